//! The commit engine: builds a [`CommitJob`] and its actions from a
//! packed entry list, then drives insertion into the `pub` store under
//! the duplicate-DOI policy, and back-propagates `committed`/
//! `job_committed` to the originating parse stage.

use crate::{
    action::{CommitAction, CommitActionWriteExt},
    error::Error,
    job::CommitJob,
    packer::{self, CommitEntry},
};
use appeer_core::JobLogger;
use appeer_db::{rows::CommitActionRow, Store};
use appeer_jobs::{ActionRunner, CommitKind, Status, Write};
use appeer_parse::{ParseAction, ParseActionWriteExt, ParseJob, ParseJobWriteExt};
use std::fs;
use std::path::Path;

fn build(
    store: Store,
    label: Option<String>,
    description: &str,
    data_directory: &Path,
    mode: &str,
    entries: Vec<CommitEntry>,
) -> Result<CommitJob<Write>, Error> {
    let label = label.unwrap_or_else(|| {
        let suffix: u32 = rand::random();
        format!("commit_{}_{:08x}", appeer_core::compact_timestamp(), suffix)
    });

    let log_path = data_directory.join("commit_logs").join(format!("{label}.log"));
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).map_err(appeer_core::Error::from)?;
    }

    let job = CommitJob::<Write>::create(store, Some(label), description, &log_path, &[("mode", &mode)])?;

    for entry in &entries {
        let fields = entry.metadata.fields();
        let mut columns: Vec<(&str, &dyn rusqlite::ToSql)> = vec![
            ("parse_label", &entry.parse_label),
            ("parse_action_index", &entry.parse_action_index),
            ("passed", &"F"),
            ("duplicate", &"F"),
        ];
        for (name, value) in &fields {
            columns.push((*name, value));
        }
        CommitAction::<Write>::append(job.store().clone(), job.label(), &columns)?;
    }

    job.mark_waiting(entries.len() as i64)?;
    Ok(job)
}

/// Mode `A`.
///
/// # Errors
///
/// Returns [`Error::Db`] on a lower-level failure.
pub fn build_auto(
    store: Store,
    label: Option<String>,
    description: &str,
    data_directory: &Path,
) -> Result<CommitJob<Write>, Error> {
    let entries = packer::pack_auto(&store)?;
    build(store, label, description, data_directory, "A", entries)
}

/// Mode `E`.
///
/// # Errors
///
/// Returns [`Error::Db`] on a lower-level failure.
pub fn build_everything(
    store: Store,
    label: Option<String>,
    description: &str,
    data_directory: &Path,
) -> Result<CommitJob<Write>, Error> {
    let entries = packer::pack_everything(&store)?;
    build(store, label, description, data_directory, "E", entries)
}

/// Mode `P`.
///
/// # Errors
///
/// Returns [`Error::Job`] if a label is unknown or not executed, or
/// [`Error::Db`] on a lower-level failure.
pub fn build_from_parse_jobs(
    store: Store,
    label: Option<String>,
    description: &str,
    data_directory: &Path,
    parse_labels: &[String],
) -> Result<CommitJob<Write>, Error> {
    let entries = packer::pack_from_parse_jobs(&store, parse_labels)?;
    build(store, label, description, data_directory, "P", entries)
}

/// Drives commit actions: duplicate-DOI policy against `pub`, and
/// back-propagation of `committed`/`job_committed` to the originating
/// parse stage.
#[derive(Debug, Clone)]
pub struct CommitEngine {
    pubs: Store,
    pub overwrite: bool,
    pub no_parse_mark: bool,
}

impl CommitEngine {
    #[must_use]
    pub const fn new(pubs: Store, overwrite: bool, no_parse_mark: bool) -> Self {
        Self {
            pubs,
            overwrite,
            no_parse_mark,
        }
    }

    fn mark_parse_back_propagation(&self, store: &Store, parse_label: &str, parse_action_index: i64) -> Result<(), Error> {
        if self.no_parse_mark {
            return Ok(());
        }

        let parse_action = ParseAction::<appeer_jobs::Write>::bind(store.clone(), parse_label, parse_action_index);
        parse_action.set_committed(true)?;

        let conn = store.connect()?;
        let actions = appeer_db::actions::by_label::<appeer_db::rows::ParseActionRow>(&conn, parse_label)?;
        drop(conn);

        let all_committed = actions
            .iter()
            .filter(|a| a.success == "T")
            .all(|a| a.committed == "T");

        if all_committed {
            ParseJob::<appeer_jobs::Write>::bind(store.clone(), parse_label).set_job_committed(true)?;
        }

        Ok(())
    }
}

impl ActionRunner<CommitKind> for CommitEngine {
    type Error = Error;

    fn run_action(&mut self, action: &CommitAction<Write>, logger: &JobLogger) -> Result<(), Error> {
        let row: CommitActionRow = action
            .row()?
            .ok_or_else(|| Error::Job(appeer_jobs::Error::NotFound {
                kind: "commit action",
                label: format!("{}#{}", action.label(), action.action_index()),
            }))?;

        let Some(doi) = row.doi.clone() else {
            logger.log(format!("action {} has no DOI to commit", action.action_index()));
            action.set_success(false)?;
            action.set_status(Status::Error)?;
            return Ok(());
        };

        // The parse action stores raw extractor output in these columns
        // (see `appeer_parse::engine::run_action`); the normalized
        // variants `pub`/`Publication` need are derived here, from the
        // raw strings plus the publisher code the originating parser
        // was registered under.
        let publisher_code = row
            .parser
            .as_deref()
            .and_then(appeer_parse::parsers::implementation_for_name)
            .map(|implementation| implementation.publisher_code);

        let normalized_publisher = row.publisher.as_deref().and_then(appeer_parse::normalize::normalized_publisher);
        let normalized_journal = match (publisher_code, row.journal.as_deref()) {
            (Some(code), Some(raw)) => appeer_parse::normalize::normalized_journal(code, raw),
            _ => None,
        };
        let normalized_received = row.received.as_deref().and_then(appeer_parse::dates::normalize_d_m_y);
        let normalized_accepted = row.accepted.as_deref().and_then(appeer_parse::dates::normalize_d_m_y);
        let normalized_published = row.published.as_deref().and_then(appeer_parse::dates::normalize_d_m_y);
        let duration = appeer_parse::dates::duration_days(normalized_received.as_deref(), normalized_published.as_deref());

        let values: Vec<(&str, &dyn rusqlite::ToSql)> = vec![
            ("doi", &doi),
            ("publisher", &row.publisher),
            ("journal", &row.journal),
            ("title", &row.title),
            ("publication_type", &row.publication_type),
            ("affiliations", &row.affiliations),
            ("received", &row.received),
            ("accepted", &row.accepted),
            ("published", &row.published),
            ("normalized_publisher", &normalized_publisher),
            ("normalized_journal", &normalized_journal),
            ("normalized_received", &normalized_received),
            ("normalized_accepted", &normalized_accepted),
            ("normalized_published", &normalized_published),
            ("duration", &duration),
        ];

        let conn = match self.pubs.connect() {
            Ok(conn) => conn,
            Err(err) => {
                logger.log(format!("action {} could not open pubs store: {err}", action.action_index()));
                action.set_success(false)?;
                action.set_status(Status::Error)?;
                return Ok(());
            }
        };

        match appeer_db::pub_table::add_entry(&conn, &doi, &values, self.overwrite) {
            Ok(outcome) => {
                drop(conn);
                action.set_duplicate(outcome.duplicate)?;
                action.set_passed(outcome.inserted)?;
                action.set_success(true)?;
                action.set_status(Status::Executed)?;

                if let (Some(parse_label), Some(parse_action_index)) =
                    (row.parse_label.clone(), row.parse_action_index)
                {
                    self.mark_parse_back_propagation(action.store(), &parse_label, parse_action_index)?;
                }
            }
            Err(err) => {
                logger.log(format!("action {} failed to commit `{doi}`: {err}", action.action_index()));
                action.set_success(false)?;
                action.set_status(Status::Error)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appeer_db::{registry::Table, table};
    use appeer_jobs::RestartMode;
    use appeer_parse::{ParseActionExt, ParseJobExt};
    use std::time::Duration;
    use tempfile::tempdir;

    fn seed_parse_job(store: &Store, label: &str, doi: &str) {
        let conn = store.connect().unwrap();
        table::add_entry(&conn, Table::ParseJobs, &[("label", &label), ("job_status", &"X")]).unwrap();
        table::add_entry(
            &conn,
            Table::Parses,
            &[
                ("label", &label),
                ("action_index", &0_i64),
                ("status", &"X"),
                ("success", &"T"),
                ("committed", &"F"),
                ("doi", &doi),
                ("publisher", &"RSC"),
            ],
        )
        .unwrap();
    }

    #[test]
    fn fresh_doi_commits_and_back_propagates() {
        let dir = tempdir().unwrap();
        let jobs_store = Store::jobs(dir.path()).unwrap();
        let pubs_store = Store::pubs(dir.path()).unwrap();
        seed_parse_job(&jobs_store, "parse1", "10.1/a");

        let job = build_from_parse_jobs(
            jobs_store.clone(),
            Some("commit1".to_string()),
            "d",
            dir.path(),
            &["parse1".to_string()],
        )
        .unwrap();

        let mut engine = CommitEngine::new(pubs_store.clone(), false, false);
        let summary = job
            .run::<CommitKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut engine)
            .unwrap();

        assert_eq!(summary.successes, 1);
        assert_eq!(summary.status, appeer_jobs::Status::Executed);

        let conn = pubs_store.connect().unwrap();
        assert!(appeer_db::pub_table::find_by_doi(&conn, "10.1/a").unwrap().is_some());

        let parse_action = ParseAction::<appeer_jobs::Read>::bind(jobs_store.clone(), "parse1", 0);
        assert!(parse_action.committed().unwrap());
        let parse_job = ParseJob::<appeer_jobs::Read>::bind(jobs_store, "parse1");
        assert!(parse_job.job_committed().unwrap());
    }

    #[test]
    fn duplicate_without_overwrite_does_not_insert_but_action_succeeds() {
        let dir = tempdir().unwrap();
        let jobs_store = Store::jobs(dir.path()).unwrap();
        let pubs_store = Store::pubs(dir.path()).unwrap();
        seed_parse_job(&jobs_store, "parse1", "10.1/a");
        seed_parse_job(&jobs_store, "parse2", "10.1/a");

        let first = build_from_parse_jobs(
            jobs_store.clone(),
            Some("commit1".to_string()),
            "d",
            dir.path(),
            &["parse1".to_string()],
        )
        .unwrap();
        let mut engine = CommitEngine::new(pubs_store.clone(), false, false);
        first
            .run::<CommitKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut engine)
            .unwrap();

        let second = build_from_parse_jobs(
            jobs_store,
            Some("commit2".to_string()),
            "d",
            dir.path(),
            &["parse2".to_string()],
        )
        .unwrap();
        let summary = second
            .run::<CommitKind, _>(RestartMode::FromScratch, Duration::from_millis(0), &mut engine)
            .unwrap();

        assert_eq!(summary.successes, 1);

        let conn = second.store().connect().unwrap();
        let row: CommitActionRow = appeer_db::actions::find(&conn, "commit2", 0).unwrap().unwrap();
        assert_eq!(row.duplicate, "T");
        assert_eq!(row.passed, "F");
        assert_eq!(row.success, "T");
    }
}
