//! Packing: turning a parse mode + data source into a flat list of files
//! to parse, each optionally tagged with the scrape action it came from.

use crate::Error;
use appeer_db::{
    registry::Table,
    rows::{Row, ScrapeActionRow, ScrapeJobRow},
    table::{self, Combinator},
    Store,
};
use std::path::Path;

/// One file to be parsed, optionally linked back to the scrape action it
/// was downloaded by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEntry {
    pub scrape_label: Option<String>,
    pub scrape_action_index: Option<i64>,
    pub filepath: String,
}

fn entries_from_job(conn: &rusqlite::Connection, job: &ScrapeJobRow, require_unparsed: bool) -> Result<Vec<ParseEntry>, Error> {
    let actions = appeer_db::actions::by_label::<ScrapeActionRow>(conn, &job.label)?;
    Ok(actions
        .into_iter()
        .filter(|a| a.success == "T")
        .filter(|a| !require_unparsed || a.parsed == "F")
        .filter_map(|a| {
            a.out_file.clone().map(|filepath| ParseEntry {
                scrape_label: Some(job.label.clone()),
                scrape_action_index: Some(a.action_index),
                filepath,
            })
        })
        .collect())
}

fn executed_scrape_jobs(conn: &rusqlite::Connection) -> Result<Vec<ScrapeJobRow>, Error> {
    let rows = table::search(conn, Table::ScrapeJobs, &[("job_status", &"X")], Combinator::And)?;
    rows.iter().map(|v| Ok(ScrapeJobRow::from_values(v)?)).collect()
}

/// Mode `A`: successful, previously-unparsed scrape actions across every
/// executed (`X`) scrape job.
///
/// # Errors
///
/// Returns [`Error::Db`] on a lower-level failure.
pub fn pack_auto(store: &Store) -> Result<Vec<ParseEntry>, Error> {
    let conn = store.connect()?;
    let mut out = Vec::new();
    for job in executed_scrape_jobs(&conn)? {
        out.extend(entries_from_job(&conn, &job, true)?);
    }
    Ok(out)
}

/// Mode `E`: every successful scrape action across every executed scrape
/// job, regardless of prior parse state.
///
/// # Errors
///
/// Returns [`Error::Db`] on a lower-level failure.
pub fn pack_everything(store: &Store) -> Result<Vec<ParseEntry>, Error> {
    let conn = store.connect()?;
    let mut out = Vec::new();
    for job in executed_scrape_jobs(&conn)? {
        out.extend(entries_from_job(&conn, &job, false)?);
    }
    Ok(out)
}

/// Mode `S`: successful scrape actions of a caller-supplied list of
/// scrape-job labels. Every label must exist and be `job_status='X'`.
///
/// # Errors
///
/// Returns [`Error::BadInput`] if a label doesn't exist or isn't
/// executed, or [`Error::Db`] on a lower-level failure.
pub fn pack_scrape_jobs(store: &Store, labels: &[String]) -> Result<Vec<ParseEntry>, Error> {
    let conn = store.connect()?;
    let mut out = Vec::new();
    for label in labels {
        let job: ScrapeJobRow = appeer_db::jobs::find_by_label(&conn, label)?
            .ok_or_else(|| Error::BadInput(format!("unknown scrape job `{label}`")))?;
        if job.job_status != "X" {
            return Err(Error::BadInput(format!(
                "scrape job `{label}` is not executed (status `{}`)",
                job.job_status
            )));
        }
        out.extend(entries_from_job(&conn, &job, false)?);
    }
    Ok(out)
}

/// Mode `F`: an arbitrary file list with no scrape-origin link.
/// Unreadable files are silently dropped; the returned report lists
/// which ones.
///
/// # Errors
///
/// Returns [`Error::BadInput`] if none of the inputted files are
/// readable.
pub fn pack_file_list(paths: &[String]) -> Result<(Vec<ParseEntry>, Vec<String>), Error> {
    let mut entries = Vec::new();
    let mut report = Vec::new();

    for path in paths {
        if Path::new(path).is_file() {
            entries.push(ParseEntry {
                scrape_label: None,
                scrape_action_index: None,
                filepath: path.clone(),
            });
        } else {
            report.push(format!("unreadable or missing: {path}"));
        }
    }

    if entries.is_empty() {
        return Err(Error::BadInput(
            "none of the inputted files are readable".to_string(),
        ));
    }

    Ok((entries, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use appeer_db::Store;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        (dir, Store::jobs(dir.path()).unwrap())
    }

    fn seed_job(store: &Store, label: &str, job_status: &str, actions: &[(i64, &str, &str, &str)]) {
        let conn = store.connect().unwrap();
        table::add_entry(&conn, Table::ScrapeJobs, &[("label", &label), ("job_status", &job_status)]).unwrap();
        for (idx, success, parsed, out_file) in actions {
            table::add_entry(
                &conn,
                Table::Scrapes,
                &[
                    ("label", &label),
                    ("action_index", idx),
                    ("status", &"X"),
                    ("success", success),
                    ("parsed", parsed),
                    ("out_file", out_file),
                ],
            )
            .unwrap();
        }
    }

    #[test]
    fn mode_a_only_unparsed_successes_in_executed_jobs() {
        let (_dir, store) = store();
        seed_job(
            &store,
            "job1",
            "X",
            &[(0, "T", "F", "a.html"), (1, "T", "T", "b.html"), (2, "F", "F", "c.html")],
        );
        seed_job(&store, "job2", "R", &[(0, "T", "F", "d.html")]);

        let entries = pack_auto(&store).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filepath, "a.html");
        assert_eq!(entries[0].scrape_label.as_deref(), Some("job1"));
    }

    #[test]
    fn mode_e_ignores_prior_parse_state() {
        let (_dir, store) = store();
        seed_job(
            &store,
            "job1",
            "X",
            &[(0, "T", "F", "a.html"), (1, "T", "T", "b.html")],
        );

        let entries = pack_everything(&store).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn mode_s_rejects_non_executed_job() {
        let (_dir, store) = store();
        seed_job(&store, "job1", "R", &[(0, "T", "F", "a.html")]);

        let err = pack_scrape_jobs(&store, &["job1".to_string()]).unwrap_err();
        assert!(matches!(err, Error::BadInput(_)));
    }

    #[test]
    fn mode_f_drops_unreadable_files() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real.txt");
        std::fs::write(&real, "data").unwrap();

        let (entries, report) = pack_file_list(&[
            real.to_string_lossy().to_string(),
            "/nonexistent/file.txt".to_string(),
        ])
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn mode_f_all_unreadable_is_an_error() {
        let err = pack_file_list(&["/nonexistent/a.txt".to_string()]).unwrap_err();
        assert!(matches!(err, Error::BadInput(_)));
    }
}
