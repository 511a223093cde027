//! Packing: turning a commit mode into a flat list of previously-parsed
//! metadata ready to commit.
//!
//! Mode `A` discovers `X`-status parse jobs with uncommitted actions and
//! filters `committed == 'F'`; modes `E`/`P` do not filter on `committed`
//! — `E` behaves like `A` without that filter.

use crate::Error;
use appeer_db::{
    registry::Table,
    rows::{ParseActionRow, ParseJobRow, Row},
    table::{self, Combinator},
    Store,
};

/// The raw metadata fields echoed from a parse action onto a commit
/// action, plus the parser name that produced them (needed downstream
/// to recover the publisher code a journal string should normalize
/// against; see `appeer_commit::engine`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMetadata {
    pub doi: Option<String>,
    pub publisher: Option<String>,
    pub journal: Option<String>,
    pub title: Option<String>,
    pub publication_type: Option<String>,
    pub affiliations: Option<String>,
    pub received: Option<String>,
    pub accepted: Option<String>,
    pub published: Option<String>,
    pub parser: Option<String>,
}

impl ParsedMetadata {
    #[must_use]
    pub fn fields(&self) -> [(&'static str, Option<&str>); 10] {
        [
            ("doi", self.doi.as_deref()),
            ("publisher", self.publisher.as_deref()),
            ("journal", self.journal.as_deref()),
            ("title", self.title.as_deref()),
            ("publication_type", self.publication_type.as_deref()),
            ("affiliations", self.affiliations.as_deref()),
            ("received", self.received.as_deref()),
            ("accepted", self.accepted.as_deref()),
            ("published", self.published.as_deref()),
            ("parser", self.parser.as_deref()),
        ]
    }
}

impl From<&ParseActionRow> for ParsedMetadata {
    fn from(row: &ParseActionRow) -> Self {
        Self {
            doi: row.doi.clone(),
            publisher: row.publisher.clone(),
            journal: row.journal.clone(),
            title: row.title.clone(),
            publication_type: row.publication_type.clone(),
            affiliations: row.affiliations.clone(),
            received: row.received.clone(),
            accepted: row.accepted.clone(),
            published: row.published.clone(),
            parser: row.parser.clone(),
        }
    }
}

/// One parse action's metadata, ready to be turned into a commit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    pub parse_label: String,
    pub parse_action_index: i64,
    pub metadata: ParsedMetadata,
}

fn entries_from_job(
    conn: &rusqlite::Connection,
    job: &ParseJobRow,
    require_uncommitted: bool,
) -> Result<Vec<CommitEntry>, Error> {
    let actions = appeer_db::actions::by_label::<ParseActionRow>(conn, &job.label)?;
    Ok(actions
        .iter()
        .filter(|a| a.success == "T")
        .filter(|a| !require_uncommitted || a.committed == "F")
        .map(|a| CommitEntry {
            parse_label: job.label.clone(),
            parse_action_index: a.action_index,
            metadata: ParsedMetadata::from(a),
        })
        .collect())
}

fn executed_parse_jobs(conn: &rusqlite::Connection) -> Result<Vec<ParseJobRow>, Error> {
    let rows = table::search(conn, Table::ParseJobs, &[("job_status", &"X")], Combinator::And)?;
    Ok(rows
        .iter()
        .map(|v| ParseJobRow::from_values(v))
        .collect::<Result<_, _>>()?)
}

/// Mode `A`: successful, previously-uncommitted parse actions across
/// every executed (`X`) parse job.
///
/// # Errors
///
/// Returns [`Error::Db`] on a lower-level failure.
pub fn pack_auto(store: &Store) -> Result<Vec<CommitEntry>, Error> {
    let conn = store.connect()?;
    let mut out = Vec::new();
    for job in executed_parse_jobs(&conn)? {
        out.extend(entries_from_job(&conn, &job, true)?);
    }
    Ok(out)
}

/// Mode `E`: every successful parse action across every executed parse
/// job, regardless of prior commit state.
///
/// # Errors
///
/// Returns [`Error::Db`] on a lower-level failure.
pub fn pack_everything(store: &Store) -> Result<Vec<CommitEntry>, Error> {
    let conn = store.connect()?;
    let mut out = Vec::new();
    for job in executed_parse_jobs(&conn)? {
        out.extend(entries_from_job(&conn, &job, false)?);
    }
    Ok(out)
}

/// Mode `P`: successful parse actions of a caller-supplied list of
/// parse-job labels. Every label must exist and be `job_status='X'`.
///
/// # Errors
///
/// Returns [`Error::Job`] if a label is unknown (`NotFound`) or not
/// executed (`InvariantViolation`), or [`Error::Db`] on a lower-level
/// failure.
pub fn pack_from_parse_jobs(store: &Store, labels: &[String]) -> Result<Vec<CommitEntry>, Error> {
    let conn = store.connect()?;
    let mut out = Vec::new();
    for label in labels {
        let job: ParseJobRow = appeer_db::jobs::find_by_label(&conn, label)?.ok_or_else(|| {
            Error::Job(appeer_jobs::Error::NotFound {
                kind: "parse job",
                label: label.clone(),
            })
        })?;
        if job.job_status != "X" {
            return Err(Error::Job(appeer_jobs::Error::InvariantViolation(format!(
                "parse job `{label}` is not executed (status `{}`)",
                job.job_status
            ))));
        }
        out.extend(entries_from_job(&conn, &job, false)?);
    }
    Ok(out)
}
