//! Stage markers tying the generic [`crate::job::Job`]/[`crate::action::Action`]
//! runtime to the concrete row shapes `appeer-db` exposes for each stage.
//!
//! The abstract `Job`/`Action` entities are dispatched by stage with a
//! tagged variant instead of a string tag: `ScrapeKind`, `ParseKind`,
//! `CommitKind` are zero-sized marker types, each pinning down which
//! `appeer_db` row type and table the generic runtime talks to. Shared
//! behavior (counters, log, step) is read through the [`JobRow`]/
//! [`ActionRow`] traits so it only needs to be written once.

use appeer_db::{
    registry::Table,
    rows::{
        CommitActionRow, CommitJobRow, ParseActionRow, ParseJobRow, ScrapeActionRow, ScrapeJobRow,
    },
};

/// Read access to the fields every job table shares.
pub trait JobRow: appeer_db::rows::Row {
    fn label(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn date(&self) -> Option<&str>;
    fn log(&self) -> Option<&str>;
    fn mode(&self) -> Option<&str>;
    fn job_status(&self) -> &str;
    fn job_step(&self) -> i64;
    fn job_successes(&self) -> i64;
    fn job_fails(&self) -> i64;
    fn no_of_publications(&self) -> i64;
}

/// Read access to the fields every action table shares.
pub trait ActionRow: appeer_db::rows::Row {
    fn label(&self) -> &str;
    fn action_index(&self) -> i64;
    fn date(&self) -> Option<&str>;
    fn success(&self) -> &str;
    fn status(&self) -> &str;
}

macro_rules! job_row_impl {
    ($row:ty) => {
        impl JobRow for $row {
            fn label(&self) -> &str {
                &self.label
            }
            fn description(&self) -> Option<&str> {
                self.description.as_deref()
            }
            fn date(&self) -> Option<&str> {
                self.date.as_deref()
            }
            fn log(&self) -> Option<&str> {
                self.log.as_deref()
            }
            fn mode(&self) -> Option<&str> {
                self.mode.as_deref()
            }
            fn job_status(&self) -> &str {
                &self.job_status
            }
            fn job_step(&self) -> i64 {
                self.job_step
            }
            fn job_successes(&self) -> i64 {
                self.job_successes
            }
            fn job_fails(&self) -> i64 {
                self.job_fails
            }
            fn no_of_publications(&self) -> i64 {
                self.no_of_publications
            }
        }
    };
}

job_row_impl!(ScrapeJobRow);
job_row_impl!(ParseJobRow);
job_row_impl!(CommitJobRow);

macro_rules! action_row_impl {
    ($row:ty) => {
        impl ActionRow for $row {
            fn label(&self) -> &str {
                &self.label
            }
            fn action_index(&self) -> i64 {
                self.action_index
            }
            fn date(&self) -> Option<&str> {
                self.date.as_deref()
            }
            fn success(&self) -> &str {
                &self.success
            }
            fn status(&self) -> &str {
                &self.status
            }
        }
    };
}

action_row_impl!(ScrapeActionRow);
action_row_impl!(ParseActionRow);
action_row_impl!(CommitActionRow);

/// Ties a stage marker to its job row type and table.
pub trait JobKind {
    type Row: JobRow;
    const TABLE: Table;
    const STAGE: &'static str;
}

/// Ties a stage marker to its action row type, table, and owning job kind.
pub trait ActionKind {
    type Row: ActionRow;
    type Job: JobKind;
    const TABLE: Table;
}

/// The scrape stage.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeKind;

/// The parse stage.
#[derive(Debug, Clone, Copy)]
pub struct ParseKind;

/// The commit stage.
#[derive(Debug, Clone, Copy)]
pub struct CommitKind;

impl JobKind for ScrapeKind {
    type Row = ScrapeJobRow;
    const TABLE: Table = Table::ScrapeJobs;
    const STAGE: &'static str = "scrape";
}

impl JobKind for ParseKind {
    type Row = ParseJobRow;
    const TABLE: Table = Table::ParseJobs;
    const STAGE: &'static str = "parse";
}

impl JobKind for CommitKind {
    type Row = CommitJobRow;
    const TABLE: Table = Table::CommitJobs;
    const STAGE: &'static str = "commit";
}

impl ActionKind for ScrapeKind {
    type Row = ScrapeActionRow;
    type Job = ScrapeKind;
    const TABLE: Table = Table::Scrapes;
}

impl ActionKind for ParseKind {
    type Row = ParseActionRow;
    type Job = ParseKind;
    const TABLE: Table = Table::Parses;
}

impl ActionKind for CommitKind {
    type Row = CommitActionRow;
    type Job = CommitKind;
    const TABLE: Table = Table::Commits;
}
