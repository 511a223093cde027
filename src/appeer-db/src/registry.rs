//! The static table/column registry.
//!
//! Every mutating or searching query is checked against this registry
//! before it reaches sqlite: the table name must be one of [`Table`]'s
//! variants, and the column name must appear in that table's column list.
//! This is the only thing standing between caller-supplied strings and the
//! query builder, so it is deliberately exhaustive and conservative — no
//! table or column is added to a query string unless it first round-trips
//! through [`Table::columns`]/[`Table::contains_column`].

use crate::Error;

/// The tables that exist across the two on-disk stores (`jobs.db` holds
/// the first six, `pubs.db` holds `Pub`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    ScrapeJobs,
    Scrapes,
    ParseJobs,
    Parses,
    CommitJobs,
    Commits,
    Pub,
}

impl Table {
    /// The table's name as it appears in sqlite.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ScrapeJobs => "scrape_jobs",
            Self::Scrapes => "scrapes",
            Self::ParseJobs => "parse_jobs",
            Self::Parses => "parses",
            Self::CommitJobs => "commit_jobs",
            Self::Commits => "commits",
            Self::Pub => "pub",
        }
    }

    /// The full, ordered column list for this table, as created by its
    /// `CREATE TABLE` statement.
    #[must_use]
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::ScrapeJobs => &[
                "label",
                "description",
                "date",
                "log",
                "mode",
                "job_status",
                "job_step",
                "job_successes",
                "job_fails",
                "no_of_publications",
                "download_directory",
                "zip_file",
                "job_parsed",
            ],
            Self::Scrapes => &[
                "label",
                "action_index",
                "date",
                "success",
                "status",
                "url",
                "journal",
                "strategy",
                "method",
                "out_file",
                "parsed",
            ],
            Self::ParseJobs => &[
                "label",
                "description",
                "date",
                "log",
                "mode",
                "job_status",
                "job_step",
                "job_successes",
                "job_fails",
                "no_of_publications",
                "parse_directory",
                "job_committed",
            ],
            Self::Parses => &[
                "label",
                "action_index",
                "date",
                "success",
                "status",
                "scrape_label",
                "scrape_action_index",
                "input_file",
                "doi",
                "publisher",
                "journal",
                "title",
                "publication_type",
                "affiliations",
                "received",
                "accepted",
                "published",
                "parser",
                "committed",
            ],
            Self::CommitJobs => &[
                "label",
                "description",
                "date",
                "log",
                "mode",
                "job_status",
                "job_step",
                "job_successes",
                "job_fails",
                "no_of_publications",
            ],
            Self::Commits => &[
                "label",
                "action_index",
                "date",
                "success",
                "status",
                "parse_label",
                "parse_action_index",
                "doi",
                "publisher",
                "journal",
                "title",
                "publication_type",
                "affiliations",
                "received",
                "accepted",
                "published",
                "parser",
                "passed",
                "duplicate",
            ],
            Self::Pub => &[
                "doi",
                "publisher",
                "journal",
                "title",
                "publication_type",
                "affiliations",
                "received",
                "accepted",
                "published",
                "normalized_publisher",
                "normalized_journal",
                "normalized_received",
                "normalized_accepted",
                "normalized_published",
                "duration",
            ],
        }
    }

    /// `true` if `column` is a registered column of this table.
    #[must_use]
    pub fn contains_column(self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    /// Validate `column` against this table's registered columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if `column` is not registered.
    pub fn check_column(self, column: &str) -> Result<(), Error> {
        if self.contains_column(column) {
            Ok(())
        } else {
            Err(Error::UnknownColumn {
                table: self.name(),
                column: column.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unregistered_columns() {
        assert!(Table::ScrapeJobs.check_column("job_status").is_ok());
        assert!(Table::ScrapeJobs.check_column("'; DROP TABLE scrape_jobs; --").is_err());
    }

    #[test]
    fn every_table_lists_the_shared_job_columns() {
        for table in [Table::ScrapeJobs, Table::ParseJobs, Table::CommitJobs] {
            for column in ["label", "job_status", "job_step"] {
                assert!(table.contains_column(column), "{table:?} missing {column}");
            }
        }
    }
}
