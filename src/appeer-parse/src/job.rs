//! `ParseJob`: the generic [`appeer_jobs::Job`] specialized for the parse
//! stage, plus its extra columns (`parse_directory`, `job_committed`).

use crate::Error;
use appeer_jobs::{mode::Mode, Job, ParseKind, Write};

/// A parse job handle, bound in mode `M`.
pub type ParseJob<M> = Job<M, ParseKind>;

/// Read access to the parse-specific columns.
pub trait ParseJobExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn parse_directory(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn job_committed(&self) -> Result<bool, Error>;
}

impl<M: Mode> ParseJobExt for ParseJob<M> {
    fn parse_directory(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.parse_directory))
    }

    fn job_committed(&self) -> Result<bool, Error> {
        Ok(self.row()?.map(|r| r.job_committed == "T").unwrap_or(false))
    }
}

/// Write access to the parse-specific columns.
pub trait ParseJobWriteExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_job_committed(&self, committed: bool) -> Result<(), Error>;
}

impl ParseJobWriteExt for ParseJob<Write> {
    fn set_job_committed(&self, committed: bool) -> Result<(), Error> {
        Ok(self.set_column("job_committed", &if committed { "T" } else { "F" })?)
    }
}
