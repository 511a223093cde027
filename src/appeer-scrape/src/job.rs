//! `ScrapeJob`: the generic [`appeer_jobs::Job`] specialized for the
//! scrape stage, plus its extra columns (`download_directory`, `zip_file`,
//! `job_parsed`).

use crate::Error;
use appeer_jobs::{mode::Mode, Job, ScrapeKind, Write};

/// A scrape job handle, bound in mode `M`.
pub type ScrapeJob<M> = Job<M, ScrapeKind>;

/// Read access to the scrape-specific columns.
pub trait ScrapeJobExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn download_directory(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn zip_file(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn job_parsed(&self) -> Result<bool, Error>;
}

impl<M: Mode> ScrapeJobExt for ScrapeJob<M> {
    fn download_directory(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.download_directory))
    }

    fn zip_file(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.zip_file))
    }

    fn job_parsed(&self) -> Result<bool, Error> {
        Ok(self.row()?.map(|r| r.job_parsed == "T").unwrap_or(false))
    }
}

/// Write access to the scrape-specific columns.
pub trait ScrapeJobWriteExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_zip_file(&self, path: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_job_parsed(&self, parsed: bool) -> Result<(), Error>;
}

impl ScrapeJobWriteExt for ScrapeJob<Write> {
    fn set_zip_file(&self, path: &str) -> Result<(), Error> {
        Ok(self.set_column("zip_file", &path)?)
    }

    fn set_job_parsed(&self, parsed: bool) -> Result<(), Error> {
        Ok(self.set_column("job_parsed", &if parsed { "T" } else { "F" })?)
    }
}
