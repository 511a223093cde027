//! `ScrapeAction`: the generic [`appeer_jobs::Action`] specialized for the
//! scrape stage, plus its extra columns (`url`, `journal`, `strategy`,
//! `method`, `out_file`, `parsed`).

use crate::Error;
use appeer_jobs::{mode::Mode, Action, ScrapeKind, Write};

/// A scrape action handle, bound in mode `M`.
pub type ScrapeAction<M> = Action<M, ScrapeKind>;

/// Read access to the scrape-specific columns.
pub trait ScrapeActionExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn url(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn journal(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn out_file(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn parsed(&self) -> Result<bool, Error>;
}

impl<M: Mode> ScrapeActionExt for ScrapeAction<M> {
    fn url(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.url))
    }

    fn journal(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.journal))
    }

    fn out_file(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.out_file))
    }

    fn parsed(&self) -> Result<bool, Error> {
        Ok(self.row()?.map(|r| r.parsed == "T").unwrap_or(false))
    }
}

/// Write access to the scrape-specific columns.
pub trait ScrapeActionWriteExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_url(&self, url: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_journal(&self, journal: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_strategy(&self, strategy: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_method(&self, method: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_out_file(&self, path: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_parsed(&self, parsed: bool) -> Result<(), Error>;
}

impl ScrapeActionWriteExt for ScrapeAction<Write> {
    fn set_url(&self, url: &str) -> Result<(), Error> {
        Ok(self.set_column("url", &url)?)
    }

    fn set_journal(&self, journal: &str) -> Result<(), Error> {
        Ok(self.set_column("journal", &journal)?)
    }

    fn set_strategy(&self, strategy: &str) -> Result<(), Error> {
        Ok(self.set_column("strategy", &strategy)?)
    }

    fn set_method(&self, method: &str) -> Result<(), Error> {
        Ok(self.set_column("method", &method)?)
    }

    fn set_out_file(&self, path: &str) -> Result<(), Error> {
        Ok(self.set_column("out_file", &path)?)
    }

    fn set_parsed(&self, parsed: bool) -> Result<(), Error> {
        Ok(self.set_column("parsed", &if parsed { "T" } else { "F" })?)
    }
}
