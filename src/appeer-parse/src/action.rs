//! `ParseAction`: the generic [`appeer_jobs::Action`] specialized for the
//! parse stage, plus its extra columns.

use crate::Error;
use appeer_jobs::{mode::Mode, Action, ParseKind, Write};

/// A parse action handle, bound in mode `M`.
pub type ParseAction<M> = Action<M, ParseKind>;

/// Read access to the parse-specific columns.
pub trait ParseActionExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn scrape_label(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn scrape_action_index(&self) -> Result<Option<i64>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn input_file(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn doi(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn committed(&self) -> Result<bool, Error>;
}

impl<M: Mode> ParseActionExt for ParseAction<M> {
    fn scrape_label(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.scrape_label))
    }

    fn scrape_action_index(&self) -> Result<Option<i64>, Error> {
        Ok(self.row()?.and_then(|r| r.scrape_action_index))
    }

    fn input_file(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.input_file))
    }

    fn doi(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.doi))
    }

    fn committed(&self) -> Result<bool, Error> {
        Ok(self.row()?.map(|r| r.committed == "T").unwrap_or(false))
    }
}

/// Write access to the parse-specific columns.
pub trait ParseActionWriteExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_metadata(&self, fields: &[(&str, Option<&str>)]) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_parser(&self, parser: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_committed(&self, committed: bool) -> Result<(), Error>;
}

impl ParseActionWriteExt for ParseAction<Write> {
    fn set_metadata(&self, fields: &[(&str, Option<&str>)]) -> Result<(), Error> {
        for &(column, value) in fields {
            match value {
                Some(value) => self.set_column(column, &value)?,
                None => self.set_column(column, &Option::<String>::None)?,
            }
        }
        Ok(())
    }

    fn set_parser(&self, parser: &str) -> Result<(), Error> {
        Ok(self.set_column("parser", &parser)?)
    }

    fn set_committed(&self, committed: bool) -> Result<(), Error> {
        Ok(self.set_column("committed", &if committed { "T" } else { "F" })?)
    }
}
