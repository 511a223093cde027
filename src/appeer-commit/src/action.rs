//! `CommitAction`: the generic [`appeer_jobs::Action`] specialized for the
//! commit stage, plus its extra columns.

use crate::Error;
use appeer_jobs::{mode::Mode, Action, CommitKind, Write};

/// A commit action handle, bound in mode `M`.
pub type CommitAction<M> = Action<M, CommitKind>;

/// Read access to the commit-specific columns.
pub trait CommitActionExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn parse_label(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn parse_action_index(&self) -> Result<Option<i64>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn doi(&self) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn passed(&self) -> Result<bool, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn duplicate(&self) -> Result<bool, Error>;
}

impl<M: Mode> CommitActionExt for CommitAction<M> {
    fn parse_label(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.parse_label))
    }

    fn parse_action_index(&self) -> Result<Option<i64>, Error> {
        Ok(self.row()?.and_then(|r| r.parse_action_index))
    }

    fn doi(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.doi))
    }

    fn passed(&self) -> Result<bool, Error> {
        Ok(self.row()?.map(|r| r.passed == "T").unwrap_or(false))
    }

    fn duplicate(&self) -> Result<bool, Error> {
        Ok(self.row()?.map(|r| r.duplicate == "T").unwrap_or(false))
    }
}

/// Write access to the commit-specific columns.
pub trait CommitActionWriteExt {
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_metadata(&self, fields: &[(&str, Option<&str>)]) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_passed(&self, passed: bool) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    fn set_duplicate(&self, duplicate: bool) -> Result<(), Error>;
}

impl CommitActionWriteExt for CommitAction<Write> {
    fn set_metadata(&self, fields: &[(&str, Option<&str>)]) -> Result<(), Error> {
        for &(column, value) in fields {
            match value {
                Some(value) => self.set_column(column, &value)?,
                None => self.set_column(column, &Option::<String>::None)?,
            }
        }
        Ok(())
    }

    fn set_passed(&self, passed: bool) -> Result<(), Error> {
        Ok(self.set_column("passed", &if passed { "T" } else { "F" })?)
    }

    fn set_duplicate(&self, duplicate: bool) -> Result<(), Error> {
        Ok(self.set_column("duplicate", &if duplicate { "T" } else { "F" })?)
    }
}
