//! The generic `Action` entity: a read/write-mode handle over a single
//! `(label, action_index)` row.

use crate::{
    kinds::{ActionKind, ActionRow},
    mode::{Mode, Read, Write},
    status::Status,
    Error,
};
use appeer_db::Store;
use std::marker::PhantomData;

/// A handle to one row of an action table, parameterized by access mode
/// `M` and stage `K`.
pub struct Action<M: Mode, K: ActionKind> {
    store: Store,
    label: String,
    action_index: i64,
    _marker: PhantomData<(M, K)>,
}

impl<M: Mode, K: ActionKind> Action<M, K> {
    #[must_use]
    pub fn bind(store: Store, label: impl Into<String>, action_index: i64) -> Self {
        Self {
            store,
            label: label.into(),
            action_index,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn action_index(&self) -> i64 {
        self.action_index
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn row(&self) -> Result<Option<K::Row>, Error> {
        let conn = self.store.connect()?;
        Ok(appeer_db::actions::find::<K::Row>(
            &conn,
            &self.label,
            self.action_index,
        )?)
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn status(&self) -> Result<Option<Status>, Error> {
        Ok(self.row()?.map(|r| Status::from_code(r.status())))
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn success(&self) -> Result<Option<bool>, Error> {
        Ok(self.row()?.map(|r| r.success() == "T"))
    }

    fn require_row(&self) -> Result<K::Row, Error> {
        self.row()?.ok_or_else(|| Error::NotFound {
            kind: "action",
            label: format!("{}#{}", self.label, self.action_index),
        })
    }
}

impl<K: ActionKind> Action<Read, K> {
    #[must_use]
    pub fn into_write(self) -> Action<Write, K> {
        Action {
            store: self.store,
            label: self.label,
            action_index: self.action_index,
            _marker: PhantomData,
        }
    }
}

impl<K: ActionKind> Action<Write, K> {
    /// The next contiguous `action_index` for `label` (i.e. the current
    /// count of actions already attached to it).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn next_index(store: &Store, label: &str) -> Result<i64, Error> {
        let conn = store.connect()?;
        Ok(appeer_db::actions::by_label::<K::Row>(&conn, label)?.len() as i64)
    }

    /// Append a new action at the next contiguous index, in status `W`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn append(
        store: Store,
        label: &str,
        extra_columns: &[(&str, &dyn rusqlite::ToSql)],
    ) -> Result<Self, Error> {
        let index = Self::next_index(&store, label)?;
        let date = appeer_core::current_datetime();

        let mut columns: Vec<(&str, &dyn rusqlite::ToSql)> = vec![
            ("label", &label),
            ("action_index", &index),
            ("date", &date),
            ("success", &"F"),
            ("status", &"W"),
        ];
        columns.extend_from_slice(extra_columns);

        let conn = store.connect()?;
        appeer_db::table::add_entry(&conn, K::TABLE, &columns)?;
        drop(conn);

        Ok(Self::bind(store, label, index))
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the action has no backing row, or
    /// [`Error::Db`] on a lower-level failure.
    pub fn set_status(&self, status: Status) -> Result<(), Error> {
        self.require_row()?;
        self.update("status", &status.code())
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the action has no backing row, or
    /// [`Error::Db`] on a lower-level failure.
    pub fn set_success(&self, success: bool) -> Result<(), Error> {
        self.require_row()?;
        self.update("success", &if success { "T" } else { "F" })
    }

    /// Generic column setter for stage-specific fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Db`] if `column` is not registered for this
    /// action's table, or on a lower-level failure.
    pub fn set_column(&self, column: &str, value: &dyn rusqlite::ToSql) -> Result<(), Error> {
        self.require_row()?;
        self.update(column, value)
    }

    fn update(&self, column: &str, value: &dyn rusqlite::ToSql) -> Result<(), Error> {
        let conn = self.store.connect()?;
        appeer_db::table::update_entry(
            &conn,
            K::TABLE,
            &[("label", &self.label), ("action_index", &self.action_index)],
            column,
            value,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appeer_db::Table;
    use tempfile::tempdir;

    struct FakeKind;
    impl crate::kinds::JobKind for FakeKind {
        type Row = appeer_db::rows::ScrapeJobRow;
        const TABLE: Table = Table::ScrapeJobs;
        const STAGE: &'static str = "scrape";
    }
    impl ActionKind for FakeKind {
        type Row = appeer_db::rows::ScrapeActionRow;
        type Job = FakeKind;
        const TABLE: Table = Table::Scrapes;
    }

    fn store_with_job(label: &str) -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::jobs(dir.path()).unwrap();
        let conn = store.connect().unwrap();
        appeer_db::table::add_entry(&conn, Table::ScrapeJobs, &[("label", &label)]).unwrap();
        (dir, store)
    }

    #[test]
    fn append_assigns_contiguous_indices() {
        let (_dir, store) = store_with_job("job1");
        let a0 = Action::<Write, FakeKind>::append(store.clone(), "job1", &[]).unwrap();
        let a1 = Action::<Write, FakeKind>::append(store, "job1", &[]).unwrap();
        assert_eq!(a0.action_index(), 0);
        assert_eq!(a1.action_index(), 1);
    }

    #[test]
    fn set_status_and_success_round_trip() {
        let (_dir, store) = store_with_job("job1");
        let action = Action::<Write, FakeKind>::append(store, "job1", &[]).unwrap();
        action.set_status(Status::Executed).unwrap();
        action.set_success(true).unwrap();

        assert_eq!(action.status().unwrap(), Some(Status::Executed));
        assert_eq!(action.success().unwrap(), Some(true));
    }
}
