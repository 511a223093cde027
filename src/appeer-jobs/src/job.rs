//! The generic `Job` entity: a read/write-mode handle over a labeled row in
//! one of the three job tables.
//!
//! Reading a field queries the backing row fresh every time — there is no
//! in-memory cache to go stale. Writing (only available in [`Write`] mode)
//! issues an `UPDATE` inside its own transaction and returns once it lands.

use crate::{
    kinds::{JobKind, JobRow},
    mode::{Mode, Read, Write},
    status::Status,
    Error,
};
use appeer_db::Store;
use std::{fs::OpenOptions, io::Write as _, marker::PhantomData, path::Path};

/// A handle to one row of a job table, parameterized by access mode `M`
/// and stage `K`.
pub struct Job<M: Mode, K: JobKind> {
    store: Store,
    label: String,
    _marker: PhantomData<(M, K)>,
}

impl<M: Mode, K: JobKind> Job<M, K> {
    /// Bind a handle to `label` without checking that it exists yet.
    /// Reading a field of a job that turns out not to exist yields `None`.
    #[must_use]
    pub fn bind(store: Store, label: impl Into<String>) -> Self {
        Self {
            store,
            label: label.into(),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The raw backing row, or `None` if this label does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn row(&self) -> Result<Option<K::Row>, Error> {
        let conn = self.store.connect()?;
        Ok(appeer_db::jobs::find_by_label::<K::Row>(&conn, &self.label)?)
    }

    /// `true` if this label has a backing row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn exists(&self) -> Result<bool, Error> {
        Ok(self.row()?.is_some())
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn description(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.description().map(str::to_string)))
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn log_path(&self) -> Result<Option<String>, Error> {
        Ok(self.row()?.and_then(|r| r.log().map(str::to_string)))
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn status(&self) -> Result<Option<Status>, Error> {
        Ok(self.row()?.map(|r| Status::from_code(r.job_status())))
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn step(&self) -> Result<Option<i64>, Error> {
        Ok(self.row()?.map(|r| r.job_step()))
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn successes(&self) -> Result<Option<i64>, Error> {
        Ok(self.row()?.map(|r| r.job_successes()))
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn fails(&self) -> Result<Option<i64>, Error> {
        Ok(self.row()?.map(|r| r.job_fails()))
    }

    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn no_of_publications(&self) -> Result<Option<i64>, Error> {
        Ok(self.row()?.map(|r| r.no_of_publications()))
    }

    fn require_row(&self) -> Result<K::Row, Error> {
        self.row()?.ok_or_else(|| Error::NotFound {
            kind: K::STAGE,
            label: self.label.clone(),
        })
    }
}

impl<K: JobKind> Job<Read, K> {
    /// Re-bind this handle as a write-mode handle. The caller attests the
    /// job is not concurrently held elsewhere for writing.
    #[must_use]
    pub fn into_write(self) -> Job<Write, K> {
        Job {
            store: self.store,
            label: self.label,
            _marker: PhantomData,
        }
    }
}

impl<K: JobKind> Job<Write, K> {
    /// Create a new job row in status `I`, with the shared columns plus
    /// whatever stage-specific columns `extra_columns` supplies (e.g.
    /// `download_directory` for a scrape job). Writes a one-line preamble
    /// to `log_path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Db`] if the row already exists or cannot be
    /// inserted, or an IO error wrapped as [`appeer_db::Error`] equivalent
    /// is not applicable here — log-file failures are silently ignored, as
    /// a missing preamble line is not fatal to job creation.
    pub fn create(
        store: Store,
        label: Option<String>,
        description: &str,
        log_path: &Path,
        extra_columns: &[(&str, &dyn rusqlite::ToSql)],
    ) -> Result<Self, Error> {
        let label = label.unwrap_or_else(|| default_label(K::STAGE));
        let date = appeer_core::current_datetime();
        let log_str = log_path.to_string_lossy().to_string();

        let mut columns: Vec<(&str, &dyn rusqlite::ToSql)> = vec![
            ("label", &label),
            ("description", &description),
            ("date", &date),
            ("log", &log_str),
            ("job_status", &"I"),
            ("job_step", &0_i64),
            ("job_successes", &0_i64),
            ("job_fails", &0_i64),
            ("no_of_publications", &0_i64),
        ];
        columns.extend_from_slice(extra_columns);

        let conn = store.connect()?;
        appeer_db::table::add_entry(&conn, K::TABLE, &columns)?;
        drop(conn);

        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
            let _ = writeln!(file, "[{date}] job `{label}` created ({} stage)", K::STAGE);
        }

        Ok(Self::bind(store, label))
    }

    /// Set `no_of_publications` after the initial action set is known, and
    /// move the job into `W` (waiting) if it is still `I`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn mark_waiting(&self, no_of_publications: i64) -> Result<(), Error> {
        self.require_row()?;
        let conn = self.store.connect()?;
        appeer_db::table::update_entry(
            &conn,
            K::TABLE,
            &[("label", &self.label)],
            "no_of_publications",
            &no_of_publications,
        )?;
        appeer_db::table::update_entry(
            &conn,
            K::TABLE,
            &[("label", &self.label)],
            "job_status",
            &Status::Waiting.code(),
        )?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the job has no backing row, or
    /// [`Error::Db`] on a lower-level failure.
    pub fn set_status(&self, status: Status) -> Result<(), Error> {
        self.require_row()?;
        let conn = self.store.connect()?;
        appeer_db::table::update_entry(
            &conn,
            K::TABLE,
            &[("label", &self.label)],
            "job_status",
            &status.code(),
        )?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the job has no backing row, or
    /// [`Error::Db`] on a lower-level failure.
    pub fn set_step(&self, step: i64) -> Result<(), Error> {
        self.require_row()?;
        let conn = self.store.connect()?;
        appeer_db::table::update_entry(&conn, K::TABLE, &[("label", &self.label)], "job_step", &step)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the job has no backing row, or
    /// [`Error::Db`] on a lower-level failure.
    pub fn set_successes(&self, value: i64) -> Result<(), Error> {
        self.require_row()?;
        let conn = self.store.connect()?;
        appeer_db::table::update_entry(&conn, K::TABLE, &[("label", &self.label)], "job_successes", &value)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the job has no backing row, or
    /// [`Error::Db`] on a lower-level failure.
    pub fn set_fails(&self, value: i64) -> Result<(), Error> {
        self.require_row()?;
        let conn = self.store.connect()?;
        appeer_db::table::update_entry(&conn, K::TABLE, &[("label", &self.label)], "job_fails", &value)?;
        Ok(())
    }

    /// Generic column setter for stage-specific fields (`download_directory`,
    /// `zip_file`, `job_parsed`, `parse_directory`, `job_committed`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Db`] if `column` is not registered for this job's
    /// table, or on a lower-level failure.
    pub fn set_column(&self, column: &str, value: &dyn rusqlite::ToSql) -> Result<(), Error> {
        self.require_row()?;
        let conn = self.store.connect()?;
        appeer_db::table::update_entry(&conn, K::TABLE, &[("label", &self.label)], column, value)?;
        Ok(())
    }

    /// Delete this job and (by `ON DELETE CASCADE`) every one of its
    /// actions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Db`] on a lower-level failure.
    pub fn delete(&self) -> Result<(), Error> {
        let conn = self.store.connect()?;
        appeer_db::table::delete_entry(&conn, K::TABLE, &[("label", &self.label)])?;
        Ok(())
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

fn default_label(stage: &str) -> String {
    let suffix: u32 = rand::random();
    format!("{stage}_{}_{:08x}", appeer_core::compact_timestamp(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appeer_db::Table;
    use tempfile::tempdir;

    struct FakeKind;
    impl JobKind for FakeKind {
        type Row = appeer_db::rows::ScrapeJobRow;
        const TABLE: Table = Table::ScrapeJobs;
        const STAGE: &'static str = "scrape";
    }

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::jobs(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn create_then_read_round_trips() {
        let (dir, store) = store();
        let log_path = dir.path().join("job.log");
        let job = Job::<Write, FakeKind>::create(
            store,
            Some("fixed_label".to_string()),
            "a test job",
            &log_path,
            &[("job_parsed", &"F")],
        )
        .unwrap();

        assert_eq!(job.label(), "fixed_label");
        assert_eq!(job.status().unwrap(), Some(Status::Initialized));
        assert_eq!(job.description().unwrap().as_deref(), Some("a test job"));
        assert!(log_path.exists());
    }

    #[test]
    fn mark_waiting_sets_count_and_status() {
        let (dir, store) = store();
        let log_path = dir.path().join("job.log");
        let job =
            Job::<Write, FakeKind>::create(store, None, "d", &log_path, &[("job_parsed", &"F")]).unwrap();

        job.mark_waiting(3).unwrap();
        assert_eq!(job.no_of_publications().unwrap(), Some(3));
        assert_eq!(job.status().unwrap(), Some(Status::Waiting));
    }

    #[test]
    fn writing_missing_job_fails() {
        let (_dir, store) = store();
        let job = Job::<Write, FakeKind>::bind(store, "missing");
        assert!(matches!(job.set_step(1), Err(Error::NotFound { .. })));
    }
}
