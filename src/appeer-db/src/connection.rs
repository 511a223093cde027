//! Per-operation sqlite connections for the two on-disk stores.
//!
//! `jobs.db` holds `scrape_jobs`, `scrapes`, `parse_jobs`, `parses`,
//! `commit_jobs`, `commits`. `pubs.db` holds `pub`. Each logical operation
//! opens its own connection, uses it inside a transaction, and lets it
//! drop — this crate never keeps a connection pool alive across calls.

use crate::{registry::Table, Error};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// A handle to one of the two on-disk stores. Cheap to clone; holds only a
/// path.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    tables: &'static [Table],
}

/// The six job/action tables, held in `jobs.db`.
pub const JOBS_TABLES: &[Table] = &[
    Table::ScrapeJobs,
    Table::Scrapes,
    Table::ParseJobs,
    Table::Parses,
    Table::CommitJobs,
    Table::Commits,
];

/// The publications table, held in `pubs.db`.
pub const PUBS_TABLES: &[Table] = &[Table::Pub];

impl Store {
    /// Open (creating if needed) the `jobs.db` store at `data_directory`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `data_directory` cannot be created, or
    /// [`Error::Sqlite`] if the schema cannot be created.
    pub fn jobs(data_directory: &Path) -> Result<Self, Error> {
        Self::open(data_directory, "jobs.db", JOBS_TABLES)
    }

    /// Open (creating if needed) the `pubs.db` store at `data_directory`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `data_directory` cannot be created, or
    /// [`Error::Sqlite`] if the schema cannot be created.
    pub fn pubs(data_directory: &Path) -> Result<Self, Error> {
        Self::open(data_directory, "pubs.db", PUBS_TABLES)
    }

    fn open(data_directory: &Path, file_name: &str, tables: &'static [Table]) -> Result<Self, Error> {
        let db_dir = data_directory.join("db");
        std::fs::create_dir_all(&db_dir)?;
        let path = db_dir.join(file_name);

        let store = Self { path, tables };
        let conn = store.connect()?;
        create_schema(&conn, tables)?;
        Ok(store)
    }

    /// Open a fresh connection to this store. One connection per logical
    /// operation — callers are expected to use it and let it drop rather
    /// than cache it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sqlite`] if the connection cannot be opened.
    pub fn connect(&self) -> Result<Connection, Error> {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    /// The tables this store is responsible for.
    #[must_use]
    pub const fn tables(&self) -> &'static [Table] {
        self.tables
    }

    /// The on-disk path of this store's database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn create_schema(conn: &Connection, tables: &[Table]) -> Result<(), Error> {
    for table in tables {
        conn.execute_batch(&create_table_sql(*table))?;
    }
    Ok(())
}

fn create_table_sql(table: Table) -> String {
    let body = match table {
        Table::ScrapeJobs => {
            "label TEXT PRIMARY KEY, description TEXT, date TEXT, log TEXT, mode TEXT, \
             job_status TEXT NOT NULL DEFAULT 'I', job_step INTEGER NOT NULL DEFAULT 0, \
             job_successes INTEGER NOT NULL DEFAULT 0, job_fails INTEGER NOT NULL DEFAULT 0, \
             no_of_publications INTEGER NOT NULL DEFAULT 0, download_directory TEXT, \
             zip_file TEXT, job_parsed TEXT NOT NULL DEFAULT 'F'"
        }
        Table::Scrapes => {
            "label TEXT NOT NULL, action_index INTEGER NOT NULL, date TEXT, success TEXT, \
             status TEXT NOT NULL DEFAULT 'W', url TEXT, journal TEXT, strategy TEXT, \
             method TEXT, out_file TEXT, parsed TEXT NOT NULL DEFAULT 'F', \
             PRIMARY KEY (label, action_index), \
             FOREIGN KEY (label) REFERENCES scrape_jobs(label) ON DELETE CASCADE"
        }
        Table::ParseJobs => {
            "label TEXT PRIMARY KEY, description TEXT, date TEXT, log TEXT, mode TEXT, \
             job_status TEXT NOT NULL DEFAULT 'I', job_step INTEGER NOT NULL DEFAULT 0, \
             job_successes INTEGER NOT NULL DEFAULT 0, job_fails INTEGER NOT NULL DEFAULT 0, \
             no_of_publications INTEGER NOT NULL DEFAULT 0, parse_directory TEXT, \
             job_committed TEXT NOT NULL DEFAULT 'F'"
        }
        Table::Parses => {
            "label TEXT NOT NULL, action_index INTEGER NOT NULL, date TEXT, success TEXT, \
             status TEXT NOT NULL DEFAULT 'W', scrape_label TEXT, scrape_action_index INTEGER, \
             input_file TEXT, doi TEXT, publisher TEXT, journal TEXT, title TEXT, \
             publication_type TEXT, affiliations TEXT, received TEXT, accepted TEXT, \
             published TEXT, parser TEXT, committed TEXT NOT NULL DEFAULT 'F', \
             PRIMARY KEY (label, action_index), \
             FOREIGN KEY (label) REFERENCES parse_jobs(label) ON DELETE CASCADE"
        }
        Table::CommitJobs => {
            "label TEXT PRIMARY KEY, description TEXT, date TEXT, log TEXT, mode TEXT, \
             job_status TEXT NOT NULL DEFAULT 'I', job_step INTEGER NOT NULL DEFAULT 0, \
             job_successes INTEGER NOT NULL DEFAULT 0, job_fails INTEGER NOT NULL DEFAULT 0, \
             no_of_publications INTEGER NOT NULL DEFAULT 0"
        }
        Table::Commits => {
            "label TEXT NOT NULL, action_index INTEGER NOT NULL, date TEXT, success TEXT, \
             status TEXT NOT NULL DEFAULT 'W', parse_label TEXT, parse_action_index INTEGER, \
             doi TEXT, publisher TEXT, journal TEXT, title TEXT, publication_type TEXT, \
             affiliations TEXT, received TEXT, accepted TEXT, published TEXT, parser TEXT, \
             passed TEXT, duplicate TEXT, \
             PRIMARY KEY (label, action_index), \
             FOREIGN KEY (label) REFERENCES commit_jobs(label) ON DELETE CASCADE"
        }
        Table::Pub => {
            "doi TEXT PRIMARY KEY COLLATE NOCASE, publisher TEXT, journal TEXT, title TEXT, \
             publication_type TEXT, affiliations TEXT, received TEXT, accepted TEXT, \
             published TEXT, normalized_publisher TEXT, normalized_journal TEXT, \
             normalized_received TEXT, normalized_accepted TEXT, normalized_published TEXT, \
             duration TEXT"
        }
    };

    format!("CREATE TABLE IF NOT EXISTS {} ({body});", table.name())
}

/// Open an in-memory store seeded with the given tables' schema. Used by
/// this crate's own tests, and re-exported for the job/action runtime's
/// tests so they don't need a temp directory for pure logic checks.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
#[doc(hidden)]
pub fn open_memory_store(tables: &[Table]) -> Result<Connection, Error> {
    let conn = Connection::open_in_memory()?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    create_schema(&conn, tables)?;
    Ok(conn)
}
