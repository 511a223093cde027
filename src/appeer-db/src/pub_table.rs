//! The `pub` table: committed publications, keyed by DOI (case-insensitive).
//!
//! This is the one table whose insert can legitimately collide on its key,
//! so it gets its own `add_entry` rather than sharing
//! [`crate::table::add_entry`]'s insert-only semantics.

use crate::{jobs::decode_row, registry::Table, rows::PubRow, rows::Row, Error};
use rusqlite::{OptionalExtension, Connection, ToSql};

/// Outcome of an attempted insert into `pub`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// `true` if a row with this DOI already existed.
    pub duplicate: bool,
    /// `true` if a row was written (always true unless `duplicate` and
    /// `overwrite` was `false`).
    pub inserted: bool,
}

/// Insert or replace a publication row.
///
/// On a DOI collision: with `overwrite = false` the existing row is left
/// untouched and `{duplicate: true, inserted: false}` is returned; with
/// `overwrite = true` the row is replaced and `{duplicate: true, inserted:
/// true}` is returned. A fresh DOI always yields `{duplicate: false,
/// inserted: true}`.
///
/// # Errors
///
/// Returns [`Error::UnknownColumn`] if a column is not registered for
/// `pub`, or [`Error::Sqlite`] on a lower-level failure.
pub fn add_entry(
    conn: &Connection,
    doi: &str,
    values: &[(&str, &dyn ToSql)],
    overwrite: bool,
) -> Result<UpsertOutcome, Error> {
    for (column, _) in values {
        Table::Pub.check_column(column)?;
    }

    let exists = conn
        .query_row(
            "SELECT 1 FROM pub WHERE doi = ?1 COLLATE NOCASE",
            [doi],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    if exists && !overwrite {
        return Ok(UpsertOutcome {
            duplicate: true,
            inserted: false,
        });
    }

    let columns: Vec<&str> = values.iter().map(|(c, _)| *c).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT OR REPLACE INTO pub ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    let params: Vec<&dyn ToSql> = values.iter().map(|(_, v)| *v).collect();
    conn.execute(&sql, params.as_slice())?;

    Ok(UpsertOutcome {
        duplicate: exists,
        inserted: true,
    })
}

/// Look up a publication by DOI (case-insensitive).
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn find_by_doi(conn: &Connection, doi: &str) -> Result<Option<PubRow>, Error> {
    let table = Table::Pub;
    let sql = format!(
        "SELECT {} FROM pub WHERE doi = ?1 COLLATE NOCASE",
        table.columns().join(", ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([doi])?;
    match rows.next()? {
        Some(row) => Ok(Some(PubRow::from_values(&decode_row(
            row,
            table.columns().len(),
        )?)?)),
        None => Ok(None),
    }
}

/// One group of the per-publisher/journal aggregate report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherJournalStats {
    pub normalized_publisher: Option<String>,
    pub journal: Option<String>,
    pub count: i64,
    pub earliest_received: Option<String>,
    pub latest_published: Option<String>,
}

/// Per-journal counts and min/max normalized dates, grouped by
/// `normalized_publisher`.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn stats_by_publisher(conn: &Connection) -> Result<Vec<PublisherJournalStats>, Error> {
    let sql = "SELECT normalized_publisher, journal, COUNT(*), \
               MIN(normalized_received), MAX(normalized_published) \
               FROM pub GROUP BY normalized_publisher, journal \
               ORDER BY normalized_publisher, journal";
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(PublisherJournalStats {
            normalized_publisher: row.get(0)?,
            journal: row.get(1)?,
            count: row.get(2)?,
            earliest_received: row.get(3)?,
            latest_published: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
