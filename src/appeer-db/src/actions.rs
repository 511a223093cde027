//! Generic action-table queries, shared by `scrapes`, `parses`, and
//! `commits`.

use crate::{jobs::decode_row, rows::Row, Error};
use rusqlite::Connection;

/// Look up a single action by its composite key.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn find<A: Row>(conn: &Connection, label: &str, action_index: i64) -> Result<Option<A>, Error> {
    let table = A::TABLE;
    let sql = format!(
        "SELECT {} FROM {} WHERE label = ?1 AND action_index = ?2",
        table.columns().join(", "),
        table.name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params![label, action_index])?;
    match rows.next()? {
        Some(row) => Ok(Some(A::from_values(&decode_row(row, table.columns().len())?)?)),
        None => Ok(None),
    }
}

/// Every action belonging to `label`, ordered by `action_index`.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn by_label<A: Row>(conn: &Connection, label: &str) -> Result<Vec<A>, Error> {
    let table = A::TABLE;
    let sql = format!(
        "SELECT {} FROM {} WHERE label = ?1 ORDER BY action_index",
        table.columns().join(", "),
        table.name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([label])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(A::from_values(&decode_row(row, table.columns().len())?)?);
    }
    Ok(out)
}

/// Every action of `label` in a terminal status (`X` or `E`).
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn count_by_status<A: Row>(conn: &Connection, label: &str, status: &str) -> Result<i64, Error> {
    let table = A::TABLE;
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE label = ?1 AND status = ?2",
        table.name()
    );
    Ok(conn.query_row(&sql, rusqlite::params![label, status], |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connection::open_memory_store, registry::Table, rows::ScrapeActionRow, table};

    #[test]
    fn find_and_by_label() {
        let conn = open_memory_store(&[Table::ScrapeJobs, Table::Scrapes]).unwrap();
        table::add_entry(&conn, Table::ScrapeJobs, &[("label", &"job1")]).unwrap();
        table::add_entry(
            &conn,
            Table::Scrapes,
            &[("label", &"job1"), ("action_index", &0_i64), ("status", &"W")],
        )
        .unwrap();
        table::add_entry(
            &conn,
            Table::Scrapes,
            &[("label", &"job1"), ("action_index", &1_i64), ("status", &"W")],
        )
        .unwrap();

        let found: ScrapeActionRow = find(&conn, "job1", 0).unwrap().unwrap();
        assert_eq!(found.action_index, 0);

        let all: Vec<ScrapeActionRow> = by_label(&conn, "job1").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].action_index, 0);
        assert_eq!(all[1].action_index, 1);
    }
}
