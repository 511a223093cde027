//! Generic job-table queries, shared by `scrape_jobs`, `parse_jobs`, and
//! `commit_jobs`.

use crate::{registry::Table, rows::Row, Error};
use rusqlite::Connection;

/// Look up a job by its label.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn find_by_label<J: Row>(conn: &Connection, label: &str) -> Result<Option<J>, Error> {
    let table = J::TABLE;
    let sql = format!("SELECT {} FROM {} WHERE label = ?1", table.columns().join(", "), table.name());
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([label])?;
    match rows.next()? {
        Some(row) => {
            let values = decode_row(row, table.columns().len())?;
            Ok(Some(J::from_values(&values)?))
        }
        None => Ok(None),
    }
}

/// Every job whose `job_status` is not `X` (executed) — i.e. still
/// in-flight or terminated in error.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn bad_jobs<J: Row>(conn: &Connection) -> Result<Vec<J>, Error> {
    let table = J::TABLE;
    let sql = format!(
        "SELECT {} FROM {} WHERE job_status != 'X'",
        table.columns().join(", "),
        table.name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = decode_row(row, table.columns().len())?;
        out.push(J::from_values(&values)?);
    }
    Ok(out)
}

/// Every job in every status, ordered by `label`.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn all<J: Row>(conn: &Connection) -> Result<Vec<J>, Error> {
    let table = J::TABLE;
    let sql = format!(
        "SELECT {} FROM {} ORDER BY label",
        table.columns().join(", "),
        table.name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = decode_row(row, table.columns().len())?;
        out.push(J::from_values(&values)?);
    }
    Ok(out)
}

pub(crate) fn decode_row(
    row: &rusqlite::Row<'_>,
    n: usize,
) -> Result<Vec<rusqlite::types::Value>, Error> {
    (0..n).map(|i| row.get::<_, rusqlite::types::Value>(i).map_err(Error::from)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connection::open_memory_store, rows::ScrapeJobRow, table};

    #[test]
    fn find_by_label_round_trips() {
        let conn = open_memory_store(&[Table::ScrapeJobs]).unwrap();
        table::add_entry(
            &conn,
            Table::ScrapeJobs,
            &[("label", &"job1"), ("job_status", &"I")],
        )
        .unwrap();

        let row: ScrapeJobRow = find_by_label(&conn, "job1").unwrap().unwrap();
        assert_eq!(row.label, "job1");
        assert_eq!(row.job_status, "I");
        assert!(find_by_label::<ScrapeJobRow>(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn bad_jobs_excludes_executed() {
        let conn = open_memory_store(&[Table::ScrapeJobs]).unwrap();
        table::add_entry(&conn, Table::ScrapeJobs, &[("label", &"a"), ("job_status", &"X")]).unwrap();
        table::add_entry(&conn, Table::ScrapeJobs, &[("label", &"b"), ("job_status", &"E")]).unwrap();

        let bad: Vec<ScrapeJobRow> = bad_jobs(&conn).unwrap();
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].label, "b");
    }
}
