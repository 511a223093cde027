//! Table-specific queries for `parses` that don't fit the generic action
//! primitives in [`crate::actions`].

use crate::{jobs::decode_row, registry::Table, rows::ParseActionRow, rows::Row, Error};
use rusqlite::Connection;

/// Actions with `status='X'`, `success='T'` and `committed='F'` —
/// candidates for commit mode `A`.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn uncommitted(conn: &Connection) -> Result<Vec<ParseActionRow>, Error> {
    let table = Table::Parses;
    let sql = format!(
        "SELECT {} FROM {} WHERE status = 'X' AND success = 'T' AND committed = 'F'",
        table.columns().join(", "),
        table.name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(ParseActionRow::from_values(&decode_row(
            row,
            table.columns().len(),
        )?)?);
    }
    Ok(out)
}

/// Every successful action (`status='X'`, `success='T'`) of `label`,
/// regardless of `committed` — used by commit mode `E`.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn successful_by_label(conn: &Connection, label: &str) -> Result<Vec<ParseActionRow>, Error> {
    let table = Table::Parses;
    let sql = format!(
        "SELECT {} FROM {} WHERE label = ?1 AND status = 'X' AND success = 'T' ORDER BY action_index",
        table.columns().join(", "),
        table.name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([label])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(ParseActionRow::from_values(&decode_row(
            row,
            table.columns().len(),
        )?)?);
    }
    Ok(out)
}
