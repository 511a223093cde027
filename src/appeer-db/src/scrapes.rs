//! Table-specific queries for `scrapes` that don't fit the generic action
//! primitives in [`crate::actions`].

use crate::{jobs::decode_row, registry::Table, rows::ScrapeActionRow, Error};
use rusqlite::Connection;

/// Actions with `status='X'` and `parsed='F'` — candidates for parse mode
/// `A`.
///
/// # Errors
///
/// Returns [`Error::Sqlite`] on a lower-level failure.
pub fn unparsed(conn: &Connection) -> Result<Vec<ScrapeActionRow>, Error> {
    let table = Table::Scrapes;
    let sql = format!(
        "SELECT {} FROM {} WHERE status = 'X' AND parsed = 'F'",
        table.columns().join(", "),
        table.name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(ScrapeActionRow::from_values(&decode_row(
            row,
            table.columns().len(),
        )?)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connection::open_memory_store, table};

    #[test]
    fn unparsed_filters_on_status_and_parsed() {
        let conn = open_memory_store(&[Table::ScrapeJobs, Table::Scrapes]).unwrap();
        table::add_entry(&conn, Table::ScrapeJobs, &[("label", &"j")]).unwrap();
        table::add_entry(
            &conn,
            Table::Scrapes,
            &[
                ("label", &"j"),
                ("action_index", &0_i64),
                ("status", &"X"),
                ("parsed", &"F"),
            ],
        )
        .unwrap();
        table::add_entry(
            &conn,
            Table::Scrapes,
            &[
                ("label", &"j"),
                ("action_index", &1_i64),
                ("status", &"X"),
                ("parsed", &"T"),
            ],
        )
        .unwrap();

        let rows = unparsed(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].action_index, 0);
    }
}
