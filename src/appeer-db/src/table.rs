//! Generic, registry-gated CRUD primitives shared by every table module.
//!
//! No call site builds a SQL string by hand with a caller-controlled
//! identifier in it: column names always pass through
//! [`crate::registry::Table::check_column`] first, and values are always
//! bound as parameters, never interpolated.

use crate::{registry::Table, Error};
use rusqlite::{types::Value, Connection, ToSql};

/// How multiple search predicates combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    const fn sql(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Insert a new row. `values` must name every column being set; each
/// column is validated against `table`'s registry before it is used to
/// build the statement.
///
/// # Errors
///
/// Returns [`Error::UnknownColumn`] if a column is not registered for
/// `table`, or [`Error::Sqlite`] if the insert fails (e.g. a primary key
/// collision on a table without `OR REPLACE` semantics).
pub fn add_entry(
    conn: &Connection,
    table: Table,
    values: &[(&str, &dyn ToSql)],
) -> Result<(), Error> {
    for (column, _) in values {
        table.check_column(column)?;
    }

    let columns: Vec<&str> = values.iter().map(|(c, _)| *c).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name(),
        columns.join(", "),
        placeholders.join(", ")
    );

    let params: Vec<&dyn ToSql> = values.iter().map(|(_, v)| *v).collect();
    conn.execute(&sql, params.as_slice())?;
    Ok(())
}

/// Update a single column of the row matched by `key` (an AND-combined
/// equality predicate list, typically the primary key columns).
///
/// # Errors
///
/// Returns [`Error::UnknownColumn`] if `column` or a key column is not
/// registered for `table`, or [`Error::Sqlite`] on a lower-level failure.
pub fn update_entry(
    conn: &Connection,
    table: Table,
    key: &[(&str, &dyn ToSql)],
    column: &str,
    value: &dyn ToSql,
) -> Result<(), Error> {
    table.check_column(column)?;
    for (k, _) in key {
        table.check_column(k)?;
    }

    let mut params: Vec<&dyn ToSql> = vec![value];
    let mut next = 2;
    let where_clause: Vec<String> = key
        .iter()
        .map(|(k, v)| {
            params.push(*v);
            let clause = format!("{k} = ?{next}");
            next += 1;
            clause
        })
        .collect();

    let sql = format!(
        "UPDATE {} SET {column} = ?1 WHERE {}",
        table.name(),
        where_clause.join(" AND "),
    );

    conn.execute(&sql, params.as_slice())?;
    Ok(())
}

/// Delete every row matching `key` (AND-combined equality predicates).
///
/// # Errors
///
/// Returns [`Error::UnknownColumn`] if a key column is not registered, or
/// [`Error::Sqlite`] on a lower-level failure.
pub fn delete_entry(
    conn: &Connection,
    table: Table,
    key: &[(&str, &dyn ToSql)],
) -> Result<usize, Error> {
    for (k, _) in key {
        table.check_column(k)?;
    }

    let mut params: Vec<&dyn ToSql> = Vec::new();
    let mut next = 1;
    let where_clause: Vec<String> = key
        .iter()
        .map(|(k, v)| {
            params.push(*v);
            let clause = format!("{k} = ?{next}");
            next += 1;
            clause
        })
        .collect();

    let sql = format!("DELETE FROM {} WHERE {}", table.name(), where_clause.join(" AND "));
    Ok(conn.execute(&sql, params.as_slice())?)
}

/// Search `table` for rows matching `predicates`, combined with
/// `combinator`. Returns each matching row as a vector of [`Value`]s in
/// the table's registered column order, ready for a per-table row struct
/// to decode.
///
/// # Errors
///
/// Returns [`Error::UnknownColumn`] if a predicate column is not
/// registered, or [`Error::Sqlite`] on a lower-level failure.
pub fn search(
    conn: &Connection,
    table: Table,
    predicates: &[(&str, &dyn ToSql)],
    combinator: Combinator,
) -> Result<Vec<Vec<Value>>, Error> {
    for (k, _) in predicates {
        table.check_column(k)?;
    }

    let columns = table.columns();
    let select_list = columns.join(", ");

    let mut sql = format!("SELECT {select_list} FROM {}", table.name());
    let mut params: Vec<&dyn ToSql> = Vec::new();

    if !predicates.is_empty() {
        let mut next = 1;
        let clauses: Vec<String> = predicates
            .iter()
            .map(|(k, v)| {
                params.push(*v);
                let clause = format!("{k} = ?{next}");
                next += 1;
                clause
            })
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(combinator.sql()));
    }

    let mut stmt = conn.prepare(&sql)?;
    let n = columns.len();
    let rows = stmt.query_map(params.as_slice(), |row| {
        (0..n).map(|i| row.get::<_, Value>(i)).collect()
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
