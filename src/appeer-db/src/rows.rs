//! Per-table row shapes.
//!
//! Callers of [`crate::table::search`] get a typed struct with named
//! fields, not a positional `Vec<Value>`.

use crate::{registry::Table, Error};
use rusqlite::types::Value;

/// A row shape that knows which registered table it decodes.
pub trait Row: Sized {
    /// The table this row shape belongs to.
    const TABLE: Table;

    /// Decode a row returned by [`crate::table::search`] (column order
    /// matches `Self::TABLE.columns()`).
    ///
    /// # Errors
    ///
    /// Propagates any decode error from the underlying value conversion.
    fn from_values(values: &[Value]) -> Result<Self, Error>;
}

fn text(values: &[Value], columns: &[&str], name: &str) -> Result<String, Error> {
    let idx = columns.iter().position(|c| *c == name).expect("registered column");
    match &values[idx] {
        Value::Text(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        other => Ok(format!("{other:?}")),
    }
}

fn opt_text(values: &[Value], columns: &[&str], name: &str) -> Result<Option<String>, Error> {
    let idx = columns.iter().position(|c| *c == name).expect("registered column");
    match &values[idx] {
        Value::Text(s) => Ok(Some(s.clone())),
        Value::Null => Ok(None),
        other => Ok(Some(format!("{other:?}"))),
    }
}

fn int(values: &[Value], columns: &[&str], name: &str) -> Result<i64, Error> {
    let idx = columns.iter().position(|c| *c == name).expect("registered column");
    match &values[idx] {
        Value::Integer(i) => Ok(*i),
        Value::Null => Ok(0),
        _ => Ok(0),
    }
}

fn opt_int(values: &[Value], columns: &[&str], name: &str) -> Result<Option<i64>, Error> {
    let idx = columns.iter().position(|c| *c == name).expect("registered column");
    match &values[idx] {
        Value::Integer(i) => Ok(Some(*i)),
        Value::Null => Ok(None),
        _ => Ok(None),
    }
}

macro_rules! row_struct {
    (
        $name:ident, $table:expr, {
            $( $field:ident : $kind:ident ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            $( pub $field: row_struct!(@ty $kind), )*
        }

        impl $name {
            fn decode(values: &[Value]) -> Result<Self, Error> {
                let columns = $table.columns();
                Ok(Self {
                    $( $field: row_struct!(@get $kind, values, columns, stringify!($field)), )*
                })
            }
        }

        impl Row for $name {
            const TABLE: Table = $table;

            fn from_values(values: &[Value]) -> Result<Self, Error> {
                Self::decode(values)
            }
        }
    };
    (@ty text) => { String };
    (@ty opt_text) => { Option<String> };
    (@ty int) => { i64 };
    (@ty opt_int) => { Option<i64> };
    (@get text, $values:expr, $columns:expr, $name:expr) => { text($values, $columns, $name)? };
    (@get opt_text, $values:expr, $columns:expr, $name:expr) => { opt_text($values, $columns, $name)? };
    (@get int, $values:expr, $columns:expr, $name:expr) => { int($values, $columns, $name)? };
    (@get opt_int, $values:expr, $columns:expr, $name:expr) => { opt_int($values, $columns, $name)? };
}

row_struct!(ScrapeJobRow, Table::ScrapeJobs, {
    label: text,
    description: opt_text,
    date: opt_text,
    log: opt_text,
    mode: opt_text,
    job_status: text,
    job_step: int,
    job_successes: int,
    job_fails: int,
    no_of_publications: int,
    download_directory: opt_text,
    zip_file: opt_text,
    job_parsed: text,
});

row_struct!(ScrapeActionRow, Table::Scrapes, {
    label: text,
    action_index: int,
    date: opt_text,
    success: text,
    status: text,
    url: opt_text,
    journal: opt_text,
    strategy: opt_text,
    method: opt_text,
    out_file: opt_text,
    parsed: text,
});

row_struct!(ParseJobRow, Table::ParseJobs, {
    label: text,
    description: opt_text,
    date: opt_text,
    log: opt_text,
    mode: opt_text,
    job_status: text,
    job_step: int,
    job_successes: int,
    job_fails: int,
    no_of_publications: int,
    parse_directory: opt_text,
    job_committed: text,
});

row_struct!(ParseActionRow, Table::Parses, {
    label: text,
    action_index: int,
    date: opt_text,
    success: text,
    status: text,
    scrape_label: opt_text,
    scrape_action_index: opt_int,
    input_file: opt_text,
    doi: opt_text,
    publisher: opt_text,
    journal: opt_text,
    title: opt_text,
    publication_type: opt_text,
    affiliations: opt_text,
    received: opt_text,
    accepted: opt_text,
    published: opt_text,
    parser: opt_text,
    committed: text,
});

row_struct!(CommitJobRow, Table::CommitJobs, {
    label: text,
    description: opt_text,
    date: opt_text,
    log: opt_text,
    mode: opt_text,
    job_status: text,
    job_step: int,
    job_successes: int,
    job_fails: int,
    no_of_publications: int,
});

row_struct!(CommitActionRow, Table::Commits, {
    label: text,
    action_index: int,
    date: opt_text,
    success: text,
    status: text,
    parse_label: opt_text,
    parse_action_index: opt_int,
    doi: opt_text,
    publisher: opt_text,
    journal: opt_text,
    title: opt_text,
    publication_type: opt_text,
    affiliations: opt_text,
    received: opt_text,
    accepted: opt_text,
    published: opt_text,
    parser: opt_text,
    passed: text,
    duplicate: text,
});

row_struct!(PubRow, Table::Pub, {
    doi: text,
    publisher: opt_text,
    journal: opt_text,
    title: opt_text,
    publication_type: opt_text,
    affiliations: opt_text,
    received: opt_text,
    accepted: opt_text,
    published: opt_text,
    normalized_publisher: opt_text,
    normalized_journal: opt_text,
    normalized_received: opt_text,
    normalized_accepted: opt_text,
    normalized_published: opt_text,
    duration: opt_text,
});
