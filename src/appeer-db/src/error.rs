/// Errors raised by the persistence layer.
///
/// This type is not intended to be exhaustively matched, and new variants
/// may be added in the future without a major version bump.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A table name was used that is not in the static registry.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A column name was used that is not registered for its table.
    #[error("unknown column `{column}` for table `{table}`")]
    UnknownColumn {
        table: &'static str,
        column: String,
    },

    /// No row matched a key lookup where exactly one was expected.
    #[error("row not found: {0}")]
    RowNotFound(String),

    /// Underlying sqlite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Underlying filesystem failure (opening/creating the database file,
    /// creating its parent directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[doc(hidden)]
    #[error("unknown error")]
    __Unknown, // Match against _ instead, more variants may be added in the future.
}
