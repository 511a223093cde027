/// Errors raised by the scrape engine.
///
/// This type is not intended to be exhaustively matched, and new variants
/// may be added in the future without a major version bump.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input source could not be parsed: a multi-token plaintext
    /// line, invalid JSON, or an unreadable file.
    #[error("bad scrape input: {0}")]
    BadInput(String),

    /// The underlying job/action runtime reported a problem (missing
    /// label, invariant violation).
    #[error("job runtime error: {0}")]
    Job(#[from] appeer_jobs::Error),

    /// The persistence layer reported a failure.
    #[error("database error: {0}")]
    Db(#[from] appeer_db::Error),

    /// Filesystem or archival failure.
    #[error("io error: {0}")]
    Io(#[from] appeer_core::Error),

    #[doc(hidden)]
    #[error("unknown error")]
    __Unknown, // Match against _ instead, more variants may be added in the future.
}
