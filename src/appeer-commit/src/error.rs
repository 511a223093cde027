/// Errors raised by the commit engine.
///
/// This type is not intended to be exhaustively matched, and new variants
/// may be added in the future without a major version bump.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying job/action runtime reported a problem (missing or
    /// non-executed parse job label, invariant violation).
    #[error("job runtime error: {0}")]
    Job(#[from] appeer_jobs::Error),

    /// The persistence layer reported a failure.
    #[error("database error: {0}")]
    Db(#[from] appeer_db::Error),

    /// Back-propagating `committed`/`job_committed` to the originating
    /// parse stage failed.
    #[error("parse back-propagation error: {0}")]
    Parse(#[from] appeer_parse::Error),

    #[doc(hidden)]
    #[error("unknown error")]
    __Unknown, // Match against _ instead, more variants may be added in the future.
}
