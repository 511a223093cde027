/// Errors raised by the abstract job/action runtime.
///
/// This type is not intended to be exhaustively matched, and new variants
/// may be added in the future without a major version bump.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The job or action being addressed does not exist. Raised only when
    /// the caller tries to *write* to a missing entity — reading a missing
    /// entity's field yields `None` instead.
    #[error("{kind} `{label}` not found")]
    NotFound { kind: &'static str, label: String },

    /// An operation would violate a data-model invariant: adding actions to
    /// a job that is not `I`/`W`, or running a job that is already `R`
    /// without explicitly choosing `resume`.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The persistence layer reported a failure.
    #[error("database error: {0}")]
    Db(#[from] appeer_db::Error),

    #[doc(hidden)]
    #[error("unknown error")]
    __Unknown, // Match against _ instead, more variants may be added in the future.
}
