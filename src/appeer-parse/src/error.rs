/// Errors raised by the parse engine.
///
/// This type is not intended to be exhaustively matched, and new variants
/// may be added in the future without a major version bump.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input packet could not be built: an unreadable file, an
    /// unknown mode, or a bad filter combination.
    #[error("bad parse input: {0}")]
    BadInput(String),

    /// No registered parser's `check_publisher_journal` matched the
    /// input document.
    #[error("no parser matched the input")]
    NoParserMatched,

    /// The underlying job/action runtime reported a problem.
    #[error("job runtime error: {0}")]
    Job(#[from] appeer_jobs::Error),

    /// The persistence layer reported a failure.
    #[error("database error: {0}")]
    Db(#[from] appeer_db::Error),

    /// Filesystem failure (reading an input file, creating a parse
    /// directory, opening the job log).
    #[error("io error: {0}")]
    Io(#[from] appeer_core::Error),

    /// Back-propagating `parsed`/`job_parsed` to the originating scrape
    /// stage failed.
    #[error("scrape back-propagation error: {0}")]
    Scrape(#[from] appeer_scrape::Error),

    #[doc(hidden)]
    #[error("unknown error")]
    __Unknown, // Match against _ instead, more variants may be added in the future.
}
