use std::{io, path::PathBuf};

/// Errors that can occur in the ambient parts of the pipeline: filesystem
/// access, archival, and configuration bootstrap.
///
/// This type is not intended to be exhaustively matched, and new variants
/// may be added in the future without a major version bump.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error occurred during IO activities.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A zip archive could not be created or read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A path that was expected to exist (a data directory, an input file)
    /// did not.
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),

    /// Something about the runtime environment makes it impossible to
    /// continue at all (e.g. the data directory cannot be created).
    #[error("fatal error: {0}")]
    Fatal(String),

    #[doc(hidden)]
    #[error("unknown error")]
    __Unknown, // Match against _ instead, more variants may be added in the future.
}
