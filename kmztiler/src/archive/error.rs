//! Error types for KMZ packaging.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while packaging a KMZ.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The directory to package does not exist.
    #[error("archive root does not exist or is not a directory: {}", .0.display())]
    MissingRoot(PathBuf),

    /// Walking the archive root failed.
    #[error("failed to walk archive root: {0}")]
    Walk(#[from] walkdir::Error),

    /// Reading a file to be archived, or creating the output, failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// The zip writer rejected an entry.
    #[error("failed to write zip entry '{entry}': {source}")]
    Zip {
        entry: String,
        source: zip::result::ZipError,
    },

    /// The finished archive could not be moved into place.
    #[error("failed to persist archive to {}: {source}", .path.display())]
    Persist { path: PathBuf, source: io::Error },
}

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;
