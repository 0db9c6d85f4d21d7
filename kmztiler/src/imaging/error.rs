//! Error types for image engine operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while measuring, converting or slicing images.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image could not be opened or decoded.
    #[error("failed to read image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The image could not be encoded or written.
    #[error("failed to write image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// Filesystem error around an image file.
    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Tile size of zero cannot slice anything.
    #[error("invalid tile size {0}: must be at least 1 pixel")]
    InvalidTileSize(u32),

    /// An external tool is not installed or not runnable.
    #[error("'{tool}' is not available: {reason}")]
    ToolMissing { tool: String, reason: String },

    /// An external tool ran but reported failure.
    #[error("'{tool}' failed ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// An external tool produced output we could not interpret.
    #[error("unexpected output from '{tool}': {output}")]
    UnexpectedOutput { tool: String, output: String },
}
