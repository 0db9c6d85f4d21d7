//! Error types for descriptor rendering.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while rendering or writing `doc.kml`.
#[derive(Debug, Error)]
pub enum KmlError {
    /// A descriptor template failed to parse or render.
    #[error("KML template error: {0}")]
    Template(#[from] tera::Error),

    /// The rendered descriptor could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}
