//! Per-input failure reporting.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::imaging::ImageError;
use crate::kml::KmlError;
use crate::naming::FilenameError;
use crate::tile::TileError;

/// Processing step at which an input failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Locating and resolving the input file.
    Input,
    /// Parsing the bounding box out of the file name.
    Filename,
    /// Reading the source image dimensions.
    Measure,
    /// Creating the temporary working directory.
    Staging,
    /// Normalizing, resizing or copying the source image.
    Prepare,
    /// Cutting the prepared image into tiles.
    Slice,
    /// Assigning bounding boxes to tiles.
    Layout,
    /// Writing `doc.kml`.
    Descriptor,
    /// Zipping the KMZ.
    Package,
}

impl Stage {
    /// Lowercase label for messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::Filename => "filename",
            Stage::Measure => "measure",
            Stage::Staging => "staging",
            Stage::Prepare => "prepare",
            Stage::Slice => "slice",
            Stage::Layout => "layout",
            Stage::Descriptor => "descriptor",
            Stage::Package => "package",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why one input could not be turned into a KMZ.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// The input path has no usable file-name component.
    #[error("input path has no file name: {}", .0.display())]
    InvalidInputPath(PathBuf),

    /// The file name does not encode a valid bounding box.
    #[error(transparent)]
    Filename(#[from] FilenameError),

    /// The image engine failed.
    #[error("{stage} step failed: {source}")]
    Image { stage: Stage, source: ImageError },

    /// A raster could not be placed on the map.
    #[error(transparent)]
    Tile(#[from] TileError),

    /// Rendering or writing `doc.kml` failed.
    #[error(transparent)]
    Descriptor(#[from] KmlError),

    /// Packaging the archive failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Filesystem error outside the image engine and archiver.
    #[error("{stage} step failed on {}: {source}", .path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        source: io::Error,
    },
}

impl MosaicError {
    /// Step the failure happened in.
    pub fn stage(&self) -> Stage {
        match self {
            MosaicError::InvalidInputPath(_) => Stage::Input,
            MosaicError::Filename(_) => Stage::Filename,
            MosaicError::Image { stage, .. } => *stage,
            MosaicError::Tile(_) => Stage::Layout,
            MosaicError::Descriptor(_) => Stage::Descriptor,
            MosaicError::Archive(_) => Stage::Package,
            MosaicError::Io { stage, .. } => *stage,
        }
    }

    pub(crate) fn image(stage: Stage) -> impl FnOnce(ImageError) -> Self {
        move |source| MosaicError::Image { stage, source }
    }

    pub(crate) fn io(stage: Stage, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| MosaicError::Io {
            stage,
            path,
            source,
        }
    }
}
