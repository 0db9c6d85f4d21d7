//! Scoped working directories.
//!
//! Each input gets its own temporary directory laid out as
//!
//! ```text
//! <tmp>/kmztiler-XXXXXX/
//!   fixed.jpg            normalized or resized source image
//!   <map-name>/          archive root
//!     doc.kml
//!     tiles/
//! ```
//!
//! The directory is removed when the [`StagingDir`] is dropped, on success
//! and error paths alike, unless it is explicitly kept for inspection.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

/// Name of the prepared source image inside the staging directory.
pub const FIXED_IMAGE: &str = "fixed.jpg";

/// Name of the tile folder inside the archive root.
pub const TILES_DIR: &str = "tiles";

/// A per-input temporary directory.
#[derive(Debug)]
pub struct StagingDir {
    dir: TempDir,
    map_name: String,
}

impl StagingDir {
    /// Create a fresh staging directory under the system temp dir, with the
    /// archive root and its `tiles/` folder already in place.
    pub fn create(map_name: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("kmztiler-").tempdir()?;
        Self::prepare(dir, map_name)
    }

    /// Like [`StagingDir::create`], but under `parent`.
    pub fn create_in(parent: &Path, map_name: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("kmztiler-")
            .tempdir_in(parent)?;
        Self::prepare(dir, map_name)
    }

    fn prepare(dir: TempDir, map_name: &str) -> io::Result<Self> {
        fs::create_dir_all(dir.path().join(map_name).join(TILES_DIR))?;
        debug!(path = %dir.path().display(), "Created staging directory");
        Ok(Self {
            dir,
            map_name: map_name.to_string(),
        })
    }

    /// Top of the staging directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the prepared source image is written.
    pub fn fixed_image(&self) -> PathBuf {
        self.dir.path().join(FIXED_IMAGE)
    }

    /// Directory that becomes the archive root.
    pub fn map_root(&self) -> PathBuf {
        self.dir.path().join(&self.map_name)
    }

    /// Directory holding the image tiles.
    pub fn tiles_dir(&self) -> PathBuf {
        self.map_root().join(TILES_DIR)
    }

    /// Stop automatic cleanup and return the directory's path.
    pub fn keep(self) -> PathBuf {
        let path = self.dir.keep();
        warn!(path = %path.display(), "Keeping temporary directory");
        path
    }
}
