//! Mosaic assembler settings.

use std::path::{Path, PathBuf};

use crate::kml::{EdgeMode, DEFAULT_DRAWING_ORDER};

/// Default tile budget; Garmin handhelds display at most 100 tiles per KMZ.
pub const DEFAULT_MAX_TILES: u32 = 100;

/// Default tile edge in pixels; the largest Garmin units accept.
pub const DEFAULT_TILE_SIZE: u32 = 1024;

/// Default pixel budget for single-image output; zero means unlimited.
pub const DEFAULT_MAX_PIXELS: u64 = 0;

/// How the source image becomes overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MosaicMode {
    /// Slice into `tile_size` squares, shrinking first so that at most
    /// about `max_tiles` tiles result.
    Tiled { max_tiles: u32, tile_size: u32 },
    /// Keep one image, shrinking it to `max_pixels` when set.
    Single { max_pixels: u64 },
}

impl MosaicMode {
    /// Tiled mode with the default budget and tile size.
    pub fn tiled() -> Self {
        MosaicMode::Tiled {
            max_tiles: DEFAULT_MAX_TILES,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }

    /// Single-image mode with no pixel budget.
    pub fn single() -> Self {
        MosaicMode::Single {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Pixel area the prepared image may occupy, zero meaning unlimited.
    ///
    /// ```
    /// use kmztiler::mosaic::MosaicMode;
    ///
    /// assert_eq!(MosaicMode::tiled().max_pixel_area(), 100 * 1024 * 1024);
    /// assert_eq!(MosaicMode::single().max_pixel_area(), 0);
    /// ```
    pub fn max_pixel_area(&self) -> u64 {
        match *self {
            MosaicMode::Tiled {
                max_tiles,
                tile_size,
            } => max_tiles as u64 * tile_size as u64 * tile_size as u64,
            MosaicMode::Single { max_pixels } => max_pixels,
        }
    }

    /// File name of the KMZ produced for `map_name`.
    pub fn archive_file_name(&self, map_name: &str) -> String {
        match self {
            MosaicMode::Tiled { .. } => format!("{}.kmz", map_name),
            MosaicMode::Single { .. } => format!("{}-big.kmz", map_name),
        }
    }
}

/// Settings shared by every input of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicConfig {
    /// Tiled or single-image output.
    pub mode: MosaicMode,
    /// `drawOrder` written for every overlay.
    pub drawing_order: i32,
    /// Edge rendering in `doc.kml`.
    pub edge_mode: EdgeMode,
    /// Keep staging directories instead of deleting them.
    pub keep_tmp: bool,
    /// Where KMZ files are written.
    pub output_dir: PathBuf,
    /// Process inputs concurrently.
    pub parallel: bool,
    /// Parent for staging directories; the system temp dir when unset.
    pub temp_root: Option<PathBuf>,
}

impl MosaicConfig {
    /// Defaults for the given mode, writing to the current directory.
    pub fn new(mode: MosaicMode) -> Self {
        Self {
            mode,
            drawing_order: DEFAULT_DRAWING_ORDER,
            edge_mode: EdgeMode::default(),
            keep_tmp: false,
            output_dir: PathBuf::from("."),
            parallel: false,
            temp_root: None,
        }
    }

    /// Set the overlay draw order.
    pub fn with_drawing_order(mut self, drawing_order: i32) -> Self {
        self.drawing_order = drawing_order;
        self
    }

    /// Set the edge rendering mode.
    pub fn with_edge_mode(mut self, edge_mode: EdgeMode) -> Self {
        self.edge_mode = edge_mode;
        self
    }

    /// Keep or discard staging directories.
    pub fn with_keep_tmp(mut self, keep_tmp: bool) -> Self {
        self.keep_tmp = keep_tmp;
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Enable or disable concurrent processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Place staging directories under `temp_root`.
    pub fn with_temp_root(mut self, temp_root: impl AsRef<Path>) -> Self {
        self.temp_root = Some(temp_root.as_ref().to_path_buf());
        self
    }

    /// Full output path of the KMZ for `map_name`.
    pub fn archive_path(&self, map_name: &str) -> PathBuf {
        self.output_dir.join(self.mode.archive_file_name(map_name))
    }
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self::new(MosaicMode::tiled())
    }
}
