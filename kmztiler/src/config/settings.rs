//! Settings structs, one per `[section]` of config.ini.

use std::path::PathBuf;

use crate::imaging::{EngineKind, DEFAULT_JPEG_QUALITY};
use crate::kml::{EdgeMode, DEFAULT_DRAWING_ORDER};
use crate::mosaic::{
    MosaicConfig, MosaicMode, DEFAULT_MAX_PIXELS, DEFAULT_MAX_TILES, DEFAULT_TILE_SIZE,
};

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    /// Tiled-mode sizing
    pub tiles: TilesSettings,
    /// Single-image sizing
    pub single: SingleSettings,
    /// KML overlay settings
    pub overlay: OverlaySettings,
    /// Image engine settings
    pub image: ImageSettings,
    /// Output and staging
    pub output: OutputSettings,
    /// Log file
    pub logging: LoggingSettings,
}

/// `[tiles]`
#[derive(Debug, Clone, PartialEq)]
pub struct TilesSettings {
    /// Most tiles a KMZ should hold.
    pub max_tiles: u32,
    /// Tile edge in pixels.
    pub tile_size: u32,
}

impl Default for TilesSettings {
    fn default() -> Self {
        Self {
            max_tiles: DEFAULT_MAX_TILES,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

/// `[single]`
#[derive(Debug, Clone, PartialEq)]
pub struct SingleSettings {
    /// Pixel budget for single-image output, 0 for unlimited.
    pub max_pixels: u64,
}

impl Default for SingleSettings {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// `[overlay]`
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    /// KML `drawOrder`.
    pub drawing_order: i32,
    /// Normalize east/west edges before writing them.
    pub normalize_edges: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            drawing_order: DEFAULT_DRAWING_ORDER,
            normalize_edges: false,
        }
    }
}

impl OverlaySettings {
    /// Edge mode implied by `normalize_edges`.
    pub fn edge_mode(&self) -> EdgeMode {
        if self.normalize_edges {
            EdgeMode::Normalized
        } else {
            EdgeMode::Raw
        }
    }
}

/// `[image]`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    /// Image backend.
    pub engine: EngineKind,
    /// JPEG quality for the builtin engine.
    pub jpeg_quality: u8,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputSettings {
    /// Where KMZ files go; the current directory when unset.
    pub directory: Option<PathBuf>,
    /// Keep staging directories.
    pub keep_tmp: bool,
    /// Process inputs concurrently.
    pub parallel: bool,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoggingSettings {
    /// Optional log file in addition to stderr.
    pub file: Option<PathBuf>,
}

impl ConfigFile {
    /// Tiled mode from `[tiles]`.
    pub fn tiled_mode(&self) -> MosaicMode {
        MosaicMode::Tiled {
            max_tiles: self.tiles.max_tiles,
            tile_size: self.tiles.tile_size,
        }
    }

    /// Single-image mode from `[single]`.
    pub fn single_mode(&self) -> MosaicMode {
        MosaicMode::Single {
            max_pixels: self.single.max_pixels,
        }
    }

    /// Assembler settings for `mode` with the file's overlay and output values.
    pub fn mosaic_config(&self, mode: MosaicMode) -> MosaicConfig {
        let mut config = MosaicConfig::new(mode)
            .with_drawing_order(self.overlay.drawing_order)
            .with_edge_mode(self.overlay.edge_mode())
            .with_keep_tmp(self.output.keep_tmp)
            .with_parallel(self.output.parallel);
        if let Some(dir) = &self.output.directory {
            config = config.with_output_dir(dir);
        }
        config
    }
}
