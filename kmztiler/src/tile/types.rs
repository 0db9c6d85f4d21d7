//! Map tile type definitions

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geo::GeoBox;

/// Errors constructing a [`MapTile`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// A raster with no pixels cannot anchor any proportional math.
    #[error("tile {} has empty pixel dimensions {width}x{height}", .path.display())]
    EmptyRaster {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

/// A raster image plus the geographic box it covers.
///
/// The path is an opaque identifier; nothing in the geometry code reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct MapTile {
    path: PathBuf,
    width: u32,
    height: u32,
    bbox: GeoBox,
}

impl MapTile {
    /// Create a tile, rejecting zero-sized rasters.
    pub fn new(
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        bbox: GeoBox,
    ) -> Result<Self, TileError> {
        let path = path.into();
        if width == 0 || height == 0 {
            return Err(TileError::EmptyRaster {
                path,
                width,
                height,
            });
        }
        Ok(Self {
            path,
            width,
            height,
            bbox,
        })
    }

    /// File path of the tile image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count.
    #[inline]
    pub fn pixel_area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Geographic bounding box.
    #[inline]
    pub fn bbox(&self) -> &GeoBox {
        &self.bbox
    }
}

/// A cut tile whose pixel size is known but whose geography is not yet.
///
/// This is what the image engine hands back for each piece of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRaster {
    /// Tile image path.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TileRaster {
    /// Create a raster description.
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}
