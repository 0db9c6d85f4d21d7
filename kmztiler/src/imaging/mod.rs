//! Image engine abstraction.
//!
//! The tiler never touches pixels itself. Everything that decodes, resizes
//! or crops an image goes through the [`ImageEngine`] trait so the mosaic
//! assembler can be driven by any backend.
//!
//! # Available Engines
//!
//! - [`RasterEngine`] - in-process, built on the `image` crate (default)
//! - [`MagickEngine`] - shells out to ImageMagick's `convert` and `identify`
//!
//! All engines emit baseline (non-progressive) JPEGs without metadata, which
//! is what Garmin units require.

mod error;
mod magick;
mod raster;

pub use error::ImageError;
pub use magick::MagickEngine;
pub use raster::RasterEngine;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Default JPEG quality for re-encoded images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Backend that measures, re-encodes, resizes and slices images.
///
/// Implementations must be thread-safe so several inputs can be processed
/// in parallel.
pub trait ImageEngine: Send + Sync {
    /// Human-readable engine name for logs.
    fn name(&self) -> &str;

    /// Pixel width and height of an image.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ImageError>;

    /// Re-encode `input` as a baseline, metadata-free JPEG at `output`.
    fn normalize(&self, input: &Path, output: &Path) -> Result<PathBuf, ImageError>;

    /// Like [`ImageEngine::normalize`], but also shrinks the image so that
    /// `width * height <= max_pixel_area`, keeping the aspect ratio.
    fn resize_by_area(
        &self,
        input: &Path,
        max_pixel_area: u64,
        output: &Path,
    ) -> Result<PathBuf, ImageError>;

    /// Slice `input` into `tile_size` squares written to `out_dir`.
    ///
    /// Tiles are returned row-major from the top-left corner and named
    /// `<stem>_tile_<index>.jpg` (see [`tile_file_name`]). The right column
    /// and bottom row may be smaller than `tile_size`.
    fn crop_grid(
        &self,
        input: &Path,
        tile_size: u32,
        out_dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, ImageError>;
}

/// Selects which [`ImageEngine`] implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    /// In-process decoding with the `image` crate.
    #[default]
    Builtin,
    /// External ImageMagick tools.
    Magick,
}

impl EngineKind {
    /// Config/CLI spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Builtin => "builtin",
            EngineKind::Magick => "magick",
        }
    }

    /// Construct the selected engine.
    ///
    /// `jpeg_quality` applies to the builtin engine; ImageMagick uses its
    /// own defaults. Selecting ImageMagick fails here, before any input is
    /// touched, if its tools are not installed.
    pub fn build(&self, jpeg_quality: u8) -> Result<Arc<dyn ImageEngine>, ImageError> {
        match self {
            EngineKind::Builtin => Ok(Arc::new(
                RasterEngine::new().with_jpeg_quality(jpeg_quality),
            )),
            EngineKind::Magick => {
                let engine = MagickEngine::new();
                engine.check_required_tools()?;
                Ok(Arc::new(engine))
            }
        }
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "builtin" => Ok(EngineKind::Builtin),
            "magick" | "imagemagick" => Ok(EngineKind::Magick),
            other => Err(format!("unknown image engine '{}'", other)),
        }
    }
}

/// Number of columns and rows a `tile_size` grid needs to cover an image.
pub fn grid_shape(width: u32, height: u32, tile_size: u32) -> (u32, u32) {
    (width.div_ceil(tile_size), height.div_ceil(tile_size))
}

/// Number of tiles a `tile_size` grid cuts from an image.
///
/// Counted in `usize` since a huge image sliced into tiny tiles can exceed
/// `u32::MAX` tiles.
pub fn tile_count(width: u32, height: u32, tile_size: u32) -> usize {
    let (cols, rows) = grid_shape(width, height, tile_size);
    cols as usize * rows as usize
}

/// File name of the tile at `index` in a grid of `count` tiles.
///
/// Indices are zero-padded to at least three digits, and wider when the
/// grid is large enough to need it, so lexicographic order is raster order.
///
/// ```
/// use kmztiler::imaging::tile_file_name;
///
/// assert_eq!(tile_file_name("map", 7, 100), "map_tile_007.jpg");
/// assert_eq!(tile_file_name("map", 7, 1500), "map_tile_0007.jpg");
/// ```
pub fn tile_file_name(stem: &str, index: usize, count: usize) -> String {
    let digits = index_digits(count);
    format!("{}_tile_{:0width$}.jpg", stem, index, width = digits)
}

/// Digits needed to number `count` tiles, never fewer than three.
pub(crate) fn index_digits(count: usize) -> usize {
    let max_index = count.saturating_sub(1);
    max_index.to_string().len().max(3)
}

/// Largest dimensions with the same aspect ratio whose area fits the budget.
///
/// Images already inside the budget are returned unchanged; a zero budget
/// means unlimited.
pub fn fit_to_area(width: u32, height: u32, max_pixel_area: u64) -> (u32, u32) {
    let area = width as u64 * height as u64;
    if max_pixel_area == 0 || area <= max_pixel_area {
        return (width, height);
    }

    let scale = (max_pixel_area as f64 / area as f64).sqrt();
    let mut new_width = ((width as f64 * scale).floor() as u32).max(1);
    let mut new_height = ((height as f64 * scale).floor() as u32).max(1);

    // sqrt rounding can overshoot by a pixel
    while new_width as u64 * new_height as u64 > max_pixel_area && (new_width > 1 || new_height > 1)
    {
        if new_width >= new_height {
            new_width -= 1;
        } else {
            new_height -= 1;
        }
    }

    (new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_shape() {
        assert_eq!(grid_shape(10000, 10000, 1000), (10, 10));
        assert_eq!(grid_shape(2500, 1700, 1024), (3, 2));
        assert_eq!(grid_shape(1024, 1024, 1024), (1, 1));
        assert_eq!(grid_shape(1, 1, 1024), (1, 1));
    }

    #[test]
    fn test_tile_count() {
        assert_eq!(tile_count(2500, 1700, 1024), 6);
        assert_eq!(tile_count(10000, 10000, 1000), 100);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_tile_count_beyond_u32() {
        assert_eq!(
            tile_count(u32::MAX, u32::MAX, 1),
            u32::MAX as usize * u32::MAX as usize
        );
        assert!(tile_count(100_000, 100_000, 1) > u32::MAX as usize);
    }

    #[test]
    fn test_tile_file_name_padding() {
        assert_eq!(tile_file_name("Grouse", 0, 1), "Grouse_tile_000.jpg");
        assert_eq!(tile_file_name("Grouse", 42, 100), "Grouse_tile_042.jpg");
        assert_eq!(tile_file_name("Grouse", 999, 1000), "Grouse_tile_999.jpg");
        assert_eq!(tile_file_name("Grouse", 3, 1001), "Grouse_tile_0003.jpg");
    }

    #[test]
    fn test_tile_names_sort_in_raster_order() {
        let count = 1200;
        let names: Vec<String> = (0..count).map(|i| tile_file_name("m", i, count)).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_fit_to_area_unchanged_when_small() {
        assert_eq!(fit_to_area(800, 600, 1_000_000), (800, 600));
        assert_eq!(fit_to_area(8000, 6000, 0), (8000, 6000));
    }

    #[test]
    fn test_fit_to_area_shrinks_keeping_ratio() {
        let (w, h) = fit_to_area(8000, 6000, 12_000_000);
        assert!(w as u64 * h as u64 <= 12_000_000);
        assert_eq!((w, h), (4000, 3000));
    }

    #[test]
    fn test_fit_to_area_tiny_budget() {
        let (w, h) = fit_to_area(5000, 10, 1);
        assert_eq!((w, h), (1, 1));
    }

    #[test]
    fn test_engine_kind_from_str() {
        assert_eq!("builtin".parse::<EngineKind>(), Ok(EngineKind::Builtin));
        assert_eq!("Magick".parse::<EngineKind>(), Ok(EngineKind::Magick));
        assert_eq!("imagemagick".parse::<EngineKind>(), Ok(EngineKind::Magick));
        assert!("gimp".parse::<EngineKind>().is_err());
    }

    #[test]
    fn test_build_builtin_engine() {
        let engine = EngineKind::Builtin.build(75).unwrap();
        assert_eq!(engine.name(), "builtin");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_fit_to_area_respects_budget(
                width in 1u32..20_000,
                height in 1u32..20_000,
                budget in 1u64..50_000_000,
            ) {
                let (w, h) = fit_to_area(width, height, budget);
                prop_assert!(w >= 1 && h >= 1);
                prop_assert!(w <= width && h <= height);
                prop_assert!(w as u64 * h as u64 <= budget.max(1));
            }
        }
    }
}
