//! In-process image engine built on the `image` crate.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use rayon::prelude::*;
use tracing::debug;

use super::{
    fit_to_area, grid_shape, tile_count, tile_file_name, ImageEngine, ImageError,
    DEFAULT_JPEG_QUALITY,
};

/// Image engine that decodes and encodes in-process.
///
/// Re-encoded output is always a baseline JPEG: the `image` crate's encoder
/// never writes progressive scans or EXIF/ICC segments, which covers both
/// the de-interlace and metadata-strip requirements. Tiles of one grid are
/// encoded in parallel.
#[derive(Debug, Clone)]
pub struct RasterEngine {
    jpeg_quality: u8,
}

impl Default for RasterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterEngine {
    /// Engine with the default JPEG quality and a Lanczos resize filter.
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set JPEG quality (1-100).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Configured JPEG quality.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    fn open(&self, path: &Path) -> Result<DynamicImage, ImageError> {
        let reader = ImageReader::open(path).map_err(|e| ImageError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let reader = reader.with_guessed_format().map_err(|e| ImageError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        reader.decode().map_err(|e| ImageError::Decode {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn save_jpeg(&self, image: &DynamicImage, path: &Path) -> Result<PathBuf, ImageError> {
        let io_err = |e| ImageError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        // JPEG has no alpha channel
        let rgb = image.to_rgb8();
        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality);
            encoder.encode_image(&rgb).map_err(|e| ImageError::Encode {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        writer.flush().map_err(io_err)?;

        Ok(path.to_path_buf())
    }
}

impl ImageEngine for RasterEngine {
    fn name(&self) -> &str {
        "builtin"
    }

    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ImageError> {
        image::image_dimensions(path).map_err(|e| ImageError::Decode {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn normalize(&self, input: &Path, output: &Path) -> Result<PathBuf, ImageError> {
        let image = self.open(input)?;
        debug!(
            input = %input.display(),
            output = %output.display(),
            "Re-encoding as baseline JPEG"
        );
        self.save_jpeg(&image, output)
    }

    fn resize_by_area(
        &self,
        input: &Path,
        max_pixel_area: u64,
        output: &Path,
    ) -> Result<PathBuf, ImageError> {
        let image = self.open(input)?;
        let (width, height) = image.dimensions();
        let (new_width, new_height) = fit_to_area(width, height, max_pixel_area);

        if (new_width, new_height) == (width, height) {
            return self.save_jpeg(&image, output);
        }

        debug!(
            from = %format!("{}x{}", width, height),
            to = %format!("{}x{}", new_width, new_height),
            max_pixel_area,
            "Resizing image to pixel budget"
        );
        let resized = image.resize_exact(new_width, new_height, FilterType::Lanczos3);
        self.save_jpeg(&resized, output)
    }

    fn crop_grid(
        &self,
        input: &Path,
        tile_size: u32,
        out_dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, ImageError> {
        if tile_size == 0 {
            return Err(ImageError::InvalidTileSize(tile_size));
        }

        let image = self.open(input)?;
        let (width, height) = image.dimensions();
        let (cols, rows) = grid_shape(width, height, tile_size);
        let count = tile_count(width, height, tile_size);

        fs::create_dir_all(out_dir).map_err(|e| ImageError::Io {
            path: out_dir.to_path_buf(),
            source: e,
        })?;

        debug!(cols, rows, tile_size, "Cropping image into tile grid");

        (0..count)
            .into_par_iter()
            .map(|index| {
                let col = (index % cols as usize) as u32;
                let row = (index / cols as usize) as u32;
                let x = col * tile_size;
                let y = row * tile_size;
                let tile_width = tile_size.min(width - x);
                let tile_height = tile_size.min(height - y);

                let tile = image.crop_imm(x, y, tile_width, tile_height);
                let path = out_dir.join(tile_file_name(stem, index, count));
                self.save_jpeg(&tile, &path)
            })
            .collect()
    }
}
