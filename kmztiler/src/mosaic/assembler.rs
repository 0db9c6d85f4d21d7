//! Turns geo-anchored images into KMZ files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{MosaicConfig, MosaicError, MosaicMode, Stage};
use crate::archive::build_kmz;
use crate::imaging::{tile_file_name, ImageEngine};
use crate::kml::{GroundOverlay, KmlDocument, DOC_KML};
use crate::naming::{parse_geo_filename, GeoFilename};
use crate::staging::{StagingDir, TILES_DIR};
use crate::tile::{layout_tiles, MapTile, TileRaster};

/// What one successful input produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicOutput {
    /// Map name taken from the input file name.
    pub map_name: String,
    /// The KMZ that was written.
    pub archive: PathBuf,
    /// Number of image overlays in the KMZ.
    pub tiles: usize,
    /// Pixel size of the image after any resize.
    pub width: u32,
    /// Pixel size of the image after any resize.
    pub height: u32,
    /// Staging directory left on disk, when asked to keep it.
    pub kept_staging: Option<PathBuf>,
}

/// Outcome for one input of a batch.
#[derive(Debug)]
pub struct InputReport {
    /// Input path as given.
    pub input: PathBuf,
    /// KMZ details, or why the input failed.
    pub result: Result<MosaicOutput, MosaicError>,
}

impl InputReport {
    /// True when the input produced a KMZ.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Drives an [`ImageEngine`] through the full image-to-KMZ pipeline.
///
/// The assembler holds no per-input state; every call to
/// [`MosaicAssembler::process`] gets its own staging directory, which is
/// removed on every exit path unless `keep_tmp` is set.
pub struct MosaicAssembler {
    engine: Arc<dyn ImageEngine>,
    config: MosaicConfig,
}

impl MosaicAssembler {
    /// Create an assembler around an engine.
    pub fn new(engine: Arc<dyn ImageEngine>, config: MosaicConfig) -> Self {
        Self { engine, config }
    }

    /// Process every input, continuing past failures.
    ///
    /// Reports come back in input order whether or not `parallel` is set.
    pub fn process_all(&self, inputs: &[PathBuf]) -> Vec<InputReport> {
        let report = |input: &PathBuf| {
            let result = self.process(input);
            if let Err(e) = &result {
                warn!(
                    input = %input.display(),
                    stage = %e.stage(),
                    error = %e,
                    "Input failed"
                );
            }
            InputReport {
                input: input.clone(),
                result,
            }
        };

        if self.config.parallel {
            inputs.par_iter().map(report).collect()
        } else {
            inputs.iter().map(report).collect()
        }
    }

    /// Turn one geo-anchored image into a KMZ.
    pub fn process(&self, input: &Path) -> Result<MosaicOutput, MosaicError> {
        let input = fs::canonicalize(input).map_err(MosaicError::io(Stage::Input, input))?;

        // Only the last component carries the box; parent directories may
        // contain underscores of their own.
        let file_name = input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MosaicError::InvalidInputPath(input.clone()))?;
        let GeoFilename { map_name, bbox } = parse_geo_filename(file_name)?;

        let (width, height) = self
            .engine
            .dimensions(&input)
            .map_err(MosaicError::image(Stage::Measure))?;
        let source = MapTile::new(&input, width, height, bbox)?;

        info!(
            input = %input.display(),
            map = %map_name,
            width,
            height,
            bbox = %bbox,
            antimeridian = bbox.crosses_antimeridian(),
            engine = self.engine.name(),
            "Processing map"
        );

        let staging = match &self.config.temp_root {
            Some(root) => StagingDir::create_in(root, &map_name),
            None => StagingDir::create(&map_name),
        }
        .map_err(MosaicError::io(
            Stage::Staging,
            self.config
                .temp_root
                .clone()
                .unwrap_or_else(std::env::temp_dir),
        ))?;

        let mut document = KmlDocument::new(&map_name, self.config.edge_mode);
        let (prepared_width, prepared_height) = match self.config.mode {
            MosaicMode::Tiled {
                max_tiles,
                tile_size,
            } => self.assemble_tiled(
                &source,
                &staging,
                &map_name,
                max_tiles,
                tile_size,
                &mut document,
            )?,
            MosaicMode::Single { max_pixels } => {
                self.assemble_single(&source, &staging, &map_name, max_pixels, &mut document)?
            }
        };

        document.write_to(&staging.map_root().join(DOC_KML))?;

        let archive = build_kmz(&staging.map_root(), &self.config.archive_path(&map_name))?;

        let tiles = document.overlays().len();
        let kept_staging = self.config.keep_tmp.then(|| staging.keep());

        info!(
            archive = %archive.path.display(),
            tiles,
            entries = archive.entries.len(),
            "Finished map"
        );

        Ok(MosaicOutput {
            map_name,
            archive: archive.path,
            tiles,
            width: prepared_width,
            height: prepared_height,
            kept_staging,
        })
    }

    fn assemble_tiled(
        &self,
        source: &MapTile,
        staging: &StagingDir,
        map_name: &str,
        max_tiles: u32,
        tile_size: u32,
        document: &mut KmlDocument,
    ) -> Result<(u32, u32), MosaicError> {
        let max_pixels = self.config.mode.max_pixel_area();
        let fixed = staging.fixed_image();

        if source.pixel_area() > max_pixels {
            debug!(
                pixel_area = source.pixel_area(),
                max_pixels,
                "Image exceeds tile budget, resizing"
            );
            self.engine
                .resize_by_area(source.path(), max_pixels, &fixed)
                .map_err(MosaicError::image(Stage::Prepare))?;
        } else {
            self.engine
                .normalize(source.path(), &fixed)
                .map_err(MosaicError::image(Stage::Prepare))?;
        }

        // Geometry is relative to the prepared image, not the original
        let (width, height) = self
            .engine
            .dimensions(&fixed)
            .map_err(MosaicError::image(Stage::Prepare))?;
        let parent = MapTile::new(&fixed, width, height, *source.bbox())?;

        let tile_paths = self
            .engine
            .crop_grid(&fixed, tile_size, &staging.tiles_dir(), map_name)
            .map_err(MosaicError::image(Stage::Slice))?;
        if tile_paths.len() > max_tiles as usize {
            warn!(
                tiles = tile_paths.len(),
                max_tiles,
                "Ragged edges pushed the tile count over the budget"
            );
        }

        let rasters = tile_paths
            .into_iter()
            .map(|path| {
                let (w, h) = self
                    .engine
                    .dimensions(&path)
                    .map_err(MosaicError::image(Stage::Slice))?;
                Ok(TileRaster::new(path, w, h))
            })
            .collect::<Result<Vec<_>, MosaicError>>()?;

        for tile in layout_tiles(&parent, rasters)? {
            let name = tile
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!(tile = %name, bbox = %tile.bbox(), "Placed tile");
            document.add_overlay(GroundOverlay {
                href: format!("{}/{}", TILES_DIR, name),
                name,
                drawing_order: self.config.drawing_order,
                bbox: *tile.bbox(),
            });
        }

        Ok((width, height))
    }

    fn assemble_single(
        &self,
        source: &MapTile,
        staging: &StagingDir,
        map_name: &str,
        max_pixels: u64,
        document: &mut KmlDocument,
    ) -> Result<(u32, u32), MosaicError> {
        let file_name = tile_file_name(map_name, 0, 1);
        let image = staging.tiles_dir().join(&file_name);

        let (width, height) = if max_pixels > 0 && source.pixel_area() > max_pixels {
            debug!(
                pixel_area = source.pixel_area(),
                max_pixels,
                "Image exceeds pixel budget, resizing"
            );
            self.engine
                .resize_by_area(source.path(), max_pixels, &image)
                .map_err(MosaicError::image(Stage::Prepare))?;
            self.engine
                .dimensions(&image)
                .map_err(MosaicError::image(Stage::Prepare))?
        } else {
            // Byte-for-byte: no re-encode, no metadata strip
            fs::copy(source.path(), &image).map_err(MosaicError::io(Stage::Prepare, &image))?;
            (source.width(), source.height())
        };

        document.add_overlay(GroundOverlay {
            name: map_name.to_string(),
            drawing_order: self.config.drawing_order,
            href: format!("{}/{}", TILES_DIR, file_name),
            bbox: *source.bbox(),
        });

        Ok((width, height))
    }
}
