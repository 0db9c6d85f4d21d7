//! Mosaic assembly.
//!
//! Orchestrates one geo-anchored image at a time:
//!
//! 1. parse the bounding box from the file name
//! 2. measure the source image
//! 3. normalize or resize it into a staging directory
//! 4. slice it into tiles (tiled mode) or keep it whole (single mode)
//! 5. place every tile on the map with the raster layout walk
//! 6. write `doc.kml` and zip the lot into a KMZ
//!
//! Failures are reported per input along with the [`Stage`] that failed;
//! a batch keeps going after one input fails.

mod assembler;
mod config;
mod error;

pub use assembler::{InputReport, MosaicAssembler, MosaicOutput};
pub use config::{
    MosaicConfig, MosaicMode, DEFAULT_MAX_PIXELS, DEFAULT_MAX_TILES, DEFAULT_TILE_SIZE,
};
pub use error::{MosaicError, Stage};
