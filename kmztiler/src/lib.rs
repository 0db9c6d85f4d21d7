//! kmztiler - geo-anchored images to KMZ overlays
//!
//! Turns a large map image whose file name carries its bounding box
//! (`<name>_<north>_<south>_<east>_<west>.jpg`) into a KMZ that Garmin
//! handhelds or Google Earth can display as a ground overlay.
//!
//! Two outputs are supported:
//!
//! - **tiled**: the image is cut into small square tiles, each with its own
//!   `LatLonBox`, to respect per-tile pixel limits on handheld units
//! - **single**: the image is kept whole, optionally downsampled
//!
//! # Modules
//!
//! - [`geo`] - longitude normalization and bounding boxes
//! - [`naming`] - bounding boxes from file names
//! - [`tile`] - tile geometry and the raster layout walk
//! - [`imaging`] - image engines (builtin and ImageMagick)
//! - [`kml`] - `doc.kml` rendering
//! - [`archive`] - KMZ packaging
//! - [`staging`] - temporary working directories
//! - [`mosaic`] - end-to-end orchestration
//! - [`config`] - config.ini handling
//! - [`logging`] - tracing setup
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use kmztiler::imaging::RasterEngine;
//! use kmztiler::mosaic::{MosaicAssembler, MosaicConfig, MosaicMode};
//!
//! let assembler = MosaicAssembler::new(
//!     Arc::new(RasterEngine::new()),
//!     MosaicConfig::new(MosaicMode::tiled()),
//! );
//! let reports = assembler.process_all(&[PathBuf::from(
//!     "Grouse-Mountain_49.470628_49.336694_-123.132056_-122.9811.jpg",
//! )]);
//! assert!(reports.iter().all(|r| r.is_ok()));
//! ```

pub mod archive;
pub mod config;
pub mod geo;
pub mod imaging;
pub mod kml;
pub mod logging;
pub mod mosaic;
pub mod naming;
pub mod staging;
pub mod tile;

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
