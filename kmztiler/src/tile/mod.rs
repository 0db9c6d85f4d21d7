//! Tile geometry engine
//!
//! Given a parent image's pixel size and bounding box, works out the
//! bounding box of every tile cut from it:
//!
//! - [`delta`] maps a tile's pixel size to degrees of latitude/longitude
//! - [`TileAnchor::complete`] turns a known north-west corner into a full box
//! - [`RasterLayout`] walks a row-major tile sequence, anchoring each tile on
//!   its predecessor
//!
//! Raster rows grow southward while latitude grows northward, so the walk
//! subtracts latitude as it moves down the image and adds longitude as it
//! moves right.

mod geometry;
mod layout;
mod types;

pub use geometry::{delta, TileAnchor};
pub use layout::{layout_tiles, RasterLayout};
pub use types::{MapTile, TileError, TileRaster};
