//! Proportional tile geometry.
//!
//! A tile covers the same fraction of its parent's geographic span as it
//! covers of the parent's pixels. This is a plain equirectangular
//! interpolation; parents are assumed small enough for curvature to vanish.

use crate::geo::{east_west_span, GeoBox, MIN_LAT};

use super::MapTile;

/// Degrees of latitude and longitude spanned by a tile.
///
/// Returns `(ns_delta, ew_delta)`:
/// - `ns_delta = tile_height / parent_height * (north - south)`
/// - `ew_delta = tile_width / parent_width * east_west_span(east, west)`
///
/// Both are non-negative. The east/west span is antimeridian-aware.
///
/// ```
/// use kmztiler::geo::GeoBox;
/// use kmztiler::tile::delta;
///
/// let parent = GeoBox::new(50.0, 40.0, 10.0, 0.0).unwrap();
/// let (ns, ew) = delta(1000, 500, &parent, 10000, 10000);
/// assert!((ns - 0.5).abs() < 1e-12);
/// assert!((ew - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn delta(
    tile_width: u32,
    tile_height: u32,
    parent_box: &GeoBox,
    parent_width: u32,
    parent_height: u32,
) -> (f64, f64) {
    let ns_delta = (tile_height as f64 / parent_height as f64) * parent_box.lat_span();
    let ew_span = east_west_span(parent_box.east(), parent_box.west());
    let ew_delta = (tile_width as f64 / parent_width as f64) * ew_span;
    (ns_delta, ew_delta)
}

/// The north-west corner of a tile, known before its extent is.
///
/// Tiling fixes a tile's anchor from its position in the grid first; the
/// opposite corner follows from its pixel size via [`TileAnchor::complete`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileAnchor {
    /// Northern edge latitude.
    pub north: f64,
    /// Western edge longitude.
    pub west: f64,
}

impl TileAnchor {
    /// Anchor at the given north-west corner.
    pub fn new(north: f64, west: f64) -> Self {
        Self { north, west }
    }

    /// Anchor at the north-west corner of `bbox`.
    pub fn north_west_of(bbox: &GeoBox) -> Self {
        Self::new(bbox.north(), bbox.west())
    }

    /// Compute the south and east edges for a tile cut from `parent`.
    ///
    /// `south = north - ns_delta`, `east = west + ew_delta`. The east edge is
    /// not normalized: tiles right of the antimeridian report east > 180 and
    /// adjacent tiles share the exact same edge value.
    /// South is only clamped at -90 to absorb rounding at the pole.
    pub fn complete(&self, tile_width: u32, tile_height: u32, parent: &MapTile) -> GeoBox {
        let (ns_delta, ew_delta) = delta(
            tile_width,
            tile_height,
            parent.bbox(),
            parent.width(),
            parent.height(),
        );
        let south = (self.north - ns_delta).max(MIN_LAT);
        let east = self.west + ew_delta;
        GeoBox::from_edges(self.north, south, east, self.west)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn parent(bbox: GeoBox, width: u32, height: u32) -> MapTile {
        MapTile::new("full.jpg", width, height, bbox).unwrap()
    }

    #[test]
    fn test_delta_simple_box() {
        let bbox = GeoBox::new(50.0, 40.0, 10.0, 0.0).unwrap();
        let (ns, ew) = delta(100, 100, &bbox, 10000, 10000);
        assert!((ns - 0.1).abs() < EPSILON);
        assert!((ew - 0.1).abs() < EPSILON);
    }

    #[test]
    fn test_delta_southern_hemisphere() {
        let bbox = GeoBox::new(-50.0, -60.0, 10.0, 0.0).unwrap();
        let (ns, ew) = delta(1000, 1000, &bbox, 10000, 10000);
        assert!((ns - 1.0).abs() < EPSILON);
        assert!((ew - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_delta_across_prime_meridian() {
        let bbox = GeoBox::new(50.0, 40.0, 0.0, -10.0).unwrap();
        let (_, ew) = delta(1000, 1000, &bbox, 10000, 10000);
        assert!((ew - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_delta_across_antimeridian() {
        let bbox = GeoBox::new(50.0, 40.0, -170.0, 170.0).unwrap();
        let (ns, ew) = delta(1000, 1000, &bbox, 10000, 10000);
        assert!((ns - 1.0).abs() < EPSILON);
        assert!((ew - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_delta_uses_width_for_longitude_and_height_for_latitude() {
        // Non-square parent and tile catch any width/height transposition
        let bbox = GeoBox::new(10.0, 0.0, 40.0, 0.0).unwrap();
        let (ns, ew) = delta(100, 50, &bbox, 400, 200);
        assert!((ns - 2.5).abs() < EPSILON);
        assert!((ew - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_complete_from_anchor() {
        let full = parent(GeoBox::new(50.0, 40.0, 10.0, 0.0).unwrap(), 10000, 10000);
        let bbox = TileAnchor::new(49.0, 3.0).complete(1000, 1000, &full);
        assert_eq!(bbox.north(), 49.0);
        assert_eq!(bbox.west(), 3.0);
        assert!((bbox.south() - 48.0).abs() < EPSILON);
        assert!((bbox.east() - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_complete_does_not_renormalize_east() {
        let full = parent(GeoBox::new(50.0, 40.0, -170.0, 170.0).unwrap(), 10000, 10000);
        let bbox = TileAnchor::new(50.0, 179.0).complete(1000, 1000, &full);
        assert!((bbox.east() - 181.0).abs() < EPSILON);
        assert!((bbox.normalized().east() - (-179.0)).abs() < EPSILON);
    }

    #[test]
    fn test_complete_clamps_south_at_pole() {
        let full = parent(GeoBox::new(-80.0, -90.0, 10.0, 0.0).unwrap(), 3, 3);
        let anchor = TileAnchor::new(-80.0 - 2.0 * (10.0 / 3.0), 0.0);
        let bbox = anchor.complete(3, 1, &full);
        assert!(bbox.south() >= -90.0);
    }

    #[test]
    fn test_anchor_north_west_of_box() {
        let bbox = GeoBox::new(50.0, 40.0, 10.0, 0.0).unwrap();
        assert_eq!(TileAnchor::north_west_of(&bbox), TileAnchor::new(50.0, 0.0));
    }
}
