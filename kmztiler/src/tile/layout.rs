//! Raster layout walk.
//!
//! Recovers every tile's bounding box from nothing but the order the tiles
//! were cut in and their pixel sizes. The slicer emits tiles row-major from
//! the north-west corner, so a running pixel-width sum tells us when a row
//! ends: the next tile then starts back at the parent's west edge, one row
//! further south.

use super::{MapTile, TileAnchor, TileRaster};

/// Iterator adapter that assigns geography to raster-ordered tiles.
///
/// Edge tiles may be narrower or shorter than the rest; every tile's extent
/// is computed from its own pixel size rather than assumed uniform.
///
/// # Example
///
/// ```
/// use kmztiler::geo::GeoBox;
/// use kmztiler::tile::{MapTile, RasterLayout, TileRaster};
///
/// let parent = MapTile::new("map.jpg", 200, 100, GeoBox::new(2.0, 0.0, 4.0, 0.0).unwrap()).unwrap();
/// let rasters = vec![
///     TileRaster::new("t0.jpg", 100, 100),
///     TileRaster::new("t1.jpg", 100, 100),
/// ];
///
/// let tiles: Vec<MapTile> = RasterLayout::new(&parent, rasters).collect::<Result<_, _>>().unwrap();
/// assert_eq!(tiles[1].bbox().west(), tiles[0].bbox().east());
/// ```
#[derive(Debug)]
pub struct RasterLayout<'a, I> {
    parent: &'a MapTile,
    rasters: I,
    anchor: TileAnchor,
    width_sum: u64,
}

impl<'a, I> RasterLayout<'a, I>
where
    I: Iterator<Item = TileRaster>,
{
    /// Start a walk at the parent's north-west corner.
    pub fn new(parent: &'a MapTile, rasters: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            parent,
            rasters: rasters.into_iter(),
            anchor: TileAnchor::north_west_of(parent.bbox()),
            width_sum: 0,
        }
    }
}

impl<I> Iterator for RasterLayout<'_, I>
where
    I: Iterator<Item = TileRaster>,
{
    type Item = Result<MapTile, super::TileError>;

    fn next(&mut self) -> Option<Self::Item> {
        let raster = self.rasters.next()?;

        let bbox = self
            .anchor
            .complete(raster.width, raster.height, self.parent);
        let tile = match MapTile::new(raster.path, raster.width, raster.height, bbox) {
            Ok(tile) => tile,
            Err(e) => return Some(Err(e)),
        };

        self.width_sum += raster.width as u64;
        if self.width_sum >= self.parent.width() as u64 {
            // Row complete: drop to the next row at the parent's west edge
            self.anchor = TileAnchor::new(bbox.south(), self.parent.bbox().west());
            self.width_sum = 0;
        } else {
            self.anchor = TileAnchor::new(self.anchor.north, bbox.east());
        }

        Some(Ok(tile))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rasters.size_hint()
    }
}

/// Lay out a full raster-ordered tile sequence.
///
/// Convenience wrapper over [`RasterLayout`] that stops at the first tile
/// with empty pixel dimensions.
pub fn layout_tiles(
    parent: &MapTile,
    rasters: impl IntoIterator<Item = TileRaster>,
) -> Result<Vec<MapTile>, super::TileError> {
    RasterLayout::new(parent, rasters).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoBox;

    const EPSILON: f64 = 1e-9;

    /// Row-major rasters for a grid of `tile`-sized squares over `width`×`height`.
    fn grid(width: u32, height: u32, tile: u32) -> Vec<TileRaster> {
        let mut rasters = Vec::new();
        let mut index = 0;
        for y in (0..height).step_by(tile as usize) {
            for x in (0..width).step_by(tile as usize) {
                let w = tile.min(width - x);
                let h = tile.min(height - y);
                rasters.push(TileRaster::new(format!("tile_{:03}.jpg", index), w, h));
                index += 1;
            }
        }
        rasters
    }

    fn parent(bbox: GeoBox, width: u32, height: u32) -> MapTile {
        MapTile::new("full.jpg", width, height, bbox).unwrap()
    }

    #[test]
    fn test_ten_by_ten_grid_ends_at_south_east_corner() {
        let full = parent(GeoBox::new(50.0, 40.0, 10.0, 0.0).unwrap(), 10000, 10000);
        let tiles = layout_tiles(&full, grid(10000, 10000, 1000)).unwrap();

        assert_eq!(tiles.len(), 100);
        let last = tiles.last().unwrap();
        assert!((last.bbox().south() - 40.0).abs() < EPSILON);
        assert!((last.bbox().east() - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_first_tile_anchored_at_north_west() {
        let full = parent(GeoBox::new(50.0, 40.0, 10.0, 0.0).unwrap(), 10000, 10000);
        let tiles = layout_tiles(&full, grid(10000, 10000, 1000)).unwrap();
        let first = tiles[0].bbox();
        assert_eq!(first.north(), 50.0);
        assert_eq!(first.west(), 0.0);
        assert!((first.south() - 49.0).abs() < EPSILON);
        assert!((first.east() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_rows_drop_south_and_restart_at_west() {
        let full = parent(GeoBox::new(50.0, 40.0, 10.0, 0.0).unwrap(), 10000, 10000);
        let tiles = layout_tiles(&full, grid(10000, 10000, 1000)).unwrap();

        let end_of_row = tiles[9].bbox();
        let start_of_next = tiles[10].bbox();
        assert_eq!(start_of_next.north(), end_of_row.south());
        assert_eq!(start_of_next.west(), 0.0);
    }

    #[test]
    fn test_ragged_edge_tiles() {
        // 2500x1700 cut into 1024 squares: 3 columns, 2 rows, short edges
        let full = parent(GeoBox::new(49.470628, 49.336694, -122.9811, -123.132056).unwrap(), 2500, 1700);
        let rasters = grid(2500, 1700, 1024);
        assert_eq!(rasters.len(), 6);
        assert_eq!(rasters[2].width, 452);
        assert_eq!(rasters[5].height, 676);

        let tiles = layout_tiles(&full, rasters).unwrap();
        let last = tiles[5].bbox();
        assert!((last.south() - 49.336694).abs() < EPSILON);
        assert!((last.east() - (-122.9811)).abs() < EPSILON);
        assert!((tiles[3].bbox().north() - tiles[0].bbox().south()).abs() < EPSILON);
    }

    #[test]
    fn test_antimeridian_walk_shares_edges() {
        let full = parent(GeoBox::new(50.0, 40.0, -170.0, 170.0).unwrap(), 10000, 10000);
        let tiles = layout_tiles(&full, grid(10000, 10000, 1000)).unwrap();

        for row in tiles.chunks(10) {
            for pair in row.windows(2) {
                assert_eq!(pair[0].bbox().east(), pair[1].bbox().west());
            }
            // Last column passes the antimeridian without renormalization
            let east = row[9].bbox().east();
            assert!((east - 190.0).abs() < EPSILON);
            assert!((row[9].bbox().normalized().east() - (-170.0)).abs() < EPSILON);
        }
    }

    #[test]
    fn test_single_tile_covers_parent() {
        let bbox = GeoBox::new(10.0, 5.0, 3.0, 1.0).unwrap();
        let full = parent(bbox, 640, 480);
        let tiles = layout_tiles(&full, vec![TileRaster::new("only.jpg", 640, 480)]).unwrap();
        assert_eq!(tiles.len(), 1);
        let only = tiles[0].bbox();
        assert_eq!(only.north(), 10.0);
        assert!((only.south() - 5.0).abs() < EPSILON);
        assert!((only.east() - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_empty_raster_is_rejected() {
        let full = parent(GeoBox::new(10.0, 5.0, 3.0, 1.0).unwrap(), 640, 480);
        let result = layout_tiles(&full, vec![TileRaster::new("bad.jpg", 0, 480)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_iterator_keeps_tile_paths_in_order() {
        let full = parent(GeoBox::new(50.0, 40.0, 10.0, 0.0).unwrap(), 300, 200);
        let paths: Vec<String> = RasterLayout::new(&full, grid(300, 200, 100))
            .map(|tile| tile.unwrap().path().display().to_string())
            .collect();
        assert_eq!(paths[0], "tile_000.jpg");
        assert_eq!(paths[5], "tile_005.jpg");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_walk_produces_valid_contiguous_boxes(
                south in -90.0..80.0_f64,
                lat_span in 0.001..10.0_f64,
                west in -180.0..180.0_f64,
                lon_span in 0.001..40.0_f64,
                width in 1u32..3000,
                height in 1u32..3000,
                tile in 64u32..1024,
            ) {
                let north = (south + lat_span).min(90.0);
                let east = west + lon_span;
                let bbox = GeoBox::new(north, south, east, west).unwrap();
                let full = parent(bbox, width, height);
                let rasters = grid(width, height, tile);
                let cols = width.div_ceil(tile) as usize;

                let tiles = layout_tiles(&full, rasters).unwrap();

                for t in &tiles {
                    let b = t.bbox();
                    prop_assert!(b.south() <= b.north(), "S {} > N {}", b.south(), b.north());
                    prop_assert!((-90.0..=90.0).contains(&b.north()));
                    prop_assert!((-90.0..=90.0).contains(&b.south()));
                }
                for row in tiles.chunks(cols) {
                    for pair in row.windows(2) {
                        prop_assert_eq!(pair[0].bbox().east(), pair[1].bbox().west());
                        prop_assert_eq!(pair[0].bbox().north(), pair[1].bbox().north());
                    }
                }
                let last = tiles.last().unwrap().bbox();
                prop_assert!((last.south() - bbox.south()).abs() < 1e-6);
            }
        }
    }
}
