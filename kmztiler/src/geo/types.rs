//! Geographic bounding box types.

use std::fmt;

use thiserror::Error;

use super::normalize_longitude;

/// Southern latitude limit in decimal degrees.
pub const MIN_LAT: f64 = -90.0;
/// Northern latitude limit in decimal degrees.
pub const MAX_LAT: f64 = 90.0;

/// Errors raised when a bounding box violates its latitude invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoBoxError {
    /// North edge is not strictly north of the south edge.
    #[error("north boundary ({north}) must be greater than south boundary ({south})")]
    InvertedLatitudes { north: f64, south: f64 },

    /// A latitude lies outside [-90, 90]; boxes may not cross a pole.
    #[error("{edge} latitude {value} is outside [-90, 90]")]
    LatitudeOutOfRange { edge: &'static str, value: f64 },

    /// A coordinate is NaN or infinite.
    #[error("{edge} coordinate is not a finite number ({value})")]
    NotFinite { edge: &'static str, value: f64 },
}

/// A rectangular geographic region in decimal degrees.
///
/// `east` may be numerically smaller than `west`, in which case the box
/// wraps through the antimeridian. Boxes built with [`GeoBox::new`] have both
/// longitudes normalized to [-180, 180]; boxes produced by tile completion
/// keep the east edge exactly as computed (see [`crate::tile::TileAnchor`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl GeoBox {
    /// Validates the latitudes and normalizes both longitudes.
    ///
    /// North may equal 90 and south may equal -90; anything beyond is
    /// rejected, as is `north <= south`.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, GeoBoxError> {
        for (edge, value) in [
            ("north", north),
            ("south", south),
            ("east", east),
            ("west", west),
        ] {
            if !value.is_finite() {
                return Err(GeoBoxError::NotFinite { edge, value });
            }
        }
        if north > MAX_LAT {
            return Err(GeoBoxError::LatitudeOutOfRange {
                edge: "north",
                value: north,
            });
        }
        if south < MIN_LAT {
            return Err(GeoBoxError::LatitudeOutOfRange {
                edge: "south",
                value: south,
            });
        }
        if north <= south {
            return Err(GeoBoxError::InvertedLatitudes { north, south });
        }

        Ok(Self {
            north,
            south,
            east: normalize_longitude(east),
            west: normalize_longitude(west),
        })
    }

    /// Builds a box from edges that are valid by construction.
    ///
    /// Used by tile completion, which must stay total and must not
    /// renormalize the east edge.
    pub(crate) fn from_edges(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Northern latitude.
    #[inline]
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Southern latitude.
    #[inline]
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Eastern longitude.
    #[inline]
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Western longitude.
    #[inline]
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Degrees of latitude covered by the box.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Degrees of longitude covered by the box, walking east from `west`.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        super::east_west_span(self.east, self.west)
    }

    /// True when the box wraps through ±180°.
    pub fn crosses_antimeridian(&self) -> bool {
        normalize_longitude(self.east) < normalize_longitude(self.west)
    }

    /// Same box with east and west passed through the longitude normalizer.
    pub fn normalized(&self) -> Self {
        Self {
            east: normalize_longitude(self.east),
            west: normalize_longitude(self.west),
            ..*self
        }
    }
}

impl fmt::Display for GeoBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N {} S {} E {} W {}",
            self.north, self.south, self.east, self.west
        )
    }
}
