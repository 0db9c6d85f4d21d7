//! Geographic primitives
//!
//! Longitude normalization, antimeridian-aware east/west spans and the
//! validated [`GeoBox`] used throughout the tiler.

mod types;

pub use types::{GeoBox, GeoBoxError, MAX_LAT, MIN_LAT};

/// Reduces a longitude in decimal degrees to the range [-180, 180].
///
/// The result is congruent to the input modulo 360. Both ±180 are left
/// untouched. Rust's `%` on floats keeps the sign of the dividend, which is
/// what keeps e.g. `-185` at `175` instead of overshooting.
///
/// ```
/// use kmztiler::geo::normalize_longitude;
///
/// assert_eq!(normalize_longitude(-185.0), 175.0);
/// assert_eq!(normalize_longitude(420.0), 60.0);
/// assert_eq!(normalize_longitude(180.0), 180.0);
/// ```
#[inline]
pub fn normalize_longitude(deg: f64) -> f64 {
    if deg < -180.0 {
        return (deg + 180.0) % 360.0 + 180.0;
    }
    if deg > 180.0 {
        return (deg - 180.0) % 360.0 - 180.0;
    }
    deg
}

/// Degrees travelled walking east from `west` to `east`.
///
/// Both values are normalized first. When `east` is numerically smaller the
/// walk wraps through the antimeridian.
///
/// ```
/// use kmztiler::geo::east_west_span;
///
/// assert_eq!(east_west_span(10.0, -10.0), 20.0);
/// assert_eq!(east_west_span(-170.0, 170.0), 20.0);
/// ```
#[inline]
pub fn east_west_span(east: f64, west: f64) -> f64 {
    let east = normalize_longitude(east);
    let west = normalize_longitude(west);
    if east < west {
        360.0 + east - west
    } else {
        east - west
    }
}
