//! Geo-anchored filename parsing.
//!
//! Map images carry their bounding box in the file name instead of a
//! sidecar file:
//!
//! `<map-name>_<north>_<south>_<east>_<west>.<ext>`
//!
//! For example `Grouse-Mountain_49.470628_49.336694_-123.132056_-122.9811.jpg`.
//! All four coordinates are decimal degrees.

use std::path::Path;

use thiserror::Error;

use crate::geo::{GeoBox, GeoBoxError};

/// Example shown to users whose file name does not follow the convention.
pub const FILENAME_EXAMPLE: &str = "Grouse-Mountain_49.470628_49.336694_-123.132056_-122.9811.jpg";

/// Map name and bounding box recovered from a file name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFilename {
    /// Base name of the map, used for the KMZ name and its root folder.
    pub map_name: String,
    /// Bounding box with normalized longitudes.
    pub bbox: GeoBox,
}

/// Error parsing a geo-anchored filename.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilenameError {
    /// The name did not split into a map name plus four coordinates.
    #[error(
        "file name must include bounding box name_N_S_E_W.jpg in decimal degrees, \
         e.g. {example} (found {found} underscore-separated parts)",
        example = FILENAME_EXAMPLE
    )]
    WrongFieldCount { found: usize },

    /// Nothing usable precedes the coordinates.
    #[error(
        "file name has no map name before the coordinates, e.g. {example}",
        example = FILENAME_EXAMPLE
    )]
    EmptyMapName,

    /// A coordinate field is not a number.
    #[error("cannot parse {field} coordinate '{value}' in file name")]
    InvalidCoordinate { field: &'static str, value: String },

    /// The coordinates parse but do not describe a valid box.
    #[error("invalid bounding box in file name: {0}")]
    InvalidBox(#[from] GeoBoxError),
}

const FIELD_NAMES: [&str; 4] = ["north", "south", "east", "west"];

/// Parse a geo-anchored filename into its map name and bounding box.
///
/// The final field has its extension stripped by splitting on `.` into at
/// most three pieces and keeping the first two when there are three, so a
/// decimal coordinate followed by an extension (`-122.9811.jpg`) survives.
///
/// # Examples
///
/// ```
/// use kmztiler::naming::parse_geo_filename;
///
/// let parsed =
///     parse_geo_filename("Grouse-Mountain_49.470628_49.336694_-123.132056_-122.9811.jpg")
///         .unwrap();
/// assert_eq!(parsed.map_name, "Grouse-Mountain");
/// assert_eq!(parsed.bbox.north(), 49.470628);
/// assert_eq!(parsed.bbox.west(), -122.9811);
///
/// // North and south swapped
/// assert!(
///     parse_geo_filename("Grouse-Mountain_49.336694_49.470628_-123.132056_-122.9811.jpg")
///         .is_err()
/// );
/// ```
pub fn parse_geo_filename(filename: &str) -> Result<GeoFilename, FilenameError> {
    let parts: Vec<&str> = filename.split('_').collect();
    if parts.len() != 5 {
        return Err(FilenameError::WrongFieldCount { found: parts.len() });
    }

    let map_name = Path::new(parts[0])
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if map_name.is_empty() || map_name == "." || map_name == ".." {
        return Err(FilenameError::EmptyMapName);
    }

    let mut coords = [0.0_f64; 4];
    for (i, raw) in parts[1..].iter().enumerate() {
        let field = if i == 3 {
            strip_extension(raw)
        } else {
            (*raw).to_string()
        };
        coords[i] = field
            .parse::<f64>()
            .map_err(|_| FilenameError::InvalidCoordinate {
                field: FIELD_NAMES[i],
                value: field.clone(),
            })?;
    }

    let [north, south, east, west] = coords;
    let bbox = GeoBox::new(north, south, east, west)?;

    Ok(GeoFilename { map_name, bbox })
}

/// Drops the extension from the last coordinate field.
fn strip_extension(field: &str) -> String {
    let pieces: Vec<&str> = field.splitn(3, '.').collect();
    if pieces.len() == 3 {
        format!("{}.{}", pieces[0], pieces[1])
    } else {
        field.to_string()
    }
}
