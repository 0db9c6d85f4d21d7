//! INI parsing: `Ini` → [`ConfigFile`].
//!
//! The one place INI key names are mapped to struct fields. Unknown
//! sections and keys are ignored.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` into a [`ConfigFile`], starting from the defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("tiles")) {
        if let Some(v) = section.get("max_tiles") {
            config.tiles.max_tiles =
                parse_positive("tiles", "max_tiles", v, "must be a positive integer")?;
        }
        if let Some(v) = section.get("tile_size") {
            config.tiles.tile_size = parse_positive(
                "tiles",
                "tile_size",
                v,
                "must be a positive integer (pixels)",
            )?;
        }
    }

    if let Some(section) = ini.section(Some("single")) {
        if let Some(v) = section.get("max_pixels") {
            config.single.max_pixels = parse_value(
                "single",
                "max_pixels",
                v,
                "must be a non-negative integer (0 = unlimited)",
            )?;
        }
    }

    if let Some(section) = ini.section(Some("overlay")) {
        if let Some(v) = section.get("drawing_order") {
            config.overlay.drawing_order =
                parse_value("overlay", "drawing_order", v, "must be an integer")?;
        }
        if let Some(v) = section.get("normalize_edges") {
            config.overlay.normalize_edges = parse_bool("overlay", "normalize_edges", v)?;
        }
    }

    if let Some(section) = ini.section(Some("image")) {
        if let Some(v) = section.get("engine") {
            config.image.engine =
                parse_value("image", "engine", v, "must be 'builtin' or 'magick'")?;
        }
        if let Some(v) = section.get("jpeg_quality") {
            let quality: u8 =
                parse_value("image", "jpeg_quality", v, "must be between 1 and 100")?;
            if !(1..=100).contains(&quality) {
                return Err(invalid(
                    "image",
                    "jpeg_quality",
                    v,
                    "must be between 1 and 100",
                ));
            }
            config.image.jpeg_quality = quality;
        }
    }

    if let Some(section) = ini.section(Some("output")) {
        config.output.directory = optional_path(section, "directory");
        if let Some(v) = section.get("keep_tmp") {
            config.output.keep_tmp = parse_bool("output", "keep_tmp", v)?;
        }
        if let Some(v) = section.get("parallel") {
            config.output.parallel = parse_bool("output", "parallel", v)?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        config.logging.file = optional_path(section, "file");
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<u32, ConfigFileError> {
    match parse_value::<u32>(section, key, value, reason)? {
        0 => Err(invalid(section, key, value, reason)),
        n => Ok(n),
    }
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(section, key, value, "must be 'true' or 'false'")),
    }
}

fn optional_path(section: &Properties, key: &str) -> Option<PathBuf> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(expand_tilde)
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
