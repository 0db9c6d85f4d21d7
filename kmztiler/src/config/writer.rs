//! INI serialization: [`ConfigFile`] → commented INI text.

use std::path::Path;

use super::settings::ConfigFile;

/// Render `config` as the commented INI written to config.ini.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let directory = config
        .output
        .directory
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();
    let log_file = config
        .logging
        .file
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();

    format!(
        r#"[tiles]
; Most tiles one KMZ should hold (default: 100). Garmin handhelds show at
; most 100 tiles across all loaded KMZs; larger images are shrunk to fit.
max_tiles = {}
; Tile edge in pixels (default: 1024). Garmin units accept up to 1024x1024.
tile_size = {}

[single]
; Pixel budget for bigkmz output (default: 0 = keep full resolution)
max_pixels = {}

[overlay]
; KML drawOrder for every overlay (default: 51). Higher draws on top of
; vector basemaps on Garmin units.
drawing_order = {}
; Write east/west edges normalized to [-180, 180] (default: false).
; When false, tiles east of the antimeridian keep longitudes above 180.
normalize_edges = {}

[image]
; Image engine:
;   builtin - in-process decoding and encoding (no external tools)
;   magick  - ImageMagick 'convert' and 'identify' (must be on PATH)
engine = {}
; JPEG quality for the builtin engine, 1-100 (default: 90)
jpeg_quality = {}

[output]
; Directory for .kmz files. If empty, the current directory is used.
directory = {}
; Keep temporary working directories for inspection (default: false)
keep_tmp = {}
; Process several input images at once (default: false)
parallel = {}

[logging]
; Optional log file written in addition to stderr
file = {}
"#,
        config.tiles.max_tiles,
        config.tiles.tile_size,
        config.single.max_pixels,
        config.overlay.drawing_order,
        config.overlay.normalize_edges,
        config.image.engine.as_str(),
        config.image.jpeg_quality,
        directory,
        config.output.keep_tmp,
        config.output.parallel,
        log_file,
    )
}

/// Display a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::EngineKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_string() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("max_tiles = 100\n"));
        assert!(text.contains("tile_size = 1024\n"));
        assert!(text.contains("max_pixels = 0\n"));
        assert!(text.contains("drawing_order = 51\n"));
        assert!(text.contains("normalize_edges = false\n"));
        assert!(text.contains("engine = builtin\n"));
        assert!(text.contains("directory = \n"));
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.tiles.max_tiles = 36;
        config.single.max_pixels = 12_000_000;
        config.overlay.normalize_edges = true;
        config.image.engine = EngineKind::Magick;
        config.image.jpeg_quality = 75;
        config.output.directory = Some(PathBuf::from("/srv/maps"));
        config.output.parallel = true;

        config.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }
}
