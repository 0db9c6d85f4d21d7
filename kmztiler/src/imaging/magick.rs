//! ImageMagick-backed image engine.
//!
//! Uses the external `convert` and `identify` programs. Argument order for
//! `convert` matters: the resize option must precede the input file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use super::{index_digits, tile_count, ImageEngine, ImageError};

const CONVERT: &str = "convert";
const IDENTIFY: &str = "identify";

/// Image engine that shells out to ImageMagick.
#[derive(Debug, Clone)]
pub struct MagickEngine {
    convert: String,
    identify: String,
}

impl Default for MagickEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MagickEngine {
    /// Engine using `convert` and `identify` from `PATH`.
    pub fn new() -> Self {
        Self {
            convert: CONVERT.to_string(),
            identify: IDENTIFY.to_string(),
        }
    }

    /// Use explicit `convert` and `identify` binaries, e.g. absolute paths
    /// to a non-default ImageMagick install.
    pub fn with_programs(convert: impl Into<String>, identify: impl Into<String>) -> Self {
        Self {
            convert: convert.into(),
            identify: identify.into(),
        }
    }

    /// Fail early if either ImageMagick program is missing.
    pub fn check_required_tools(&self) -> Result<(), ImageError> {
        check_tool_available(&self.convert, &["-version"])?;
        check_tool_available(&self.identify, &["-version"])?;
        Ok(())
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<Output, ImageError> {
        debug!(program, ?args, "About to run");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ImageError::ToolMissing {
                tool: program.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ImageError::ToolFailed {
                tool: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// Check that a tool can be launched and exits successfully.
fn check_tool_available(tool: &str, args: &[&str]) -> Result<(), ImageError> {
    match Command::new(tool).args(args).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(ImageError::ToolMissing {
            tool: tool.to_string(),
            reason: "command failed, please ensure ImageMagick is properly installed".to_string(),
        }),
        Err(e) => Err(ImageError::ToolMissing {
            tool: tool.to_string(),
            reason: format!(
                "{}. Please install ImageMagick using your package manager \
                 (e.g. 'apt install imagemagick')",
                e
            ),
        }),
    }
}

/// Parse `identify -format "%w %h"` output.
fn parse_dimensions(tool: &str, stdout: &[u8]) -> Result<(u32, u32), ImageError> {
    let text = String::from_utf8_lossy(stdout);
    let unexpected = || ImageError::UnexpectedOutput {
        tool: tool.to_string(),
        output: text.trim().to_string(),
    };

    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(unexpected());
    }
    let width = fields[0].parse::<u32>().map_err(|_| unexpected())?;
    let height = fields[1].parse::<u32>().map_err(|_| unexpected())?;
    Ok((width, height))
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl ImageEngine for MagickEngine {
    fn name(&self) -> &str {
        "imagemagick"
    }

    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ImageError> {
        if !path.exists() {
            return Err(ImageError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "image not found"),
            });
        }
        // [0] restricts multi-frame formats to the first frame
        let target = format!("{}[0]", path_arg(path));
        let output = self.run(&self.identify, &["-format", "%w %h", &target])?;
        parse_dimensions(&self.identify, &output.stdout)
    }

    fn normalize(&self, input: &Path, output: &Path) -> Result<PathBuf, ImageError> {
        let (input_arg, output_arg) = (path_arg(input), path_arg(output));
        self.run(
            &self.convert,
            &[&input_arg, "-strip", "-interlace", "none", &output_arg],
        )?;
        Ok(output.to_path_buf())
    }

    fn resize_by_area(
        &self,
        input: &Path,
        max_pixel_area: u64,
        output: &Path,
    ) -> Result<PathBuf, ImageError> {
        let area = format!("@{}", max_pixel_area);
        let (input_arg, output_arg) = (path_arg(input), path_arg(output));
        self.run(
            &self.convert,
            &[
                "-resize",
                &area,
                &input_arg,
                "-strip",
                "-interlace",
                "none",
                &output_arg,
            ],
        )?;
        Ok(output.to_path_buf())
    }

    fn crop_grid(
        &self,
        input: &Path,
        tile_size: u32,
        out_dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, ImageError> {
        if tile_size == 0 {
            return Err(ImageError::InvalidTileSize(tile_size));
        }

        let (width, height) = self.dimensions(input)?;
        let count = tile_count(width, height, tile_size);

        fs::create_dir_all(out_dir).map_err(|e| ImageError::Io {
            path: out_dir.to_path_buf(),
            source: e,
        })?;

        let prefix = format!("{}_tile_", stem);
        let pattern = out_dir.join(format!("{}%0{}d.jpg", prefix, index_digits(count)));
        let geometry = format!("{}x{}", tile_size, tile_size);
        let (input_arg, pattern_arg) = (path_arg(input), path_arg(&pattern));
        self.run(
            &self.convert,
            &["-crop", &geometry, &input_arg, "+adjoin", &pattern_arg],
        )?;

        let entries = fs::read_dir(out_dir).map_err(|e| ImageError::Io {
            path: out_dir.to_path_buf(),
            source: e,
        })?;
        let mut tiles: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        // Zero-padded indices: lexicographic order is raster order
        tiles.sort();

        if tiles.len() != count {
            return Err(ImageError::UnexpectedOutput {
                tool: self.convert.clone(),
                output: format!("expected {} tiles, found {}", count, tiles.len()),
            });
        }

        Ok(tiles)
    }
}
