//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use kmztiler::config::ConfigFile;
use kmztiler::imaging::EngineKind;
use kmztiler::kml::EdgeMode;
use kmztiler::mosaic::{InputReport, MosaicAssembler, MosaicConfig, MosaicMode};
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Image engine selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EngineChoice {
    /// In-process decoding, no external tools needed
    Builtin,
    /// ImageMagick 'convert' and 'identify'
    Magick,
}

impl From<EngineChoice> for EngineKind {
    fn from(choice: EngineChoice) -> Self {
        match choice {
            EngineChoice::Builtin => EngineKind::Builtin,
            EngineChoice::Magick => EngineKind::Magick,
        }
    }
}

/// Options shared by the `kmz` and `bigkmz` commands.
#[derive(Debug, Clone, Args)]
pub struct SharedArgs {
    /// Geo-anchored images: NAME_NORTH_SOUTH_EAST_WEST.jpg in decimal degrees
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// KML drawOrder for the overlays [default: 51]
    #[arg(short = 'd', long)]
    pub drawing_order: Option<i32>,

    /// Keep temporary working directories for inspection
    #[arg(short = 'k', long)]
    pub keep_tmp: bool,

    /// Directory for the .kmz files [default: current directory]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write east/west edges normalized to [-180, 180]
    #[arg(long)]
    pub normalize_edges: bool,

    /// Image engine [default: builtin]
    #[arg(long, value_enum)]
    pub engine: Option<EngineChoice>,

    /// Process several images at once
    #[arg(long)]
    pub parallel: bool,

    /// Config file to use instead of ~/.kmztiler/config.ini
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Build assembler settings: CLI flags over config file over defaults.
pub fn resolve_mosaic_config(
    mode: MosaicMode,
    args: &SharedArgs,
    config: &ConfigFile,
) -> MosaicConfig {
    let mut mosaic = config.mosaic_config(mode);

    if let Some(order) = args.drawing_order {
        mosaic = mosaic.with_drawing_order(order);
    }
    if let Some(dir) = &args.output_dir {
        mosaic = mosaic.with_output_dir(dir);
    }
    if args.normalize_edges {
        mosaic = mosaic.with_edge_mode(EdgeMode::Normalized);
    }
    if args.keep_tmp {
        mosaic = mosaic.with_keep_tmp(true);
    }
    if args.parallel {
        mosaic = mosaic.with_parallel(true);
    }

    mosaic
}

/// Resolve the image engine from CLI args and config.
pub fn resolve_engine(cli_engine: Option<EngineChoice>, config: &ConfigFile) -> EngineKind {
    cli_engine
        .map(EngineKind::from)
        .unwrap_or(config.image.engine)
}

/// Run a batch and print one line per input.
///
/// Successes go to stdout, failures to stderr with the failing step.
pub fn run_batch(
    runner: &CliRunner,
    mode: MosaicMode,
    args: &SharedArgs,
) -> Result<(), CliError> {
    let config = runner.config();
    let mosaic = resolve_mosaic_config(mode, args, config);

    if let Some(dir) = &args.output_dir {
        if dir.exists() && !dir.is_dir() {
            return Err(CliError::Config(format!(
                "output directory is not a directory: {}",
                dir.display()
            )));
        }
    }

    let engine = resolve_engine(args.engine, config).build(config.image.jpeg_quality)?;
    info!(
        engine = engine.name(),
        mode = ?mosaic.mode,
        drawing_order = mosaic.drawing_order,
        keep_tmp = mosaic.keep_tmp,
        parallel = mosaic.parallel,
        "Starting batch"
    );

    let assembler = MosaicAssembler::new(engine, mosaic);
    let reports = assembler.process_all(&args.files);
    print_reports(&reports);

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        return Err(CliError::InputsFailed {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}

fn print_reports(reports: &[InputReport]) {
    for report in reports {
        match &report.result {
            Ok(output) => {
                println!(
                    "{} -> {} ({} overlay(s), {}x{} px)",
                    report.input.display(),
                    output.archive.display(),
                    output.tiles,
                    output.width,
                    output.height
                );
                if let Some(kept) = &output.kept_staging {
                    println!("  temporary files kept in {}", kept.display());
                }
            }
            Err(e) => {
                eprintln!(
                    "{}: {} step failed: {}",
                    report.input.display(),
                    e.stage(),
                    e
                );
            }
        }
    }
}
