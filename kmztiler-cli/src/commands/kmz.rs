//! Kmz command - tiled KMZs for GPS handhelds.

use clap::Args;
use kmztiler::config::ConfigFile;
use kmztiler::mosaic::MosaicMode;

use super::common::{run_batch, SharedArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the kmz command.
#[derive(Debug, Clone, Args)]
pub struct KmzArgs {
    /// Most tiles per KMZ; larger images are shrunk to fit [default: 100]
    #[arg(short = 't', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tiles: Option<u32>,

    /// Tile edge in pixels [default: 1024]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub tile_size: Option<u32>,

    #[command(flatten)]
    pub shared: SharedArgs,
}

impl KmzArgs {
    /// Tiled mode from flags, falling back to `[tiles]` in the config file.
    pub fn mode(&self, config: &ConfigFile) -> MosaicMode {
        MosaicMode::Tiled {
            max_tiles: self.max_tiles.unwrap_or(config.tiles.max_tiles),
            tile_size: self.tile_size.unwrap_or(config.tiles.tile_size),
        }
    }
}

/// Run the kmz command.
pub fn run(args: KmzArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.shared.config.as_deref(), args.shared.verbose)?;
    runner.log_startup("kmz");

    let mode = args.mode(runner.config());
    run_batch(&runner, mode, &args.shared)
}
