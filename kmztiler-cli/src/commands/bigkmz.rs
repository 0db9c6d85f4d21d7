//! Bigkmz command - single-image KMZs for Google Earth.

use clap::Args;
use kmztiler::config::ConfigFile;
use kmztiler::mosaic::MosaicMode;

use super::common::{run_batch, SharedArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the bigkmz command.
#[derive(Debug, Clone, Args)]
pub struct BigkmzArgs {
    /// Shrink images with more pixels than this; 0 keeps full size [default: 0]
    #[arg(short = 'm', long)]
    pub max_pixels: Option<u64>,

    #[command(flatten)]
    pub shared: SharedArgs,
}

impl BigkmzArgs {
    /// Single mode from flags, falling back to `[single]` in the config file.
    pub fn mode(&self, config: &ConfigFile) -> MosaicMode {
        MosaicMode::Single {
            max_pixels: self.max_pixels.unwrap_or(config.single.max_pixels),
        }
    }
}

/// Run the bigkmz command.
pub fn run(args: BigkmzArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.shared.config.as_deref(), args.shared.verbose)?;
    runner.log_startup("bigkmz");

    let mode = args.mode(runner.config());
    run_batch(&runner, mode, &args.shared)
}
