//! kmztiler CLI - Command-line interface
//!
//! Converts geo-anchored map images into KMZ ground overlays.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::bigkmz::BigkmzArgs;
use commands::config::ConfigCommands;
use commands::kmz::KmzArgs;

#[derive(Parser)]
#[command(name = "kmztiler")]
#[command(version = kmztiler::VERSION)]
#[command(about = "Convert geo-anchored map images into KMZ overlays", long_about = None)]
#[command(after_help = "Image file names must carry their bounding box in decimal degrees:\n  \
    NAME_NORTH_SOUTH_EAST_WEST.jpg\n  \
    e.g. Grouse-Mountain_49.470628_49.336694_-123.132056_-122.9811.jpg")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tile images into KMZs for Garmin handhelds (at most 1024x1024 per tile)
    Kmz(KmzArgs),

    /// Wrap each image whole in a KMZ for Google Earth
    Bigkmz(BigkmzArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Kmz(args) => commands::kmz::run(args),
        Commands::Bigkmz(args) => commands::bigkmz::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
