//! Configuration management CLI commands.
//!
//! Provides `config init`, `config path` and `config show`.

use std::path::PathBuf;

use clap::Subcommand;
use kmztiler::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a commented config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Where to write it [default: ~/.kmztiler/config.ini]
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show {
        /// Config file to read [default: ~/.kmztiler/config.ini]
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { force, path } => {
            run_init(&path.unwrap_or_else(config_file_path), force)
        }
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show { path } => run_show(&path.unwrap_or_else(config_file_path)),
    }
}

/// Write the default configuration.
fn run_init(path: &std::path::Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    ConfigFile::default().save_to(path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize kmztiler settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    let path = config_file_path();
    println!("{}", path.display());
    if !path.exists() {
        println!("(file does not exist, defaults are in effect)");
    }
    Ok(())
}

/// Print every setting with its effective value.
fn run_show(path: &std::path::Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;
    let unset = |p: &Option<PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    };

    println!("Configuration Settings ({})", path.display());
    println!("======================");
    println!();
    println!("[tiles]");
    println!("  max_tiles = {}", config.tiles.max_tiles);
    println!("  tile_size = {}", config.tiles.tile_size);
    println!();
    println!("[single]");
    println!("  max_pixels = {}", config.single.max_pixels);
    println!();
    println!("[overlay]");
    println!("  drawing_order = {}", config.overlay.drawing_order);
    println!("  normalize_edges = {}", config.overlay.normalize_edges);
    println!();
    println!("[image]");
    println!("  engine = {}", config.image.engine.as_str());
    println!("  jpeg_quality = {}", config.image.jpeg_quality);
    println!();
    println!("[output]");
    println!("  directory = {}", unset(&config.output.directory));
    println!("  keep_tmp = {}", config.output.keep_tmp);
    println!("  parallel = {}", config.output.parallel);
    println!();
    println!("[logging]");
    println!("  file = {}", unset(&config.logging.file));

    Ok(())
}
