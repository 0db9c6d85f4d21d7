//! User configuration.
//!
//! Values come from three layers, highest precedence first: command-line
//! flags, `~/.kmztiler/config.ini`, built-in defaults. This module owns the
//! file layer.
//!
//! # Example
//!
//! ```
//! use kmztiler::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let mosaic = config.mosaic_config(config.tiled_mode());
//! assert_eq!(mosaic.drawing_order, 51);
//! ```

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, ImageSettings, LoggingSettings, OutputSettings, OverlaySettings, SingleSettings,
    TilesSettings,
};
