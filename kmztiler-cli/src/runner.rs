//! CLI runner for common setup.
//!
//! Loads the configuration file and initializes logging once, so command
//! handlers only deal with their own work.

use std::path::Path;

use kmztiler::config::{config_file_path, ConfigFile};
use kmztiler::logging::{init_logging, LoggingGuard};
use tracing::{debug, info};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (from `config_path`, or the default location) and start
    /// logging.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(config_file_path);
        let config = ConfigFile::load_from(&path)?;

        let logging_guard = init_logging(verbose, config.logging.file.as_deref())
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;
        debug!(config = %path.display(), "Configuration loaded");

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("kmztiler v{}: {} command", kmztiler::VERSION, command);
    }
}
