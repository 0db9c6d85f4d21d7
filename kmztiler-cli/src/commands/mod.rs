//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`kmz`] - Tiled KMZs for GPS handhelds
//! - [`bigkmz`] - Single-image KMZs for Google Earth
//! - [`config`] - Configuration management (init, path, show)

pub mod bigkmz;
pub mod common;
pub mod config;
pub mod kmz;
