//! Configuration module
//!
//! Settings loaded from `config.toml`, overridable from the command line.

#[allow(clippy::module_inception)]
pub mod config;

pub use config::{Config, DisplayConfig, SearchConfig, ServerConfig};
