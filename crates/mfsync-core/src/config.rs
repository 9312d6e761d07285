//! Configuration discovery, merging, environment overrides and validation
//!
//! This module handles:
//! - Config file discovery from multiple locations
//! - TOML parsing with serde
//! - Config merging with precedence rules
//! - `MFSYNC_*` environment variable overrides
//! - Validation and error reporting

mod discovery;
mod env;
mod merge;
mod types;
mod validation;


use std::path::Path;

pub use discovery::{ConfigDiscovery, ConfigFiles};
pub use env::EnvOverrides;
pub use merge::ConfigMerger;
pub use types::{Config, StoreConfig, StoreEntry};
pub use validation::ConfigValidator;

use crate::error::Result;

/// Configuration manager that coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from all sources and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if config files are invalid or cannot be read.
    pub fn load(cli_config_path: Option<&Path>) -> Result<Config> {
        Self::load_with_env(cli_config_path, std::env::vars())
    }

    /// Load configuration using `vars` as the environment
    ///
    /// # Errors
    ///
    /// Returns an error if config files are invalid or cannot be read.
    pub fn load_with_env(
        cli_config_path: Option<&Path>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Config> {
        if let Some(path) = cli_config_path
            && !path.is_file()
        {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config_files = ConfigDiscovery::discover(cli_config_path);
        let mut merged = ConfigMerger::merge(&config_files)?;

        EnvOverrides::apply(&mut merged, vars);

        ConfigValidator::validate(&merged)?;

        Ok(merged)
    }
}
