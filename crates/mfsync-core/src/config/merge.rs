//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **Scalars** (api version, timings, page size): a value set in a
//!   higher-precedence file replaces the lower one; unset values inherit
//! - **Stores**: merged by name, field by field, with the same override rule

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use super::discovery::ConfigFiles;
use super::types::Config;
use crate::error::Result;

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. .mfsync.toml
    /// 3. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<Config> {
        let mut merged = Config::default();

        // Lowest to highest precedence
        for path in [&files.global, &files.project, &files.cli].into_iter().flatten() {
            Self::merge_into(&mut merged, path)?;
        }

        Ok(merged)
    }

    /// Load and merge a single config file into the existing config
    fn merge_into(base: &mut Config, path: &Path) -> Result<()> {
        debug!("Loading config file {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Self::overlay(base, config);
        Ok(())
    }

    /// Apply `top` over `base`
    fn overlay(base: &mut Config, top: Config) {
        if top.api_version.is_some() {
            base.api_version = top.api_version;
        }
        if top.request_timeout_secs.is_some() {
            base.request_timeout_secs = top.request_timeout_secs;
        }
        if top.creation_delay_ms.is_some() {
            base.creation_delay_ms = top.creation_delay_ms;
        }
        if top.pass_delay_ms.is_some() {
            base.pass_delay_ms = top.pass_delay_ms;
        }
        if top.max_passes.is_some() {
            base.max_passes = top.max_passes;
        }
        if top.page_size.is_some() {
            base.page_size = top.page_size;
        }

        for (name, store) in top.stores {
            let entry = base.stores.entry(name).or_default();
            if store.domain.is_some() {
                entry.domain = store.domain;
            }
            if store.access_token.is_some() {
                entry.access_token = store.access_token;
            }
        }
    }
}
