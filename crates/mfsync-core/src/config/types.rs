//! Configuration types and structures

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env::env_key;
use super::validation::ConfigValidator;
use crate::error::Result;
use crate::sync::SyncOptions;

/// Admin API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2024-10";

/// Request timeout used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// One `[stores.<name>]` table as written in a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StoreEntry {
    /// Store domain (`example.myshopify.com` or just `example`)
    pub domain: Option<String>,
    /// Admin API access token
    pub access_token: Option<String>,
}

/// A fully specified store, ready to build a client from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name the store is configured under
    pub name: String,
    /// Normalized store domain
    pub domain: String,
    /// Admin API access token
    pub access_token: String,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Admin API version (`YYYY-MM` or `unstable`)
    pub api_version: Option<String>,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,

    /// Wait after each created metaobject definition, in milliseconds
    pub creation_delay_ms: Option<u64>,

    /// Wait between retry passes, in milliseconds
    pub pass_delay_ms: Option<u64>,

    /// Retry passes after the initial creation attempt
    pub max_passes: Option<usize>,

    /// Entries fetched per page
    pub page_size: Option<usize>,

    /// Configured stores by name
    #[serde(default)]
    pub stores: BTreeMap<String, StoreEntry>,
}

impl Config {
    /// Admin API version to talk to
    #[must_use]
    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    /// HTTP request timeout
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Engine options with configured values applied over the defaults
    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        let defaults = SyncOptions::default();
        SyncOptions {
            creation_delay: self
                .creation_delay_ms
                .map_or(defaults.creation_delay, Duration::from_millis),
            pass_delay: self
                .pass_delay_ms
                .map_or(defaults.pass_delay, Duration::from_millis),
            max_passes: self.max_passes.unwrap_or(defaults.max_passes),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }

    /// Look up a store entry by name
    ///
    /// Names that only differ in case or `-`/`_` (as produced by
    /// environment variables) refer to the same store.
    #[must_use]
    pub fn store_entry(&self, name: &str) -> Option<(&str, &StoreEntry)> {
        if let Some((key, entry)) = self.stores.get_key_value(name) {
            return Some((key.as_str(), entry));
        }
        let wanted = env_key(name);
        self.stores
            .iter()
            .find(|(key, _)| env_key(key) == wanted)
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Resolve a complete store configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unknown, lacks a domain or token, or
    /// its domain is malformed.
    pub fn store(&self, name: &str) -> Result<StoreConfig> {
        let Some((key, entry)) = self.store_entry(name) else {
            let env = env_key(name);
            anyhow::bail!(
                "Unknown store '{name}': add a [stores.{name}] table to the config file \
                 or set MFSYNC_{env}_DOMAIN and MFSYNC_{env}_ACCESS_TOKEN"
            );
        };

        let domain = entry
            .domain
            .as_deref()
            .filter(|domain| !domain.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Store '{key}' has no domain configured"))?;
        let access_token = entry
            .access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Store '{key}' has no access token configured"))?;

        Ok(StoreConfig {
            name: key.to_string(),
            domain: ConfigValidator::normalize_domain(domain)?,
            access_token: access_token.trim().to_string(),
        })
    }
}
