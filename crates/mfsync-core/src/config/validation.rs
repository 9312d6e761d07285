//! Configuration validation and error reporting

use super::types::Config;
use crate::error::Result;

/// Largest page size the Admin API accepts
const MAX_PAGE_SIZE: usize = 250;

/// Suffix appended to bare shop names
const DEFAULT_DOMAIN_SUFFIX: &str = ".myshopify.com";

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// Store completeness (domain and token) is checked when a store is
    /// resolved, since only the stores a command uses need to be complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(version) = &config.api_version
            && !Self::is_valid_api_version(version)
        {
            anyhow::bail!("Invalid api_version '{version}': expected YYYY-MM or 'unstable'");
        }

        if config.request_timeout_secs == Some(0) {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }

        if config.max_passes == Some(0) {
            anyhow::bail!("max_passes must be at least 1");
        }

        if let Some(page_size) = config.page_size
            && !(1..=MAX_PAGE_SIZE).contains(&page_size)
        {
            anyhow::bail!("page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}");
        }

        for (name, store) in &config.stores {
            if !Self::is_valid_store_name(name) {
                anyhow::bail!(
                    "Invalid store name '{name}': use letters, digits, '-' and '_' only"
                );
            }
            if let Some(domain) = &store.domain {
                Self::normalize_domain(domain)
                    .map_err(|e| anyhow::anyhow!("Store '{name}': {e}"))?;
            }
        }

        Ok(())
    }

    /// Normalize a store domain to its bare host form
    ///
    /// A scheme and trailing slash are stripped, and a bare shop name gets
    /// `.myshopify.com` appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is not a plausible host name.
    pub fn normalize_domain(domain: &str) -> Result<String> {
        let trimmed = domain.trim();
        let host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed)
            .trim_end_matches('/');

        if host.is_empty()
            || host.starts_with('.')
            || host.ends_with('.')
            || !host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            anyhow::bail!("Invalid domain '{domain}'");
        }

        if host.contains('.') {
            Ok(host.to_ascii_lowercase())
        } else {
            Ok(format!("{}{DEFAULT_DOMAIN_SUFFIX}", host.to_ascii_lowercase()))
        }
    }

    fn is_valid_store_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn is_valid_api_version(version: &str) -> bool {
        if version == "unstable" {
            return true;
        }
        let Some((year, month)) = version.split_once('-') else {
            return false;
        };
        year.len() == 4
            && month.len() == 2
            && year.chars().all(|c| c.is_ascii_digit())
            && month
                .parse::<u8>()
                .is_ok_and(|month| (1..=12).contains(&month))
    }
}
