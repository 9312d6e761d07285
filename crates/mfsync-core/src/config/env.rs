//! `MFSYNC_*` environment variable overrides
//!
//! - `MFSYNC_API_VERSION` overrides `api_version`
//! - `MFSYNC_<STORE>_DOMAIN` and `MFSYNC_<STORE>_ACCESS_TOKEN` override (or
//!   declare) a store, where `<STORE>` is the store name upper-cased with
//!   `-` replaced by `_`

use tracing::debug;

use super::types::{Config, StoreEntry};

const PREFIX: &str = "MFSYNC_";
const API_VERSION_VAR: &str = "MFSYNC_API_VERSION";
const DOMAIN_SUFFIX: &str = "_DOMAIN";
const TOKEN_SUFFIX: &str = "_ACCESS_TOKEN";

/// Environment form of a store name
pub(super) fn env_key(name: &str) -> String {
    name.to_uppercase().replace('-', "_")
}

/// Applies environment variables on top of file configuration
pub struct EnvOverrides;

impl EnvOverrides {
    /// Apply every recognized variable of `vars` to `config`
    pub fn apply(config: &mut Config, vars: impl IntoIterator<Item = (String, String)>) {
        for (name, value) in vars {
            if name == API_VERSION_VAR {
                debug!("Using API version from {API_VERSION_VAR}");
                config.api_version = Some(value);
                continue;
            }

            let Some(rest) = name.strip_prefix(PREFIX) else {
                continue;
            };

            if let Some(store) = rest.strip_suffix(TOKEN_SUFFIX) {
                if let Some(entry) = Self::store_entry(config, store) {
                    debug!("Using access token for store {store} from {name}");
                    entry.access_token = Some(value);
                }
            } else if let Some(store) = rest.strip_suffix(DOMAIN_SUFFIX)
                && let Some(entry) = Self::store_entry(config, store)
            {
                debug!("Using domain for store {store} from {name}");
                entry.domain = Some(value);
            }
        }
    }

    /// Existing store matching `key`, or a new one named after it
    fn store_entry<'a>(config: &'a mut Config, key: &str) -> Option<&'a mut StoreEntry> {
        if key.is_empty() {
            return None;
        }

        let existing = config
            .stores
            .keys()
            .find(|name| env_key(name) == key)
            .cloned();
        let name = existing.unwrap_or_else(|| key.to_lowercase());

        Some(config.stores.entry(name).or_default())
    }
}
