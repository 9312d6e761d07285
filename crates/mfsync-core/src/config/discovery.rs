//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

/// Project config file name, searched from the current directory upwards
pub const PROJECT_CONFIG_NAME: &str = ".mfsync.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Project config (.mfsync.toml)
    pub project: Option<PathBuf>,
    /// Global config in the user config directory
    pub global: Option<PathBuf>,
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// Returns a `ConfigFiles` struct with paths to discovered configs.
    #[must_use]
    pub fn discover(cli_path: Option<&Path>) -> ConfigFiles {
        let start = std::env::current_dir().ok();
        Self::discover_from(cli_path, start.as_deref())
    }

    /// Discover configuration files searching upwards from `start`
    #[must_use]
    pub fn discover_from(cli_path: Option<&Path>, start: Option<&Path>) -> ConfigFiles {
        let cli = cli_path.filter(|p| p.is_file()).map(Path::to_path_buf);
        let project = start.and_then(|dir| Self::find_file(dir, PROJECT_CONFIG_NAME));
        let global = Self::find_global_config();

        ConfigFiles {
            cli,
            project,
            global,
        }
    }

    /// Find a config file in `start` or its parent directories
    fn find_file(start: &Path, name: &str) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Find global config in the user config directory
    fn find_global_config() -> Option<PathBuf> {
        let global_config = dirs::config_dir()?.join("mfsync").join("config.toml");
        global_config.is_file().then_some(global_config)
    }
}
