//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wtd_core::RegulatoryLimits;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Limits entries are checked against. Unset fields keep the UK/EU defaults.
    #[serde(default)]
    pub limits: RegulatoryLimits,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, `~/.config/wtd/config.toml`, the given
    /// file, then `WTD_` environment variables (`WTD_LIMITS__MAX_DAILY_WORKING_HOURS=10`).
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WTD_*)
        figment = figment.merge(Env::prefixed("WTD_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for wtd.
///
/// On Linux: `~/.config/wtd`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wtd"))
}
