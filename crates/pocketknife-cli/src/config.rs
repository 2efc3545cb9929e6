// crates/pocketknife-cli/src/config.rs
//
// Runtime configuration for the pocketknife CLI.
// Loaded from a TOML file or populated with sensible defaults; command-line
// flags override individual keys.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pocketknife_chain::{LcdConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use pocketknife_core::{Denomination, TreasuryError, DEFAULT_MAX_WORKERS};

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
    /// Base URL of the chain's REST gateway.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// On-chain base denom.
    #[serde(default = "default_denom")]
    pub denom: String,

    /// Symbol printed next to display amounts.
    #[serde(default = "default_display_denom")]
    pub display_denom: String,

    /// Base units per display token.
    #[serde(default = "default_base_units_per_token")]
    pub base_units_per_token: u64,

    /// Bech32 prefix of account addresses.
    #[serde(default = "default_account_prefix")]
    pub account_prefix: String,

    /// Bech32 prefix of validator operator addresses.
    #[serde(default = "default_validator_prefix")]
    pub validator_prefix: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Fetch worker pool size.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_denom() -> String {
    "upokt".to_string()
}

fn default_display_denom() -> String {
    "POKT".to_string()
}

fn default_base_units_per_token() -> u64 {
    1_000_000
}

fn default_account_prefix() -> String {
    "pokt".to_string()
}

fn default_validator_prefix() -> String {
    "poktvaloper".to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            denom: default_denom(),
            display_denom: default_display_denom(),
            base_units_per_token: default_base_units_per_token(),
            account_prefix: default_account_prefix(),
            validator_prefix: default_validator_prefix(),
            request_timeout_secs: default_request_timeout_secs(),
            max_workers: default_max_workers(),
            log_level: default_log_level(),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from this file.
    File(PathBuf),
    /// The default file does not exist; built-in defaults are in use.
    Defaults(PathBuf),
    /// No home directory to look in; built-in defaults are in use.
    NoHome,
}

/// Default config location: `~/.pocketknife/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pocketknife").join("config.toml"))
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self, TreasuryError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            TreasuryError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| TreasuryError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Resolve the configuration for this run.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file falls back to defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, ConfigSource), TreasuryError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())));
        }
        match default_path() {
            Some(path) if path.exists() => {
                let config = Self::load(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            Some(path) => Ok((Self::default(), ConfigSource::Defaults(path))),
            None => Ok((Self::default(), ConfigSource::NoHome)),
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), TreasuryError> {
        if self.max_workers == 0 {
            return Err(TreasuryError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(TreasuryError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        for (key, value) in [
            ("endpoint", &self.endpoint),
            ("denom", &self.denom),
            ("account_prefix", &self.account_prefix),
            ("validator_prefix", &self.validator_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(TreasuryError::Config(format!("{} must not be empty", key)));
            }
        }
        self.denomination().map(|_| ())
    }

    pub fn denomination(&self) -> Result<Denomination, TreasuryError> {
        Denomination::new(
            &self.denom,
            &self.display_denom,
            u128::from(self.base_units_per_token),
        )
    }

    pub fn lcd_config(&self) -> LcdConfig {
        LcdConfig {
            endpoint: self.endpoint.clone(),
            denom: self.denom.clone(),
            account_prefix: self.account_prefix.clone(),
            validator_prefix: self.validator_prefix.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
