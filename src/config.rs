//! Configuration loading.
//!
//! Loads `config.toml` from `$AGENCYDESK_CONFIG_PATH` or
//! `~/.agencydesk/config.toml`. A missing file means defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::format::{EmptyCopyBlockPolicy, FencedBlockPolicy, FormatterConfig};
use crate::roles::RoleRule;

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "AGENCYDESK_CONFIG_PATH";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Message formatter settings.
    pub formatter: FormatterConfig,
    /// Role rule overrides and additions.
    pub roles: Vec<RoleRule>,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for JSON log files; console only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            dir: None,
        }
    }
}

impl Config {
    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function so tests need not touch the process env.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("AGENCYDESK_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = env("AGENCYDESK_LOG_DIR") {
            self.logging.dir = Some(PathBuf::from(v));
        }

        if let Some(v) = env("AGENCYDESK_FENCED_BLOCKS") {
            match v.trim().to_ascii_lowercase().as_str() {
                "prose" => self.formatter.fenced_blocks = FencedBlockPolicy::Prose,
                "tiles" => self.formatter.fenced_blocks = FencedBlockPolicy::Tiles,
                _ => tracing::warn!(
                    var = "AGENCYDESK_FENCED_BLOCKS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("AGENCYDESK_EMPTY_COPY_BLOCK") {
            match v.trim().to_ascii_lowercase().as_str() {
                "drop" => self.formatter.empty_copy_block = EmptyCopyBlockPolicy::Drop,
                "literal" => self.formatter.empty_copy_block = EmptyCopyBlockPolicy::Literal,
                _ => tracing::warn!(
                    var = "AGENCYDESK_EMPTY_COPY_BLOCK",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }
}

/// Load config from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse config at {}", path.display()))
}

/// Load config from `path`, falling back to defaults if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_or_default(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading config from file");
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file found, using defaults");
        Ok(Config::default())
    }
}

/// Load the config from its resolved path and apply env overrides.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
pub fn load_default_config() -> anyhow::Result<Config> {
    let path = config_path_with(|key| std::env::var(key).ok())?;
    let mut config = load_config_or_default(&path)?;
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

/// Resolve the config file path using a custom env resolver.
///
/// # Errors
///
/// Returns an error if no override is set and the home directory is unknown.
pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<PathBuf> {
    if let Some(p) = env(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(p));
    }
    Ok(config_dir()?.join("config.toml"))
}

/// Resolve the default config directory (`~/.agencydesk/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".agencydesk"))
}
