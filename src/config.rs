use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::deserialize_duration;

/// Default base currency.
fn default_base_currency() -> String {
    "USD".to_string()
}

/// Display/output formatting configuration.
///
/// Purely presentation settings; calculations always keep full precision.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    /// If set, money values are rounded to this many decimal places before
    /// rendering.
    pub currency_decimals: Option<u32>,

    /// When true, render money values with thousands separators.
    pub currency_grouping: bool,

    /// Optional currency symbol (e.g. "$") prefixed to money values.
    pub currency_symbol: Option<String>,
}

/// Default quote staleness (15 minutes).
fn default_quote_staleness() -> std::time::Duration {
    std::time::Duration::from_secs(15 * 60)
}

/// Refresh/staleness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// How old the portfolio's quotes can be before `summary` warns that a
    /// refresh is due.
    #[serde(
        default = "default_quote_staleness",
        deserialize_with = "deserialize_duration"
    )]
    pub quote_staleness: std::time::Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            quote_staleness: default_quote_staleness(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from the config file
    /// location. If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    /// Currency all values are denominated in (e.g. "USD").
    #[serde(default = "default_base_currency")]
    pub base_currency: String,

    /// Display/output formatting settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Refresh/staleness settings.
    #[serde(default)]
    pub refresh: RefreshConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            base_currency: default_base_currency(),
            display: DisplayConfig::default(),
            refresh: RefreshConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the data directory path.
    ///
    /// If `data_dir` is set and relative, it's resolved relative to
    /// `config_dir`. If `data_dir` is not set, returns `config_dir`.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./foliotrack.toml` if it exists in the current directory
/// 2. `~/.local/share/foliotrack/foliotrack.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("foliotrack.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("foliotrack").join("foliotrack.toml");
    }

    local_config
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The resolved data directory path.
    pub data_dir: PathBuf,

    /// Currency all values are denominated in.
    pub base_currency: String,

    /// Display/output formatting settings.
    pub display: DisplayConfig,

    /// Refresh/staleness settings.
    pub refresh: RefreshConfig,
}

impl ResolvedConfig {
    /// Load and resolve config from a file path.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        let data_dir = config.resolve_data_dir(config_dir);

        Ok(Self {
            data_dir,
            base_currency: config.base_currency,
            display: config.display,
            refresh: config.refresh,
        })
    }

    /// Load config, falling back to defaults if the file doesn't exist.
    /// A missing file uses its intended parent directory as the data dir.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            let config_path = if config_path.is_relative() {
                std::env::current_dir()
                    .context("Failed to get current directory")?
                    .join(config_path)
            } else {
                config_path.to_path_buf()
            };

            let config_dir = config_path
                .parent()
                .context("Config path has no parent directory")?;

            Ok(Self {
                data_dir: config_dir.to_path_buf(),
                base_currency: default_base_currency(),
                display: DisplayConfig::default(),
                refresh: RefreshConfig::default(),
            })
        }
    }
}
