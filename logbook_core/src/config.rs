//! Configuration file support for the gym logbook.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/gym-logbook/config.toml`.

use crate::analytics::{DEFAULT_CHART_LIMIT, DEFAULT_TOP_LIMIT};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub charts: ChartConfig,

    #[serde(default)]
    pub ranking: RankingConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Plateau detection parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressionConfig {
    /// Number of most recent sets that must share a weight
    #[serde(default = "default_window")]
    pub window: usize,

    /// Weight added to the current weight when suggesting an increase
    #[serde(default = "default_increment")]
    pub increment: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            increment: default_increment(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_limit")]
    pub limit: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            limit: default_chart_limit(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_limit: default_top_limit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("gym-logbook")
}

fn default_window() -> usize {
    5
}

fn default_increment() -> f64 {
    2.5
}

fn default_chart_limit() -> usize {
    DEFAULT_CHART_LIMIT
}

fn default_top_limit() -> usize {
    DEFAULT_TOP_LIMIT
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject settings the analytics cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.progression.window == 0 {
            return Err(Error::Config("progression.window must be at least 1".into()));
        }
        if !self.progression.increment.is_finite() || self.progression.increment <= 0.0 {
            return Err(Error::Config(format!(
                "progression.increment must be a positive number, got {}",
                self.progression.increment
            )));
        }
        if self.charts.limit == 0 {
            return Err(Error::Config("charts.limit must be at least 1".into()));
        }
        if self.ranking.top_limit == 0 {
            return Err(Error::Config("ranking.top_limit must be at least 1".into()));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("gym-logbook").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
