//! Configuration file support for GitFit.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/gitfit/config.toml`.

use crate::notes::NotesImportStrategy;
use crate::quick_fill::{QuickFillOptions, DEFAULT_PER_DIFFICULTY};
use crate::regimen::RegimenImportStrategy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub quick_fill: QuickFillConfig,

    #[serde(default)]
    pub import: ImportConfig,
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

/// Optional replacement for the built-in catalog
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Quick fill parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuickFillConfig {
    #[serde(default = "default_per_difficulty")]
    pub per_difficulty: usize,

    #[serde(default = "default_true")]
    pub skip_duplicates: bool,

    #[serde(default = "default_true")]
    pub to_top: bool,
}

impl Default for QuickFillConfig {
    fn default() -> Self {
        Self {
            per_difficulty: default_per_difficulty(),
            skip_duplicates: true,
            to_top: true,
        }
    }
}

impl QuickFillConfig {
    pub fn options(&self) -> QuickFillOptions {
        QuickFillOptions {
            per_difficulty: self.per_difficulty,
            to_top: self.to_top,
            skip_duplicates: self.skip_duplicates,
        }
    }
}

/// Default merge strategies for imports
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ImportConfig {
    #[serde(default)]
    pub notes_strategy: NotesImportStrategy,

    #[serde(default)]
    pub regimen_strategy: RegimenImportStrategy,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("gitfit")
}

fn default_per_difficulty() -> usize {
    DEFAULT_PER_DIFFICULTY
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        if config.quick_fill.per_difficulty == 0 {
            return Err(Error::Config(
                "quick_fill.per_difficulty must be at least 1".to_string(),
            ));
        }
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("gitfit").join("config.toml")
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
