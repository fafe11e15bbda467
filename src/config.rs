//! Configuration management for RDR

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::export::DeckFormat;
use crate::pipeline::deck::LegalityTable;
use crate::pipeline::patterns::ActionKind;
use crate::pipeline::segment::BoundaryRule;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub segmenter: SegmenterConfig,
    #[serde(default)]
    pub legality: LegalityConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory deck files are written to
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Which encodings to write
    #[serde(default)]
    pub format: DeckFormat,
    /// Also write per-game diagnostic dumps
    #[serde(default)]
    pub per_game: bool,
}

fn default_directory() -> String {
    ".".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            format: DeckFormat::default(),
            per_game: false,
        }
    }
}

/// Pattern library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternsConfig {
    /// Action kinds to recognize
    #[serde(default = "default_actions")]
    pub actions: Vec<ActionKind>,
    /// Require the deck qualifier on banish lines
    #[serde(default = "default_strict_banish")]
    pub strict_banish: bool,
}

fn default_actions() -> Vec<ActionKind> {
    ActionKind::all().to_vec()
}

fn default_strict_banish() -> bool {
    true
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            actions: default_actions(),
            strict_banish: default_strict_banish(),
        }
    }
}

/// Game segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SegmenterConfig {
    /// Which structural evidence opens a new game
    #[serde(default)]
    pub boundary: BoundaryRule,
}

/// Copy-limit configuration. The defaults carry a representative slice
/// of the format's restriction tiers; setting a list replaces that tier
/// entirely.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LegalityConfig {
    /// Cards limited to a single copy
    #[serde(default)]
    pub limit_one: Option<Vec<String>>,
    /// Cards limited to two copies
    #[serde(default)]
    pub limit_two: Option<Vec<String>>,
}

impl LegalityConfig {
    /// Build the effective legality table. Each tier falls back to the
    /// built-in list independently.
    pub fn table(&self) -> LegalityTable {
        let one = self.limit_one.clone().unwrap_or_else(|| {
            LegalityTable::default_limit_one().map(String::from).collect()
        });
        let two = self.limit_two.clone().unwrap_or_else(|| {
            LegalityTable::default_limit_two().map(String::from).collect()
        });
        LegalityTable::new(one, two)
    }
}

impl Config {
    /// Get the config file path (~/.config/rdr/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get the config directory path (~/.config/rdr)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("rdr"))
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Expand ~ in the output directory path
    pub fn output_directory(&self) -> PathBuf {
        let dir = &self.output.directory;
        if let Some(stripped) = dir.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        }
        PathBuf::from(dir)
    }
}
