//! Configuration loading and management
//!
//! Handles parsing of `habits.toml` from the data directory.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name of the configuration inside the data directory
pub const CONFIG_FILE: &str = "habits.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Habit creation defaults and limits
    #[serde(default)]
    pub habits: HabitsConfig,

    /// Engine behavior
    #[serde(default)]
    pub engine: EngineConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the habit collection is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// How long to wait for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_storage_key() -> String {
    crate::storage::DEFAULT_KEY.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    crate::lock::DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Habit creation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitsConfig {
    /// Target days used when `add` is not given one
    #[serde(default = "default_target_days")]
    pub default_target_days: u32,

    /// Largest accepted target
    #[serde(default = "default_max_target_days")]
    pub max_target_days: u32,

    /// Accepted accent colors; the first entry is the default
    #[serde(default = "default_palette")]
    pub palette: Vec<PaletteColor>,
}

/// Named accent color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    pub hex: String,
}

impl PaletteColor {
    fn new(name: &str, hex: &str) -> Self {
        Self {
            name: name.to_string(),
            hex: hex.to_string(),
        }
    }
}

fn default_target_days() -> u32 {
    30
}

fn default_max_target_days() -> u32 {
    365
}

fn default_palette() -> Vec<PaletteColor> {
    vec![
        PaletteColor::new("emerald", "#10b981"),
        PaletteColor::new("blue", "#3b82f6"),
        PaletteColor::new("violet", "#8b5cf6"),
        PaletteColor::new("amber", "#f59e0b"),
        PaletteColor::new("red", "#ef4444"),
        PaletteColor::new("cyan", "#06b6d4"),
        PaletteColor::new("lime", "#84cc16"),
        PaletteColor::new("orange", "#f97316"),
    ]
}

impl Default for HabitsConfig {
    fn default() -> Self {
        Self {
            default_target_days: default_target_days(),
            max_target_days: default_max_target_days(),
            palette: default_palette(),
        }
    }
}

impl HabitsConfig {
    /// The default accent color (first palette entry)
    pub fn default_color(&self) -> Option<&PaletteColor> {
        self.palette.first()
    }

    /// Resolve a palette name or hex value to a palette entry
    pub fn resolve_color(&self, raw: &str) -> Result<&PaletteColor> {
        let wanted = raw.trim();
        self.palette
            .iter()
            .find(|color| {
                color.name.eq_ignore_ascii_case(wanted) || color.hex.eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                let names: Vec<&str> = self.palette.iter().map(|c| c.name.as_str()).collect();
                Error::InvalidArgument(format!(
                    "unknown color '{wanted}' (expected one of: {})",
                    names.join(", ")
                ))
            })
    }

    fn validate(&self) -> Result<()> {
        if self.max_target_days == 0 || self.max_target_days > 365 {
            return Err(Error::InvalidConfig(
                "habits.max_target_days must be between 1 and 365".to_string(),
            ));
        }
        if self.default_target_days == 0 || self.default_target_days > self.max_target_days {
            return Err(Error::InvalidConfig(format!(
                "habits.default_target_days must be between 1 and {}",
                self.max_target_days
            )));
        }

        if self.palette.is_empty() {
            return Err(Error::InvalidConfig(
                "habits.palette cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for color in &self.palette {
            let name = color.name.trim();
            if name.is_empty() {
                return Err(Error::InvalidConfig(
                    "habits.palette cannot include empty names".to_string(),
                ));
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(Error::InvalidConfig(format!(
                    "habits.palette has duplicate color '{name}'"
                )));
            }
            if !is_hex_color(&color.hex) {
                return Err(Error::InvalidConfig(format!(
                    "habits.palette color '{name}' has invalid hex '{}' (expected #rrggbb)",
                    color.hex
                )));
            }
        }

        Ok(())
    }
}

fn is_hex_color(raw: &str) -> bool {
    raw.len() == 7
        && raw.starts_with('#')
        && raw[1..].chars().all(|ch| ch.is_ascii_hexdigit())
}

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Recompute streaks from completion days at load instead of trusting
    /// the persisted value
    #[serde(default)]
    pub recompute_streak_on_load: bool,
}

/// Display configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Streak lengths at which a streak is shown as building/strong/legendary
    #[serde(default)]
    pub streak_tiers: StreakTiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakTiers {
    #[serde(default = "default_tier_building")]
    pub building: u32,
    #[serde(default = "default_tier_strong")]
    pub strong: u32,
    #[serde(default = "default_tier_legendary")]
    pub legendary: u32,
}

fn default_tier_building() -> u32 {
    3
}

fn default_tier_strong() -> u32 {
    7
}

fn default_tier_legendary() -> u32 {
    30
}

impl Default for StreakTiers {
    fn default() -> Self {
        Self {
            building: default_tier_building(),
            strong: default_tier_strong(),
            legendary: default_tier_legendary(),
        }
    }
}

impl StreakTiers {
    fn validate(&self) -> Result<()> {
        if self.building == 0 || self.building >= self.strong || self.strong >= self.legendary {
            return Err(Error::InvalidConfig(
                "display.streak_tiers must satisfy 0 < building < strong < legendary".to_string(),
            ));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig(
                "storage.key cannot be empty".to_string(),
            ));
        }
        if !key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(Error::InvalidConfig(
                "storage.key must only contain letters, digits, '-' or '_'".to_string(),
            ));
        }
        if self.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `habits.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.habits.validate()?;
        self.display.streak_tiers.validate()?;
        Ok(())
    }
}
