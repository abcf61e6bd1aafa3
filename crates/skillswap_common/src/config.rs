//! SkillSwap Configuration
//!
//! Config file: `$SKILLSWAP_CONFIG`, else `<config dir>/skillswap/config.toml`.
//! Missing file means defaults.

use crate::notifications::NotificationSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SKILLSWAP_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillswapConfig {
    /// Local user the CLI acts as
    #[serde(default = "default_user")]
    pub user_id: String,

    /// Root of per-user state directories (default: `<data dir>/skillswap`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// tracing filter used when SKILLSWAP_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Initial notification settings for a fresh data dir
    #[serde(default)]
    pub notifications: NotificationSettings,
}

fn default_user() -> String {
    "alex".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SkillswapConfig {
    fn default() -> Self {
        Self {
            user_id: default_user(),
            data_dir: None,
            log_level: default_log_level(),
            notifications: NotificationSettings::default(),
        }
    }
}

impl SkillswapConfig {
    /// Config file path: $SKILLSWAP_CONFIG or ~/.config/skillswap/config.toml
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(dir.join("skillswap").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, toml_string).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Effective data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let base = dirs::data_dir().context("Cannot determine data directory")?;
                Ok(base.join("skillswap"))
            }
        }
    }

    /// State directory of the configured user: `<data_dir>/<user_id>`
    pub fn user_dir(&self) -> Result<PathBuf> {
        let valid = !self.user_id.is_empty()
            && self
                .user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            anyhow::bail!("Invalid user_id: '{}'", self.user_id);
        }
        Ok(self.data_dir()?.join(&self.user_id))
    }

    /// Apply a `key=value` assignment
    ///
    /// Keys: `user_id`, `data_dir`, `log_level`, `notifications.<category>`.
    pub fn set(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{}'", assignment))?;
        let (key, value) = (key.trim(), value.trim());

        match key {
            "user_id" | "user" => {
                if value.is_empty() {
                    anyhow::bail!("user_id cannot be empty");
                }
                self.user_id = value.to_string();
            }
            "data_dir" => {
                self.data_dir = if value.is_empty() { None } else { Some(PathBuf::from(value)) };
            }
            "log_level" => self.log_level = value.to_string(),
            _ => {
                let Some(category) = key.strip_prefix("notifications.") else {
                    anyhow::bail!("Unknown config key: '{}'", key);
                };
                let on = parse_switch(value)?;
                if !self.notifications.set(category, on) {
                    anyhow::bail!("Unknown notification category: '{}'", category);
                }
            }
        }
        Ok(())
    }
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "enabled" => Ok(true),
        "off" | "false" | "no" | "disabled" => Ok(false),
        _ => anyhow::bail!("Invalid switch: '{}'. Valid values: on, off", value),
    }
}
