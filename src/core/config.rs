//! Configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tray configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrayConfig {
    /// Tooltip shown when hovering the tray icon
    #[serde(default = "default_tooltip")]
    pub tooltip: String,
    /// Whether to register the tray icon at startup
    #[serde(default = "default_show_on_start")]
    pub show_icon_on_start: bool,
}

fn default_tooltip() -> String {
    crate::APP_NAME.to_string()
}
fn default_show_on_start() -> bool {
    true
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            tooltip: default_tooltip(),
            show_icon_on_start: default_show_on_start(),
        }
    }
}

/// About surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutConfig {
    /// Project website opened from the about surface
    #[serde(default = "default_website")]
    pub website: String,
}

fn default_website() -> String {
    "https://github.com/perch-app/perch".to_string()
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            website: default_website(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tray configuration
    #[serde(default)]
    pub tray: TrayConfig,
    /// About surface configuration
    #[serde(default)]
    pub about: AboutConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            // Return default config if file doesn't exist
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Create parent directories if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "perch-app", "Perch")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
