//! Configuration management for glance.
//!
//! Loads configuration from ${GLANCE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::format::{LINE_WIDTH, PLACEHOLDER};

/// How the refresh timer behaves while the display is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefreshVariant {
    /// Re-render the visible surface every second so the clock stays current.
    #[default]
    Clock,
    /// Scroll the body every few seconds and push both surfaces.
    Scroll,
}

impl RefreshVariant {
    pub fn default_interval(self) -> Duration {
        match self {
            RefreshVariant::Clock => Duration::from_millis(1000),
            RefreshVariant::Scroll => Duration::from_millis(3000),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RefreshVariant::Clock => "clock",
            RefreshVariant::Scroll => "scroll",
        }
    }
}

impl std::str::FromStr for RefreshVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "clock" => Ok(Self::Clock),
            "scroll" => Ok(Self::Scroll),
            _ => Err(format!("Unknown refresh variant: {value}")),
        }
    }
}

/// Layout of the rendered text blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Characters per line.
    pub line_width: usize,
    /// Body rows on the main surface.
    pub main_rows: usize,
    /// Body rows on the expanded surface.
    pub expanded_rows: usize,
    /// Shown when there is no notification.
    pub placeholder: String,
    /// Show this message instead of notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_message: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            line_width: LINE_WIDTH,
            main_rows: 2,
            expanded_rows: 4,
            placeholder: PLACEHOLDER.to_string(),
            fixed_message: None,
        }
    }
}

/// Refresh timer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub variant: RefreshVariant,
    /// Tick interval in milliseconds (0 uses the variant's default).
    pub interval_ms: u64,
    /// Lines the scroll variant advances per tick.
    pub scroll_step: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            variant: RefreshVariant::Clock,
            interval_ms: 0,
            scroll_step: 3,
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        if self.interval_ms == 0 {
            self.variant.default_interval()
        } else {
            Duration::from_millis(self.interval_ms)
        }
    }
}

/// Where rendered text is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// POST each push to this URL instead of writing JSON lines to stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Request timeout for webhook pushes in seconds.
    pub webhook_timeout_secs: u64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            webhook_timeout_secs: 5,
        }
    }
}

impl SinkConfig {
    /// Webhook URL from config, falling back to `GLANCE_WEBHOOK_URL`.
    pub fn effective_webhook_url(&self) -> Option<String> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .or_else(|| {
                std::env::var("GLANCE_WEBHOOK_URL")
                    .ok()
                    .map(|url| url.trim().to_string())
                    .filter(|url| !url.is_empty())
            })
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs.max(1))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `GLANCE_LOG` is unset (e.g. "info").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Also write logs to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub sink: SinkConfig,

    #[serde(default)]
    pub log: LogConfig,
}

pub mod paths {
    //! Path resolution for glance configuration.
    //!
    //! GLANCE_HOME resolution order:
    //! 1. GLANCE_HOME environment variable (if set)
    //! 2. ~/.config/glance (default)

    use std::path::PathBuf;

    /// Returns the glance home directory.
    pub fn glance_home() -> PathBuf {
        if let Ok(home) = std::env::var("GLANCE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".glance"),
            |h| h.join(".config").join("glance"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        glance_home().join("config.toml")
    }
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}
