//! Logger configuration.
//!
//! Settings come from the process environment (`LOG_LEVEL`, `LOG_JSON`,
//! `DEBUG`) or from a `[logging]` table in a host application's TOML file.
//! Resolution never fails: unrecognized values fall back to defaults.

use crate::error::ConfigError;
use crate::format::LogFormat;
use crate::level::Level;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the minimum severity.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Environment variable selecting JSON output.
pub const ENV_LOG_JSON: &str = "LOG_JSON";

/// Environment variable forcing DEBUG verbosity.
pub const ENV_DEBUG: &str = "DEBUG";

/// Raw logging settings, as read from the environment or a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level name: debug, info, warning, error, critical
    pub level: String,

    /// Emit one JSON object per line instead of plain text
    pub json: bool,

    /// Force DEBUG regardless of `level`
    pub debug: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            json: false,
            debug: false,
        }
    }
}

/// Fully resolved settings applied to the process logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Minimum severity for both the logger and its sink
    pub level: Level,

    /// Line format of the console sink
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        LoggingConfig::default().resolve()
    }
}

impl LoggingConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            level: lookup(ENV_LOG_LEVEL).unwrap_or(defaults.level),
            json: lookup(ENV_LOG_JSON).is_some_and(|v| is_truthy(&v)),
            debug: lookup(ENV_DEBUG).is_some_and(|v| is_truthy(&v)),
        }
    }

    /// Parse a `[logging]`-shaped TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve into the settings the logger is built from.
    ///
    /// `debug` overrides `level`. An unrecognized level name silently
    /// resolves to INFO.
    pub fn resolve(&self) -> LogSettings {
        let level = if self.debug {
            Level::Debug
        } else {
            Level::parse(&self.level).unwrap_or_default()
        };
        let format = if self.json {
            LogFormat::Json
        } else {
            LogFormat::Text
        };
        LogSettings { level, format }
    }
}

/// Whether an environment flag value counts as enabled.
pub fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
