use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{DEFAULT_REVIEWS_NUMBER, WORDPRESS_BASE_URL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Tap configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Plugin slugs, in the order they are synced.
    pub plugins: Vec<String>,
    /// Maximum number of reviews pulled per plugin.
    pub number: usize,
    /// Origin all pages are fetched from.
    pub base_url: String,
}

/// `plugins` may be a single slug or a list of slugs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PluginsSetting {
    One(String),
    Many(Vec<String>),
}

impl From<PluginsSetting> for Vec<String> {
    fn from(setting: PluginsSetting) -> Self {
        match setting {
            PluginsSetting::One(plugin) => vec![plugin],
            PluginsSetting::Many(plugins) => plugins,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    plugins: Option<PluginsSetting>,
    number: Option<usize>,
    base_url: Option<String>,
}

impl Config {
    /// Load configuration from a Singer JSON config file such as
    /// `{"plugins": ["akismet", "jetpack"], "number": 10}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// lacks `plugins`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::parse_json(&contents, &display)
    }

    /// Parse configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or lacks `plugins`.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Self::parse_json(contents, "<inline>")
    }

    fn parse_json(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?;

        Ok(Self {
            plugins: file
                .plugins
                .ok_or_else(|| ConfigError::Missing("plugins".to_string()))?
                .into(),
            number: file.number.unwrap_or(DEFAULT_REVIEWS_NUMBER),
            base_url: file
                .base_url
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| WORDPRESS_BASE_URL.to_string()),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `WP_PLUGINS` is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            plugins: parse_plugin_list(&required_env("WP_PLUGINS")?),
            number: parse_env_usize("WP_REVIEWS_NUMBER", DEFAULT_REVIEWS_NUMBER)?,
            base_url: env_or_default("WP_BASE_URL", WORDPRESS_BASE_URL),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plugins.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "plugins".to_string(),
                message: "at least one plugin is required".to_string(),
            });
        }
        if self.plugins.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                name: "plugins".to_string(),
                message: "plugin names cannot be blank".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_plugin_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
