//! Session configuration.
//!
//! # Responsibility
//! - Provide defaults for zoom level, snapshot key and log level.
//! - Layer TOML file values and environment overrides on top.
//!
//! # Invariants
//! - A `SessionConfig` returned by any loader has passed `validate()`.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::snapshot_repo::DEFAULT_SNAPSHOT_KEY;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const DEFAULT_ZOOM_LEVEL: u8 = 13;
pub const MAX_ZOOM_LEVEL: u8 = 20;

pub const ENV_ZOOM_LEVEL: &str = "PROPMAP_ZOOM_LEVEL";
pub const ENV_SNAPSHOT_KEY: &str = "PROPMAP_SNAPSHOT_KEY";
pub const ENV_LOG_LEVEL: &str = "PROPMAP_LOG_LEVEL";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid { key: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config file: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config file: {err}"),
            Self::Invalid { key, reason } => write!(f, "invalid config value for {key}: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

/// Runtime knobs for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Zoom used when the map is initialized and when focusing a record.
    pub map_zoom_level: u8,
    /// Storage key holding the collection snapshot.
    pub snapshot_key: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            map_zoom_level: DEFAULT_ZOOM_LEVEL,
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            log_level: default_log_level().to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    map_zoom_level: Option<u8>,
    snapshot_key: Option<String>,
    log_level: Option<String>,
}

impl SessionConfig {
    /// Applies values present in a TOML document over `self`.
    pub fn merge_toml_str(mut self, content: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        if let Some(zoom) = file.map_zoom_level {
            self.map_zoom_level = zoom;
        }
        if let Some(key) = file.snapshot_key {
            self.snapshot_key = key;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        self.validate()
    }

    pub fn merge_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        self.merge_toml_str(&content)
    }

    /// Applies `PROPMAP_*` overrides read through `lookup`.
    ///
    /// Takes a lookup function so callers can pass `std::env::var` or a map.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ZOOM_LEVEL) {
            self.map_zoom_level = raw.trim().parse::<u8>().map_err(|err| ConfigError::Invalid {
                key: "map_zoom_level",
                reason: format!("`{raw}` is not a zoom level: {err}"),
            })?;
        }
        if let Some(key) = lookup(ENV_SNAPSHOT_KEY) {
            self.snapshot_key = key;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        self.validate()
    }

    /// Defaults, then the optional file, then process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::default().merge_file(path)?,
            None => Self::default(),
        };
        config.merge_env(|name| std::env::var(name).ok())
    }

    /// Checks ranges and normalizes the log level.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.map_zoom_level > MAX_ZOOM_LEVEL {
            return Err(ConfigError::Invalid {
                key: "map_zoom_level",
                reason: format!("{} exceeds maximum {MAX_ZOOM_LEVEL}", self.map_zoom_level),
            });
        }
        let key = self.snapshot_key.trim();
        if key.is_empty() {
            return Err(ConfigError::Invalid {
                key: "snapshot_key",
                reason: "must not be empty".to_string(),
            });
        }
        self.snapshot_key = key.to_string();
        self.log_level = normalize_level(&self.log_level)
            .map_err(|reason| ConfigError::Invalid {
                key: "log_level",
                reason,
            })?
            .to_string();
        Ok(self)
    }
}
