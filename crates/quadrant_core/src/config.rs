//! Sync configuration.
//!
//! # Responsibility
//! - Name the store containers the sync layer relies on by convention.
//! - Load overrides from JSON, falling back to defaults per field.
//!
//! # Invariants
//! - Container names are non-blank after trim.
//! - Default and delegates containers are distinct (case-insensitive).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_TASK_CONTAINER: &str = "Backlog";
pub const DEFAULT_DELEGATES_CONTAINER: &str = "Delegates";
pub const DEFAULT_STALE_AFTER_DAYS: u32 = 7;

/// Configuration load/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid sync config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid sync config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Conventions used by `SyncCoordinator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Destination list for newly created tasks.
    pub default_container: String,
    /// List whose item titles are delegate short names.
    pub delegates_container: String,
    /// Age after which an incomplete task counts as stale.
    pub stale_after_days: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_container: DEFAULT_TASK_CONTAINER.to_string(),
            delegates_container: DEFAULT_DELEGATES_CONTAINER.to_string(),
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
        }
    }
}

impl SyncConfig {
    /// Parses and validates a JSON document; missing fields use defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_container.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_container must not be blank".to_string(),
            ));
        }
        if self.delegates_container.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "delegates_container must not be blank".to_string(),
            ));
        }
        if self
            .default_container
            .trim()
            .eq_ignore_ascii_case(self.delegates_container.trim())
        {
            return Err(ConfigError::Invalid(
                "default_container and delegates_container must differ".to_string(),
            ));
        }
        Ok(())
    }

    /// Stale threshold in milliseconds.
    pub fn stale_after_ms(&self) -> i64 {
        i64::from(self.stale_after_days) * 24 * 60 * 60 * 1000
    }
}
