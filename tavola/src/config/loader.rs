//! Configuration file loading and environment overrides.
//!
//! A [`ConfigFile`] is the raw, partially-specified form of the
//! configuration as read from YAML or the environment; merging and
//! validation produce the resolved [`Config`](super::Config).

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{parse_time, Config, ServiceHours};
use crate::error::Result;

/// Environment variable overriding the restaurant name.
pub const ENV_RESTAURANT_NAME: &str = "TAVOLA_RESTAURANT_NAME";

/// Environment variable overriding the opening time (`HH:MM`).
pub const ENV_OPENING_TIME: &str = "TAVOLA_OPENING_TIME";

/// Environment variable overriding the closing time (`HH:MM`).
pub const ENV_CLOSING_TIME: &str = "TAVOLA_CLOSING_TIME";

/// Environment variable overriding the slot duration in minutes.
pub const ENV_SLOT_MINUTES: &str = "TAVOLA_SLOT_MINUTES";

/// A partially-specified configuration, as found in a YAML file.
///
/// Times are kept as `HH:MM` strings until resolution so that a file with
/// a malformed value produces a validation error naming the field rather
/// than a serde type error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Display name of the restaurant.
    pub restaurant_name: Option<String>,
    /// First bookable time, `HH:MM`.
    pub opening_time: Option<String>,
    /// End of service, `HH:MM`.
    pub closing_time: Option<String>,
    /// Slot duration in minutes.
    pub slot_minutes: Option<u32>,
}

impl ConfigFile {
    /// Loads a configuration file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Reads overrides from `TAVOLA_*` environment variables.
    ///
    /// Unset variables leave the corresponding field unspecified; values
    /// are validated later, during resolution.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            restaurant_name: env::var(ENV_RESTAURANT_NAME).ok(),
            opening_time: env::var(ENV_OPENING_TIME).ok(),
            closing_time: env::var(ENV_CLOSING_TIME).ok(),
            slot_minutes: env::var(ENV_SLOT_MINUTES)
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Merges `other` over `self`: fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            restaurant_name: other.restaurant_name.or(self.restaurant_name),
            opening_time: other.opening_time.or(self.opening_time),
            closing_time: other.closing_time.or(self.closing_time),
            slot_minutes: other.slot_minutes.or(self.slot_minutes),
        }
    }

    /// Resolves the partial configuration against the built-in defaults
    /// and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a time field is malformed or the resolved
    /// service window is invalid.
    pub fn resolve(self) -> Result<Config> {
        let defaults = Config::default();

        let opening = match self.opening_time {
            Some(s) => parse_time(&s)?,
            None => defaults.hours.opening,
        };
        let closing = match self.closing_time {
            Some(s) => parse_time(&s)?,
            None => defaults.hours.closing,
        };
        let slot_minutes = self.slot_minutes.unwrap_or(defaults.hours.slot_minutes);

        Ok(Config {
            restaurant_name: self
                .restaurant_name
                .unwrap_or(defaults.restaurant_name),
            hours: ServiceHours::new(opening, closing, slot_minutes)?,
        })
    }
}

/// Returns the default configuration file path (`~/.tavola/config.yaml`),
/// or `None` if the home directory cannot be determined.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".tavola").join("config.yaml"))
}
