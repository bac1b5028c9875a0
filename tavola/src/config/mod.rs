//! Restaurant configuration for tavola.
//!
//! This module provides the service configuration (restaurant name,
//! opening hours, slot duration) with support for:
//! - YAML configuration files
//! - Environment variable overrides (`TAVOLA_*`)
//! - Programmatic configuration via builder pattern
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following
//! precedence (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_overrides`)
//! 2. Environment variables (`TAVOLA_*`)
//! 3. Configuration file (explicit path, or `~/.tavola/config.yaml`)
//! 4. Built-in defaults (17:00–22:00 service, 30-minute slots)
//!
//! # Examples
//!
//! ```
//! use tavola::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.hours.slot_minutes, 30);
//! ```

pub mod loader;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use loader::ConfigFile;

/// Default restaurant name, used when no source overrides it.
pub const DEFAULT_RESTAURANT_NAME: &str = "Bella Vista Restaurant";

/// Default opening time.
pub const DEFAULT_OPENING_TIME: &str = "17:00";

/// Default closing time.
pub const DEFAULT_CLOSING_TIME: &str = "22:00";

/// Default slot duration in minutes.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

/// The restaurant's service window and booking grid.
///
/// Bookable times lie in `[opening, closing)` and fall on the slot grid:
/// a whole number of `slot_minutes` after opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHours {
    /// First bookable time of the day.
    pub opening: NaiveTime,
    /// End of service; not itself bookable.
    pub closing: NaiveTime,
    /// Duration of one booking slot, in minutes.
    pub slot_minutes: u32,
}

impl ServiceHours {
    /// Creates a validated service window.
    ///
    /// # Errors
    ///
    /// Returns an error if the opening time is not strictly before the
    /// closing time, or the slot duration is zero or longer than the
    /// service window.
    pub fn new(opening: NaiveTime, closing: NaiveTime, slot_minutes: u32) -> Result<Self> {
        if opening >= closing {
            return Err(Error::Validation {
                field: "hours".into(),
                message: format!(
                    "opening time {} must be before closing time {}",
                    opening.format("%H:%M"),
                    closing.format("%H:%M")
                ),
            });
        }
        let window_minutes = (closing - opening).num_minutes();
        if slot_minutes == 0 || i64::from(slot_minutes) > window_minutes {
            return Err(Error::Validation {
                field: "slot_minutes".into(),
                message: format!(
                    "slot duration must be between 1 and {window_minutes} minutes"
                ),
            });
        }
        Ok(Self {
            opening,
            closing,
            slot_minutes,
        })
    }

    /// Whether the given time lies inside the service window.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.opening && time < self.closing
    }

    /// Whether the given time falls on the booking grid.
    #[must_use]
    pub fn is_slot_aligned(&self, time: NaiveTime) -> bool {
        if time < self.opening {
            return false;
        }
        let offset = (time - self.opening).num_minutes();
        offset % i64::from(self.slot_minutes) == 0
    }

    /// All bookable times of one service day, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveTime;
    /// use tavola::config::ServiceHours;
    ///
    /// let hours = ServiceHours::new(
    ///     NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
    ///     30,
    /// )
    /// .unwrap();
    /// assert_eq!(hours.slots().len(), 4); // 17:00, 17:30, 18:00, 18:30
    /// ```
    #[must_use]
    pub fn slots(&self) -> Vec<NaiveTime> {
        let mut slots = Vec::new();
        let mut current = self.opening;
        while current < self.closing {
            slots.push(current);
            let next = current + chrono::Duration::minutes(i64::from(self.slot_minutes));
            // NaiveTime arithmetic wraps at midnight
            if next <= current {
                break;
            }
            current = next;
        }
        slots
    }
}

/// The resolved restaurant configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Display name of the restaurant.
    pub restaurant_name: String,
    /// Service window and booking grid.
    pub hours: ServiceHours,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            restaurant_name: DEFAULT_RESTAURANT_NAME.to_string(),
            hours: ServiceHours {
                opening: parse_time(DEFAULT_OPENING_TIME).expect("default opening time"),
                closing: parse_time(DEFAULT_CLOSING_TIME).expect("default closing time"),
                slot_minutes: DEFAULT_SLOT_MINUTES,
            },
        }
    }
}

/// Parses a wall-clock time in `HH:MM` form.
///
/// # Errors
///
/// Returns an error if the string is not a valid `HH:MM` time.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| Error::Validation {
        field: "time".into(),
        message: format!("expected HH:MM, got '{s}'"),
    })
}

/// Builder assembling a [`Config`] from files, the environment, and
/// programmatic overrides.
///
/// # Examples
///
/// ```
/// use tavola::config::{ConfigBuilder, ConfigFile};
///
/// let overrides = ConfigFile {
///     restaurant_name: Some("Trattoria Prova".to_string()),
///     ..ConfigFile::default()
/// };
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_overrides(overrides)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.restaurant_name, "Trattoria Prova");
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    file: Option<std::path::PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<ConfigFile>,
}

impl ConfigBuilder {
    /// Creates a builder with no sources selected yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from an explicit file path.
    ///
    /// Unlike the default search, an explicit file must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Disables configuration-file loading.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Disables environment-variable overrides.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Applies programmatic overrides on top of all other sources.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigFile) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Merges all sources and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or unreadable,
    /// YAML parsing fails, a time field is malformed, or the resolved
    /// service window is invalid.
    pub fn build(self) -> Result<Config> {
        let mut merged = ConfigFile::default();

        if !self.skip_files {
            if let Some(path) = &self.file {
                merged = merged.merge(ConfigFile::load(path)?);
            } else if let Some(path) = loader::default_config_path() {
                if path.exists() {
                    merged = merged.merge(ConfigFile::load(&path)?);
                }
            }
        }

        if !self.skip_env {
            merged = merged.merge(ConfigFile::from_env());
        }

        if let Some(overrides) = self.overrides {
            merged = merged.merge(overrides);
        }

        merged.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.restaurant_name, DEFAULT_RESTAURANT_NAME);
        assert_eq!(config.hours.opening, t(17, 0));
        assert_eq!(config.hours.closing, t(22, 0));
        assert_eq!(config.hours.slot_minutes, 30);
    }

    #[test]
    fn test_service_hours_rejects_inverted_window() {
        assert!(ServiceHours::new(t(22, 0), t(17, 0), 30).is_err());
        assert!(ServiceHours::new(t(17, 0), t(17, 0), 30).is_err());
    }

    #[test]
    fn test_service_hours_rejects_bad_slot() {
        assert!(ServiceHours::new(t(17, 0), t(22, 0), 0).is_err());
        assert!(ServiceHours::new(t(17, 0), t(18, 0), 90).is_err());
    }

    #[test]
    fn test_contains() {
        let hours = ServiceHours::new(t(17, 0), t(22, 0), 30).unwrap();
        assert!(hours.contains(t(17, 0)));
        assert!(hours.contains(t(21, 30)));
        assert!(!hours.contains(t(22, 0)));
        assert!(!hours.contains(t(16, 30)));
    }

    #[test]
    fn test_slot_alignment() {
        let hours = ServiceHours::new(t(17, 0), t(22, 0), 30).unwrap();
        assert!(hours.is_slot_aligned(t(17, 0)));
        assert!(hours.is_slot_aligned(t(19, 30)));
        assert!(!hours.is_slot_aligned(t(19, 15)));
        assert!(!hours.is_slot_aligned(t(16, 30)));
    }

    #[test]
    fn test_slots_enumeration() {
        let hours = ServiceHours::new(t(17, 0), t(19, 0), 30).unwrap();
        assert_eq!(
            hours.slots(),
            vec![t(17, 0), t(17, 30), t(18, 0), t(18, 30)]
        );
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("19:30").unwrap(), t(19, 30));
        assert_eq!(parse_time(" 09:00 ").unwrap(), t(9, 0));
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("7pm").is_err());
    }

    #[test]
    fn test_builder_defaults_only() {
        let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_builder_overrides_win() {
        let overrides = ConfigFile {
            opening_time: Some("12:00".to_string()),
            closing_time: Some("15:00".to_string()),
            slot_minutes: Some(15),
            ..ConfigFile::default()
        };
        let config = ConfigBuilder::new()
            .skip_files()
            .skip_env()
            .with_overrides(overrides)
            .build()
            .unwrap();
        assert_eq!(config.hours.opening, t(12, 0));
        assert_eq!(config.hours.closing, t(15, 0));
        assert_eq!(config.hours.slot_minutes, 15);
    }

    #[test]
    fn test_builder_rejects_invalid_merge() {
        let overrides = ConfigFile {
            opening_time: Some("23:00".to_string()),
            ..ConfigFile::default()
        };
        let result = ConfigBuilder::new()
            .skip_files()
            .skip_env()
            .with_overrides(overrides)
            .build();
        assert!(result.is_err());
    }
}
