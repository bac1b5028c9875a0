//! Shared utilities for CLI commands.
//!
//! This module provides global option handling, database opening, and
//! argument parsing helpers used across commands.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tavola::database::{resolve_database_path, Database, DatabaseConfig};
use tavola::{Config, ConfigBuilder};

use crate::error::CliError;

/// Global options shared by all commands.
pub struct GlobalOptions {
    /// Verbose output requested.
    #[allow(dead_code)]
    pub verbose: bool,
    /// Quiet output requested.
    pub quiet: bool,
    /// Data directory override.
    pub data_dir: Option<PathBuf>,
    /// Busy timeout override, in seconds.
    pub busy_timeout: Option<u32>,
    /// Restaurant configuration file override.
    pub config_file: Option<PathBuf>,
}

/// Resolves the database configuration from global options.
pub fn database_config(global: &GlobalOptions) -> Result<DatabaseConfig, CliError> {
    let path = match &global.data_dir {
        Some(dir) => dir.join("tavola.db"),
        None => resolve_database_path()?,
    };

    let mut config = DatabaseConfig::new(path);
    if let Some(seconds) = global.busy_timeout {
        config = config.with_busy_timeout(Duration::from_secs(u64::from(seconds)));
    }
    Ok(config)
}

/// Opens the database per the global options.
pub fn open_database(global: &GlobalOptions) -> Result<Database, CliError> {
    Ok(Database::open(database_config(global)?)?)
}

/// Loads the restaurant configuration per the global options.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(path) = &global.config_file {
        builder = builder.with_file(path);
    }
    builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Parses a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::InvalidArguments(format!("expected YYYY-MM-DD date, got '{s}'")))
}

/// Parses an `HH:MM` time argument.
pub fn parse_time(s: &str) -> Result<NaiveTime, CliError> {
    tavola::config::parse_time(s)
        .map_err(|_| CliError::InvalidArguments(format!("expected HH:MM time, got '{s}'")))
}

/// Serializes a value as pretty JSON to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
    println!("{json}");
    Ok(())
}
