//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixture builders for
//! testing the tavola library.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use tavola::database::{Database, DatabaseConfig};
use tavola::{Config, ConfigBuilder, CustomerDetails, PartySize, TableSpec};

/// Creates a temporary directory for testing.
///
/// The directory will be automatically cleaned up when the returned
/// `TempDir` is dropped.
pub fn create_temp_dir() -> std::io::Result<tempfile::TempDir> {
    tempfile::tempdir()
}

/// Opens a test database inside the given directory.
#[allow(dead_code)]
pub fn open_test_database(dir: &tempfile::TempDir) -> (PathBuf, Database) {
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(&path)).unwrap();
    (path, db)
}

/// A configuration with only built-in defaults (no files, no env).
#[allow(dead_code)]
pub fn test_config() -> Config {
    ConfigBuilder::new().skip_files().skip_env().build().unwrap()
}

/// A service date safely in the future for date validation.
#[allow(dead_code)]
pub fn future_date() -> NaiveDate {
    chrono::Local::now().date_naive() + chrono::Duration::days(7)
}

/// A time on the default booking grid (19:00).
#[allow(dead_code)]
pub fn dinner_time() -> NaiveTime {
    NaiveTime::from_hms_opt(19, 0, 0).unwrap()
}

/// Seeds the two-table floor from the capacity-matching scenario:
/// T1 seats 2, T2 seats 4.
#[allow(dead_code)]
pub fn seed_two_tables(db: &mut Database) {
    db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();
    db.create_table(&TableSpec::new(2, 4).unwrap()).unwrap();
}

/// Customer details with a distinct phone per caller-chosen suffix.
#[allow(dead_code)]
pub fn customer(suffix: u32) -> CustomerDetails {
    CustomerDetails::new(
        "Ada",
        "Lovelace",
        format!("0400 000 {suffix:03}"),
        None,
    )
    .unwrap()
}

/// Party-size helper.
#[allow(dead_code)]
pub fn party(n: u32) -> PartySize {
    PartySize::try_from(n).unwrap()
}
