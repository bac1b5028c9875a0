//! Database layer for persistent storage of reservations, tables,
//! customers, and staff users.
//!
//! This module provides a SQLite-based storage layer with connection
//! management, schema versioning, and CRUD operations per entity. The
//! no-double-booking invariant is enforced here, by a partial UNIQUE
//! index over active reservations; the in-memory availability check is
//! advisory only and this index is the source of truth under concurrency.
//!
//! # Examples
//!
//! ```no_run
//! use tavola::database::{Database, DatabaseConfig};
//! use tavola::CustomerDetails;
//!
//! let config = DatabaseConfig::new("/tmp/tavola.db");
//! let mut db = Database::open(config).unwrap();
//!
//! let details = CustomerDetails::new("Ada", "Lovelace", "0400 000 001", None).unwrap();
//! let customer = db.get_or_create_customer(&details).unwrap();
//! println!("customer #{}", customer.id());
//! ```

mod config;
mod connection;
mod customers;
pub mod migrations;
mod reservations;
mod stats;
mod tables;
mod users;

// Re-export public API
pub use config::{default_data_dir, resolve_database_path, DatabaseConfig};
pub use connection::Database;
pub use reservations::{ReservationFilter, ReservationSummary};
pub use stats::RestaurantStats;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};

pub(crate) mod schema;

pub(crate) use tables::row_to_table as tables_row_to_table;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// Converts a UTC timestamp to Unix epoch seconds for database storage.
pub(crate) fn datetime_to_unix_secs(time: DateTime<Utc>) -> i64 {
    time.timestamp()
}

/// Converts Unix epoch seconds from the database to a UTC timestamp.
pub(crate) fn unix_secs_to_datetime(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Formats a service date for storage (`YYYY-MM-DD`).
pub(crate) fn date_to_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a stored service date.
pub(crate) fn text_to_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::DatabaseCorruption {
        details: format!("invalid stored date: {s}"),
    })
}

/// Formats a service time for storage (`HH:MM`, minute precision).
pub(crate) fn time_to_text(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses a stored service time.
pub(crate) fn text_to_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| Error::DatabaseCorruption {
        details: format!("invalid stored time: {s}"),
    })
}

/// Whether a rusqlite error is a UNIQUE-constraint violation.
///
/// Used to translate storage-level conflicts (a contested slot, a taken
/// table number) into their typed errors.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
