//! Error types for the tavola library.
//!
//! This module provides a comprehensive error hierarchy for all operations
//! in the tavola library, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::reservation::{ReservationId, ReservationStatus};
use crate::table::TableId;

/// Result type alias for operations that may fail with a tavola error.
///
/// # Examples
///
/// ```
/// use tavola::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the tavola library.
///
/// This enum encompasses all possible error conditions that can occur
/// during reservation and table-inventory operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested slot is already claimed by an active reservation.
    ///
    /// This is the conflict the storage layer reports when two requests
    /// race for the same (table, date, time) triple; the caller may retry
    /// against a different table.
    #[error("table {table_id} is already booked on {date} at {} (party of {party_size})", time.format("%H:%M"))]
    SlotConflict {
        /// The table whose slot was contested.
        table_id: TableId,
        /// The requested date.
        date: NaiveDate,
        /// The requested time.
        time: NaiveTime,
        /// The requested party size.
        party_size: u32,
    },

    /// No table satisfies the request at all.
    #[error("no table available for a party of {party_size} on {date} at {}", time.format("%H:%M"))]
    NoTableAvailable {
        /// The requested party size.
        party_size: u32,
        /// The requested date.
        date: NaiveDate,
        /// The requested time.
        time: NaiveTime,
    },

    /// A lifecycle transition was attempted from a state that forbids it.
    #[error("cannot {action} reservation {reservation_id} from status '{status}'")]
    InvalidTransition {
        /// The reservation whose transition was rejected.
        reservation_id: ReservationId,
        /// The status the reservation was in at commit time.
        status: ReservationStatus,
        /// The attempted action ("confirm", "cancel", "complete").
        action: &'static str,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A table number is already taken by another table.
    #[error("table number {table_number} is already in use")]
    TableNumberInUse {
        /// The contested table number.
        table_number: u32,
    },

    /// A table cannot be removed while active reservations reference it.
    #[error("table {table_id} still has active reservations")]
    TableHasActiveReservations {
        /// The table that was attempted to be removed.
        table_id: TableId,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },

    /// Password hashing or verification failed.
    #[error("password hash error: {message}")]
    PasswordHash {
        /// A description of the failure.
        message: String,
    },
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if the error is a capacity conflict: either the chosen slot
    /// was taken or no table fits the request.
    ///
    /// Conflicts are retryable: the caller can re-plan against another
    /// table or a different slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use tavola::{Error, TableId};
    ///
    /// let err = Error::SlotConflict {
    ///     table_id: TableId::new(1),
    ///     date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
    ///     time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
    ///     party_size: 2,
    /// };
    /// assert!(err.is_conflict());
    /// ```
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SlotConflict { .. } | Self::NoTableAvailable { .. }
        )
    }

    /// Check if the error indicates a missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
