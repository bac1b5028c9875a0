//! Dining table types for the restaurant floor inventory.
//!
//! Tables carry a unique table number, a seating capacity, and an
//! inventory status. Availability for a specific slot is a separate
//! question answered by the availability resolver.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;

/// A unique identifier for a dining table, assigned by the storage layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TableId(i64);

impl TableId {
    /// Creates a table id from a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seating capacity of a dining table.
///
/// A capacity is always greater than zero.
///
/// # Examples
///
/// ```
/// use tavola::Capacity;
///
/// let capacity = Capacity::try_from(4).unwrap();
/// assert_eq!(capacity.seats(), 4);
/// assert!(Capacity::try_from(0).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct Capacity(u32);

impl Capacity {
    /// Returns the number of seats.
    #[must_use]
    pub const fn seats(self) -> u32 {
        self.0
    }

    /// Whether a party of the given size fits at this table.
    #[must_use]
    pub fn fits(self, party_size: crate::PartySize) -> bool {
        self.0 >= party_size.value()
    }
}

impl TryFrom<u32> for Capacity {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(ValidationError {
                field: "capacity".into(),
                message: "capacity must be greater than zero".into(),
            });
        }
        Ok(Self(value))
    }
}

impl From<Capacity> for u32 {
    fn from(capacity: Capacity) -> Self {
        capacity.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The inventory status of a dining table.
///
/// Only `Available` tables participate in availability resolution;
/// `Reserved` marks a table held back by staff (for instance for a
/// walk-in block) and `Maintenance` takes it off the floor entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    /// Bookable through the availability resolver.
    Available,
    /// Held back from online booking by staff.
    Reserved,
    /// Out of service.
    Maintenance,
}

impl TableStatus {
    /// Returns the storage representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Maintenance => "maintenance",
        }
    }

    /// Parses a status from its storage representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known status.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown table status: {s}"),
            }),
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated specification for creating a dining table.
///
/// # Examples
///
/// ```
/// use tavola::{TableSpec, TableStatus};
///
/// let spec = TableSpec::new(5, 4)
///     .unwrap()
///     .with_location(Some("Patio".to_string()))
///     .with_status(TableStatus::Available);
/// assert_eq!(spec.table_number(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    table_number: u32,
    capacity: Capacity,
    status: TableStatus,
    location: Option<String>,
}

impl TableSpec {
    /// Creates a table specification with the given number and capacity.
    ///
    /// The status defaults to [`TableStatus::Available`] and the location
    /// to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table number is zero or the capacity is
    /// not positive.
    pub fn new(table_number: u32, capacity: u32) -> Result<Self, ValidationError> {
        if table_number == 0 {
            return Err(ValidationError {
                field: "table_number".into(),
                message: "table number must be greater than zero".into(),
            });
        }
        Ok(Self {
            table_number,
            capacity: Capacity::try_from(capacity)?,
            status: TableStatus::Available,
            location: None,
        })
    }

    /// Sets the floor location description.
    ///
    /// The location is trimmed; an empty string becomes `None`.
    #[must_use]
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }

    /// Sets the inventory status.
    #[must_use]
    pub const fn with_status(mut self, status: TableStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the table number.
    #[must_use]
    pub const fn table_number(&self) -> u32 {
        self.table_number
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TableStatus {
        self.status
    }

    /// Returns the location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// A set of optional changes to apply to an existing dining table.
///
/// Fields left as `None` are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableChanges {
    /// New table number, if changing.
    pub table_number: Option<u32>,
    /// New capacity, if changing.
    pub capacity: Option<Capacity>,
    /// New inventory status, if changing.
    pub status: Option<TableStatus>,
    /// New location, if changing.
    pub location: Option<String>,
}

impl TableChanges {
    /// Whether the change set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table_number.is_none()
            && self.capacity.is_none()
            && self.status.is_none()
            && self.location.is_none()
    }
}

/// A stored dining table.
///
/// Named `DiningTable` rather than `Table` to keep the SQL keyword out of
/// the API surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningTable {
    id: TableId,
    table_number: u32,
    capacity: Capacity,
    status: TableStatus,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DiningTable {
    /// Assembles a dining table from stored parts.
    pub(crate) fn from_parts(
        id: TableId,
        table_number: u32,
        capacity: Capacity,
        status: TableStatus,
        location: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            table_number,
            capacity,
            status,
            location,
            created_at,
            updated_at,
        }
    }

    /// Returns the table id.
    #[must_use]
    pub const fn id(&self) -> TableId {
        self.id
    }

    /// Returns the table number.
    #[must_use]
    pub const fn table_number(&self) -> u32 {
        self.table_number
    }

    /// Returns the seating capacity.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Returns the inventory status.
    #[must_use]
    pub const fn status(&self) -> TableStatus {
        self.status
    }

    /// Returns the floor location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
