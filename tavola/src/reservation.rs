//! Reservation types for tracking table bookings.
//!
//! This module provides the reservation entity, its status lifecycle,
//! and the slot/party-size value types used throughout the library.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::customer::CustomerId;
use crate::table::TableId;

/// A unique identifier for a reservation, assigned by the storage layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ReservationId(i64);

impl ReservationId {
    /// Creates a reservation id from a raw row id.
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

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The number of guests in a booking party.
///
/// A party size is always greater than zero.
///
/// # Examples
///
/// ```
/// use tavola::PartySize;
///
/// let party = PartySize::try_from(4).unwrap();
/// assert_eq!(party.value(), 4);
///
/// assert!(PartySize::try_from(0).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct PartySize(u32);

impl PartySize {
    /// Returns the number of guests.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PartySize {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(ValidationError {
                field: "party_size".into(),
                message: "party size must be greater than zero".into(),
            });
        }
        Ok(Self(value))
    }
}

impl From<PartySize> for u32 {
    fn from(party: PartySize) -> Self {
        party.0
    }
}

impl fmt::Display for PartySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bookable (table, date, time) triple.
///
/// A slot can hold at most one active reservation; this is the central
/// consistency constraint of the whole system. Slots are points in time,
/// not intervals: bookings at 18:00 and 18:30 on the same table are
/// independent.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use tavola::{Slot, TableId};
///
/// let slot = Slot::new(
///     TableId::new(1),
///     NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
///     NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
/// );
/// assert_eq!(format!("{slot}"), "table 1 on 2026-09-01 at 19:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// The table being claimed.
    pub table_id: TableId,
    /// The service date.
    pub date: NaiveDate,
    /// The service time (minute precision).
    pub time: NaiveTime,
}

impl Slot {
    /// Creates a new slot.
    #[must_use]
    pub const fn new(table_id: TableId, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            table_id,
            date,
            time,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table {} on {} at {}",
            self.table_id,
            self.date,
            self.time.format("%H:%M")
        )
    }
}

/// The lifecycle status of a reservation.
///
/// Reservations are created `Pending` and move through the lifecycle via
/// [`StatusTransition`]. `Cancelled` and `Completed` are terminal. Only
/// `Pending` and `Confirmed` reservations occupy their slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Newly created, awaiting staff confirmation.
    Pending,
    /// Confirmed by staff.
    Confirmed,
    /// Cancelled by staff or the customer.
    Cancelled,
    /// Service finished.
    Completed,
}

impl ReservationStatus {
    /// Returns the storage representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from its storage representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known status.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown reservation status: {s}"),
            }),
        }
    }

    /// Whether a reservation in this status occupies its slot.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lifecycle action on a reservation.
///
/// Each transition is valid only from specific statuses; attempting it
/// from any other status is rejected without mutating state.
///
/// # Examples
///
/// ```
/// use tavola::{ReservationStatus, StatusTransition};
///
/// assert!(StatusTransition::Confirm.allowed_from(ReservationStatus::Pending));
/// assert!(!StatusTransition::Confirm.allowed_from(ReservationStatus::Cancelled));
/// assert_eq!(StatusTransition::Cancel.target(), ReservationStatus::Cancelled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTransition {
    /// `pending → confirmed`.
    Confirm,
    /// `pending | confirmed → cancelled`.
    Cancel,
    /// `confirmed → completed`.
    Complete,
}

impl StatusTransition {
    /// The statuses from which this transition may be taken.
    #[must_use]
    pub const fn allowed_sources(self) -> &'static [ReservationStatus] {
        match self {
            Self::Confirm => &[ReservationStatus::Pending],
            Self::Cancel => &[ReservationStatus::Pending, ReservationStatus::Confirmed],
            Self::Complete => &[ReservationStatus::Confirmed],
        }
    }

    /// Whether the transition may be taken from `status`.
    #[must_use]
    pub fn allowed_from(self, status: ReservationStatus) -> bool {
        self.allowed_sources().contains(&status)
    }

    /// The status this transition moves a reservation into.
    #[must_use]
    pub const fn target(self) -> ReservationStatus {
        match self {
            Self::Confirm => ReservationStatus::Confirmed,
            Self::Cancel => ReservationStatus::Cancelled,
            Self::Complete => ReservationStatus::Completed,
        }
    }

    /// The verb used in error messages ("confirm", "cancel", "complete").
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for StatusTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verb())
    }
}

/// A validated request to create a reservation.
///
/// This is the typed input the booking operation hands to the storage
/// layer once the customer record is resolved. Input validation happens
/// here, at the boundary, before any storage work runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    customer_id: CustomerId,
    slot: Slot,
    party_size: PartySize,
    special_requests: Option<String>,
}

impl ReservationRequest {
    /// Creates a new reservation request.
    ///
    /// Special requests are trimmed; an empty string becomes `None`.
    #[must_use]
    pub fn new(
        customer_id: CustomerId,
        slot: Slot,
        party_size: PartySize,
        special_requests: Option<String>,
    ) -> Self {
        let special_requests = special_requests
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            customer_id,
            slot,
            party_size,
            special_requests,
        }
    }

    /// Returns the customer making the booking.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the slot being claimed.
    #[must_use]
    pub const fn slot(&self) -> Slot {
        self.slot
    }

    /// Returns the party size.
    #[must_use]
    pub const fn party_size(&self) -> PartySize {
        self.party_size
    }

    /// Returns the special requests, if any.
    #[must_use]
    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }
}

/// A stored reservation with its lifecycle status and timestamps.
///
/// Reservations are only constructed by the storage layer; callers
/// observe them through accessors and mutate them through the lifecycle
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    customer_id: CustomerId,
    table_id: TableId,
    date: NaiveDate,
    time: NaiveTime,
    party_size: PartySize,
    status: ReservationStatus,
    special_requests: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Assembles a reservation from stored parts.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: ReservationId,
        customer_id: CustomerId,
        table_id: TableId,
        date: NaiveDate,
        time: NaiveTime,
        party_size: PartySize,
        status: ReservationStatus,
        special_requests: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id,
            table_id,
            date,
            time,
            party_size,
            status,
            special_requests,
            created_at,
            updated_at,
        }
    }

    /// Returns the reservation id.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the booking customer's id.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the reserved table's id.
    #[must_use]
    pub const fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Returns the service date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the service time.
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    /// Returns the slot this reservation targets.
    #[must_use]
    pub const fn slot(&self) -> Slot {
        Slot::new(self.table_id, self.date, self.time)
    }

    /// Returns the party size.
    #[must_use]
    pub const fn party_size(&self) -> PartySize {
        self.party_size
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns the special requests, if any.
    #[must_use]
    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
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

    /// Whether the reservation currently occupies its slot.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
