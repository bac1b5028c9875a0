//! Reservation storage operations.
//!
//! Creation claims a slot atomically: the insert either commits with the
//! partial UNIQUE index intact, or trips it and rolls back, surfacing a
//! typed conflict. Lifecycle transitions re-check the current status
//! inside the UPDATE itself, so a stale in-memory status can never cause
//! an illegal transition to commit.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, TransactionBehavior};

use crate::customer::CustomerId;
use crate::error::{Error, Result};
use crate::reservation::{
    PartySize, Reservation, ReservationId, ReservationRequest, ReservationStatus, Slot,
    StatusTransition,
};
use crate::table::TableId;

use super::connection::Database;
use super::{
    date_to_text, datetime_to_unix_secs, is_unique_violation, text_to_date, text_to_time,
    time_to_text, unix_secs_to_datetime,
};

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (customer_id, table_id, reservation_date, reservation_time, party_size,
     status, special_requests, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, 'pending', ?, ?, ?)
";

const SELECT_RESERVATION_COLUMNS: &str = r"
    SELECT reservation_id, customer_id, table_id, reservation_date, reservation_time,
           party_size, status, special_requests, created_at, updated_at
    FROM reservations
";

const SELECT_ACTIVE_FOR_SLOT: &str = r"
    SELECT reservation_id, customer_id, table_id, reservation_date, reservation_time,
           party_size, status, special_requests, created_at, updated_at
    FROM reservations
    WHERE table_id = ? AND reservation_date = ? AND reservation_time = ?
      AND status IN ('pending', 'confirmed')
";

// One statement per transition: the WHERE clause carries the allowed
// source statuses, making the state check and the write a single
// atomic step.
const UPDATE_STATUS_CONFIRM: &str = r"
    UPDATE reservations SET status = 'confirmed', updated_at = ?2
    WHERE reservation_id = ?1 AND status = 'pending'
";

const UPDATE_STATUS_CANCEL: &str = r"
    UPDATE reservations SET status = 'cancelled', updated_at = ?2
    WHERE reservation_id = ?1 AND status IN ('pending', 'confirmed')
";

const UPDATE_STATUS_COMPLETE: &str = r"
    UPDATE reservations SET status = 'completed', updated_at = ?2
    WHERE reservation_id = ?1 AND status = 'confirmed'
";

const SELECT_SEARCH: &str = r"
    SELECT r.reservation_id, r.customer_id, r.table_id, r.reservation_date,
           r.reservation_time, r.party_size, r.status, r.special_requests,
           r.created_at, r.updated_at,
           c.first_name || ' ' || c.last_name AS customer_name,
           c.phone AS customer_phone,
           t.table_number
    FROM reservations r
    JOIN customers c ON c.customer_id = r.customer_id
    JOIN tables t ON t.table_id = r.table_id
    WHERE (?1 IS NULL OR r.reservation_date = ?1)
      AND (?2 IS NULL
           OR instr(lower(c.first_name || ' ' || c.last_name), ?2) > 0
           OR instr(c.phone, ?2) > 0
           OR CAST(t.table_number AS TEXT) = ?2)
    ORDER BY r.reservation_date DESC, r.reservation_time DESC
    LIMIT ?3
";

/// Deserializes a reservation from a database row.
///
/// Expects row fields in this order: `reservation_id`, `customer_id`,
/// `table_id`, date, time, `party_size`, status, `special_requests`,
/// `created_at`, `updated_at`.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let customer_id: i64 = row.get(1)?;
    let table_id: i64 = row.get(2)?;
    let date_text: String = row.get(3)?;
    let time_text: String = row.get(4)?;
    let party_value: u32 = row.get(5)?;
    let status_text: String = row.get(6)?;
    let special_requests: Option<String> = row.get(7)?;
    let created_secs: i64 = row.get(8)?;
    let updated_secs: i64 = row.get(9)?;

    let date = text_to_date(&date_text)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let time = text_to_time(&time_text)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let party_size = PartySize::try_from(party_value)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let status = ReservationStatus::parse(&status_text)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    Ok(Reservation::from_parts(
        ReservationId::new(id),
        CustomerId::new(customer_id),
        TableId::new(table_id),
        date,
        time,
        party_size,
        status,
        special_requests,
        unix_secs_to_datetime(created_secs),
        unix_secs_to_datetime(updated_secs),
    ))
}

/// Filter for reservation searches.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tavola::database::ReservationFilter;
///
/// let filter = ReservationFilter::new()
///     .with_date(Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()))
///     .with_term(Some("lovelace".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    /// Restrict results to this service date.
    pub date: Option<NaiveDate>,
    /// Case-insensitive term matched against customer name, phone, and
    /// table number.
    pub term: Option<String>,
    /// Maximum number of rows returned; `None` uses the default cap.
    pub limit: Option<u32>,
}

impl ReservationFilter {
    /// Default cap on search results.
    pub const DEFAULT_LIMIT: u32 = 50;

    /// Creates an empty filter (all reservations, newest first, capped).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to a service date.
    #[must_use]
    pub const fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// Sets the search term.
    #[must_use]
    pub fn with_term(mut self, term: Option<String>) -> Self {
        self.term = term
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        self
    }

    /// Overrides the result cap.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A reservation joined with display fields from its customer and table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReservationSummary {
    /// The reservation itself.
    pub reservation: Reservation,
    /// The customer's full name.
    pub customer_name: String,
    /// The customer's phone number.
    pub customer_phone: String,
    /// The reserved table's floor number.
    pub table_number: u32,
}

impl Database {
    /// Creates a reservation, claiming its slot atomically.
    ///
    /// The insert and the slot-uniqueness check are one storage-level
    /// step: if another active reservation already holds the
    /// (table, date, time) triple, nothing is written and
    /// [`Error::SlotConflict`] is returned with the request context so
    /// the caller can retry against a different table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotConflict`] when the slot is taken, or a
    /// database error for any other storage failure (including a missing
    /// customer or table, which trips the foreign keys).
    pub fn create_reservation(&mut self, request: &ReservationRequest) -> Result<Reservation> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let reservation = Self::create_reservation_tx(&tx, request)?;
        tx.commit()?;
        Ok(reservation)
    }

    /// Creates a reservation within an existing transaction.
    ///
    /// This method is intended for composing into a larger transaction,
    /// such as the booking flow that also resolves the customer. Unlike
    /// [`create_reservation`](Self::create_reservation), it does not
    /// create its own transaction.
    ///
    /// # Errors
    ///
    /// Same conditions as [`create_reservation`](Self::create_reservation).
    pub(crate) fn create_reservation_tx(
        conn: &Connection,
        request: &ReservationRequest,
    ) -> Result<Reservation> {
        let now = datetime_to_unix_secs(Utc::now());
        let slot = request.slot();

        let result = conn.execute(
            INSERT_RESERVATION,
            params![
                request.customer_id().value(),
                slot.table_id.value(),
                date_to_text(slot.date),
                time_to_text(slot.time),
                request.party_size().value(),
                request.special_requests(),
                now,
                now,
            ],
        );

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::SlotConflict {
                    table_id: slot.table_id,
                    date: slot.date,
                    time: slot.time,
                    party_size: request.party_size().value(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        let reservation = conn.query_row(
            &format!("{SELECT_RESERVATION_COLUMNS} WHERE reservation_id = ?"),
            params![id],
            row_to_reservation,
        )?;
        Ok(reservation)
    }

    /// Retrieves a reservation by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(reservation))` if it exists
    /// - `Ok(None)` if it doesn't
    /// - `Err(_)` if a database error occurs
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than
    /// "not found").
    pub fn get_reservation(&self, id: ReservationId) -> Result<Option<Reservation>> {
        match self.conn.query_row(
            &format!("{SELECT_RESERVATION_COLUMNS} WHERE reservation_id = ?"),
            params![id.value()],
            row_to_reservation,
        ) {
            Ok(reservation) => Ok(Some(reservation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies a lifecycle transition to a reservation.
    ///
    /// The allowed source statuses are part of the UPDATE's WHERE
    /// clause, so the check and the write commit together; a transition
    /// attempted from a non-qualifying status changes nothing and is
    /// reported as [`Error::InvalidTransition`] with the status found at
    /// commit time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the reservation does not exist and
    /// [`Error::InvalidTransition`] if its status forbids the transition.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tavola::database::{Database, DatabaseConfig};
    /// use tavola::{ReservationId, StatusTransition};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/tavola.db")).unwrap();
    /// let confirmed = db
    ///     .transition_reservation(ReservationId::new(1), StatusTransition::Confirm)
    ///     .unwrap();
    /// assert_eq!(confirmed.status().as_str(), "confirmed");
    /// ```
    pub fn transition_reservation(
        &mut self,
        id: ReservationId,
        transition: StatusTransition,
    ) -> Result<Reservation> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let sql = match transition {
            StatusTransition::Confirm => UPDATE_STATUS_CONFIRM,
            StatusTransition::Cancel => UPDATE_STATUS_CANCEL,
            StatusTransition::Complete => UPDATE_STATUS_COMPLETE,
        };

        let now = datetime_to_unix_secs(Utc::now());
        let rows_affected = tx.execute(sql, params![id.value(), now])?;

        if rows_affected == 0 {
            // Either the reservation is missing or its status forbids
            // the transition; look once to tell the two apart
            let found = match tx.query_row(
                &format!("{SELECT_RESERVATION_COLUMNS} WHERE reservation_id = ?"),
                params![id.value()],
                row_to_reservation,
            ) {
                Ok(reservation) => Some(reservation),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            };

            return match found {
                Some(reservation) => Err(Error::InvalidTransition {
                    reservation_id: id,
                    status: reservation.status(),
                    action: transition.verb(),
                }),
                None => Err(Error::NotFound {
                    resource: format!("reservation {id}"),
                }),
            };
        }

        let reservation = tx.query_row(
            &format!("{SELECT_RESERVATION_COLUMNS} WHERE reservation_id = ?"),
            params![id.value()],
            row_to_reservation,
        )?;
        tx.commit()?;
        Ok(reservation)
    }

    /// Finds the active reservation holding a slot, if any.
    ///
    /// This is the advisory form of the slot check; the UNIQUE index
    /// remains the authoritative guard at insert time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_active_reservation_for_slot(&self, slot: Slot) -> Result<Option<Reservation>> {
        match self.conn.query_row(
            SELECT_ACTIVE_FOR_SLOT,
            params![
                slot.table_id.value(),
                date_to_text(slot.date),
                time_to_text(slot.time)
            ],
            row_to_reservation,
        ) {
            Ok(reservation) => Ok(Some(reservation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists all reservations for a service date, earliest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be
    /// deserialized.
    pub fn list_reservations_for_day(&self, date: NaiveDate) -> Result<Vec<Reservation>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_RESERVATION_COLUMNS} WHERE reservation_date = ?
             ORDER BY reservation_time, reservation_id"
        ))?;
        let reservations = stmt
            .query_map(params![date_to_text(date)], row_to_reservation)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(reservations)
    }

    /// Searches reservations with customer and table context.
    ///
    /// Results are ordered newest first and capped by the filter's
    /// limit. The term matches the customer's full name (case-
    /// insensitive), their phone, or the exact table number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be
    /// deserialized.
    pub fn search_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<ReservationSummary>> {
        let mut stmt = self.conn.prepare(SELECT_SEARCH)?;
        let limit = filter.limit.unwrap_or(ReservationFilter::DEFAULT_LIMIT);

        let summaries = stmt
            .query_map(
                params![
                    filter.date.map(date_to_text),
                    filter.term.as_deref(),
                    limit
                ],
                |row| {
                    let reservation = row_to_reservation(row)?;
                    let customer_name: String = row.get(10)?;
                    let customer_phone: String = row.get(11)?;
                    let table_number: u32 = row.get(12)?;
                    Ok(ReservationSummary {
                        reservation,
                        customer_name,
                        customer_phone,
                        table_number,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(summaries)
    }
}
