//! Booking operation planning.
//!
//! Planning validates the typed booking request at the boundary,
//! resolves candidate tables (advisory), and selects the tightest fit.
//! The availability snapshot taken here is re-checked at commit time by
//! the storage layer's unique slot index; when a concurrent booking wins
//! the race, execution fails with a conflict and the caller can simply
//! re-plan, at which point the lost table is no longer offered.

use chrono::{Local, NaiveDate, NaiveTime};

use crate::availability::{find_available_tables, is_table_available_at};
use crate::config::Config;
use crate::customer::CustomerDetails;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{PartySize, Slot};

use super::plan::{OperationPlan, PlanAction};

/// Options for a booking operation.
#[derive(Debug, Clone)]
pub struct BookOptions {
    /// The booking customer's details.
    pub customer: CustomerDetails,

    /// The requested service date.
    pub date: NaiveDate,

    /// The requested service time.
    pub time: NaiveTime,

    /// The party size.
    pub party_size: PartySize,

    /// Free-form requests attached to the booking.
    pub special_requests: Option<String>,

    /// Request a specific table by floor number instead of the tightest
    /// fit.
    pub table_number: Option<u32>,

    /// Allow dates in the past (normally rejected).
    pub allow_past_dates: bool,

    /// Skip the service-hours and slot-grid checks (staff override for
    /// walk-ins outside the booking grid).
    pub ignore_hours: bool,
}

impl BookOptions {
    /// Creates booking options with the given request values.
    ///
    /// All flags default to off and no specific table is requested.
    #[must_use]
    pub fn new(
        customer: CustomerDetails,
        date: NaiveDate,
        time: NaiveTime,
        party_size: PartySize,
    ) -> Self {
        Self {
            customer,
            date,
            time,
            party_size,
            special_requests: None,
            table_number: None,
            allow_past_dates: false,
            ignore_hours: false,
        }
    }

    /// Attaches special requests to the booking.
    #[must_use]
    pub fn with_special_requests(mut self, requests: Option<String>) -> Self {
        self.special_requests = requests;
        self
    }

    /// Requests a specific table by floor number.
    #[must_use]
    pub const fn with_table_number(mut self, table_number: Option<u32>) -> Self {
        self.table_number = table_number;
        self
    }

    /// Sets the `allow_past_dates` flag.
    #[must_use]
    pub const fn with_allow_past_dates(mut self, allow: bool) -> Self {
        self.allow_past_dates = allow;
        self
    }

    /// Sets the `ignore_hours` flag.
    #[must_use]
    pub const fn with_ignore_hours(mut self, ignore: bool) -> Self {
        self.ignore_hours = ignore;
        self
    }
}

/// A booking plan generator.
///
/// This struct is responsible for analyzing a booking request and
/// generating a plan that describes what actions to take.
pub struct BookPlan<'a> {
    options: BookOptions,
    config: &'a Config,
}

impl<'a> BookPlan<'a> {
    /// Creates a new booking plan with the given options and config.
    #[must_use]
    pub const fn new(options: BookOptions, config: &'a Config) -> Self {
        Self { options, config }
    }

    /// Builds an operation plan for this booking request.
    ///
    /// This method performs all validation and table selection. It does
    /// NOT modify the database.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The date is in the past (unless `allow_past_dates`)
    /// - The time is outside service hours or off the slot grid (unless
    ///   `ignore_hours`)
    /// - A requested table does not exist, cannot seat the party, or
    ///   (as a fast path) already holds an active reservation at the
    ///   slot
    /// - No table qualifies at all
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let options = &self.options;
        let mut plan = OperationPlan::new(format!(
            "Book a table for {} {} (party of {}) on {} at {}",
            options.customer.first_name(),
            options.customer.last_name(),
            options.party_size,
            options.date,
            options.time.format("%H:%M")
        ));

        // Step 1: reject dates already behind us
        if !options.allow_past_dates && options.date < Local::now().date_naive() {
            return Err(Error::Validation {
                field: "date".into(),
                message: format!("reservation date {} is in the past", options.date),
            });
        }

        // Step 2: keep requests on the configured booking grid
        if !options.ignore_hours {
            let hours = &self.config.hours;
            if !hours.contains(options.time) {
                return Err(Error::Validation {
                    field: "time".into(),
                    message: format!(
                        "{} is outside service hours ({}-{})",
                        options.time.format("%H:%M"),
                        hours.opening.format("%H:%M"),
                        hours.closing.format("%H:%M")
                    ),
                });
            }
            if !hours.is_slot_aligned(options.time) {
                return Err(Error::Validation {
                    field: "time".into(),
                    message: format!(
                        "{} is not on the {}-minute booking grid",
                        options.time.format("%H:%M"),
                        hours.slot_minutes
                    ),
                });
            }
        }

        // Step 3: pick the table, requested explicitly or tightest fit
        let table = match options.table_number {
            Some(number) => {
                let table =
                    db.find_table_by_number(number)?
                        .ok_or_else(|| Error::NotFound {
                            resource: format!("table number {number}"),
                        })?;

                // Advisory fast path; the unique slot index re-checks at
                // commit time
                let slot_taken = db
                    .find_active_reservation_for_slot(Slot::new(
                        table.id(),
                        options.date,
                        options.time,
                    ))?
                    .is_some();
                if slot_taken {
                    return Err(Error::SlotConflict {
                        table_id: table.id(),
                        date: options.date,
                        time: options.time,
                        party_size: options.party_size.value(),
                    });
                }
                if !is_table_available_at(
                    db,
                    &table,
                    options.date,
                    options.time,
                    options.party_size,
                )? {
                    return Err(Error::NoTableAvailable {
                        party_size: options.party_size.value(),
                        date: options.date,
                        time: options.time,
                    });
                }
                table
            }
            None => {
                let candidates =
                    find_available_tables(db, options.date, options.time, options.party_size)?;
                candidates
                    .into_iter()
                    .next()
                    .ok_or(Error::NoTableAvailable {
                        party_size: options.party_size.value(),
                        date: options.date,
                        time: options.time,
                    })?
            }
        };

        plan = plan.add_action(PlanAction::BookTable {
            customer: options.customer.clone(),
            table_id: table.id(),
            date: options.date,
            time: options.time,
            party_size: options.party_size,
            special_requests: options.special_requests.clone(),
        });

        Ok(plan)
    }
}
