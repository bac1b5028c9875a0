//! Occupancy and volume numbers for the staff dashboard.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;

use super::connection::Database;
use super::date_to_text;

const COUNT_AVAILABLE_TABLES: &str = r"
    SELECT COUNT(*), COALESCE(SUM(capacity), 0)
    FROM tables WHERE status = 'available'
";

const COUNT_DAY_RESERVATIONS: &str = r"
    SELECT COUNT(*), COALESCE(SUM(CASE WHEN status IN ('pending', 'confirmed')
                                       THEN party_size ELSE 0 END), 0)
    FROM reservations WHERE reservation_date = ?
";

/// A snapshot of floor availability and booking volume for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantStats {
    /// The day the snapshot describes.
    pub date: NaiveDate,
    /// Tables currently in `available` status.
    pub available_tables: u32,
    /// Total seats across available tables.
    pub total_capacity: u32,
    /// All reservations on the day, regardless of status.
    pub day_reservations: u32,
    /// Seats claimed by active (pending or confirmed) reservations.
    pub reserved_capacity: u32,
    /// Reserved share of available seats, as a percentage.
    pub occupancy_rate: f64,
}

impl Database {
    /// Computes availability and booking volume for a service date.
    ///
    /// The occupancy rate is the active reserved capacity over the total
    /// available capacity; zero available capacity yields a zero rate
    /// rather than a division error.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chrono::NaiveDate;
    /// use tavola::database::{Database, DatabaseConfig};
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/tavola.db")).unwrap();
    /// let stats = db
    ///     .restaurant_stats(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())
    ///     .unwrap();
    /// println!("{} tables free", stats.available_tables);
    /// ```
    pub fn restaurant_stats(&self, date: NaiveDate) -> Result<RestaurantStats> {
        let (available_tables, total_capacity): (u32, u32) =
            self.conn
                .query_row(COUNT_AVAILABLE_TABLES, [], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?;

        let (day_reservations, reserved_capacity): (u32, u32) = self.conn.query_row(
            COUNT_DAY_RESERVATIONS,
            [date_to_text(date)],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let occupancy_rate = if total_capacity == 0 {
            0.0
        } else {
            f64::from(reserved_capacity) / f64::from(total_capacity) * 100.0
        };

        Ok(RestaurantStats {
            date,
            available_tables,
            total_capacity,
            day_reservations,
            reserved_capacity,
            occupancy_rate,
        })
    }
}
