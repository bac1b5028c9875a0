//! Availability resolution: which tables can seat a party at a slot.
//!
//! The resolver answers with candidate tables ordered tightest-fit
//! first, so small parties do not consume large tables. Its answer is a
//! snapshot: a concurrent booking can take a candidate between the
//! query and the claim. Correctness does not depend on it. The claim
//! itself is guarded by the storage layer's unique slot index, and a
//! lost race surfaces as a conflict the caller can retry.
//!
//! Reservations occupy exactly one discrete time slot, not an interval:
//! the resolver treats 18:00 and 18:30 at the same table as independent
//! slots.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;
use crate::reservation::{PartySize, Slot};
use crate::table::{DiningTable, TableStatus};

const SELECT_AVAILABLE_TABLES: &str = r"
    SELECT t.table_id, t.table_number, t.capacity, t.status, t.location,
           t.created_at, t.updated_at
    FROM tables t
    WHERE t.capacity >= ?1
      AND t.status = 'available'
      AND NOT EXISTS (
          SELECT 1 FROM reservations r
          WHERE r.table_id = t.table_id
            AND r.reservation_date = ?2
            AND r.reservation_time = ?3
            AND r.status IN ('pending', 'confirmed'))
    ORDER BY t.capacity ASC, t.table_number ASC
";

/// Finds tables free for the given slot, tightest fit first.
///
/// A table qualifies when its capacity covers the party, its inventory
/// status is `available`, and no pending or confirmed reservation holds
/// the exact (table, date, time) triple. Ties on capacity are broken by
/// table number so results are deterministic.
///
/// An empty vector means nothing qualifies; that is an expected outcome,
/// not an error.
///
/// # Errors
///
/// Returns an error only for storage failures.
///
/// # Examples
///
/// ```no_run
/// use chrono::{NaiveDate, NaiveTime};
/// use tavola::database::{Database, DatabaseConfig};
/// use tavola::{find_available_tables, PartySize};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/tavola.db")).unwrap();
/// let candidates = find_available_tables(
///     &db,
///     NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
///     NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
///     PartySize::try_from(2).unwrap(),
/// )
/// .unwrap();
///
/// for table in &candidates {
///     println!("table {} seats {}", table.table_number(), table.capacity());
/// }
/// ```
pub fn find_available_tables(
    db: &Database,
    date: NaiveDate,
    time: NaiveTime,
    party_size: PartySize,
) -> Result<Vec<DiningTable>> {
    let mut stmt = db.connection().prepare(SELECT_AVAILABLE_TABLES)?;
    let tables = stmt
        .query_map(
            params![
                party_size.value(),
                crate::database::date_to_text(date),
                crate::database::time_to_text(time),
            ],
            crate::database::tables_row_to_table,
        )?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(tables)
}

/// Whether a single table could take the party at the slot.
///
/// Advisory only, used to fail fast when a caller asks for a specific
/// table. The unique slot index remains the authoritative guard.
///
/// # Errors
///
/// Returns an error only for storage failures.
pub fn is_table_available_at(
    db: &Database,
    table: &DiningTable,
    date: NaiveDate,
    time: NaiveTime,
    party_size: PartySize,
) -> Result<bool> {
    if table.status() != TableStatus::Available || !table.capacity().fits(party_size) {
        return Ok(false);
    }
    let held = db
        .find_active_reservation_for_slot(Slot::new(table.id(), date, time))?
        .is_some();
    Ok(!held)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerDetails;
    use crate::database::DatabaseConfig;
    use crate::reservation::{ReservationRequest, StatusTransition};
    use crate::table::TableSpec;
    use tempfile::tempdir;

    fn create_test_database() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(DatabaseConfig::new(path)).unwrap();
        (dir, db)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    fn time() -> NaiveTime {
        NaiveTime::from_hms_opt(19, 0, 0).unwrap()
    }

    fn party(n: u32) -> PartySize {
        PartySize::try_from(n).unwrap()
    }

    fn book(db: &mut Database, table: &DiningTable, party_size: u32) -> crate::Reservation {
        let customer = db
            .get_or_create_customer(
                &CustomerDetails::new("Ada", "Lovelace", "0400", None).unwrap(),
            )
            .unwrap();
        db.create_reservation(&ReservationRequest::new(
            customer.id(),
            Slot::new(table.id(), date(), time()),
            party(party_size),
            None,
        ))
        .unwrap()
    }

    #[test]
    fn test_capacity_filter() {
        let (_dir, mut db) = create_test_database();
        db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();
        db.create_table(&TableSpec::new(2, 4).unwrap()).unwrap();

        let results = find_available_tables(&db, date(), time(), party(3)).unwrap();
        let numbers: Vec<u32> = results.iter().map(DiningTable::table_number).collect();
        // The two-seater never appears for a party of three
        assert_eq!(numbers, vec![2]);
    }

    #[test]
    fn test_tightest_fit_ordering() {
        let (_dir, mut db) = create_test_database();
        db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();
        db.create_table(&TableSpec::new(2, 4).unwrap()).unwrap();

        let results = find_available_tables(&db, date(), time(), party(2)).unwrap();
        let numbers: Vec<u32> = results.iter().map(DiningTable::table_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_booked_table_disappears_from_results() {
        let (_dir, mut db) = create_test_database();
        let t1 = db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();
        db.create_table(&TableSpec::new(2, 4).unwrap()).unwrap();

        book(&mut db, &t1, 2);

        let results = find_available_tables(&db, date(), time(), party(2)).unwrap();
        let numbers: Vec<u32> = results.iter().map(DiningTable::table_number).collect();
        assert_eq!(numbers, vec![2]);
    }

    #[test]
    fn test_other_slots_unaffected_by_booking() {
        let (_dir, mut db) = create_test_database();
        let t1 = db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();

        book(&mut db, &t1, 2);

        // same table, same date, half an hour later: still free
        let later = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
        let results = find_available_tables(&db, date(), later, party(2)).unwrap();
        assert_eq!(results.len(), 1);

        // same table, same time, next day: still free
        let tomorrow = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
        let results = find_available_tables(&db, tomorrow, time(), party(2)).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_cancelled_reservation_frees_table() {
        let (_dir, mut db) = create_test_database();
        let t1 = db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();

        let reservation = book(&mut db, &t1, 2);
        assert!(find_available_tables(&db, date(), time(), party(2))
            .unwrap()
            .is_empty());

        db.transition_reservation(reservation.id(), StatusTransition::Cancel)
            .unwrap();
        assert_eq!(
            find_available_tables(&db, date(), time(), party(2))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_non_available_statuses_excluded() {
        let (_dir, mut db) = create_test_database();
        db.create_table(
            &TableSpec::new(1, 4)
                .unwrap()
                .with_status(TableStatus::Maintenance),
        )
        .unwrap();
        db.create_table(
            &TableSpec::new(2, 4)
                .unwrap()
                .with_status(TableStatus::Reserved),
        )
        .unwrap();

        assert!(find_available_tables(&db, date(), time(), party(2))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_no_capacity_returns_empty_not_error() {
        let (_dir, db) = create_test_database();
        let results = find_available_tables(&db, date(), time(), party(12)).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_is_table_available_at() {
        let (_dir, mut db) = create_test_database();
        let t1 = db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();

        assert!(is_table_available_at(&db, &t1, date(), time(), party(2)).unwrap());
        assert!(!is_table_available_at(&db, &t1, date(), time(), party(3)).unwrap());

        book(&mut db, &t1, 2);
        assert!(!is_table_available_at(&db, &t1, date(), time(), party(2)).unwrap());
    }
}
