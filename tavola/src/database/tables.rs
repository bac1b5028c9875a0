//! Dining table inventory operations.
//!
//! Table numbers are unique across the floor; the storage layer enforces
//! this, and removal of a table is refused while active reservations
//! still reference it.

use chrono::Utc;
use rusqlite::{params, Connection, TransactionBehavior};

use crate::error::{Error, Result};
use crate::table::{Capacity, DiningTable, TableChanges, TableId, TableSpec, TableStatus};

use super::connection::Database;
use super::{datetime_to_unix_secs, is_unique_violation, unix_secs_to_datetime};

const INSERT_TABLE: &str = r"
    INSERT INTO tables (table_number, capacity, status, location, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_TABLE_COLUMNS: &str = r"
    SELECT table_id, table_number, capacity, status, location, created_at, updated_at
    FROM tables
";

const UPDATE_TABLE: &str = r"
    UPDATE tables SET
        table_number = COALESCE(?2, table_number),
        capacity = COALESCE(?3, capacity),
        status = COALESCE(?4, status),
        location = COALESCE(?5, location),
        updated_at = ?6
    WHERE table_id = ?1
";

const DELETE_TABLE: &str = "DELETE FROM tables WHERE table_id = ?";

const COUNT_ACTIVE_RESERVATIONS: &str = r"
    SELECT COUNT(*) FROM reservations
    WHERE table_id = ? AND status IN ('pending', 'confirmed')
";

/// Deserializes a dining table from a database row.
///
/// Expects row fields in this order: `table_id`, `table_number`,
/// capacity, status, location, `created_at`, `updated_at`.
pub(crate) fn row_to_table(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiningTable> {
    let id: i64 = row.get(0)?;
    let table_number: u32 = row.get(1)?;
    let capacity_value: u32 = row.get(2)?;
    let status_text: String = row.get(3)?;
    let location: Option<String> = row.get(4)?;
    let created_secs: i64 = row.get(5)?;
    let updated_secs: i64 = row.get(6)?;

    let capacity = Capacity::try_from(capacity_value)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let status = TableStatus::parse(&status_text)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    Ok(DiningTable::from_parts(
        TableId::new(id),
        table_number,
        capacity,
        status,
        location,
        unix_secs_to_datetime(created_secs),
        unix_secs_to_datetime(updated_secs),
    ))
}

impl Database {
    /// Creates a dining table from a validated specification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableNumberInUse`] if another table already holds
    /// the requested table number, or a database error for any other
    /// storage failure.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tavola::database::{Database, DatabaseConfig};
    /// use tavola::TableSpec;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/tavola.db")).unwrap();
    /// let spec = TableSpec::new(1, 4).unwrap();
    /// let table = db.create_table(&spec).unwrap();
    /// assert_eq!(table.table_number(), 1);
    /// ```
    pub fn create_table(&mut self, spec: &TableSpec) -> Result<DiningTable> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let table = Self::create_table_tx(&tx, spec)?;
        tx.commit()?;
        Ok(table)
    }

    /// Creates a dining table within an existing transaction.
    ///
    /// # Errors
    ///
    /// Same conditions as [`create_table`](Self::create_table).
    pub(crate) fn create_table_tx(conn: &Connection, spec: &TableSpec) -> Result<DiningTable> {
        let now = datetime_to_unix_secs(Utc::now());

        let result = conn.execute(
            INSERT_TABLE,
            params![
                spec.table_number(),
                spec.capacity().seats(),
                spec.status().as_str(),
                spec.location(),
                now,
                now,
            ],
        );

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::TableNumberInUse {
                    table_number: spec.table_number(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        let table = conn.query_row(
            &format!("{SELECT_TABLE_COLUMNS} WHERE table_id = ?"),
            params![id],
            row_to_table,
        )?;
        Ok(table)
    }

    /// Retrieves a table by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than
    /// "not found").
    pub fn get_table(&self, id: TableId) -> Result<Option<DiningTable>> {
        match self.conn.query_row(
            &format!("{SELECT_TABLE_COLUMNS} WHERE table_id = ?"),
            params![id.value()],
            row_to_table,
        ) {
            Ok(table) => Ok(Some(table)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves a table by its floor number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than
    /// "not found").
    pub fn find_table_by_number(&self, table_number: u32) -> Result<Option<DiningTable>> {
        match self.conn.query_row(
            &format!("{SELECT_TABLE_COLUMNS} WHERE table_number = ?"),
            params![table_number],
            row_to_table,
        ) {
            Ok(table) => Ok(Some(table)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists the whole floor, ordered by table number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be
    /// deserialized.
    pub fn list_tables(&self) -> Result<Vec<DiningTable>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_TABLE_COLUMNS} ORDER BY table_number"))?;
        let tables = stmt
            .query_map([], row_to_table)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(tables)
    }

    /// Applies a change set to an existing table.
    ///
    /// Fields left unset in `changes` are preserved. Returns the updated
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the table does not exist,
    /// [`Error::TableNumberInUse`] if the new table number is taken, or a
    /// database error for any other storage failure.
    pub fn update_table(&mut self, id: TableId, changes: &TableChanges) -> Result<DiningTable> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let now = datetime_to_unix_secs(Utc::now());
        let result = tx.execute(
            UPDATE_TABLE,
            params![
                id.value(),
                changes.table_number,
                changes.capacity.map(Capacity::seats),
                changes.status.map(TableStatus::as_str),
                changes.location.as_deref(),
                now,
            ],
        );

        let rows_affected = match result {
            Ok(n) => n,
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::TableNumberInUse {
                    // The unique index can only trip when a new number was given
                    table_number: changes.table_number.unwrap_or_default(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if rows_affected == 0 {
            return Err(Error::NotFound {
                resource: format!("table {id}"),
            });
        }

        let table = tx.query_row(
            &format!("{SELECT_TABLE_COLUMNS} WHERE table_id = ?"),
            params![id.value()],
            row_to_table,
        )?;
        tx.commit()?;
        Ok(table)
    }

    /// Removes a table from the floor.
    ///
    /// The check for active reservations and the delete run in one
    /// transaction, so a booking racing the removal either lands before
    /// it (and blocks it) or after it (and fails on the foreign key).
    /// Historical (cancelled/completed) reservations are removed with
    /// the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableHasActiveReservations`] if a pending or
    /// confirmed reservation still references the table, and
    /// [`Error::NotFound`] if the table does not exist.
    pub fn delete_table(&mut self, id: TableId) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let active: i64 = tx.query_row(COUNT_ACTIVE_RESERVATIONS, params![id.value()], |row| {
            row.get(0)
        })?;
        if active > 0 {
            return Err(Error::TableHasActiveReservations { table_id: id });
        }

        let rows_affected = tx.execute(DELETE_TABLE, params![id.value()])?;
        if rows_affected == 0 {
            return Err(Error::NotFound {
                resource: format!("table {id}"),
            });
        }

        tx.commit()?;
        Ok(())
    }

    /// Counts pending and confirmed reservations referencing a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_reservations_for_table(&self, id: TableId) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row(COUNT_ACTIVE_RESERVATIONS, params![id.value()], |row| {
                    row.get(0)
                })?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;
    use tempfile::tempdir;

    fn create_test_database() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(DatabaseConfig::new(path)).unwrap();
        (dir, db)
    }

    #[test]
    fn test_create_and_get_table() {
        let (_dir, mut db) = create_test_database();

        let spec = TableSpec::new(7, 4)
            .unwrap()
            .with_location(Some("Patio".to_string()));
        let created = db.create_table(&spec).unwrap();

        assert_eq!(created.table_number(), 7);
        assert_eq!(created.capacity().seats(), 4);
        assert_eq!(created.status(), TableStatus::Available);
        assert_eq!(created.location(), Some("Patio"));

        let fetched = db.get_table(created.id()).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_duplicate_table_number_rejected() {
        let (_dir, mut db) = create_test_database();

        db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();
        let err = db
            .create_table(&TableSpec::new(1, 6).unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::TableNumberInUse { table_number: 1 }));
    }

    #[test]
    fn test_find_table_by_number() {
        let (_dir, mut db) = create_test_database();

        db.create_table(&TableSpec::new(3, 2).unwrap()).unwrap();
        assert!(db.find_table_by_number(3).unwrap().is_some());
        assert!(db.find_table_by_number(99).unwrap().is_none());
    }

    #[test]
    fn test_list_tables_ordered_by_number() {
        let (_dir, mut db) = create_test_database();

        db.create_table(&TableSpec::new(5, 4).unwrap()).unwrap();
        db.create_table(&TableSpec::new(2, 2).unwrap()).unwrap();
        db.create_table(&TableSpec::new(9, 8).unwrap()).unwrap();

        let numbers: Vec<u32> = db
            .list_tables()
            .unwrap()
            .iter()
            .map(DiningTable::table_number)
            .collect();
        assert_eq!(numbers, vec![2, 5, 9]);
    }

    #[test]
    fn test_update_table_partial_changes() {
        let (_dir, mut db) = create_test_database();

        let table = db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();
        let changes = TableChanges {
            capacity: Some(Capacity::try_from(6).unwrap()),
            status: Some(TableStatus::Maintenance),
            ..TableChanges::default()
        };

        let updated = db.update_table(table.id(), &changes).unwrap();
        assert_eq!(updated.table_number(), 1);
        assert_eq!(updated.capacity().seats(), 6);
        assert_eq!(updated.status(), TableStatus::Maintenance);
    }

    #[test]
    fn test_update_table_number_conflict() {
        let (_dir, mut db) = create_test_database();

        db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();
        let second = db.create_table(&TableSpec::new(2, 2).unwrap()).unwrap();

        let changes = TableChanges {
            table_number: Some(1),
            ..TableChanges::default()
        };
        let err = db.update_table(second.id(), &changes).unwrap_err();
        assert!(matches!(err, Error::TableNumberInUse { table_number: 1 }));
    }

    #[test]
    fn test_update_missing_table() {
        let (_dir, mut db) = create_test_database();

        let changes = TableChanges {
            capacity: Some(Capacity::try_from(4).unwrap()),
            ..TableChanges::default()
        };
        let err = db.update_table(TableId::new(42), &changes).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_table() {
        let (_dir, mut db) = create_test_database();

        let table = db.create_table(&TableSpec::new(1, 2).unwrap()).unwrap();
        db.delete_table(table.id()).unwrap();
        assert!(db.get_table(table.id()).unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_table() {
        let (_dir, mut db) = create_test_database();
        let err = db.delete_table(TableId::new(42)).unwrap_err();
        assert!(err.is_not_found());
    }
}
