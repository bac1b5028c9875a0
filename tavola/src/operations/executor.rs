//! Plan execution engine.
//!
//! This module implements the executor that takes operation plans and
//! applies them to the database. Every action commits or rolls back as
//! one transaction; the composite booking action in particular resolves
//! the customer and claims the slot atomically, so a lost slot race
//! leaves no partial write behind.

use rusqlite::TransactionBehavior;

use crate::customer::Customer;
use crate::database::Database;
use crate::error::Result;
use crate::reservation::{Reservation, ReservationRequest, Slot};
use crate::table::DiningTable;

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
///
/// This struct provides information about what happened during
/// execution, including whether it was a dry run and what actions were
/// taken.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in
    /// dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The reservation created or transitioned, if applicable.
    pub reservation: Option<Reservation>,

    /// The customer resolved by a booking action, if applicable.
    pub customer: Option<Customer>,

    /// The table created or updated, if applicable.
    pub table: Option<DiningTable>,
}

impl ExecutionResult {
    fn empty(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservation: None,
            customer: None,
            table: None,
        }
    }
}

/// Executes operation plans against the database.
///
/// The executor can run in normal mode (applying changes) or dry-run
/// mode (validating without changes).
///
/// # Examples
///
/// ```no_run
/// use chrono::{NaiveDate, NaiveTime};
/// use tavola::config::ConfigBuilder;
/// use tavola::database::{Database, DatabaseConfig};
/// use tavola::operations::{BookOptions, BookPlan, PlanExecutor};
/// use tavola::{CustomerDetails, PartySize};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/tavola.db")).unwrap();
/// let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
///
/// let customer = CustomerDetails::new("Ada", "Lovelace", "0400 000 001", None).unwrap();
/// let options = BookOptions::new(
///     customer,
///     NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
///     NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
///     PartySize::try_from(2).unwrap(),
/// );
///
/// let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// assert!(result.success);
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(db: &'a mut Database) -> Self {
        Self { db, dry_run: false }
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode, the executor reports the plan's actions but does
    /// not modify the database.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// If in dry-run mode, reports the plan without changes. Otherwise,
    /// applies all actions in the plan to the database, each in its own
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any action fails to execute; actions already
    /// applied stay applied, the failing action is fully rolled back.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::empty(plan, self.dry_run);

        if self.dry_run {
            return Ok(result);
        }

        for action in &plan.actions {
            self.execute_action(action, &mut result)?;
        }

        Ok(result)
    }

    /// Executes a single action, recording outputs on the result.
    fn execute_action(
        &mut self,
        action: &PlanAction,
        result: &mut ExecutionResult,
    ) -> Result<()> {
        match action {
            PlanAction::BookTable {
                customer,
                table_id,
                date,
                time,
                party_size,
                special_requests,
            } => {
                // One transaction for the registry get-or-create and the
                // slot claim: a conflict on the unique slot index rolls
                // the whole booking back
                let tx = self
                    .db
                    .connection_mut()
                    .transaction_with_behavior(TransactionBehavior::Immediate)?;

                let resolved = Database::get_or_create_customer_tx(&tx, customer)?;
                let request = ReservationRequest::new(
                    resolved.id(),
                    Slot::new(*table_id, *date, *time),
                    *party_size,
                    special_requests.clone(),
                );
                let reservation = Database::create_reservation_tx(&tx, &request)?;
                tx.commit()?;

                result.customer = Some(resolved);
                result.reservation = Some(reservation);
            }
            PlanAction::TransitionReservation {
                reservation_id,
                transition,
            } => {
                let reservation = self.db.transition_reservation(*reservation_id, *transition)?;
                result.reservation = Some(reservation);
            }
            PlanAction::CreateTable(spec) => {
                let table = self.db.create_table(spec)?;
                result.table = Some(table);
            }
            PlanAction::UpdateTable { table_id, changes } => {
                let table = self.db.update_table(*table_id, changes)?;
                result.table = Some(table);
            }
            PlanAction::DeleteTable(table_id) => {
                self.db.delete_table(*table_id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerDetails;
    use crate::database::DatabaseConfig;
    use crate::reservation::{PartySize, ReservationStatus};
    use crate::table::{TableId, TableSpec};
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::tempdir;

    fn create_test_database() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(DatabaseConfig::new(path)).unwrap();
        (dir, db)
    }

    fn book_action(table_id: TableId) -> PlanAction {
        PlanAction::BookTable {
            customer: CustomerDetails::new("Ada", "Lovelace", "0400 000 001", None).unwrap(),
            table_id,
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            party_size: PartySize::try_from(2).unwrap(),
            special_requests: None,
        }
    }

    #[test]
    fn test_dry_run_makes_no_changes() {
        let (_dir, mut db) = create_test_database();
        let table = db.create_table(&TableSpec::new(1, 4).unwrap()).unwrap();

        let plan = OperationPlan::new("Book").add_action(book_action(table.id()));
        let result = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();

        assert!(result.success);
        assert!(result.dry_run);
        assert_eq!(result.actions_taken.len(), 1);
        assert!(result.reservation.is_none());
        // Nothing was written
        assert!(db.find_customer_by_phone("0400 000 001").unwrap().is_none());
    }

    #[test]
    fn test_execute_book_action() {
        let (_dir, mut db) = create_test_database();
        let table = db.create_table(&TableSpec::new(1, 4).unwrap()).unwrap();

        let plan = OperationPlan::new("Book").add_action(book_action(table.id()));
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();

        assert!(result.success);
        let reservation = result.reservation.unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Pending);
        assert_eq!(reservation.table_id(), table.id());
        assert_eq!(
            result.customer.unwrap().id(),
            reservation.customer_id()
        );
    }

    #[test]
    fn test_failed_booking_rolls_back_customer() {
        let (_dir, mut db) = create_test_database();
        let table = db.create_table(&TableSpec::new(1, 4).unwrap()).unwrap();

        // Claim the slot with a different customer first
        let other = CustomerDetails::new("Grace", "Hopper", "0400 000 002", None).unwrap();
        let plan = OperationPlan::new("Book").add_action(PlanAction::BookTable {
            customer: other,
            table_id: table.id(),
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            party_size: PartySize::try_from(2).unwrap(),
            special_requests: None,
        });
        PlanExecutor::new(&mut db).execute(&plan).unwrap();

        // The losing booking must leave no partial write: the new
        // customer row rolls back together with the failed claim
        let plan = OperationPlan::new("Book").add_action(book_action(table.id()));
        let err = PlanExecutor::new(&mut db).execute(&plan).unwrap_err();
        assert!(err.is_conflict());
        assert!(db.find_customer_by_phone("0400 000 001").unwrap().is_none());
    }

    #[test]
    fn test_execute_table_actions() {
        let (_dir, mut db) = create_test_database();

        let plan = OperationPlan::new("Add table")
            .add_action(PlanAction::CreateTable(TableSpec::new(4, 6).unwrap()));
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        let table = result.table.unwrap();
        assert_eq!(table.table_number(), 4);

        let plan = OperationPlan::new("Remove table")
            .add_action(PlanAction::DeleteTable(table.id()));
        PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert!(db.get_table(table.id()).unwrap().is_none());
    }
}
