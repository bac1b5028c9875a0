//! Lifecycle transition planning (confirm, cancel, complete).
//!
//! Planning checks the reservation's current status as a fast path; the
//! authoritative check is the status guard inside the UPDATE the
//! executor runs, so a transition raced by another writer still fails
//! cleanly rather than committing from a stale snapshot.

use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{ReservationId, StatusTransition};

use super::plan::{OperationPlan, PlanAction};

/// Options for a lifecycle transition.
#[derive(Debug, Clone, Copy)]
pub struct TransitionOptions {
    /// The reservation to transition.
    pub reservation_id: ReservationId,
    /// The transition to apply.
    pub transition: StatusTransition,
}

impl TransitionOptions {
    /// Creates transition options.
    #[must_use]
    pub const fn new(reservation_id: ReservationId, transition: StatusTransition) -> Self {
        Self {
            reservation_id,
            transition,
        }
    }
}

/// A transition plan generator.
pub struct TransitionPlan {
    options: TransitionOptions,
}

impl TransitionPlan {
    /// Creates a new transition plan with the given options.
    #[must_use]
    pub const fn new(options: TransitionOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this transition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the reservation does not exist and
    /// [`Error::InvalidTransition`] if its current status already
    /// forbids the transition. Both conditions are re-checked at
    /// execution time.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let id = self.options.reservation_id;
        let transition = self.options.transition;

        let reservation = db.get_reservation(id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {id}"),
        })?;

        if !transition.allowed_from(reservation.status()) {
            return Err(Error::InvalidTransition {
                reservation_id: id,
                status: reservation.status(),
                action: transition.verb(),
            });
        }

        let plan = OperationPlan::new(format!("{} reservation {id}", transition.verb()))
            .add_action(PlanAction::TransitionReservation {
                reservation_id: id,
                transition,
            });
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerDetails;
    use crate::database::DatabaseConfig;
    use crate::operations::PlanExecutor;
    use crate::reservation::{PartySize, ReservationRequest, ReservationStatus, Slot};
    use crate::table::TableSpec;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::tempdir;

    fn create_test_database() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(DatabaseConfig::new(path)).unwrap();
        (dir, db)
    }

    fn seed_reservation(db: &mut Database) -> ReservationId {
        let customer = db
            .get_or_create_customer(
                &CustomerDetails::new("Ada", "Lovelace", "0400", None).unwrap(),
            )
            .unwrap();
        let table = db.create_table(&TableSpec::new(1, 4).unwrap()).unwrap();
        db.create_reservation(&ReservationRequest::new(
            customer.id(),
            Slot::new(
                table.id(),
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            ),
            PartySize::try_from(2).unwrap(),
            None,
        ))
        .unwrap()
        .id()
    }

    fn run(db: &mut Database, id: ReservationId, transition: StatusTransition) -> Result<()> {
        let plan =
            TransitionPlan::new(TransitionOptions::new(id, transition)).build_plan(db)?;
        PlanExecutor::new(db).execute(&plan)?;
        Ok(())
    }

    #[test]
    fn test_confirm_then_complete() {
        let (_dir, mut db) = create_test_database();
        let id = seed_reservation(&mut db);

        run(&mut db, id, StatusTransition::Confirm).unwrap();
        assert_eq!(
            db.get_reservation(id).unwrap().unwrap().status(),
            ReservationStatus::Confirmed
        );

        run(&mut db, id, StatusTransition::Complete).unwrap();
        assert_eq!(
            db.get_reservation(id).unwrap().unwrap().status(),
            ReservationStatus::Completed
        );
    }

    #[test]
    fn test_plan_rejects_invalid_transition_early() {
        let (_dir, mut db) = create_test_database();
        let id = seed_reservation(&mut db);

        // complete requires confirmed; the plan itself refuses
        let err = TransitionPlan::new(TransitionOptions::new(id, StatusTransition::Complete))
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn test_plan_missing_reservation() {
        let (_dir, db) = create_test_database();
        let err = TransitionPlan::new(TransitionOptions::new(
            ReservationId::new(99),
            StatusTransition::Confirm,
        ))
        .build_plan(&db)
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cancel_from_both_active_states() {
        let (_dir, mut db) = create_test_database();

        // cancel a pending reservation
        let id = seed_reservation(&mut db);
        run(&mut db, id, StatusTransition::Cancel).unwrap();

        // cancel a confirmed reservation (slot freed above, rebook it)
        let id = {
            let customer = db.find_customer_by_phone("0400").unwrap().unwrap();
            let table = db.find_table_by_number(1).unwrap().unwrap();
            db.create_reservation(&ReservationRequest::new(
                customer.id(),
                Slot::new(
                    table.id(),
                    NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                    NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                ),
                PartySize::try_from(2).unwrap(),
                None,
            ))
            .unwrap()
            .id()
        };
        run(&mut db, id, StatusTransition::Confirm).unwrap();
        run(&mut db, id, StatusTransition::Cancel).unwrap();
        assert_eq!(
            db.get_reservation(id).unwrap().unwrap().status(),
            ReservationStatus::Cancelled
        );
    }
}
