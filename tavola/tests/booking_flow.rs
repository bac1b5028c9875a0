//! End-to-end booking flow tests.
//!
//! These tests drive the full plan-execute path a request handler would
//! use: resolve the customer, plan against availability, claim the slot,
//! and walk the lifecycle.

mod common;

use common::{customer, dinner_time, future_date, open_test_database, party, seed_two_tables, test_config};
use tavola::{
    find_available_tables, BookOptions, BookPlan, Error, PlanExecutor, ReservationStatus,
    StatusTransition, TransitionOptions, TransitionPlan,
};

#[test]
fn booking_assigns_tightest_fit_then_next_table() {
    let dir = common::create_temp_dir().unwrap();
    let (_path, mut db) = open_test_database(&dir);
    let config = test_config();
    seed_two_tables(&mut db);

    // Resolver offers both tables, tightest first
    let candidates = find_available_tables(&db, future_date(), dinner_time(), party(2)).unwrap();
    let numbers: Vec<u32> = candidates.iter().map(|t| t.table_number()).collect();
    assert_eq!(numbers, vec![1, 2]);

    // First booking lands on T1
    let options = BookOptions::new(customer(1), future_date(), dinner_time(), party(2));
    let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
    let first = PlanExecutor::new(&mut db)
        .execute(&plan)
        .unwrap()
        .reservation
        .unwrap();
    let t1 = db.find_table_by_number(1).unwrap().unwrap();
    assert_eq!(first.table_id(), t1.id());

    // With T1 taken the resolver offers only T2
    let candidates = find_available_tables(&db, future_date(), dinner_time(), party(2)).unwrap();
    let numbers: Vec<u32> = candidates.iter().map(|t| t.table_number()).collect();
    assert_eq!(numbers, vec![2]);

    // And the second identical booking lands on T2
    let options = BookOptions::new(customer(2), future_date(), dinner_time(), party(2));
    let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
    let second = PlanExecutor::new(&mut db)
        .execute(&plan)
        .unwrap()
        .reservation
        .unwrap();
    let t2 = db.find_table_by_number(2).unwrap().unwrap();
    assert_eq!(second.table_id(), t2.id());
}

#[test]
fn floor_exhaustion_reports_no_table_available() {
    let dir = common::create_temp_dir().unwrap();
    let (_path, mut db) = open_test_database(&dir);
    let config = test_config();
    seed_two_tables(&mut db);

    for suffix in 1..=2 {
        let options = BookOptions::new(customer(suffix), future_date(), dinner_time(), party(2));
        let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();
    }

    let options = BookOptions::new(customer(3), future_date(), dinner_time(), party(2));
    let err = BookPlan::new(options, &config).build_plan(&db).unwrap_err();
    assert!(matches!(err, Error::NoTableAvailable { party_size: 2, .. }));
}

#[test]
fn repeat_booker_keeps_one_customer_record() {
    let dir = common::create_temp_dir().unwrap();
    let (_path, mut db) = open_test_database(&dir);
    let config = test_config();
    seed_two_tables(&mut db);

    let options = BookOptions::new(customer(1), future_date(), dinner_time(), party(2));
    let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
    let first = PlanExecutor::new(&mut db).execute(&plan).unwrap();

    // Same phone, different name: same record, unchanged
    let renamed =
        tavola::CustomerDetails::new("Augusta", "King", "0400 000 001", None).unwrap();
    let later = future_date() + chrono::Duration::days(1);
    let options = BookOptions::new(renamed, later, dinner_time(), party(2));
    let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
    let second = PlanExecutor::new(&mut db).execute(&plan).unwrap();

    let first_customer = first.customer.unwrap();
    let second_customer = second.customer.unwrap();
    assert_eq!(first_customer.id(), second_customer.id());
    assert_eq!(second_customer.first_name(), "Ada");
}

#[test]
fn cancelled_slot_can_be_rebooked_end_to_end() {
    let dir = common::create_temp_dir().unwrap();
    let (_path, mut db) = open_test_database(&dir);
    let config = test_config();
    seed_two_tables(&mut db);

    // Fill both tables at the slot
    let mut reservations = Vec::new();
    for suffix in 1..=2 {
        let options = BookOptions::new(customer(suffix), future_date(), dinner_time(), party(2));
        let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
        reservations.push(
            PlanExecutor::new(&mut db)
                .execute(&plan)
                .unwrap()
                .reservation
                .unwrap(),
        );
    }

    // Cancel the first; its slot opens up again
    let plan = TransitionPlan::new(TransitionOptions::new(
        reservations[0].id(),
        StatusTransition::Cancel,
    ))
    .build_plan(&db)
    .unwrap();
    PlanExecutor::new(&mut db).execute(&plan).unwrap();

    let options = BookOptions::new(customer(3), future_date(), dinner_time(), party(2));
    let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
    let rebooked = PlanExecutor::new(&mut db)
        .execute(&plan)
        .unwrap()
        .reservation
        .unwrap();
    assert_eq!(rebooked.slot(), reservations[0].slot());
    assert_eq!(rebooked.status(), ReservationStatus::Pending);
}

#[test]
fn lifecycle_walk_through_staff_actions() {
    let dir = common::create_temp_dir().unwrap();
    let (_path, mut db) = open_test_database(&dir);
    let config = test_config();
    seed_two_tables(&mut db);

    let options = BookOptions::new(customer(1), future_date(), dinner_time(), party(2));
    let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
    let reservation = PlanExecutor::new(&mut db)
        .execute(&plan)
        .unwrap()
        .reservation
        .unwrap();

    for (transition, expected) in [
        (StatusTransition::Confirm, ReservationStatus::Confirmed),
        (StatusTransition::Complete, ReservationStatus::Completed),
    ] {
        let plan = TransitionPlan::new(TransitionOptions::new(reservation.id(), transition))
            .build_plan(&db)
            .unwrap();
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert_eq!(result.reservation.unwrap().status(), expected);
    }

    // Completed is terminal: every further transition is rejected
    for transition in [
        StatusTransition::Confirm,
        StatusTransition::Cancel,
        StatusTransition::Complete,
    ] {
        let err = TransitionPlan::new(TransitionOptions::new(reservation.id(), transition))
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }
}

#[test]
fn completed_reservation_frees_slot() {
    let dir = common::create_temp_dir().unwrap();
    let (_path, mut db) = open_test_database(&dir);
    let config = test_config();
    seed_two_tables(&mut db);

    let options = BookOptions::new(customer(1), future_date(), dinner_time(), party(2));
    let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
    let reservation = PlanExecutor::new(&mut db)
        .execute(&plan)
        .unwrap()
        .reservation
        .unwrap();

    for transition in [StatusTransition::Confirm, StatusTransition::Complete] {
        let plan = TransitionPlan::new(TransitionOptions::new(reservation.id(), transition))
            .build_plan(&db)
            .unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();
    }

    // A completed seating no longer occupies the slot
    let candidates = find_available_tables(&db, future_date(), dinner_time(), party(2)).unwrap();
    assert_eq!(candidates.len(), 2);
}
