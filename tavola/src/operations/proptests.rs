//! Property-based tests for operations module.
//!
//! These tests focus on boundary validation and lifecycle invariants.

use crate::config::ServiceHours;
use crate::reservation::{PartySize, ReservationStatus, StatusTransition};
use chrono::NaiveTime;
use proptest::prelude::*;

const ALL_STATUSES: [ReservationStatus; 4] = [
    ReservationStatus::Pending,
    ReservationStatus::Confirmed,
    ReservationStatus::Cancelled,
    ReservationStatus::Completed,
];

// Strategy for generating statuses
fn status_strategy() -> impl Strategy<Value = ReservationStatus> {
    prop::sample::select(ALL_STATUSES.to_vec())
}

// Strategy for generating transitions
fn transition_strategy() -> impl Strategy<Value = StatusTransition> {
    prop::sample::select(vec![
        StatusTransition::Confirm,
        StatusTransition::Cancel,
        StatusTransition::Complete,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 10000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // Party sizes accept exactly the positive integers
    #[test]
    fn party_size_accepts_exactly_positive(value in 0u32..=10_000) {
        let result = PartySize::try_from(value);
        if value == 0 {
            prop_assert!(result.is_err());
        } else {
            prop_assert_eq!(result.unwrap().value(), value);
        }
    }

    // No transition ever leaves a terminal status
    #[test]
    fn terminal_statuses_admit_no_transition(
        status in status_strategy(),
        transition in transition_strategy()
    ) {
        if status.is_terminal() {
            prop_assert!(!transition.allowed_from(status));
        }
    }

    // Every allowed transition lands on its declared target, and the
    // target of confirm/cancel/complete is never a source of itself
    #[test]
    fn transition_targets_are_not_sources(transition in transition_strategy()) {
        let target = transition.target();
        prop_assert!(!transition.allowed_from(target));
    }

    // An active status admits at least one transition; a terminal one
    // admits none
    #[test]
    fn activity_matches_transition_options(status in status_strategy()) {
        let options = [
            StatusTransition::Confirm,
            StatusTransition::Cancel,
            StatusTransition::Complete,
        ]
        .iter()
        .filter(|t| t.allowed_from(status))
        .count();

        if status.is_active() {
            prop_assert!(options > 0);
        } else {
            prop_assert_eq!(options, 0);
        }
    }

    // Times on the slot grid are exactly the multiples of the slot
    // duration after opening, within the service window
    #[test]
    fn slot_grid_is_consistent(
        opening_hour in 6u32..=12,
        window_hours in 1u32..=10,
        slot_minutes in prop::sample::select(vec![15u32, 30, 60]),
        offset_minutes in 0u32..=600,
    ) {
        let opening = NaiveTime::from_hms_opt(opening_hour, 0, 0).unwrap();
        let closing = NaiveTime::from_hms_opt(opening_hour + window_hours, 0, 0).unwrap();
        let hours = ServiceHours::new(opening, closing, slot_minutes).unwrap();

        let time = opening + chrono::Duration::minutes(i64::from(offset_minutes));
        if hours.contains(time) {
            prop_assert_eq!(
                hours.is_slot_aligned(time),
                offset_minutes % slot_minutes == 0
            );
            if offset_minutes % slot_minutes == 0 {
                prop_assert!(hours.slots().contains(&time));
            }
        }
    }
}
