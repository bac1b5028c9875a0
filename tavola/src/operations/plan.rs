//! Plan types for booking and inventory operations.
//!
//! This module defines the plan structures that describe what actions
//! will be taken during an operation, without actually performing them.

use chrono::{NaiveDate, NaiveTime};

use crate::customer::CustomerDetails;
use crate::reservation::{PartySize, ReservationId, StatusTransition};
use crate::table::{TableChanges, TableId, TableSpec};

/// A single action to be taken during plan execution.
///
/// Each action corresponds to a storage operation performed when the
/// plan is executed.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Resolve the customer and claim the slot, in one transaction.
    ///
    /// The customer id is not known at planning time; the registry's
    /// get-or-create runs inside the same transaction as the
    /// reservation insert, so a failed claim rolls both back.
    BookTable {
        /// The booking customer's details.
        customer: CustomerDetails,
        /// The table to claim.
        table_id: TableId,
        /// The service date.
        date: NaiveDate,
        /// The service time.
        time: NaiveTime,
        /// The party size.
        party_size: PartySize,
        /// Free-form requests attached to the booking.
        special_requests: Option<String>,
    },

    /// Apply a lifecycle transition to a reservation.
    TransitionReservation {
        /// The reservation to transition.
        reservation_id: ReservationId,
        /// The transition to apply.
        transition: StatusTransition,
    },

    /// Add a table to the floor.
    CreateTable(TableSpec),

    /// Change fields of an existing table.
    UpdateTable {
        /// The table to change.
        table_id: TableId,
        /// The fields to change; unset fields are preserved.
        changes: TableChanges,
    },

    /// Remove a table from the floor.
    DeleteTable(TableId),
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::BookTable {
                table_id,
                date,
                time,
                party_size,
                ..
            } => format!(
                "Book table {table_id} for a party of {party_size} on {date} at {}",
                time.format("%H:%M")
            ),
            Self::TransitionReservation {
                reservation_id,
                transition,
            } => format!("{} reservation {reservation_id}", capitalize(transition.verb())),
            Self::CreateTable(spec) => format!(
                "Create table {} with capacity {}",
                spec.table_number(),
                spec.capacity()
            ),
            Self::UpdateTable { table_id, .. } => format!("Update table {table_id}"),
            Self::DeleteTable(table_id) => format!("Delete table {table_id}"),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of
/// actions, and any warnings that should be communicated to the user.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use tavola::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Book a table");
    /// assert_eq!(plan.description, "Book a table");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
