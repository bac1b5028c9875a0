//! Table inventory operation planning (add, update, remove).
//!
//! Planning performs the friendly, advisory checks (does the number
//! clash, does the table still carry active reservations); the storage
//! layer re-enforces both at execution time, inside the transaction
//! that applies the change.

use crate::database::Database;
use crate::error::{Error, Result};
use crate::table::{TableChanges, TableId, TableSpec};

use super::plan::{OperationPlan, PlanAction};

/// Options for adding a table to the floor.
#[derive(Debug, Clone)]
pub struct AddTableOptions {
    /// The validated table specification.
    pub spec: TableSpec,
}

impl AddTableOptions {
    /// Creates add-table options.
    #[must_use]
    pub const fn new(spec: TableSpec) -> Self {
        Self { spec }
    }
}

/// A plan generator for adding a table.
pub struct AddTablePlan {
    options: AddTableOptions,
}

impl AddTablePlan {
    /// Creates a new add-table plan.
    #[must_use]
    pub const fn new(options: AddTableOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for adding the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableNumberInUse`] if the floor number is
    /// already taken (also re-checked by the UNIQUE constraint at
    /// execution time).
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let number = self.options.spec.table_number();
        if db.find_table_by_number(number)?.is_some() {
            return Err(Error::TableNumberInUse {
                table_number: number,
            });
        }

        let plan = OperationPlan::new(format!("Add table {number} to the floor"))
            .add_action(PlanAction::CreateTable(self.options.spec.clone()));
        Ok(plan)
    }
}

/// Options for updating a table.
#[derive(Debug, Clone)]
pub struct UpdateTableOptions {
    /// The table to change.
    pub table_id: TableId,
    /// The fields to change.
    pub changes: TableChanges,
}

impl UpdateTableOptions {
    /// Creates update-table options.
    #[must_use]
    pub const fn new(table_id: TableId, changes: TableChanges) -> Self {
        Self { table_id, changes }
    }
}

/// A plan generator for updating a table.
pub struct UpdateTablePlan {
    options: UpdateTableOptions,
}

impl UpdateTablePlan {
    /// Creates a new update-table plan.
    #[must_use]
    pub const fn new(options: UpdateTableOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for the update.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty change set,
    /// [`Error::NotFound`] if the table does not exist, and
    /// [`Error::TableNumberInUse`] if the new number is taken.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        if self.options.changes.is_empty() {
            return Err(Error::Validation {
                field: "changes".into(),
                message: "no changes requested".into(),
            });
        }

        let id = self.options.table_id;
        if db.get_table(id)?.is_none() {
            return Err(Error::NotFound {
                resource: format!("table {id}"),
            });
        }

        if let Some(number) = self.options.changes.table_number {
            if let Some(existing) = db.find_table_by_number(number)? {
                if existing.id() != id {
                    return Err(Error::TableNumberInUse {
                        table_number: number,
                    });
                }
            }
        }

        let plan = OperationPlan::new(format!("Update table {id}")).add_action(
            PlanAction::UpdateTable {
                table_id: id,
                changes: self.options.changes.clone(),
            },
        );
        Ok(plan)
    }
}

/// Options for removing a table from the floor.
#[derive(Debug, Clone, Copy)]
pub struct RemoveTableOptions {
    /// The table to remove.
    pub table_id: TableId,
}

impl RemoveTableOptions {
    /// Creates remove-table options.
    #[must_use]
    pub const fn new(table_id: TableId) -> Self {
        Self { table_id }
    }
}

/// A plan generator for removing a table.
pub struct RemoveTablePlan {
    options: RemoveTableOptions,
}

impl RemoveTablePlan {
    /// Creates a new remove-table plan.
    #[must_use]
    pub const fn new(options: RemoveTableOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for the removal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the table does not exist and
    /// [`Error::TableHasActiveReservations`] while pending or confirmed
    /// reservations still reference it (re-checked inside the delete
    /// transaction).
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let id = self.options.table_id;
        if db.get_table(id)?.is_none() {
            return Err(Error::NotFound {
                resource: format!("table {id}"),
            });
        }

        if db.count_active_reservations_for_table(id)? > 0 {
            return Err(Error::TableHasActiveReservations { table_id: id });
        }

        let plan = OperationPlan::new(format!("Remove table {id} from the floor"))
            .add_action(PlanAction::DeleteTable(id));
        Ok(plan)
    }
}
