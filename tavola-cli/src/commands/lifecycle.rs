//! Lifecycle commands: confirm, cancel, complete.
//!
//! Each command plans and executes a single status transition; a
//! transition attempted from a non-qualifying status fails with exit
//! code 1 and changes nothing.

use clap::Args;
use tavola::{PlanExecutor, ReservationId, StatusTransition, TransitionOptions, TransitionPlan};

use crate::error::CliError;
use crate::utils::{open_database, print_json, GlobalOptions};

fn run_transition(
    global: &GlobalOptions,
    id: i64,
    transition: StatusTransition,
    json: bool,
) -> Result<(), CliError> {
    let mut db = open_database(global)?;

    let options = TransitionOptions::new(ReservationId::new(id), transition);
    let plan = TransitionPlan::new(options).build_plan(&db)?;
    let result = PlanExecutor::new(&mut db).execute(&plan)?;

    let reservation = result
        .reservation
        .expect("transition returns the updated reservation");

    if json {
        print_json(&reservation)?;
    } else if !global.quiet {
        println!(
            "Reservation {} is now {}",
            reservation.id(),
            reservation.status()
        );
    }
    Ok(())
}

/// Confirm a pending reservation.
#[derive(Args)]
pub struct ConfirmCommand {
    /// Reservation id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ConfirmCommand {
    /// Execute the confirm command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        run_transition(global, self.id, StatusTransition::Confirm, self.json)
    }
}

/// Cancel a pending or confirmed reservation.
#[derive(Args)]
pub struct CancelCommand {
    /// Reservation id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        run_transition(global, self.id, StatusTransition::Cancel, self.json)
    }
}

/// Mark a confirmed reservation as completed.
#[derive(Args)]
pub struct CompleteCommand {
    /// Reservation id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CompleteCommand {
    /// Execute the complete command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        run_transition(global, self.id, StatusTransition::Complete, self.json)
    }
}
