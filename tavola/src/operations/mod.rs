//! Booking and inventory operations using the plan-execute pattern.
//!
//! This module provides a plan-execute pattern for reservation and
//! table-inventory operations, separating planning from execution to
//! enable dry-run mode, better testing, and clear error messages.
//!
//! # Architecture
//!
//! Operations are split into two phases:
//! 1. **Planning**: Analyzes the request, validates constraints, picks
//!    the table, builds a plan
//! 2. **Execution**: Takes the plan and performs the actual storage
//!    transactions
//!
//! Planning never trusts its own snapshot for correctness: the slot
//! claim and the lifecycle status guards are re-checked by the storage
//! layer when the plan executes.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::{NaiveDate, NaiveTime};
//! use tavola::config::ConfigBuilder;
//! use tavola::database::{Database, DatabaseConfig};
//! use tavola::operations::{BookOptions, BookPlan, PlanExecutor};
//! use tavola::{CustomerDetails, PartySize};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/tavola.db")).unwrap();
//! let config = ConfigBuilder::new().build().unwrap();
//!
//! let customer = CustomerDetails::new("Ada", "Lovelace", "0400 000 001", None).unwrap();
//! let options = BookOptions::new(
//!     customer,
//!     NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
//!     NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
//!     PartySize::try_from(2).unwrap(),
//! );
//!
//! // Generate plan
//! let plan = BookPlan::new(options, &config).build_plan(&db).unwrap();
//!
//! // Execute plan
//! let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
//! println!("booked: {:?}", result.reservation);
//! ```

pub mod book;
pub mod executor;
pub mod init;
pub mod lifecycle;
pub mod plan;
pub mod tables;

#[cfg(test)]
mod proptests;

pub use book::{BookOptions, BookPlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult};
pub use lifecycle::{TransitionOptions, TransitionPlan};
pub use plan::{OperationPlan, PlanAction};
pub use tables::{
    AddTableOptions, AddTablePlan, RemoveTableOptions, RemoveTablePlan, UpdateTableOptions,
    UpdateTablePlan,
};
