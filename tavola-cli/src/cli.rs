//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive
//! macros, including global options and subcommands.

use crate::commands::{
    AvailableCommand, BookCommand, CancelCommand, CompleteCommand, ConfirmCommand, InitCommand,
    ListCommand, StatsCommand, TableCommand, UserAddCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for managing restaurant table reservations.
#[derive(Parser)]
#[command(name = "tavola")]
#[command(version, about = "Manage restaurant table reservations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "TAVOLA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "TAVOLA_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Path to the restaurant configuration file
    #[arg(long, value_name = "PATH", global = true, env = "TAVOLA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the database, optionally seeding a sample floor
    Init(InitCommand),

    /// Book a table
    Book(BookCommand),

    /// Show tables free for a slot
    Available(AvailableCommand),

    /// Confirm a pending reservation
    Confirm(ConfirmCommand),

    /// Cancel a pending or confirmed reservation
    Cancel(CancelCommand),

    /// Mark a confirmed reservation as completed
    Complete(CompleteCommand),

    /// Search reservations
    List(ListCommand),

    /// Manage the floor inventory
    Table(TableCommand),

    /// Show availability and booking volume for a day
    Stats(StatsCommand),

    /// Create a staff or admin account
    #[command(name = "user-add")]
    UserAdd(UserAddCommand),
}
