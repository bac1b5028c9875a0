//! Main entry point for the tavola CLI.
//!
//! This is the command-line interface for the tavola reservation system.
//! It provides commands for booking tables and managing reservations:
//! - `init`: Initialize (and optionally seed) the database
//! - `book`: Book a table
//! - `available`: Show tables free for a slot
//! - `confirm` / `cancel` / `complete`: Reservation lifecycle
//! - `list`: Search reservations
//! - `table`: Manage the floor inventory
//! - `stats`: Show availability and booking volume
//! - `user-add`: Create a staff or admin account

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = tavola::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        config_file: cli.config,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Book(cmd) => cmd.execute(&global),
        cli::Command::Available(cmd) => cmd.execute(&global),
        cli::Command::Confirm(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::Complete(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Table(cmd) => cmd.execute(&global),
        cli::Command::Stats(cmd) => cmd.execute(&global),
        cli::Command::UserAdd(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
