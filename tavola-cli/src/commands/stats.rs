//! Stats command implementation.
//!
//! Shows floor availability and booking volume for a service date.

use clap::Args;

use crate::error::CliError;
use crate::utils::{open_database, parse_date, print_json, GlobalOptions};

/// Show availability and booking volume for a day.
#[derive(Args)]
pub struct StatsCommand {
    /// Service date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    /// Execute the stats command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = match &self.date {
            Some(s) => parse_date(s)?,
            None => chrono::Local::now().date_naive(),
        };

        let db = open_database(global)?;
        let stats = db.restaurant_stats(date)?;

        if self.json {
            print_json(&stats)?;
            return Ok(());
        }

        if !global.quiet {
            println!("Stats for {}", stats.date);
            println!(
                "  available tables: {} ({} seats)",
                stats.available_tables, stats.total_capacity
            );
            println!("  reservations:     {}", stats.day_reservations);
            println!(
                "  reserved seats:   {} ({:.1}% occupancy)",
                stats.reserved_capacity, stats.occupancy_rate
            );
        }
        Ok(())
    }
}
