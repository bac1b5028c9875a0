//! Available command implementation.
//!
//! Shows tables free for a slot, tightest fit first. The listing is a
//! snapshot for the caller's benefit; booking re-checks at commit time.

use clap::Args;
use tavola::{find_available_tables, PartySize};

use crate::error::CliError;
use crate::utils::{open_database, parse_date, parse_time, print_json, GlobalOptions};

/// Show tables free for a slot.
#[derive(Args)]
pub struct AvailableCommand {
    /// Reservation date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Reservation time (HH:MM)
    #[arg(long, value_name = "TIME")]
    pub time: String,

    /// Number of guests
    #[arg(long, value_name = "COUNT")]
    pub party_size: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AvailableCommand {
    /// Execute the available command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let time = parse_time(&self.time)?;
        let party_size = PartySize::try_from(self.party_size)
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let db = open_database(global)?;
        let tables = find_available_tables(&db, date, time, party_size)?;

        if self.json {
            print_json(&tables)?;
            return Ok(());
        }

        if tables.is_empty() {
            if !global.quiet {
                println!(
                    "No tables available for {} guests on {} at {}",
                    party_size,
                    date,
                    time.format("%H:%M")
                );
            }
            return Ok(());
        }

        for table in &tables {
            match table.location() {
                Some(location) => println!(
                    "table {} (seats {}) - {location}",
                    table.table_number(),
                    table.capacity()
                ),
                None => println!("table {} (seats {})", table.table_number(), table.capacity()),
            }
        }
        Ok(())
    }
}
