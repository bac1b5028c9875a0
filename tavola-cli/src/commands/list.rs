//! List command implementation.
//!
//! Searches reservations with customer and table context, newest first.

use clap::Args;
use tavola::ReservationFilter;

use crate::error::CliError;
use crate::utils::{open_database, parse_date, print_json, GlobalOptions};

/// Search reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Restrict to a service date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Match customer name, phone, or table number
    #[arg(short = 'q', long, value_name = "TERM")]
    pub query: Option<String>,

    /// Maximum number of results
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = self.date.as_deref().map(parse_date).transpose()?;

        let mut filter = ReservationFilter::new()
            .with_date(date)
            .with_term(self.query.clone());
        if let Some(limit) = self.limit {
            filter = filter.with_limit(limit);
        }

        let db = open_database(global)?;
        let summaries = db.search_reservations(&filter)?;

        if self.json {
            print_json(&summaries)?;
            return Ok(());
        }

        if summaries.is_empty() {
            if !global.quiet {
                println!("No reservations found");
            }
            return Ok(());
        }

        for summary in &summaries {
            let r = &summary.reservation;
            println!(
                "#{} {} {} table {} party {} [{}] {} ({})",
                r.id(),
                r.date(),
                r.time().format("%H:%M"),
                summary.table_number,
                r.party_size(),
                r.status(),
                summary.customer_name,
                summary.customer_phone,
            );
        }
        Ok(())
    }
}
