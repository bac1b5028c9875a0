//! Book command implementation.
//!
//! Books a table through the plan-execute flow. When the claim loses a
//! slot race to a concurrent booking, the command re-plans (the taken
//! table is no longer offered) up to a bounded number of attempts.

use clap::Args;
use tavola::{BookOptions, BookPlan, CustomerDetails, Error, PartySize, PlanExecutor};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_date, parse_time, print_json, GlobalOptions};

/// Book a table.
#[derive(Args)]
pub struct BookCommand {
    /// Customer first name
    #[arg(long, value_name = "NAME")]
    pub first_name: String,

    /// Customer last name
    #[arg(long, value_name = "NAME")]
    pub last_name: String,

    /// Customer phone number (the registry's natural key)
    #[arg(long, value_name = "PHONE")]
    pub phone: String,

    /// Customer email
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Reservation date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Reservation time (HH:MM)
    #[arg(long, value_name = "TIME")]
    pub time: String,

    /// Number of guests
    #[arg(long, value_name = "COUNT")]
    pub party_size: u32,

    /// Special requests
    #[arg(long, value_name = "TEXT")]
    pub requests: Option<String>,

    /// Request a specific table by floor number
    #[arg(long, value_name = "NUMBER")]
    pub table: Option<u32>,

    /// Allow dates in the past
    #[arg(long)]
    pub allow_past_dates: bool,

    /// Skip the service-hours and slot-grid checks
    #[arg(long)]
    pub ignore_hours: bool,

    /// Number of times to re-plan after losing a slot race
    #[arg(long, value_name = "COUNT", default_value_t = 3)]
    pub max_retries: u32,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let time = parse_time(&self.time)?;
        let party_size = PartySize::try_from(self.party_size)
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        let customer = CustomerDetails::new(
            self.first_name.clone(),
            self.last_name.clone(),
            self.phone.clone(),
            self.email.clone(),
        )
        .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let config = load_configuration(global)?;
        let mut db = open_database(global)?;

        let mut attempts = 0;
        let result = loop {
            let options = BookOptions::new(customer.clone(), date, time, party_size)
                .with_special_requests(self.requests.clone())
                .with_table_number(self.table)
                .with_allow_past_dates(self.allow_past_dates)
                .with_ignore_hours(self.ignore_hours);

            let plan = BookPlan::new(options, &config).build_plan(&db)?;

            let mut executor = PlanExecutor::new(&mut db);
            if self.dry_run {
                executor = executor.dry_run();
            }
            match executor.execute(&plan) {
                Ok(result) => break result,
                Err(Error::SlotConflict { .. }) if attempts < self.max_retries => {
                    // Lost the race for that table; the next plan
                    // no longer offers it
                    attempts += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        if result.dry_run {
            if !global.quiet {
                for action in &result.actions_taken {
                    println!("[dry-run] {action}");
                }
            }
            return Ok(());
        }

        let reservation = result
            .reservation
            .expect("successful booking returns a reservation");

        if self.json {
            print_json(&reservation)?;
        } else if !global.quiet {
            let table = db
                .get_table(reservation.table_id())?
                .map_or_else(|| reservation.table_id().to_string(), |t| t.table_number().to_string());
            println!(
                "Booked reservation {}: table {} on {} at {} for {} guests ({})",
                reservation.id(),
                table,
                reservation.date(),
                reservation.time().format("%H:%M"),
                reservation.party_size(),
                reservation.status()
            );
        }
        Ok(())
    }
}
