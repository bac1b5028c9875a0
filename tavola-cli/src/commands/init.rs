//! Init command implementation.
//!
//! Initializes the database and optionally seeds the sample floor plan
//! and an admin account, so a fresh deployment is usable immediately.

use clap::Args;
use tavola::operations::{init_database, InitOptions};
use tavola::{NewUser, Role};

use crate::error::CliError;
use crate::utils::{database_config, GlobalOptions};

/// Initialize the database.
#[derive(Args)]
pub struct InitCommand {
    /// Seed a sample floor plan when the floor is empty
    #[arg(long)]
    pub seed: bool,

    /// Username for the admin account created with --admin-password
    #[arg(long, value_name = "NAME", default_value = "admin")]
    pub admin_user: String,

    /// Create an admin account with this password
    #[arg(long, value_name = "PASSWORD")]
    pub admin_password: Option<String>,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let admin = match self.admin_password {
            Some(password) => Some(
                NewUser::new(self.admin_user, password, Role::Admin, None)
                    .map_err(|e| CliError::InvalidArguments(e.to_string()))?,
            ),
            None => None,
        };

        let options = InitOptions::new()
            .with_seed_floor(self.seed)
            .with_admin(admin);
        let result = init_database(database_config(global)?, &options)?;

        if !global.quiet {
            if result.created {
                println!("Initialized database at {}", result.database_path.display());
            } else {
                println!(
                    "Database already present at {}",
                    result.database_path.display()
                );
            }
            if result.seeded_tables > 0 {
                println!("Seeded {} tables", result.seeded_tables);
            }
            if result.admin_created {
                println!("Created admin account");
            }
        }
        Ok(())
    }
}
