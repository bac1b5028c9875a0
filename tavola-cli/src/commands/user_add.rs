//! User-add command implementation.
//!
//! Creates a staff or admin account. Session handling is out of scope
//! for the CLI; accounts exist for the management surface in front of
//! the store.

use clap::Args;
use tavola::{NewUser, Role};

use crate::error::CliError;
use crate::utils::{open_database, GlobalOptions};

/// Create a staff or admin account.
#[derive(Args)]
pub struct UserAddCommand {
    /// Username
    #[arg(long, value_name = "NAME")]
    pub username: String,

    /// Password (hashed before storage)
    #[arg(long, value_name = "PASSWORD")]
    pub password: String,

    /// Role: admin, staff, or customer
    #[arg(long, value_name = "ROLE", default_value = "staff")]
    pub role: String,

    /// Email
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,
}

impl UserAddCommand {
    /// Execute the user-add command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let role =
            Role::parse(&self.role).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        let new_user = NewUser::new(self.username, self.password, role, self.email)
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let mut db = open_database(global)?;
        let user = db.create_user(&new_user)?;

        if !global.quiet {
            println!("Created {} account '{}'", user.role(), user.username());
        }
        Ok(())
    }
}
