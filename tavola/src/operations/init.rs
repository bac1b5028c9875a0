//! Database initialization and sample-floor seeding.
//!
//! A fresh deployment gets its schema from the normal open path; this
//! operation additionally seeds a small sample floor plan and an admin
//! account so the system is usable immediately after setup.

use std::path::PathBuf;

use crate::database::{Database, DatabaseConfig};
use crate::error::Result;
use crate::table::TableSpec;
use crate::user::NewUser;

/// The sample floor seeded by `init`: (number, capacity, location).
const SAMPLE_FLOOR: &[(u32, u32, &str)] = &[
    (1, 2, "Window"),
    (2, 2, "Window"),
    (3, 4, "Main dining"),
    (4, 4, "Main dining"),
    (5, 4, "Main dining"),
    (6, 6, "Main dining"),
    (7, 6, "Patio"),
    (8, 8, "Private room"),
    (9, 2, "Bar"),
    (10, 4, "Patio"),
];

/// Options for database initialization.
#[derive(Debug, Default)]
pub struct InitOptions {
    /// Seed the sample floor plan when the floor is empty.
    pub seed_floor: bool,

    /// Create this admin account when the username is free.
    pub admin: Option<NewUser>,
}

impl InitOptions {
    /// Creates init options with no seeding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables sample-floor seeding.
    #[must_use]
    pub const fn with_seed_floor(mut self, seed: bool) -> Self {
        self.seed_floor = seed;
        self
    }

    /// Sets the admin account to create.
    #[must_use]
    pub fn with_admin(mut self, admin: Option<NewUser>) -> Self {
        self.admin = admin;
        self
    }
}

/// Result of database initialization.
#[derive(Debug)]
pub struct InitResult {
    /// The database file that was initialized.
    pub database_path: PathBuf,

    /// Whether the database file was newly created.
    pub created: bool,

    /// Number of sample tables seeded (0 when the floor already had
    /// tables or seeding was not requested).
    pub seeded_tables: usize,

    /// Whether the admin account was created.
    pub admin_created: bool,
}

/// Initializes (and optionally seeds) the database.
///
/// Seeding is idempotent: an already-populated floor is left untouched,
/// and an existing username is not overwritten.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a seed write
/// fails.
///
/// # Examples
///
/// ```no_run
/// use tavola::database::DatabaseConfig;
/// use tavola::operations::{init_database, InitOptions};
///
/// let config = DatabaseConfig::new("/tmp/tavola.db");
/// let result = init_database(config, &InitOptions::new().with_seed_floor(true)).unwrap();
/// println!("seeded {} tables", result.seeded_tables);
/// ```
pub fn init_database(config: DatabaseConfig, options: &InitOptions) -> Result<InitResult> {
    let database_path = config.path.clone();
    let created = !database_path.exists();

    let mut db = Database::open(config)?;

    let mut seeded_tables = 0;
    if options.seed_floor && db.list_tables()?.is_empty() {
        for &(number, capacity, location) in SAMPLE_FLOOR {
            let spec = TableSpec::new(number, capacity)?
                .with_location(Some(location.to_string()));
            db.create_table(&spec)?;
            seeded_tables += 1;
        }
    }

    let mut admin_created = false;
    if let Some(admin) = &options.admin {
        if db.find_user_by_username(admin.username())?.is_none() {
            db.create_user(admin)?;
            admin_created = true;
        }
    }

    Ok(InitResult {
        database_path,
        created,
        seeded_tables,
        admin_created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Role;
    use tempfile::tempdir;

    #[test]
    fn test_init_plain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tavola.db");

        let result = init_database(DatabaseConfig::new(&path), &InitOptions::new()).unwrap();
        assert!(result.created);
        assert_eq!(result.seeded_tables, 0);
        assert!(!result.admin_created);
        assert!(path.exists());
    }

    #[test]
    fn test_init_seeds_floor_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tavola.db");
        let options = InitOptions::new().with_seed_floor(true);

        let result = init_database(DatabaseConfig::new(&path), &options).unwrap();
        assert_eq!(result.seeded_tables, SAMPLE_FLOOR.len());

        // Second run leaves the floor alone
        let result = init_database(DatabaseConfig::new(&path), &options).unwrap();
        assert!(!result.created);
        assert_eq!(result.seeded_tables, 0);

        let db = Database::open(DatabaseConfig::new(&path)).unwrap();
        assert_eq!(db.list_tables().unwrap().len(), SAMPLE_FLOOR.len());
    }

    #[test]
    fn test_init_creates_admin_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tavola.db");
        let options = InitOptions::new()
            .with_admin(Some(NewUser::new("admin", "admin123", Role::Admin, None).unwrap()));

        let result = init_database(DatabaseConfig::new(&path), &options).unwrap();
        assert!(result.admin_created);

        let result = init_database(DatabaseConfig::new(&path), &options).unwrap();
        assert!(!result.admin_created);
    }
}
