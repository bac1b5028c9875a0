//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, and constants
//! for the tavola reservation system.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
///
/// The metadata table stores key-value pairs for database configuration
/// and versioning information.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the customers table.
///
/// The phone number is the registry's natural key and carries a UNIQUE
/// constraint so that concurrent get-or-create calls cannot produce
/// duplicate customers.
pub const CREATE_CUSTOMERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS customers (
        customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        phone TEXT NOT NULL UNIQUE,
        email TEXT UNIQUE,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the tables table (dining tables).
pub const CREATE_TABLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS tables (
        table_id INTEGER PRIMARY KEY AUTOINCREMENT,
        table_number INTEGER NOT NULL UNIQUE,
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        status TEXT NOT NULL DEFAULT 'available'
            CHECK (status IN ('available', 'reserved', 'maintenance')),
        location TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the reservations table.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        reservation_id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id INTEGER NOT NULL
            REFERENCES customers(customer_id) ON DELETE CASCADE,
        table_id INTEGER NOT NULL
            REFERENCES tables(table_id) ON DELETE CASCADE,
        reservation_date TEXT NOT NULL,
        reservation_time TEXT NOT NULL,
        party_size INTEGER NOT NULL CHECK (party_size > 0),
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'confirmed', 'cancelled', 'completed')),
        special_requests TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the unique index over active slots.
///
/// This partial index is the authoritative no-double-booking guard: at
/// most one pending or confirmed reservation may exist per
/// (table, date, time) triple. Cancelled and completed rows fall out of
/// the index, which is what frees a slot for rebooking.
pub const CREATE_ACTIVE_SLOT_INDEX: &str = r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_reservations_active_slot
    ON reservations(table_id, reservation_date, reservation_time)
    WHERE status IN ('pending', 'confirmed')";

/// SQL statement to create an index on the reservation date.
///
/// This index speeds up day listings and the stats queries.
pub const CREATE_RESERVATION_DATE_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_date
    ON reservations(reservation_date)";

/// SQL statement to create an index on the reserving customer.
pub const CREATE_RESERVATION_CUSTOMER_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_customer
    ON reservations(customer_id)";

/// SQL statement to create the users table (staff/admin accounts).
pub const CREATE_USERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'customer'
            CHECK (role IN ('admin', 'staff', 'customer')),
        email TEXT UNIQUE,
        created_at INTEGER NOT NULL,
        last_login INTEGER
    )";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
