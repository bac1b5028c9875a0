//! Customer registry operations.
//!
//! The registry is an idempotent get-or-create keyed on the phone
//! number. Race safety comes from the UNIQUE constraint on the phone
//! column, not from an application-level check-then-insert: concurrent
//! requests for the same phone both attempt the insert and the storage
//! layer keeps exactly one row.

use chrono::Utc;
use rusqlite::{params, Connection, TransactionBehavior};

use crate::customer::{Customer, CustomerDetails, CustomerId};
use crate::error::Result;

use super::connection::Database;
use super::{datetime_to_unix_secs, unix_secs_to_datetime};

const INSERT_CUSTOMER: &str = r"
    INSERT INTO customers (first_name, last_name, phone, email, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?)
    ON CONFLICT(phone) DO NOTHING
";

const SELECT_CUSTOMER_BY_PHONE: &str = r"
    SELECT customer_id, first_name, last_name, phone, email, created_at, updated_at
    FROM customers
    WHERE phone = ?
";

const SELECT_CUSTOMER_BY_ID: &str = r"
    SELECT customer_id, first_name, last_name, phone, email, created_at, updated_at
    FROM customers
    WHERE customer_id = ?
";

/// Deserializes a customer from a database row.
///
/// Expects row fields in this order: `customer_id`, `first_name`,
/// `last_name`, phone, email, `created_at`, `updated_at`.
fn row_to_customer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    let id: i64 = row.get(0)?;
    let first_name: String = row.get(1)?;
    let last_name: String = row.get(2)?;
    let phone: String = row.get(3)?;
    let email: Option<String> = row.get(4)?;
    let created_secs: i64 = row.get(5)?;
    let updated_secs: i64 = row.get(6)?;

    Ok(Customer::from_parts(
        CustomerId::new(id),
        first_name,
        last_name,
        phone,
        email,
        unix_secs_to_datetime(created_secs),
        unix_secs_to_datetime(updated_secs),
    ))
}

impl Database {
    /// Looks up a customer by phone, creating one if none exists.
    ///
    /// The phone number is the deduplication key: when a customer with
    /// that phone already exists, the existing record is returned
    /// unchanged, even if the supplied name or email differ from the
    /// stored ones. Repeat bookings therefore never rewrite a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails or a storage constraint
    /// other than the phone key is violated (for instance an email
    /// belonging to a different customer).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tavola::database::{Database, DatabaseConfig};
    /// use tavola::CustomerDetails;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/tavola.db")).unwrap();
    /// let details = CustomerDetails::new("Ada", "Lovelace", "0400 000 001", None).unwrap();
    ///
    /// let first = db.get_or_create_customer(&details).unwrap();
    /// let second = db.get_or_create_customer(&details).unwrap();
    /// assert_eq!(first.id(), second.id());
    /// ```
    pub fn get_or_create_customer(&mut self, details: &CustomerDetails) -> Result<Customer> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let customer = Self::get_or_create_customer_tx(&tx, details)?;
        tx.commit()?;
        Ok(customer)
    }

    /// Get-or-create within an existing transaction.
    ///
    /// This method is intended for composing the registry into a larger
    /// transaction, such as the booking flow. Unlike
    /// [`get_or_create_customer`](Self::get_or_create_customer), it does
    /// not create its own transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert or lookup fails.
    pub(crate) fn get_or_create_customer_tx(
        conn: &Connection,
        details: &CustomerDetails,
    ) -> Result<Customer> {
        let now = datetime_to_unix_secs(Utc::now());

        conn.execute(
            INSERT_CUSTOMER,
            params![
                details.first_name(),
                details.last_name(),
                details.phone(),
                details.email(),
                now,
                now,
            ],
        )?;

        // Whether the insert took or a concurrent one won, the row for
        // this phone exists now
        let customer = conn.query_row(
            SELECT_CUSTOMER_BY_PHONE,
            params![details.phone()],
            row_to_customer,
        )?;
        Ok(customer)
    }

    /// Retrieves a customer by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(customer))` if the customer exists
    /// - `Ok(None)` if it doesn't
    /// - `Err(_)` if a database error occurs
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than
    /// "not found").
    pub fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        match self
            .conn
            .query_row(SELECT_CUSTOMER_BY_ID, params![id.value()], row_to_customer)
        {
            Ok(customer) => Ok(Some(customer)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves a customer by phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than
    /// "not found").
    pub fn find_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>> {
        match self
            .conn
            .query_row(SELECT_CUSTOMER_BY_PHONE, params![phone], row_to_customer)
        {
            Ok(customer) => Ok(Some(customer)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
