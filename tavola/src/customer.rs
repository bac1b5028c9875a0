//! Customer types for the booking registry.
//!
//! Customers are deduplicated by phone number: the registry is an
//! idempotent get-or-create keyed on the phone, and a repeat booking with
//! a known phone returns the existing record unchanged even when the name
//! fields differ.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;

/// A unique identifier for a customer, assigned by the storage layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CustomerId(i64);

impl CustomerId {
    /// Creates a customer id from a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated customer details, as supplied with a booking request.
///
/// All fields are trimmed; first name, last name, and phone must be
/// non-empty. The email is optional, and an empty string is treated as
/// absent.
///
/// # Examples
///
/// ```
/// use tavola::CustomerDetails;
///
/// let details = CustomerDetails::new("Ada", "Lovelace", "+61 400 000 001", None).unwrap();
/// assert_eq!(details.phone(), "+61 400 000 001");
///
/// // Invalid: empty phone
/// assert!(CustomerDetails::new("Ada", "Lovelace", "  ", None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    first_name: String,
    last_name: String,
    phone: String,
    email: Option<String>,
}

impl CustomerDetails {
    /// Creates validated customer details.
    ///
    /// # Errors
    ///
    /// Returns an error if the first name, last name, or phone is empty
    /// after trimming whitespace.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        email: Option<String>,
    ) -> Result<Self, ValidationError> {
        let first_name = required_field("first_name", first_name.into())?;
        let last_name = required_field("last_name", last_name.into())?;
        let phone = required_field("phone", phone.into())?;
        let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());

        Ok(Self {
            first_name,
            last_name,
            phone,
            email,
        })
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the phone number, the registry's natural key.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the email, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

fn required_field(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: field.into(),
            message: format!("{field} must be non-empty after trimming whitespace"),
        });
    }
    Ok(trimmed.to_string())
}

/// A stored customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    first_name: String,
    last_name: String,
    phone: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    /// Assembles a customer from stored parts.
    pub(crate) fn from_parts(
        id: CustomerId,
        first_name: String,
        last_name: String,
        phone: String,
        email: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            phone,
            email,
            created_at,
            updated_at,
        }
    }

    /// Returns the customer id.
    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the customer's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the email, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_trimming() {
        let details =
            CustomerDetails::new("  Ada ", " Lovelace ", " 0400 000 001 ", None).unwrap();
        assert_eq!(details.first_name(), "Ada");
        assert_eq!(details.last_name(), "Lovelace");
        assert_eq!(details.phone(), "0400 000 001");
        assert_eq!(details.email(), None);
    }

    #[test]
    fn test_details_empty_first_name() {
        let err = CustomerDetails::new("", "Lovelace", "0400", None).unwrap_err();
        assert_eq!(err.field, "first_name");
    }

    #[test]
    fn test_details_empty_last_name() {
        let err = CustomerDetails::new("Ada", "   ", "0400", None).unwrap_err();
        assert_eq!(err.field, "last_name");
    }

    #[test]
    fn test_details_empty_phone() {
        let err = CustomerDetails::new("Ada", "Lovelace", "", None).unwrap_err();
        assert_eq!(err.field, "phone");
    }

    #[test]
    fn test_details_blank_email_becomes_none() {
        let details =
            CustomerDetails::new("Ada", "Lovelace", "0400", Some("  ".to_string())).unwrap();
        assert_eq!(details.email(), None);
    }

    #[test]
    fn test_details_email_trimmed() {
        let details = CustomerDetails::new(
            "Ada",
            "Lovelace",
            "0400",
            Some(" ada@example.com ".to_string()),
        )
        .unwrap();
        assert_eq!(details.email(), Some("ada@example.com"));
    }

    #[test]
    fn test_full_name() {
        let customer = Customer::from_parts(
            CustomerId::new(1),
            "Ada".to_string(),
            "Lovelace".to_string(),
            "0400".to_string(),
            None,
            Utc::now(),
            Utc::now(),
        );
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }
}
