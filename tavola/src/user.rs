//! Staff and admin account types.
//!
//! Users are independent of customers: they authenticate against the
//! system to manage reservations and table inventory. Passwords are
//! stored as argon2 hashes; verification never exposes the hash to
//! callers.

use std::fmt;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reservation::ValidationError;

/// A unique identifier for a user account, assigned by the storage layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user id from a raw row id.
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including table inventory management.
    Admin,
    /// Reservation management.
    Staff,
    /// A customer-facing account with no management access.
    Customer,
}

impl Role {
    /// Returns the storage representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Customer => "customer",
        }
    }

    /// Parses a role from its storage representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known role.
    pub fn parse(s: &str) -> std::result::Result<Self, ValidationError> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            _ => Err(ValidationError {
                field: "role".into(),
                message: format!("unknown role: {s}"),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated request to create a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    username: String,
    password: String,
    role: Role,
    email: Option<String>,
}

impl NewUser {
    /// Creates a validated new-user request.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is empty after trimming or the
    /// password is empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        role: Role,
        email: Option<String>,
    ) -> std::result::Result<Self, ValidationError> {
        let username = username.into().trim().to_string();
        if username.is_empty() {
            return Err(ValidationError {
                field: "username".into(),
                message: "username must be non-empty after trimming whitespace".into(),
            });
        }
        let password = password.into();
        if password.is_empty() {
            return Err(ValidationError {
                field: "password".into(),
                message: "password must be non-empty".into(),
            });
        }
        let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        Ok(Self {
            username,
            password,
            role,
            email,
        })
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the plain-text password to be hashed at creation time.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the email, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    #[serde(skip_serializing, default)]
    password_hash: String,
    role: Role,
    email: Option<String>,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Assembles a user from stored parts.
    pub(crate) fn from_parts(
        id: UserId,
        username: String,
        password_hash: String,
        role: Role,
        email: Option<String>,
        created_at: DateTime<Utc>,
        last_login: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            role,
            email,
            created_at,
            last_login,
        }
    }

    /// Returns the user id.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
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

    /// Returns the last login timestamp, if the user has ever logged in.
    #[must_use]
    pub const fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// Whether the user has admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the user has staff (or admin) access.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }

    /// Checks a plain-text password against the stored hash.
    #[must_use]
    pub fn verify_password(&self, password: &str) -> bool {
        let Ok(hash) = PasswordHash::new(&self.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    }
}

/// Hashes a plain-text password with argon2 and a fresh random salt.
///
/// # Errors
///
/// Returns [`Error::PasswordHash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(password: &str) -> User {
        User::from_parts(
            UserId::new(1),
            "admin".to_string(),
            hash_password(password).unwrap(),
            Role::Admin,
            None,
            Utc::now(),
            None,
        )
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Admin, Role::Staff, Role::Customer] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
        assert!(Role::parse("root").is_err());
    }

    #[test]
    fn test_new_user_validation() {
        assert!(NewUser::new("admin", "secret", Role::Admin, None).is_ok());
        assert!(NewUser::new("  ", "secret", Role::Admin, None).is_err());
        assert!(NewUser::new("admin", "", Role::Admin, None).is_err());
    }

    #[test]
    fn test_password_verification() {
        let user = sample_user("admin123");
        assert!(user.verify_password("admin123"));
        assert!(!user.verify_password("wrong"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("admin123").unwrap();
        let b = hash_password("admin123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_role_checks() {
        let admin = sample_user("x");
        assert!(admin.is_admin());
        assert!(admin.is_staff());

        let staff = User::from_parts(
            UserId::new(2),
            "staff".to_string(),
            hash_password("x").unwrap(),
            Role::Staff,
            None,
            Utc::now(),
            None,
        );
        assert!(!staff.is_admin());
        assert!(staff.is_staff());

        let customer = User::from_parts(
            UserId::new(3),
            "guest".to_string(),
            hash_password("x").unwrap(),
            Role::Customer,
            None,
            Utc::now(),
            None,
        );
        assert!(!customer.is_staff());
    }
}
