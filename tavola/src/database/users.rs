//! Staff/admin account storage operations.
//!
//! Session handling lives outside the core; this module only stores
//! accounts and answers credential checks.

use chrono::Utc;
use rusqlite::{params, TransactionBehavior};

use crate::error::{Error, Result};
use crate::user::{hash_password, NewUser, Role, User, UserId};

use super::connection::Database;
use super::{datetime_to_unix_secs, is_unique_violation, unix_secs_to_datetime};

const INSERT_USER: &str = r"
    INSERT INTO users (username, password_hash, role, email, created_at)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_USER_COLUMNS: &str = r"
    SELECT user_id, username, password_hash, role, email, created_at, last_login
    FROM users
";

const UPDATE_LAST_LOGIN: &str = r"
    UPDATE users SET last_login = ? WHERE user_id = ?
";

/// Deserializes a user from a database row.
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id: i64 = row.get(0)?;
    let username: String = row.get(1)?;
    let password_hash: String = row.get(2)?;
    let role_text: String = row.get(3)?;
    let email: Option<String> = row.get(4)?;
    let created_secs: i64 = row.get(5)?;
    let last_login_secs: Option<i64> = row.get(6)?;

    let role = Role::parse(&role_text)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    Ok(User::from_parts(
        UserId::new(id),
        username,
        password_hash,
        role,
        email,
        unix_secs_to_datetime(created_secs),
        last_login_secs.map(unix_secs_to_datetime),
    ))
}

impl Database {
    /// Creates a user account, hashing the password with argon2.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the username is already taken, a
    /// password-hash error if hashing fails, or a database error for any
    /// other storage failure.
    pub fn create_user(&mut self, new_user: &NewUser) -> Result<User> {
        let password_hash = hash_password(new_user.password())?;
        let now = datetime_to_unix_secs(Utc::now());

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = tx.execute(
            INSERT_USER,
            params![
                new_user.username(),
                password_hash,
                new_user.role().as_str(),
                new_user.email(),
                now,
            ],
        );

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::Validation {
                    field: "username".into(),
                    message: format!("username '{}' is already taken", new_user.username()),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = tx.last_insert_rowid();
        let user = tx.query_row(
            &format!("{SELECT_USER_COLUMNS} WHERE user_id = ?"),
            params![id],
            row_to_user,
        )?;
        tx.commit()?;
        Ok(user)
    }

    /// Retrieves a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than
    /// "not found").
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        match self.conn.query_row(
            &format!("{SELECT_USER_COLUMNS} WHERE username = ?"),
            params![username],
            row_to_user,
        ) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Checks credentials and records the login time on success.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(user))` when the username exists and the password
    ///   matches
    /// - `Ok(None)` for an unknown username or a wrong password; the
    ///   two are deliberately indistinguishable to callers
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub fn authenticate_user(&mut self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.find_user_by_username(username)? else {
            return Ok(None);
        };
        if !user.verify_password(password) {
            return Ok(None);
        }

        let now = Utc::now();
        self.conn.execute(
            UPDATE_LAST_LOGIN,
            params![datetime_to_unix_secs(now), user.id().value()],
        )?;

        // Re-read so the returned record carries the login we just wrote
        Ok(self
            .find_user_by_username(username)?
            .or(Some(user)))
    }
}
