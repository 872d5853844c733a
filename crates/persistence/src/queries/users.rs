// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::data_models::UserData;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Hash checked when a login names no registered user.
///
/// Computed once at the same cost as stored hashes, so an unknown email
/// costs one full bcrypt verification like a wrong password does.
static ABSENT_USER_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    bcrypt::hash("absent user", bcrypt::DEFAULT_COST)
        .map_err(|e| warn!(error = %e, "Failed to prepare absent-user hash"))
        .ok()
});

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// Retrieves a user by email.
///
/// The email is normalized to lowercase for case-insensitive lookup.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserData>, PersistenceError> {
    let normalized_email: String = email.trim().to_lowercase();

    debug!("Looking up user by email: {}", normalized_email);

    let row: Option<UserRow> = users::table
        .filter(users::email.eq(&normalized_email))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(UserData::from))
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let row: Option<UserRow> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(UserData::from))
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the stored hash is not a valid bcrypt hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}

/// Runs one bcrypt verification against a hash no user owns.
///
/// The outcome is discarded; a login without a matching user always fails.
pub fn verify_absent_user_password(password: &str) {
    let Some(hash) = ABSENT_USER_HASH.as_deref() else {
        return;
    };
    if let Err(e) = bcrypt::verify(password, hash) {
        warn!(error = %e, "Absent-user password check failed");
    }
}

/// Returns the hash used by [`verify_absent_user_password`].
#[cfg(test)]
pub fn absent_user_hash() -> Option<&'static str> {
    ABSENT_USER_HASH.as_deref()
}
