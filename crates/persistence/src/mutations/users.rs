// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use guide_book_domain::NewUser;
use tracing::info;

use crate::data_models::UserData;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::queries::users::UserRow;
use crate::timestamps::now_timestamp;

/// Creates a new user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_user` - The validated registration fields
/// * `password` - The plain-text password (will be hashed)
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateEmail` if the email is already
/// registered, or another error if hashing or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    new_user: &NewUser,
    password: &str,
) -> Result<UserData, PersistenceError> {
    let email: &str = new_user.email.value();

    info!("Creating user with email: {}", email);

    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let row: UserRow = diesel::insert_into(users::table)
        .values((
            users::name.eq(&new_user.name),
            users::email.eq(email),
            users::password_hash.eq(&password_hash),
            users::created_at.eq(now_timestamp()?),
        ))
        .returning(UserRow::as_returning())
        .get_result(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::UniqueViolation(_) => {
                PersistenceError::DuplicateEmail(email.to_string())
            }
            other => other,
        })?;

    info!(user_id = row.user_id, "User created successfully");

    Ok(UserData::from(row))
}
