// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::diesel_schema::sessions;
use crate::error::PersistenceError;
use crate::timestamps::{format_timestamp, now_timestamp};

/// Creates a new session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The opaque session token
/// * `user_id` - The owning user
/// * `expires_at` - When the session stops being valid
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    expires_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let expires_at: String = format_timestamp(expires_at)?;

    debug!(
        "Creating session for user ID: {} with expiration: {}",
        user_id, expires_at
    );

    let session_id: i64 = diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::created_at.eq(now_timestamp()?),
            sessions::expires_at.eq(&expires_at),
        ))
        .returning(sessions::session_id)
        .get_result(conn)?;

    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}

/// Deletes a session by token.
///
/// Deleting an unknown token is not an error.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}

/// Deletes every session that expired before `now`.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let now: String = format_timestamp(now)?;

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.le(&now))
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}
