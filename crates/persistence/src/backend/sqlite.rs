// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific backend utilities.
//!
//! This module is limited to:
//! - Connection establishment
//! - Migration execution
//! - SQLite-specific configuration (PRAGMA statements)

use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::ConnectionSettings;
use crate::error::PersistenceError;

/// SQLite migrations embedded at compile time.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// First pause before repeating an operation rejected by a table lock.
const TABLE_LOCK_FIRST_PAUSE: Duration = Duration::from_millis(1);

/// Longest pause between repeats.
const TABLE_LOCK_MAX_PAUSE: Duration = Duration::from_millis(20);

/// Helper row struct for PRAGMA queries.
///
/// This is a justified use of raw SQL as Diesel has no PRAGMA DSL.
#[derive(QueryableByName)]
struct PragmaRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Verifies that foreign key enforcement is enabled.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    let foreign_keys_enabled: i32 = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<PragmaRow>(conn)?
        .foreign_keys;

    if foreign_keys_enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    debug!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Run pending migrations on the provided connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running SQLite database migrations");
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Opens a connection and applies the per-connection PRAGMAs.
///
/// The busy timeout is set before anything else so that every later
/// statement on this connection waits for competing writers.
///
/// # Errors
///
/// Returns an error if the connection cannot be established or configured.
pub fn open_connection(
    settings: &ConnectionSettings,
) -> Result<SqliteConnection, PersistenceError> {
    let mut conn: SqliteConnection = SqliteConnection::establish(&settings.url)?;

    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query(format!(
        "PRAGMA busy_timeout = {}",
        settings.busy_timeout.as_millis()
    ))
    .execute(&mut conn)?;
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;

    verify_foreign_key_enforcement(&mut conn)?;

    Ok(conn)
}

/// Initialize a `SQLite` database and run migrations.
///
/// # Errors
///
/// Returns an error if connection, configuration or migration fails.
pub fn initialize_database(
    settings: &ConnectionSettings,
) -> Result<SqliteConnection, PersistenceError> {
    info!("Initializing SQLite database at: {}", settings.url);

    let mut conn: SqliteConnection = open_connection(settings)?;

    if settings.wal {
        enable_wal_mode(&mut conn)?;
    }

    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Enable WAL mode for file-based `SQLite` databases.
///
/// The journal mode is stored in the database file, so enabling it once
/// covers every later connection.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(())
}

/// Runs `operation`, repeating it while a shared-cache table lock rejects it.
///
/// Connections to a shared-cache in-memory database fail with `SQLITE_LOCKED`
/// instead of waiting on `busy_timeout`. This gives them the same bounded
/// wait. The operation must be safe to repeat: one statement, or one
/// transaction that rolls back on error.
///
/// # Errors
///
/// Returns the operation's error once it is not a table lock or the busy
/// timeout has elapsed.
pub fn retry_on_table_lock<T, F>(
    conn: &mut SqliteConnection,
    busy_timeout: Duration,
    mut operation: F,
) -> Result<T, PersistenceError>
where
    F: FnMut(&mut SqliteConnection) -> Result<T, PersistenceError>,
{
    let deadline: Instant = Instant::now() + busy_timeout;
    let mut pause: Duration = TABLE_LOCK_FIRST_PAUSE;
    let mut attempts: u32 = 1;

    loop {
        match operation(conn) {
            Err(err) if err.is_table_lock() && Instant::now() < deadline => {
                thread::sleep(pause);
                pause = (pause * 2).min(TABLE_LOCK_MAX_PAUSE);
                attempts += 1;
            }
            outcome => {
                if attempts > 1 {
                    debug!(attempts, "Operation repeated after table locks");
                }
                return outcome;
            }
        }
    }
}
