// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the guide booking marketplace.
//!
//! This crate stores users, sessions, guides and bookings in `SQLite` via
//! Diesel and implements the `BookingStore` port of the booking core.
//!
//! ## Booking Uniqueness
//!
//! The `bookings` table carries a partial unique index:
//!
//! ```sql
//! CREATE UNIQUE INDEX idx_bookings_active_slot
//!     ON bookings (guide_id, slot_unix_nanos)
//!     WHERE status <> 'cancelled';
//! ```
//!
//! A reservation is one `INSERT`. When two connections race for the same
//! slot, `SQLite` serializes the writers and the loser receives a unique
//! constraint violation, reported as `StoreError::ActiveSlotTaken`.
//!
//! ## Connections
//!
//! A `Persistence` owns exactly one connection. Servers keep one adapter
//! open for the process lifetime (created with [`Persistence::open`], which
//! runs migrations) and open a short-lived adapter per request with
//! [`Persistence::connect`] using the same [`ConnectionSettings`].
//! Every connection sets `busy_timeout`; a statement still blocked after it
//! fails with `PersistenceError::Contention`.
//! Shared-cache in-memory databases report table locks without waiting, so
//! each operation is repeated on those locks until the same timeout.
//!
//! ## Testing Philosophy
//!
//! - Standard tests run against uniquely named shared in-memory databases
//! - Multi-connection races run against a file database in the system
//!   temp directory

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use guide_book_domain::{GuideId, NewUser};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;
mod timestamps;

#[cfg(test)]
mod tests;

pub use data_models::{GuideSeed, SessionData, UserData};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Default `SQLite` busy timeout.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// How to open a connection to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// `SQLite` URL or file path.
    pub url: String,
    /// How long a statement waits on a locked database.
    pub busy_timeout: Duration,
    /// Whether to switch the database to WAL journaling on open.
    pub wal: bool,
}

impl ConnectionSettings {
    /// Settings for a uniquely named, shared-cache in-memory database.
    ///
    /// The database lives as long as at least one connection to it is open.
    #[must_use]
    pub fn unique_in_memory() -> Self {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self {
            url: format!("file:memdb_{db_id}?mode=memory&cache=shared"),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            wal: false,
        }
    }

    /// Settings for a file database, journaled in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let url: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;
        Ok(Self {
            url: url.to_string(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            wal: true,
        })
    }

    /// Replaces the busy timeout.
    #[must_use]
    pub const fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

/// Persistence adapter for users, sessions, guides and bookings.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    settings: ConnectionSettings,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        Self::open(ConnectionSettings::unique_in_memory())
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        Self::open(ConnectionSettings::file(path)?)
    }

    /// Opens the database, applies migrations and verifies foreign keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(settings: ConnectionSettings) -> Result<Self, PersistenceError> {
        let conn: SqliteConnection = backend::sqlite::initialize_database(&settings)?;
        Ok(Self { conn, settings })
    }

    /// Opens an additional connection to an already initialized database.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Contention` if the database stayed locked
    /// past the busy timeout, another error if it cannot be opened.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self, PersistenceError> {
        let conn: SqliteConnection = backend::sqlite::open_connection(settings)?;
        Ok(Self {
            conn,
            settings: settings.clone(),
        })
    }

    /// The settings this adapter was opened with.
    #[must_use]
    pub const fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Runs one repeatable unit of database work on this connection.
    ///
    /// Shared-cache table locks are retried until the busy timeout elapses.
    pub(crate) fn with_conn<T, F>(&mut self, operation: F) -> Result<T, PersistenceError>
    where
        F: FnMut(&mut SqliteConnection) -> Result<T, PersistenceError>,
    {
        backend::sqlite::retry_on_table_lock(&mut self.conn, self.settings.busy_timeout, operation)
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Registers a user with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateEmail` if the email is taken.
    pub fn create_user(
        &mut self,
        new_user: &NewUser,
        password: &str,
    ) -> Result<UserData, PersistenceError> {
        self.with_conn(|conn| mutations::users::create_user(conn, new_user, password))
    }

    /// Looks up a user by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<UserData>, PersistenceError> {
        self.with_conn(|conn| queries::users::get_user_by_email(conn, email))
    }

    /// Looks up a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        self.with_conn(|conn| queries::users::get_user_by_id(conn, user_id))
    }

    /// Checks a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored hash is malformed.
    pub fn verify_password(
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::users::verify_password(password, password_hash)
    }

    /// Does the work of a password check for a login that matched no user.
    ///
    /// The result is always a failed login, so nothing is returned.
    pub fn verify_absent_user_password(password: &str) {
        queries::users::verify_absent_user_password(password);
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Stores a session token for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        self.with_conn(|conn| {
            mutations::sessions::create_session(conn, session_token, user_id, expires_at)
        })
    }

    /// Looks up a session by token without checking expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        self.with_conn(|conn| queries::sessions::get_session_by_token(conn, session_token))
    }

    /// Deletes a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        self.with_conn(|conn| mutations::sessions::delete_session(conn, session_token))
    }

    /// Deletes sessions that expired before `now`, returning how many.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        self.with_conn(|conn| mutations::sessions::delete_expired_sessions(conn, now))
    }

    // ========================================================================
    // Guides
    // ========================================================================

    /// Inserts a guide.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_guide(&mut self, seed: &GuideSeed) -> Result<GuideId, PersistenceError> {
        self.with_conn(|conn| mutations::guides::insert_guide(conn, seed))
    }

    /// Inserts a fixture of guides atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub fn import_guides(
        &mut self,
        seeds: &[GuideSeed],
    ) -> Result<Vec<GuideId>, PersistenceError> {
        self.with_conn(|conn| mutations::guides::import_guides(conn, seeds))
    }
}
