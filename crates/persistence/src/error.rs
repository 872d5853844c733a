// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use guide_book::StoreError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A uniqueness constraint rejected the statement.
    UniqueViolation(String),
    /// A foreign key constraint rejected the statement.
    ForeignKeyViolation(String),
    /// The database stayed locked or busy past the busy timeout.
    Contention(String),
    /// Another user already registered this email address.
    DuplicateEmail(String),
    /// A stored value could not be turned back into a domain value.
    CorruptRow(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::UniqueViolation(msg) => write!(f, "Unique constraint violated: {msg}"),
            Self::ForeignKeyViolation(msg) => write!(f, "Foreign key constraint violated: {msg}"),
            Self::Contention(msg) => write!(f, "Database busy: {msg}"),
            Self::DuplicateEmail(email) => write!(f, "Email already registered: {email}"),
            Self::CorruptRow(msg) => write!(f, "Corrupt row: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl PersistenceError {
    /// Returns true for a shared-cache table or schema lock.
    ///
    /// `SQLite` reports these immediately, without waiting on `busy_timeout`.
    #[must_use]
    pub fn is_table_lock(&self) -> bool {
        match self {
            Self::Contention(msg) => is_table_lock_message(msg),
            _ => false,
        }
    }
}

/// Returns true if an `SQLite` error message reports a shared-cache lock.
fn is_table_lock_message(message: &str) -> bool {
    let message: String = message.to_lowercase();
    message.contains("table is locked") || message.contains("schema is locked")
}

/// Returns true if an `SQLite` error message reports lock contention.
fn is_contention_message(message: &str) -> bool {
    let lowered: String = message.to_lowercase();
    lowered.contains("database is locked")
        || lowered.contains("database is busy")
        || is_table_lock_message(message)
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match &err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(_, info)
                if is_contention_message(info.message()) =>
            {
                Self::Contention(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        let message: String = err.to_string();
        if is_contention_message(&message) {
            Self::Contention(message)
        } else {
            Self::DatabaseConnectionFailed(message)
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::UniqueViolation(_) => Self::ActiveSlotTaken,
            PersistenceError::Contention(msg) => Self::Contention(msg),
            PersistenceError::ForeignKeyViolation(msg) => Self::MissingReference(msg),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
