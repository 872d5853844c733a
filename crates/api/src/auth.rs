// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication types and services.

use guide_book_domain::UserId;
use guide_book_persistence::{Persistence, PersistenceError, SessionData, UserData};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// The user behind a valid session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The user identifier.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized email address.
    pub email: String,
}

impl AuthenticatedUser {
    fn from_user_data(user: &UserData) -> Self {
        Self {
            user_id: UserId::new(user.user_id),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Session lifetime.
    pub const SESSION_TTL: Duration = Duration::hours(24);

    /// Checks credentials and opens a session.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the caller,
    /// and both pay for one bcrypt verification.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_user`)
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for bad credentials, `StorageFailure`
    /// if the store cannot be reached.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedUser), AuthError> {
        let Some(user) = persistence
            .get_user_by_email(email)
            .map_err(Self::map_persistence_error)?
        else {
            Persistence::verify_absent_user_password(password);
            debug!("Login attempt for unknown email");
            return Err(Self::invalid_credentials());
        };

        let verified: bool = Persistence::verify_password(password, &user.password_hash)
            .unwrap_or_else(|e| {
                warn!(user_id = user.user_id, error = %e, "Stored password hash is unusable");
                false
            });

        if !verified {
            debug!(user_id = user.user_id, "Login attempt with wrong password");
            return Err(Self::invalid_credentials());
        }

        let session_token: String = Self::open_session(persistence, user.user_id)?;
        info!(user_id = user.user_id, "User logged in");

        Ok((session_token, AuthenticatedUser::from_user_data(&user)))
    }

    /// Opens a session for a user that has just been authenticated.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the session cannot be stored.
    pub fn open_session(persistence: &mut Persistence, user_id: i64) -> Result<String, AuthError> {
        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime = OffsetDateTime::now_utc() + Self::SESSION_TTL;

        persistence
            .create_session(&session_token, user_id, expires_at)
            .map_err(Self::map_persistence_error)?;

        Ok(session_token)
    }

    /// Validates a session token and returns its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the token is unknown or expired.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Rfc3339)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if OffsetDateTime::now_utc() >= expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        Ok(AuthenticatedUser::from_user_data(&user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the delete fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)
    }

    /// Deletes every expired session, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the delete fails.
    pub fn purge_expired_sessions(persistence: &mut Persistence) -> Result<usize, AuthError> {
        let removed: usize = persistence
            .delete_expired_sessions(OffsetDateTime::now_utc())
            .map_err(Self::map_persistence_error)?;

        if removed > 0 {
            info!(removed, "Purged expired sessions");
        }

        Ok(removed)
    }

    /// Generates an opaque session token from 128 random bits.
    fn generate_session_token() -> String {
        format!(
            "session_{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("invalid credentials"),
        }
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::StorageFailure {
            message: err.to_string(),
        }
    }
}
