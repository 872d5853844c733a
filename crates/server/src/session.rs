// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for authenticated routes.
//!
//! This module provides an Axum extractor that validates the bearer token
//! at the server boundary.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use guide_book_api::{AuthenticatedUser, validate_session};
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for authenticated users.
///
/// # Authentication Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Validate the token via `validate_session`
/// 3. Return the `AuthenticatedUser` and the token
///
/// # Errors
///
/// Rejects with HTTP 401 `Authentication Required.` if the header is
/// missing or malformed, or the session is unknown or expired.
pub struct SessionUser {
    pub user: AuthenticatedUser,
    pub token: String,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                HttpError::unauthorized()
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                HttpError::unauthorized()
            })?;

        let token: String = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header is not a bearer token");
                HttpError::unauthorized()
            })?
            .to_string();

        let session_token: String = token.clone();
        let user: AuthenticatedUser = state
            .run_blocking(move |persistence| validate_session(persistence, &session_token))
            .await
            .map_err(|e| {
                if e.status == StatusCode::UNAUTHORIZED {
                    warn!(reason = %e.message, "Session validation failed");
                    HttpError::unauthorized()
                } else {
                    e
                }
            })?;

        debug!(user_id = %user.user_id, "Session validated");

        Ok(Self { user, token })
    }
}
