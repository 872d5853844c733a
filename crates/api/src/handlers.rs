// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for authentication, guides and bookings.

use guide_book::{BookingProjection, GuideListing, GuideQuery};
use guide_book_domain::{BookingId, GuideId, NewUser, Slot, validate_email};
use guide_book_persistence::{Persistence, UserData};
use tracing::info;

use crate::auth::{AuthenticatedUser, AuthenticationService};
use crate::error::{
    ApiError, translate_booking_error, translate_domain_error, translate_persistence_error,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AuthResponse, BookingResponse, CreateBookingRequest, ListGuidesRequest, ListGuidesResponse,
    LoginRequest, RegisterRequest, UserResponse,
};

/// Minimum password length accepted at login before credentials are checked.
const MIN_LOGIN_PASSWORD_LENGTH: usize = 8;

/// Registers a user and opens a session for them.
///
/// # Errors
///
/// * `InvalidInput` if the name or email is malformed
/// * `PasswordPolicyViolation` if the password is too weak
/// * `DuplicateEmail` if the email is already registered
pub fn register_user(
    persistence: &mut Persistence,
    request: &RegisterRequest,
) -> Result<AuthResponse, ApiError> {
    let new_user: NewUser =
        NewUser::new(&request.name, &request.email).map_err(translate_domain_error)?;

    PasswordPolicy::default().validate(
        &request.password,
        &new_user.name,
        new_user.email.value(),
    )?;

    let user: UserData = persistence
        .create_user(&new_user, &request.password)
        .map_err(translate_persistence_error)?;

    let token: String = AuthenticationService::open_session(persistence, user.user_id)?;

    info!(user_id = user.user_id, "Registered user");

    Ok(AuthResponse {
        token,
        user: UserResponse {
            id: user.user_id,
            name: user.name,
            email: user.email,
        },
    })
}

/// Logs a user in.
///
/// # Errors
///
/// * `InvalidInput` if the email is malformed or the password too short
/// * `AuthenticationFailed` for an unknown email or a wrong password
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<AuthResponse, ApiError> {
    validate_email(&request.email).map_err(translate_domain_error)?;

    if request.password.chars().count() < MIN_LOGIN_PASSWORD_LENGTH {
        return Err(ApiError::InvalidInput {
            field: String::from("password"),
            message: format!("must be at least {MIN_LOGIN_PASSWORD_LENGTH} characters"),
        });
    }

    let (token, user): (String, AuthenticatedUser) =
        AuthenticationService::login(persistence, &request.email, &request.password)?;

    Ok(AuthResponse {
        token,
        user: UserResponse::from(&user),
    })
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session store cannot be reached.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Resolves a bearer token to its user.
///
/// # Errors
///
/// Returns `AuthenticationFailed` if the token is unknown or expired.
pub fn validate_session(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<AuthenticatedUser, ApiError> {
    Ok(AuthenticationService::validate_session(
        persistence,
        session_token,
    )?)
}

/// Lists one page of guides with their free slots.
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn list_guides(
    persistence: &mut Persistence,
    request: &ListGuidesRequest,
) -> Result<ListGuidesResponse, ApiError> {
    let query: GuideQuery = GuideQuery::from_params(
        request.page.as_deref(),
        request.size.as_deref(),
        request.expertise.as_deref(),
    );

    let listing: GuideListing =
        guide_book::browse_guides(persistence, &query).map_err(translate_booking_error)?;

    Ok(ListGuidesResponse::from(&listing))
}

/// Books a guide for the authenticated user.
///
/// Blank notes are stored as absent.
///
/// # Errors
///
/// * `InvalidInput` if the guide id or datetime is malformed
/// * `ResourceNotFound` if the guide does not exist
/// * `SlotNotOffered` if the guide does not publish the instant
/// * `SlotAlreadyBooked` if another active booking holds it
/// * `Conflict` or `Unavailable` on store failures
pub fn create_booking(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    request: &CreateBookingRequest,
) -> Result<BookingResponse, ApiError> {
    let guide_id: GuideId = GuideId::parse(request.guide_id).map_err(translate_domain_error)?;
    let slot: Slot = Slot::parse(request.datetime.trim()).map_err(translate_domain_error)?;
    let notes: Option<String> = request
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);

    let projection: BookingProjection =
        guide_book::create_booking(persistence, guide_id, slot, user.user_id, notes)
            .map_err(translate_booking_error)?;

    BookingResponse::from_projection(&projection)
}

/// Lists the authenticated user's bookings, latest slot first.
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn list_user_bookings(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
) -> Result<Vec<BookingResponse>, ApiError> {
    guide_book::list_user_bookings(persistence, user.user_id)
        .map_err(translate_booking_error)?
        .iter()
        .map(BookingResponse::from_projection)
        .collect()
}

/// Cancels one of the authenticated user's bookings.
///
/// # Errors
///
/// * `InvalidInput` if the id is not positive
/// * `ResourceNotFound` if the booking does not exist or belongs to someone else
/// * `InvalidTransition` if the booking is already cancelled or completed
pub fn cancel_booking(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    booking_id: i64,
) -> Result<BookingResponse, ApiError> {
    let booking_id: BookingId = BookingId::parse(booking_id).map_err(translate_domain_error)?;

    let projection: BookingProjection =
        guide_book::cancel_booking(persistence, booking_id, user.user_id)
            .map_err(translate_booking_error)?;

    BookingResponse::from_projection(&projection)
}
