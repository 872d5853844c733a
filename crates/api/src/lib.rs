// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the guide booking marketplace.
//!
//! Request and response types in this crate are the API contract. Domain,
//! core and persistence errors never cross this boundary untranslated.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedUser, AuthenticationService};
pub use error::{
    ApiError, AuthError, translate_booking_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    cancel_booking, create_booking, list_guides, list_user_bookings, login, logout,
    register_user, validate_session,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AuthResponse, BookingResponse, CreateBookingRequest, GuideResponse, ListGuidesRequest,
    ListGuidesResponse, LoginRequest, PaginationResponse, RegisterRequest, UserResponse,
};
