// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use guide_book::BookingError;
use guide_book_domain::DomainError;
use guide_book_persistence::PersistenceError;
use tracing::error;

use crate::password_policy::PasswordPolicyError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The credential or session store could not be reached.
    StorageFailure {
        /// A description of the failure.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::StorageFailure { message } => {
                write!(f, "Authentication store failure: {message}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Each variant maps to exactly one HTTP status at the server boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The guide does not publish the requested instant.
    SlotNotOffered {
        /// A human-readable description.
        message: String,
    },
    /// Another active booking already holds the requested slot.
    SlotAlreadyBooked {
        /// A human-readable description.
        message: String,
    },
    /// The store stayed busy; the request may be retried.
    Conflict {
        /// A human-readable description.
        message: String,
    },
    /// The booking lifecycle forbids the requested change.
    InvalidTransition {
        /// A human-readable description.
        message: String,
    },
    /// The email address is already registered.
    DuplicateEmail {
        /// The normalized email address.
        email: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// The store could not be reached.
    Unavailable {
        /// A human-readable description.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::SlotNotOffered { message }
            | Self::SlotAlreadyBooked { message }
            | Self::Conflict { message }
            | Self::InvalidTransition { message }
            | Self::Unavailable { message } => write!(f, "{message}"),
            Self::DuplicateEmail { email } => {
                write!(f, "Email already registered: {email}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::StorageFailure { message } => {
                error!(error = %message, "Authentication store failure");
                Self::Unavailable {
                    message: String::from("Service temporarily unavailable"),
                }
            }
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidSlot { input, reason } => ApiError::InvalidInput {
            field: String::from("datetime"),
            message: format!("'{input}' is not a valid RFC 3339 instant: {reason}"),
        },
        DomainError::InvalidIdentifier { field, value } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("{value} is not a positive integer"),
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::InvalidBookingStatus { status } => ApiError::Internal {
            message: format!("Unrecognized booking status '{status}'"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => ApiError::InvalidTransition {
            message: format!("Cannot move booking from {from} to {to}: {reason}"),
        },
    }
}

/// Translates a booking error into an API error.
///
/// Store details behind `Conflict` and `Unavailable` are logged, not returned.
#[must_use]
pub fn translate_booking_error(err: BookingError) -> ApiError {
    match err {
        BookingError::InvalidFormat(message) => ApiError::InvalidInput {
            field: String::from("datetime"),
            message,
        },
        BookingError::GuideNotFound(guide_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Guide"),
            message: format!("Guide {guide_id} does not exist"),
        },
        BookingError::BookingNotFound(booking_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking {booking_id} does not exist"),
        },
        BookingError::SlotNotOffered { guide_id, slot } => ApiError::SlotNotOffered {
            message: format!("Guide {guide_id} is not available at {slot}"),
        },
        BookingError::SlotAlreadyBooked { guide_id, slot } => ApiError::SlotAlreadyBooked {
            message: format!("Guide {guide_id} is already booked at {slot}"),
        },
        BookingError::Conflict(detail) => {
            error!(error = %detail, "Booking store contention");
            ApiError::Conflict {
                message: String::from("The booking could not be completed, please retry"),
            }
        }
        BookingError::Unavailable(detail) => {
            error!(error = %detail, "Booking store unavailable");
            ApiError::Unavailable {
                message: String::from("Service temporarily unavailable"),
            }
        }
        BookingError::InvalidTransition { from, to } => ApiError::InvalidTransition {
            message: format!("Cannot move booking from {from} to {to}"),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateEmail(email) => ApiError::DuplicateEmail { email },
        PersistenceError::Contention(detail) => {
            error!(error = %detail, "Store contention");
            ApiError::Conflict {
                message: String::from("The request could not be completed, please retry"),
            }
        }
        PersistenceError::CorruptRow(detail) => ApiError::Internal { message: detail },
        other => {
            error!(error = %other, "Store failure");
            ApiError::Unavailable {
                message: String::from("Service temporarily unavailable"),
            }
        }
    }
}
