// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A slot string is not a timezone-qualified RFC 3339 instant.
    InvalidSlot {
        /// The rejected input.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },
    /// An identifier is missing or not positive.
    InvalidIdentifier {
        /// The identifier field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// User name is empty or out of bounds.
    InvalidName(String),
    /// Email address is malformed.
    InvalidEmail(String),
    /// A booking status string is not recognized.
    InvalidBookingStatus {
        /// The unrecognized status.
        status: String,
    },
    /// A booking status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlot { input, reason } => {
                write!(f, "Invalid slot '{input}': {reason}")
            }
            Self::InvalidIdentifier { field, value } => {
                write!(f, "Invalid {field}: {value} (must be a positive integer)")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidBookingStatus { status } => {
                write!(f, "Invalid booking status: {status}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition booking from {from} to {to}: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
