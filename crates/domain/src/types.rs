// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::BookingStatus;
use crate::error::DomainError;
use crate::slot::{Availability, Slot};
use crate::validation::{validate_email, validate_user_name};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Generates a numeric identifier newtype assigned by the database.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps an identifier read back from the database.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Validates an identifier supplied by a caller.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::InvalidIdentifier` if the value is not positive.
            pub const fn parse(value: i64) -> Result<Self, DomainError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(DomainError::InvalidIdentifier {
                        field: $field,
                        value,
                    })
                }
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a guide.
    GuideId,
    "guide_id"
);
id_type!(
    /// Identifier of a registered user.
    UserId,
    "user_id"
);
id_type!(
    /// Identifier of a booking.
    BookingId,
    "booking_id"
);

/// A normalized (lowercase) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email address.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` if the address is malformed.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        validate_email(raw)?;
        Ok(Self(raw.trim().to_lowercase()))
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A guide offering bookable slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guide {
    /// The guide identifier.
    pub id: GuideId,
    /// Display name.
    pub name: String,
    /// Expertise tag used for filtering.
    pub expertise: String,
    /// The published slots, as stored.
    pub availability: Availability,
}

impl Guide {
    /// Returns the guide's parseable slots in publication order.
    #[must_use]
    pub fn offered_slots(&self) -> Vec<Slot> {
        self.availability.offered_slots()
    }
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub guide_id: GuideId,
    pub slot: Slot,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Trimmed display name.
    pub name: String,
    /// Normalized email address.
    pub email: Email,
}

impl NewUser {
    /// Validates the registration fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or email is invalid.
    pub fn new(name: &str, email: &str) -> Result<Self, DomainError> {
        validate_user_name(name)?;
        Ok(Self {
            name: name.trim().to_string(),
            email: Email::new(email)?,
        })
    }
}
