// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use guide_book_domain::{BookingId, BookingStatus, DomainError, GuideId, Slot};

use crate::store::StoreError;

/// Errors that can occur while reserving or transitioning bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// A slot or identifier failed to parse. Never retried.
    InvalidFormat(String),
    /// The referenced guide does not exist.
    GuideNotFound(GuideId),
    /// The referenced booking does not exist or is not visible to the requester.
    BookingNotFound(BookingId),
    /// The requested instant is not among the guide's published slots.
    SlotNotOffered {
        /// The guide.
        guide_id: GuideId,
        /// The requested instant.
        slot: Slot,
    },
    /// Another active booking already holds the slot.
    SlotAlreadyBooked {
        /// The guide.
        guide_id: GuideId,
        /// The contested instant.
        slot: Slot,
    },
    /// Transient storage contention. The caller may retry with backoff.
    Conflict(String),
    /// The store is unreachable or failed internally.
    Unavailable(String),
    /// The booking lifecycle does not permit the transition.
    InvalidTransition {
        /// The booking's current status.
        from: BookingStatus,
        /// The requested status.
        to: BookingStatus,
    },
}

impl BookingError {
    /// Returns true if repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Maps a store failure that is not specific to a slot.
    ///
    /// `ActiveSlotTaken` outside of a reservation means the store reported a
    /// constraint violation the caller did not expect; it is treated as
    /// contention.
    #[must_use]
    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::ActiveSlotTaken => {
                Self::Conflict(String::from("active booking constraint violated"))
            }
            StoreError::Contention(msg) => Self::Conflict(msg),
            StoreError::MissingReference(msg) | StoreError::Unavailable(msg) => {
                Self::Unavailable(msg)
            }
        }
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(msg) => write!(f, "Invalid format: {msg}"),
            Self::GuideNotFound(id) => write!(f, "Guide {id} not found"),
            Self::BookingNotFound(id) => write!(f, "Booking {id} not found"),
            Self::SlotNotOffered { guide_id, slot } => {
                write!(f, "Guide {guide_id} does not offer slot {slot}")
            }
            Self::SlotAlreadyBooked { guide_id, slot } => {
                write!(f, "Slot {slot} of guide {guide_id} is already booked")
            }
            Self::Conflict(msg) => write!(f, "Storage conflict: {msg}"),
            Self::Unavailable(msg) => write!(f, "Storage unavailable: {msg}"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Cannot transition booking from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for BookingError {}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}
