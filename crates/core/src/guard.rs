// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking conflict guard.
//!
//! A reservation is a single insert. The store's active-slot uniqueness
//! constraint decides the winner when requests race; no read performed
//! here is allowed to gate the insert.

use guide_book_domain::{Booking, Guide, Slot, UserId};
use tracing::{error, info, warn};

use crate::availability::is_offered_slot;
use crate::error::BookingError;
use crate::store::{BookingStore, NewBooking, StoreError};

/// Reserves `slot` of `guide` for `requester` as a `pending` booking.
///
/// # Errors
///
/// * `SlotNotOffered` if the guide does not publish the instant
/// * `SlotAlreadyBooked` if the store rejects the insert on the active-slot constraint
/// * `Conflict` if the store stayed busy past its timeout
/// * `Unavailable` for any other store failure
pub fn reserve<S: BookingStore>(
    store: &mut S,
    guide: &Guide,
    slot: Slot,
    requester: UserId,
    notes: Option<String>,
) -> Result<Booking, BookingError> {
    if !is_offered_slot(guide, slot) {
        warn!(
            guide_id = %guide.id,
            %slot,
            "Rejected reservation of a slot the guide does not offer"
        );
        return Err(BookingError::SlotNotOffered {
            guide_id: guide.id,
            slot,
        });
    }

    let new_booking = NewBooking {
        user_id: requester,
        guide_id: guide.id,
        slot,
        notes,
    };

    match store.insert_pending_booking(&new_booking) {
        Ok(booking) => {
            info!(
                booking_id = %booking.id,
                guide_id = %guide.id,
                user_id = %requester,
                %slot,
                "Reserved slot"
            );
            Ok(booking)
        }
        Err(StoreError::ActiveSlotTaken) => {
            warn!(guide_id = %guide.id, %slot, "Slot already booked");
            Err(BookingError::SlotAlreadyBooked {
                guide_id: guide.id,
                slot,
            })
        }
        Err(StoreError::Contention(msg)) => {
            warn!(guide_id = %guide.id, %slot, error = %msg, "Reservation hit store contention");
            Err(BookingError::Conflict(msg))
        }
        Err(StoreError::MissingReference(msg) | StoreError::Unavailable(msg)) => {
            error!(guide_id = %guide.id, %slot, error = %msg, "Reservation failed");
            Err(BookingError::Unavailable(msg))
        }
    }
}
