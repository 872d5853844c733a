// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking lifecycle operations.
//!
//! Status changes are conditional updates: the store only applies a
//! transition while the row is still in one of the legal predecessor
//! states, so two racing transitions cannot both succeed.

use guide_book_domain::{Booking, BookingId, BookingStatus, Guide, GuideId, Slot, UserId};
use tracing::{debug, info, warn};

use crate::availability::free_slots_for;
use crate::error::BookingError;
use crate::guard::reserve;
use crate::projection::{BookingProjection, GuideListing, GuideSummary};
use crate::store::{BookingStore, GuidePage, GuideQuery};

/// Creates a `pending` booking for `requester`.
///
/// # Errors
///
/// Returns `GuideNotFound` if the guide does not exist, otherwise any error
/// reported by the conflict guard.
pub fn create_booking<S: BookingStore>(
    store: &mut S,
    guide_id: GuideId,
    slot: Slot,
    requester: UserId,
    notes: Option<String>,
) -> Result<BookingProjection, BookingError> {
    let guide: Guide = store
        .find_guide(guide_id)
        .map_err(BookingError::from_store)?
        .ok_or(BookingError::GuideNotFound(guide_id))?;

    let booking: Booking = reserve(store, &guide, slot, requester, notes)?;
    Ok(BookingProjection::new(booking, &guide))
}

/// Lists the bookings of `user_id`, latest slot first.
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn list_user_bookings<S: BookingStore>(
    store: &mut S,
    user_id: UserId,
) -> Result<Vec<BookingProjection>, BookingError> {
    let rows: Vec<(Booking, Guide)> = store
        .list_bookings_for_user(user_id)
        .map_err(BookingError::from_store)?;

    debug!(%user_id, count = rows.len(), "Listed bookings");

    Ok(rows
        .into_iter()
        .map(|(booking, guide)| BookingProjection::new(booking, &guide))
        .collect())
}

/// Moves a booking owned by `requester` to `next`.
///
/// # Errors
///
/// * `BookingNotFound` if the booking does not exist or belongs to someone else
/// * `InvalidTransition` if the lifecycle forbids the change
/// * `Conflict` or `Unavailable` on store failures
pub fn transition_booking<S: BookingStore>(
    store: &mut S,
    booking_id: BookingId,
    requester: UserId,
    next: BookingStatus,
) -> Result<BookingProjection, BookingError> {
    let current: Booking = find_owned_booking(store, booking_id, requester)?;

    if current.status.validate_transition(next).is_err() {
        warn!(%booking_id, from = %current.status, to = %next, "Rejected booking transition");
        return Err(BookingError::InvalidTransition {
            from: current.status,
            to: next,
        });
    }

    let allowed_from: Vec<BookingStatus> = BookingStatus::predecessors_of(next);
    let Some(updated) = store
        .update_booking_status(booking_id, &allowed_from, next)
        .map_err(BookingError::from_store)?
    else {
        // The row left a legal predecessor state after it was read.
        let latest: Booking = find_owned_booking(store, booking_id, requester)?;
        warn!(%booking_id, from = %latest.status, to = %next, "Booking changed before transition");
        return Err(BookingError::InvalidTransition {
            from: latest.status,
            to: next,
        });
    };

    let guide: Guide = store
        .find_guide(updated.guide_id)
        .map_err(BookingError::from_store)?
        .ok_or(BookingError::GuideNotFound(updated.guide_id))?;

    info!(%booking_id, from = %current.status, to = %next, "Booking transitioned");

    Ok(BookingProjection::new(updated, &guide))
}

/// Cancels a booking, releasing its slot.
///
/// # Errors
///
/// See [`transition_booking`].
pub fn cancel_booking<S: BookingStore>(
    store: &mut S,
    booking_id: BookingId,
    requester: UserId,
) -> Result<BookingProjection, BookingError> {
    transition_booking(store, booking_id, requester, BookingStatus::Cancelled)
}

/// Confirms a pending booking.
///
/// # Errors
///
/// See [`transition_booking`].
pub fn confirm_booking<S: BookingStore>(
    store: &mut S,
    booking_id: BookingId,
    requester: UserId,
) -> Result<BookingProjection, BookingError> {
    transition_booking(store, booking_id, requester, BookingStatus::Confirmed)
}

/// Marks a confirmed booking as completed.
///
/// # Errors
///
/// See [`transition_booking`].
pub fn complete_booking<S: BookingStore>(
    store: &mut S,
    booking_id: BookingId,
    requester: UserId,
) -> Result<BookingProjection, BookingError> {
    transition_booking(store, booking_id, requester, BookingStatus::Completed)
}

/// Lists one page of guides with their free slots.
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn browse_guides<S: BookingStore>(
    store: &mut S,
    query: &GuideQuery,
) -> Result<GuideListing, BookingError> {
    let page: GuidePage = store.list_guides(query).map_err(BookingError::from_store)?;
    let expertises: Vec<String> = store.list_expertises().map_err(BookingError::from_store)?;

    let mut guides: Vec<GuideSummary> = Vec::with_capacity(page.guides.len());
    for guide in &page.guides {
        let free: Vec<Slot> = free_slots_for(store, guide).map_err(BookingError::from_store)?;
        guides.push(GuideSummary::with_slots(guide, free));
    }

    Ok(GuideListing {
        guides,
        expertises,
        total: page.total,
        page: query.page,
        size: query.size,
    })
}

fn find_owned_booking<S: BookingStore>(
    store: &mut S,
    booking_id: BookingId,
    requester: UserId,
) -> Result<Booking, BookingError> {
    match store
        .find_booking(booking_id)
        .map_err(BookingError::from_store)?
    {
        Some(booking) if booking.user_id == requester => Ok(booking),
        Some(_) => {
            warn!(%booking_id, %requester, "Booking belongs to another user");
            Err(BookingError::BookingNotFound(booking_id))
        }
        None => Err(BookingError::BookingNotFound(booking_id)),
    }
}
