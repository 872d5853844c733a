// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking mutations.
//!
//! Neither function reads before writing. Slot ownership is decided by the
//! `idx_bookings_active_slot` partial unique index and status changes by
//! the `status IN (...)` predicate of a single `UPDATE`.

use diesel::SqliteConnection;
use diesel::prelude::*;
use guide_book::NewBooking;
use guide_book_domain::{Booking, BookingId, BookingStatus};
use tracing::debug;

use crate::diesel_schema::bookings;
use crate::error::PersistenceError;
use crate::queries::bookings::BookingRow;
use crate::timestamps::now_timestamp;

/// Inserts a `pending` booking.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if an active booking already
/// holds the slot, `PersistenceError::Contention` if the database stayed
/// locked past the busy timeout.
pub fn insert_pending_booking(
    conn: &mut SqliteConnection,
    booking: &NewBooking,
) -> Result<Booking, PersistenceError> {
    let now: String = now_timestamp()?;

    debug!(
        guide_id = %booking.guide_id,
        user_id = %booking.user_id,
        slot = %booking.slot,
        "Inserting pending booking"
    );

    diesel::insert_into(bookings::table)
        .values((
            bookings::user_id.eq(booking.user_id.value()),
            bookings::guide_id.eq(booking.guide_id.value()),
            bookings::slot_unix_nanos.eq(booking.slot.unix_nanos()),
            bookings::status.eq(BookingStatus::Pending.as_str()),
            bookings::notes.eq(booking.notes.as_deref()),
            bookings::created_at.eq(&now),
            bookings::updated_at.eq(&now),
        ))
        .returning(BookingRow::as_returning())
        .get_result::<BookingRow>(conn)?
        .into_booking()
}

/// Sets a booking's status if its current status is one of `allowed_from`.
///
/// Returns `Ok(None)` when no row matched.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_booking_status(
    conn: &mut SqliteConnection,
    booking_id: BookingId,
    allowed_from: &[BookingStatus],
    next: BookingStatus,
) -> Result<Option<Booking>, PersistenceError> {
    let allowed: Vec<&str> = allowed_from.iter().map(BookingStatus::as_str).collect();

    debug!(%booking_id, ?allowed, to = %next, "Updating booking status");

    diesel::update(bookings::table)
        .filter(bookings::booking_id.eq(booking_id.value()))
        .filter(bookings::status.eq_any(allowed))
        .set((
            bookings::status.eq(next.as_str()),
            bookings::updated_at.eq(now_timestamp()?),
        ))
        .returning(BookingRow::as_returning())
        .get_result::<BookingRow>(conn)
        .optional()?
        .map(BookingRow::into_booking)
        .transpose()
}
