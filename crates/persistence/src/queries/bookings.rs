// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking queries.
//!
//! "Active" means any status other than `cancelled`, matching the partial
//! unique index on `(guide_id, slot_unix_nanos)`.

use diesel::SqliteConnection;
use diesel::prelude::*;
use guide_book_domain::{
    Booking, BookingId, BookingStatus, DomainError, Guide, GuideId, Slot, UserId,
};
use tracing::{debug, warn};

use crate::diesel_schema::{bookings, guides};
use crate::error::PersistenceError;
use crate::queries::guides::GuideRow;
use crate::timestamps::parse_timestamp;

/// Diesel Queryable struct for booking rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub struct BookingRow {
    pub booking_id: i64,
    pub user_id: i64,
    pub guide_id: i64,
    pub slot_unix_nanos: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl BookingRow {
    /// Converts the row into a domain booking.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRow` if a column holds a value the
    /// domain cannot represent.
    pub fn into_booking(self) -> Result<Booking, PersistenceError> {
        let slot: Slot = Slot::from_unix_nanos(self.slot_unix_nanos)
            .map_err(|e| PersistenceError::CorruptRow(e.to_string()))?;
        let status: BookingStatus = self
            .status
            .parse()
            .map_err(|e: DomainError| PersistenceError::CorruptRow(e.to_string()))?;

        Ok(Booking {
            id: BookingId::new(self.booking_id),
            user_id: UserId::new(self.user_id),
            guide_id: GuideId::new(self.guide_id),
            slot,
            status,
            notes: self.notes,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Retrieves a booking by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the booking is not found.
pub fn get_booking_by_id(
    conn: &mut SqliteConnection,
    booking_id: BookingId,
) -> Result<Option<Booking>, PersistenceError> {
    debug!("Looking up booking by ID: {}", booking_id);

    bookings::table
        .filter(bookings::booking_id.eq(booking_id.value()))
        .select(BookingRow::as_select())
        .first::<BookingRow>(conn)
        .optional()?
        .map(BookingRow::into_booking)
        .transpose()
}

/// Counts the non-cancelled bookings of a guide at an exact instant.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_bookings(
    conn: &mut SqliteConnection,
    guide_id: GuideId,
    slot: Slot,
) -> Result<u64, PersistenceError> {
    let count: i64 = bookings::table
        .filter(bookings::guide_id.eq(guide_id.value()))
        .filter(bookings::slot_unix_nanos.eq(slot.unix_nanos()))
        .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
        .count()
        .get_result(conn)?;

    Ok(u64::try_from(count).unwrap_or_default())
}

/// Retrieves the slots of every non-cancelled booking of a guide.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn active_slots(
    conn: &mut SqliteConnection,
    guide_id: GuideId,
) -> Result<Vec<Slot>, PersistenceError> {
    let nanos: Vec<i64> = bookings::table
        .filter(bookings::guide_id.eq(guide_id.value()))
        .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
        .select(bookings::slot_unix_nanos)
        .load(conn)?;

    Ok(nanos
        .into_iter()
        .filter_map(|value| match Slot::from_unix_nanos(value) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!(%guide_id, value, error = %e, "Skipping unreadable booking slot");
                None
            }
        })
        .collect())
}

/// Retrieves a user's bookings with their guides, latest slot first.
///
/// Ties on the slot are broken by booking ID, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_bookings_for_user(
    conn: &mut SqliteConnection,
    user_id: UserId,
) -> Result<Vec<(Booking, Guide)>, PersistenceError> {
    debug!("Listing bookings for user ID: {}", user_id);

    let rows: Vec<(BookingRow, GuideRow)> = bookings::table
        .inner_join(guides::table)
        .filter(bookings::user_id.eq(user_id.value()))
        .order((bookings::slot_unix_nanos.desc(), bookings::booking_id.desc()))
        .select((BookingRow::as_select(), GuideRow::as_select()))
        .load(conn)?;

    rows.into_iter()
        .map(|(booking, guide)| Ok((booking.into_booking()?, guide.into_guide())))
        .collect()
}
