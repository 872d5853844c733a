// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability index.
//!
//! Answers whether a guide offers an instant and which offered instants are
//! still free. Reservation state is read from the store on every call; the
//! answers here are advisory and never gate an insert.

use std::collections::HashSet;

use guide_book_domain::{Guide, GuideId, Slot};
use tracing::debug;

use crate::store::{BookingStore, StoreError};

/// Returns true if `slot` equals one of the guide's parseable offered slots.
#[must_use]
pub fn is_offered_slot(guide: &Guide, slot: Slot) -> bool {
    guide.availability.offers(slot)
}

/// Returns true if an active booking holds `slot` for the guide.
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn is_reserved<S: BookingStore>(
    store: &mut S,
    guide_id: GuideId,
    slot: Slot,
) -> Result<bool, StoreError> {
    Ok(store.count_active_bookings(guide_id, slot)? > 0)
}

/// Returns the guide's offered slots that no active booking holds, in
/// publication order.
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn free_slots_for<S: BookingStore>(
    store: &mut S,
    guide: &Guide,
) -> Result<Vec<Slot>, StoreError> {
    let reserved: Vec<Slot> = store.active_slots(guide.id)?;
    let free: Vec<Slot> = free_slots_excluding(guide, &reserved);

    debug!(
        guide_id = %guide.id,
        reserved = reserved.len(),
        free = free.len(),
        "Computed free slots"
    );

    Ok(free)
}

/// Removes `reserved` instants from the guide's offered slots.
#[must_use]
pub fn free_slots_excluding(guide: &Guide, reserved: &[Slot]) -> Vec<Slot> {
    let reserved: HashSet<&Slot> = reserved.iter().collect();
    guide
        .offered_slots()
        .into_iter()
        .filter(|slot| !reserved.contains(slot))
        .collect()
}
