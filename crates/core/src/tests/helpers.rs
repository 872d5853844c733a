// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use guide_book_domain::{
    Availability, Booking, BookingId, BookingStatus, Guide, GuideId, Slot, UserId,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{BookingStore, GuidePage, GuideQuery, NewBooking, StoreError};

const CREATED_AT: OffsetDateTime = datetime!(2024-01-01 00:00:00 UTC);

/// An in-memory `BookingStore` enforcing the active-slot constraint.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub guides: Vec<Guide>,
    pub bookings: Vec<Booking>,
    /// When set, every insert fails with this error.
    pub fail_inserts_with: Option<StoreError>,
}

impl InMemoryStore {
    pub fn with_guides(guides: Vec<Guide>) -> Self {
        Self {
            guides,
            ..Self::default()
        }
    }

    fn next_booking_id(&self) -> BookingId {
        let count = i64::try_from(self.bookings.len()).unwrap();
        BookingId::new(count + 1)
    }

    fn booking_mut(&mut self, booking_id: BookingId) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.id == booking_id)
    }

    fn filtered_guides(&self, query: &GuideQuery) -> Vec<Guide> {
        let mut guides: Vec<Guide> = self
            .guides
            .iter()
            .filter(|g| {
                query
                    .expertise
                    .as_ref()
                    .is_none_or(|e| g.expertise.to_lowercase() == *e)
            })
            .cloned()
            .collect();
        guides.sort_by_key(|g| g.id);
        guides
    }
}

impl BookingStore for InMemoryStore {
    fn find_guide(&mut self, guide_id: GuideId) -> Result<Option<Guide>, StoreError> {
        Ok(self.guides.iter().find(|g| g.id == guide_id).cloned())
    }

    fn count_active_bookings(
        &mut self,
        guide_id: GuideId,
        slot: Slot,
    ) -> Result<u64, StoreError> {
        let count = self
            .bookings
            .iter()
            .filter(|b| b.guide_id == guide_id && b.slot == slot && b.status.is_active())
            .count();
        Ok(u64::try_from(count).unwrap())
    }

    fn active_slots(&mut self, guide_id: GuideId) -> Result<Vec<Slot>, StoreError> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.guide_id == guide_id && b.status.is_active())
            .map(|b| b.slot)
            .collect())
    }

    fn insert_pending_booking(&mut self, booking: &NewBooking) -> Result<Booking, StoreError> {
        if let Some(err) = self.fail_inserts_with.clone() {
            return Err(err);
        }
        if self.count_active_bookings(booking.guide_id, booking.slot)? > 0 {
            return Err(StoreError::ActiveSlotTaken);
        }
        let stored = Booking {
            id: self.next_booking_id(),
            user_id: booking.user_id,
            guide_id: booking.guide_id,
            slot: booking.slot,
            status: BookingStatus::Pending,
            notes: booking.notes.clone(),
            created_at: CREATED_AT,
            updated_at: CREATED_AT,
        };
        self.bookings.push(stored.clone());
        Ok(stored)
    }

    fn find_booking(&mut self, booking_id: BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.iter().find(|b| b.id == booking_id).cloned())
    }

    fn update_booking_status(
        &mut self,
        booking_id: BookingId,
        allowed_from: &[BookingStatus],
        next: BookingStatus,
    ) -> Result<Option<Booking>, StoreError> {
        match self.booking_mut(booking_id) {
            Some(booking) if allowed_from.contains(&booking.status) => {
                booking.status = next;
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    fn list_bookings_for_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Vec<(Booking, Guide)>, StoreError> {
        let mut rows: Vec<(Booking, Guide)> = self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| {
                self.guides
                    .iter()
                    .find(|g| g.id == b.guide_id)
                    .map(|g| (b.clone(), g.clone()))
            })
            .collect();
        rows.sort_by(|(a, _), (b, _)| b.slot.cmp(&a.slot).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    fn list_guides(&mut self, query: &GuideQuery) -> Result<GuidePage, StoreError> {
        let matching: Vec<Guide> = self.filtered_guides(query);
        let total = u64::try_from(matching.len()).unwrap();
        let offset = usize::try_from(query.offset()).unwrap();
        let guides: Vec<Guide> = matching
            .into_iter()
            .skip(offset)
            .take(query.size as usize)
            .collect();
        Ok(GuidePage { guides, total })
    }

    fn list_expertises(&mut self) -> Result<Vec<String>, StoreError> {
        let mut expertises: Vec<String> = self
            .guides
            .iter()
            .map(|g| g.expertise.clone())
            .collect::<HashSet<String>>()
            .into_iter()
            .collect();
        expertises.sort();
        Ok(expertises)
    }
}

pub fn slot(input: &str) -> Slot {
    Slot::parse(input).unwrap()
}

pub fn create_test_guide(id: i64, expertise: &str, slots: &[&str]) -> Guide {
    Guide {
        id: GuideId::new(id),
        name: format!("Guide {id}"),
        expertise: expertise.to_string(),
        availability: Availability::new(slots.iter().map(ToString::to_string).collect()),
    }
}

pub fn create_test_store() -> InMemoryStore {
    InMemoryStore::with_guides(vec![create_test_guide(
        1,
        "Hiking",
        &[
            "2024-01-01T10:00:00Z",
            "2024-01-01T12:00:00Z",
            "2024-01-02T09:30:00+02:00",
        ],
    )])
}

pub const ALICE: UserId = UserId::new(1);
pub const BOB: UserId = UserId::new(2);
