// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use guide_book::{BookingStore, GuidePage, GuideQuery, NewBooking, StoreError};
use guide_book_domain::{Booking, BookingId, BookingStatus, Guide, GuideId, Slot, UserId};

use crate::{Persistence, mutations, queries};

impl BookingStore for Persistence {
    fn find_guide(&mut self, guide_id: GuideId) -> Result<Option<Guide>, StoreError> {
        Ok(self.with_conn(|conn| queries::guides::get_guide_by_id(conn, guide_id))?)
    }

    fn count_active_bookings(
        &mut self,
        guide_id: GuideId,
        slot: Slot,
    ) -> Result<u64, StoreError> {
        Ok(self.with_conn(|conn| queries::bookings::count_active_bookings(conn, guide_id, slot))?)
    }

    fn active_slots(&mut self, guide_id: GuideId) -> Result<Vec<Slot>, StoreError> {
        Ok(self.with_conn(|conn| queries::bookings::active_slots(conn, guide_id))?)
    }

    fn insert_pending_booking(&mut self, booking: &NewBooking) -> Result<Booking, StoreError> {
        Ok(self.with_conn(|conn| mutations::bookings::insert_pending_booking(conn, booking))?)
    }

    fn find_booking(&mut self, booking_id: BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self.with_conn(|conn| queries::bookings::get_booking_by_id(conn, booking_id))?)
    }

    fn update_booking_status(
        &mut self,
        booking_id: BookingId,
        allowed_from: &[BookingStatus],
        next: BookingStatus,
    ) -> Result<Option<Booking>, StoreError> {
        Ok(self.with_conn(|conn| {
            mutations::bookings::update_booking_status(conn, booking_id, allowed_from, next)
        })?)
    }

    fn list_bookings_for_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Vec<(Booking, Guide)>, StoreError> {
        Ok(self.with_conn(|conn| queries::bookings::list_bookings_for_user(conn, user_id))?)
    }

    fn list_guides(&mut self, query: &GuideQuery) -> Result<GuidePage, StoreError> {
        Ok(self.with_conn(|conn| queries::guides::list_guides(conn, query))?)
    }

    fn list_expertises(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(self.with_conn(queries::guides::list_expertises)?)
    }
}
