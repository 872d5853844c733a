// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod availability;
mod error;
mod guard;
mod lifecycle;
mod projection;
mod store;

#[cfg(test)]
mod tests;

pub use availability::{free_slots_excluding, free_slots_for, is_offered_slot, is_reserved};
pub use error::BookingError;
pub use guard::reserve;
pub use lifecycle::{
    browse_guides, cancel_booking, complete_booking, confirm_booking, create_booking,
    list_user_bookings, transition_booking,
};
pub use projection::{BookingProjection, GuideListing, GuideSummary};
pub use store::{
    BookingStore, DEFAULT_PAGE_SIZE, GuidePage, GuideQuery, MAX_PAGE_SIZE, NewBooking, StoreError,
};
