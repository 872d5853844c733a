// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The persistence port used by the booking core.
//!
//! The core never decides slot ownership itself. `insert_pending_booking`
//! must be a single atomic insert guarded by a uniqueness constraint on
//! `(guide_id, slot)` scoped to non-cancelled rows, enforced by the store.

use guide_book_domain::{Booking, BookingId, BookingStatus, Guide, GuideId, Slot, UserId};

/// Default page size for guide listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound on the page size for guide listings.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors reported by a `BookingStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The active-slot uniqueness constraint rejected an insert.
    ActiveSlotTaken,
    /// The store was busy or locked past its timeout.
    Contention(String),
    /// A referenced row (user, guide) does not exist.
    MissingReference(String),
    /// The store is unreachable or failed internally.
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ActiveSlotTaken => write!(f, "Slot already held by an active booking"),
            Self::Contention(msg) => write!(f, "Store contention: {msg}"),
            Self::MissingReference(msg) => write!(f, "Missing reference: {msg}"),
            Self::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A booking about to be inserted in `pending` state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: UserId,
    pub guide_id: GuideId,
    pub slot: Slot,
    pub notes: Option<String>,
}

/// Pagination and filtering for guide listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size, between 1 and `MAX_PAGE_SIZE`.
    pub size: u32,
    /// Lowercased expertise filter; `None` lists every guide.
    pub expertise: Option<String>,
}

impl GuideQuery {
    /// Builds a query from raw request parameters.
    ///
    /// Missing, unparseable or non-positive page/size values fall back to
    /// page 1 and `DEFAULT_PAGE_SIZE`. Sizes above `MAX_PAGE_SIZE` are
    /// clamped. An empty expertise or `all` (any case) disables filtering.
    #[must_use]
    pub fn from_params(page: Option<&str>, size: Option<&str>, expertise: Option<&str>) -> Self {
        let page: u32 = page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let size: u32 = size
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|s| *s >= 1)
            .map_or(DEFAULT_PAGE_SIZE, |s| s.min(MAX_PAGE_SIZE));
        let expertise: Option<String> = expertise
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty() && e != "all");

        Self {
            page,
            size,
            expertise,
        }
    }

    /// Number of rows to skip for this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.size as u64
    }
}

impl Default for GuideQuery {
    fn default() -> Self {
        Self::from_params(None, None, None)
    }
}

/// One page of guides plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidePage {
    pub guides: Vec<Guide>,
    pub total: u64,
}

/// Storage operations required by the booking core.
pub trait BookingStore {
    /// Looks up a guide by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_guide(&mut self, guide_id: GuideId) -> Result<Option<Guide>, StoreError>;

    /// Counts non-cancelled bookings of `guide_id` at exactly `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn count_active_bookings(&mut self, guide_id: GuideId, slot: Slot)
    -> Result<u64, StoreError>;

    /// Returns the slots of every non-cancelled booking of `guide_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn active_slots(&mut self, guide_id: GuideId) -> Result<Vec<Slot>, StoreError>;

    /// Atomically inserts a `pending` booking.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ActiveSlotTaken` if an active booking already
    /// holds `(guide_id, slot)`, `StoreError::Contention` if the store was
    /// busy past its timeout.
    fn insert_pending_booking(&mut self, booking: &NewBooking) -> Result<Booking, StoreError>;

    /// Looks up a booking by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_booking(&mut self, booking_id: BookingId) -> Result<Option<Booking>, StoreError>;

    /// Sets the status of a booking if its current status is in `allowed_from`.
    ///
    /// Returns `None` when no row matched (unknown id or status changed).
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be executed.
    fn update_booking_status(
        &mut self,
        booking_id: BookingId,
        allowed_from: &[BookingStatus],
        next: BookingStatus,
    ) -> Result<Option<Booking>, StoreError>;

    /// Returns the bookings of a user with their guides, newest slot first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn list_bookings_for_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Vec<(Booking, Guide)>, StoreError>;

    /// Returns one page of guides ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn list_guides(&mut self, query: &GuideQuery) -> Result<GuidePage, StoreError>;

    /// Returns the distinct expertise tags of all guides, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn list_expertises(&mut self) -> Result<Vec<String>, StoreError>;
}
