// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use guide_book_domain::{Booking, BookingId, BookingStatus, Guide, GuideId, Slot, UserId};
use time::OffsetDateTime;

/// A guide as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideSummary {
    pub id: GuideId,
    pub name: String,
    pub expertise: String,
    /// Offered slots for booking views, free slots for listings.
    pub availability: Vec<Slot>,
}

impl GuideSummary {
    /// Summarizes a guide with every offered slot.
    #[must_use]
    pub fn offered(guide: &Guide) -> Self {
        Self::with_slots(guide, guide.offered_slots())
    }

    /// Summarizes a guide with an explicit slot list.
    #[must_use]
    pub fn with_slots(guide: &Guide, availability: Vec<Slot>) -> Self {
        Self {
            id: guide.id,
            name: guide.name.clone(),
            expertise: guide.expertise.clone(),
            availability,
        }
    }
}

/// A booking together with a summary of its guide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingProjection {
    pub id: BookingId,
    pub user_id: UserId,
    pub guide_id: GuideId,
    pub slot: Slot,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub guide: GuideSummary,
}

impl BookingProjection {
    /// Builds the projection of `booking` owned by `guide`.
    #[must_use]
    pub fn new(booking: Booking, guide: &Guide) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            guide_id: booking.guide_id,
            slot: booking.slot,
            status: booking.status,
            notes: booking.notes,
            created_at: booking.created_at,
            guide: GuideSummary::offered(guide),
        }
    }
}

/// One page of the guide catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideListing {
    /// Guides on this page with their free slots.
    pub guides: Vec<GuideSummary>,
    /// Distinct expertise tags across all guides.
    pub expertises: Vec<String>,
    /// Number of guides matching the filter.
    pub total: u64,
    pub page: u32,
    pub size: u32,
}
