// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use guide_book::{BookingProjection, GuideListing, GuideSummary};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;

// ========================================================================
// Authentication
// ========================================================================

/// API request to register a new user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterRequest {
    /// Display name (3 to 50 characters).
    pub name: String,
    /// Email address, unique across users.
    pub email: String,
    /// Plaintext password, checked against the password policy.
    pub password: String,
}

/// API request to log in and create a session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// The user's email address.
    pub email: String,
    /// The user's password.
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&AuthenticatedUser> for UserResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.user_id.value(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// API response for successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthResponse {
    /// The session token (opaque).
    pub token: String,
    /// The authenticated user.
    pub user: UserResponse,
}

// ========================================================================
// Guides
// ========================================================================

/// Query parameters for the guide listing.
///
/// Values are kept as raw strings; malformed numbers fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListGuidesRequest {
    pub page: Option<String>,
    pub size: Option<String>,
    pub expertise: Option<String>,
}

/// A guide with a list of slots in canonical UTC form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GuideResponse {
    pub id: i64,
    pub name: String,
    pub expertise: String,
    pub availability: Vec<String>,
}

impl From<&GuideSummary> for GuideResponse {
    fn from(guide: &GuideSummary) -> Self {
        Self {
            id: guide.id.value(),
            name: guide.name.clone(),
            expertise: guide.expertise.clone(),
            availability: guide
                .availability
                .iter()
                .map(guide_book_domain::Slot::to_canonical_string)
                .collect(),
        }
    }
}

/// Pagination metadata for the guide listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaginationResponse {
    /// Number of guides matching the filter.
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

/// API response for the guide listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListGuidesResponse {
    /// Guides on this page with their free slots.
    pub guides: Vec<GuideResponse>,
    /// Distinct expertise tags across all guides.
    pub expertises: Vec<String>,
    pub pagination: PaginationResponse,
}

impl From<&GuideListing> for ListGuidesResponse {
    fn from(listing: &GuideListing) -> Self {
        Self {
            guides: listing.guides.iter().map(GuideResponse::from).collect(),
            expertises: listing.expertises.clone(),
            pagination: PaginationResponse {
                total: listing.total,
                page: listing.page,
                size: listing.size,
            },
        }
    }
}

// ========================================================================
// Bookings
// ========================================================================

/// API request to book a guide.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateBookingRequest {
    /// The guide to book.
    pub guide_id: i64,
    /// The requested instant (RFC 3339 with offset).
    pub datetime: String,
    /// Free-form notes for the guide.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A booking as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingResponse {
    pub id: i64,
    pub user_id: i64,
    pub guide_id: i64,
    /// The booked instant in canonical UTC form.
    pub datetime: String,
    pub booking_status: String,
    pub notes: Option<String>,
    /// The guide with every offered slot.
    pub guide: GuideResponse,
    pub created_at: String,
}

impl BookingResponse {
    /// Builds the wire form of a booking projection.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the creation timestamp cannot be formatted.
    pub fn from_projection(projection: &BookingProjection) -> Result<Self, ApiError> {
        Ok(Self {
            id: projection.id.value(),
            user_id: projection.user_id.value(),
            guide_id: projection.guide_id.value(),
            datetime: projection.slot.to_canonical_string(),
            booking_status: projection.status.as_str().to_string(),
            notes: projection.notes.clone(),
            guide: GuideResponse::from(&projection.guide),
            created_at: format_instant(projection.created_at)?,
        })
    }
}

fn format_instant(instant: OffsetDateTime) -> Result<String, ApiError> {
    instant.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}
