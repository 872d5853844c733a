// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use guide_book_domain::GuideId;
use guide_book_persistence::{GuideSeed, Persistence};

use crate::{
    AuthenticatedUser, CreateBookingRequest, RegisterRequest, register_user, validate_session,
};

pub const PASSWORD: &str = "Tr@ilHead42";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn register_request(name: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
    }
}

/// Registers a user and resolves their session.
pub fn register_test_user(
    persistence: &mut Persistence,
    name: &str,
    email: &str,
) -> AuthenticatedUser {
    let response = register_user(persistence, &register_request(name, email)).unwrap();
    validate_session(persistence, &response.token).unwrap()
}

pub fn insert_test_guide(
    persistence: &mut Persistence,
    name: &str,
    expertise: &str,
    slots: &[&str],
) -> GuideId {
    persistence
        .insert_guide(&GuideSeed {
            name: name.to_string(),
            expertise: expertise.to_string(),
            availability: slots.iter().map(ToString::to_string).collect(),
        })
        .unwrap()
}

pub fn booking_request(guide_id: GuideId, datetime: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        guide_id: guide_id.value(),
        datetime: datetime.to_string(),
        notes: None,
    }
}
