// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the guide listing.

use crate::tests::helpers::{
    booking_request, create_test_persistence, insert_test_guide, register_test_user,
};
use crate::{ListGuidesRequest, cancel_booking, create_booking, list_guides};

fn request(page: Option<&str>, size: Option<&str>, expertise: Option<&str>) -> ListGuidesRequest {
    ListGuidesRequest {
        page: page.map(String::from),
        size: size.map(String::from),
        expertise: expertise.map(String::from),
    }
}

#[test]
fn test_listing_shows_free_slots_and_restores_on_cancel() {
    let mut persistence = create_test_persistence();
    let alice = register_test_user(&mut persistence, "Alice", "alice@example.com");
    let guide_id = insert_test_guide(
        &mut persistence,
        "Ada",
        "Hiking",
        &["2024-01-01T10:00:00Z", "garbage", "2024-01-01T12:00:00+00:00"],
    );

    let listing = list_guides(&mut persistence, &ListGuidesRequest::default()).unwrap();
    assert_eq!(
        listing.guides[0].availability,
        vec!["2024-01-01T10:00:00Z", "2024-01-01T12:00:00Z"]
    );

    let booking = create_booking(
        &mut persistence,
        &alice,
        &booking_request(guide_id, "2024-01-01T10:00:00Z"),
    )
    .unwrap();
    let listing = list_guides(&mut persistence, &ListGuidesRequest::default()).unwrap();
    assert_eq!(listing.guides[0].availability, vec!["2024-01-01T12:00:00Z"]);

    cancel_booking(&mut persistence, &alice, booking.id).unwrap();
    let listing = list_guides(&mut persistence, &ListGuidesRequest::default()).unwrap();
    assert_eq!(
        listing.guides[0].availability,
        vec!["2024-01-01T10:00:00Z", "2024-01-01T12:00:00Z"]
    );
}

#[test]
fn test_listing_filters_and_paginates() {
    let mut persistence = create_test_persistence();
    insert_test_guide(&mut persistence, "Ada", "Hiking", &[]);
    insert_test_guide(&mut persistence, "Bea", "Kayaking", &[]);
    insert_test_guide(&mut persistence, "Cyd", "hiking", &[]);

    let all = list_guides(&mut persistence, &request(None, None, Some("ALL"))).unwrap();
    assert_eq!(all.pagination.total, 3);
    assert_eq!(all.pagination.page, 1);
    assert_eq!(all.pagination.size, 10);
    assert_eq!(all.expertises, vec!["Hiking", "Kayaking", "hiking"]);

    let hiking = list_guides(&mut persistence, &request(None, None, Some("HIKING"))).unwrap();
    let names: Vec<&str> = hiking.guides.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Cyd"]);
    assert_eq!(hiking.pagination.total, 2);

    let second_page = list_guides(&mut persistence, &request(Some("2"), Some("2"), None)).unwrap();
    let names: Vec<&str> = second_page.guides.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Cyd"]);
    assert_eq!(second_page.pagination.total, 3);

    let defaults = list_guides(&mut persistence, &request(Some("-1"), Some("abc"), None)).unwrap();
    assert_eq!(defaults.pagination.page, 1);
    assert_eq!(defaults.pagination.size, 10);
}
