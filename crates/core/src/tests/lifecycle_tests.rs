// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BookingError, cancel_booking, complete_booking, confirm_booking, create_booking,
    list_user_bookings, transition_booking,
};
use guide_book_domain::{BookingId, BookingStatus, GuideId};

use super::helpers::{ALICE, BOB, create_test_store, slot};

#[test]
fn test_create_booking_projects_guide() {
    let mut store = create_test_store();

    let projection = create_booking(
        &mut store,
        GuideId::new(1),
        slot("2024-01-01T12:00:00Z"),
        ALICE,
        None,
    )
    .unwrap();

    assert_eq!(projection.guide_id, GuideId::new(1));
    assert_eq!(projection.status, BookingStatus::Pending);
    assert_eq!(projection.guide.name, "Guide 1");
    assert_eq!(projection.guide.availability.len(), 3);
    assert_eq!(projection.slot.to_canonical_string(), "2024-01-01T12:00:00Z");
}

#[test]
fn test_create_booking_unknown_guide() {
    let mut store = create_test_store();

    let result = create_booking(
        &mut store,
        GuideId::new(42),
        slot("2024-01-01T12:00:00Z"),
        ALICE,
        None,
    );

    assert_eq!(result, Err(BookingError::GuideNotFound(GuideId::new(42))));
}

#[test]
fn test_list_user_bookings_latest_slot_first() {
    let mut store = create_test_store();
    let guide_id = GuideId::new(1);

    create_booking(&mut store, guide_id, slot("2024-01-01T10:00:00Z"), ALICE, None).unwrap();
    create_booking(&mut store, guide_id, slot("2024-01-02T07:30:00Z"), ALICE, None).unwrap();
    create_booking(&mut store, guide_id, slot("2024-01-01T12:00:00Z"), BOB, None).unwrap();

    let bookings = list_user_bookings(&mut store, ALICE).unwrap();
    let slots: Vec<String> = bookings
        .iter()
        .map(|b| b.slot.to_canonical_string())
        .collect();

    assert_eq!(slots, vec!["2024-01-02T07:30:00Z", "2024-01-01T10:00:00Z"]);
}

#[test]
fn test_full_lifecycle() {
    let mut store = create_test_store();
    let booking = create_booking(
        &mut store,
        GuideId::new(1),
        slot("2024-01-01T10:00:00Z"),
        ALICE,
        None,
    )
    .unwrap();

    let confirmed = confirm_booking(&mut store, booking.id, ALICE).unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let completed = complete_booking(&mut store, booking.id, ALICE).unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);
}

#[test]
fn test_illegal_transitions_are_rejected() {
    let mut store = create_test_store();
    let guide_id = GuideId::new(1);

    let pending =
        create_booking(&mut store, guide_id, slot("2024-01-01T10:00:00Z"), ALICE, None).unwrap();
    assert_eq!(
        complete_booking(&mut store, pending.id, ALICE),
        Err(BookingError::InvalidTransition {
            from: BookingStatus::Pending,
            to: BookingStatus::Completed,
        })
    );

    cancel_booking(&mut store, pending.id, ALICE).unwrap();
    assert_eq!(
        confirm_booking(&mut store, pending.id, ALICE),
        Err(BookingError::InvalidTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Confirmed,
        })
    );

    let done =
        create_booking(&mut store, guide_id, slot("2024-01-01T12:00:00Z"), ALICE, None).unwrap();
    confirm_booking(&mut store, done.id, ALICE).unwrap();
    complete_booking(&mut store, done.id, ALICE).unwrap();
    assert_eq!(
        cancel_booking(&mut store, done.id, ALICE),
        Err(BookingError::InvalidTransition {
            from: BookingStatus::Completed,
            to: BookingStatus::Cancelled,
        })
    );
}

#[test]
fn test_cannot_cancel_another_users_booking() {
    let mut store = create_test_store();
    let booking = create_booking(
        &mut store,
        GuideId::new(1),
        slot("2024-01-01T10:00:00Z"),
        ALICE,
        None,
    )
    .unwrap();

    let result = cancel_booking(&mut store, booking.id, BOB);

    assert_eq!(result, Err(BookingError::BookingNotFound(booking.id)));
    assert_eq!(store.bookings[0].status, BookingStatus::Pending);
}

#[test]
fn test_transition_unknown_booking() {
    let mut store = create_test_store();

    let result = transition_booking(
        &mut store,
        BookingId::new(5),
        ALICE,
        BookingStatus::Cancelled,
    );

    assert_eq!(result, Err(BookingError::BookingNotFound(BookingId::new(5))));
}
