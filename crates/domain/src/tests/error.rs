// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidSlot {
        input: String::from("tomorrow"),
        reason: String::from("not RFC 3339"),
    };
    assert_eq!(format!("{err}"), "Invalid slot 'tomorrow': not RFC 3339");

    let err: DomainError = DomainError::InvalidIdentifier {
        field: "guide_id",
        value: 0,
    };
    assert_eq!(
        format!("{err}"),
        "Invalid guide_id: 0 (must be a positive integer)"
    );

    let err: DomainError = DomainError::InvalidName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid name: test");

    let err: DomainError = DomainError::InvalidEmail(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid email: test");

    let err: DomainError = DomainError::InvalidBookingStatus {
        status: String::from("refunded"),
    };
    assert_eq!(format!("{err}"), "Invalid booking status: refunded");

    let err: DomainError = DomainError::InvalidStatusTransition {
        from: String::from("cancelled"),
        to: String::from("confirmed"),
        reason: String::from("cannot transition from terminal state"),
    };
    assert_eq!(
        format!("{err}"),
        "Cannot transition booking from cancelled to confirmed: cannot transition from terminal state"
    );
}

#[test]
fn test_domain_error_equality() {
    let a: DomainError = DomainError::InvalidName(String::from("x"));
    let b: DomainError = DomainError::InvalidName(String::from("x"));
    let c: DomainError = DomainError::InvalidEmail(String::from("x"));
    assert_eq!(a, b);
    assert_ne!(a, c);
}
