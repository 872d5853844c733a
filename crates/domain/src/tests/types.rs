// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Availability, DomainError, Email, Guide, GuideId, NewUser, Slot};

#[test]
fn test_id_parse_rejects_non_positive_values() {
    assert_eq!(GuideId::parse(7).unwrap().value(), 7);
    assert_eq!(
        GuideId::parse(0),
        Err(DomainError::InvalidIdentifier {
            field: "guide_id",
            value: 0
        })
    );
    assert!(GuideId::parse(-3).is_err());
}

#[test]
fn test_email_is_normalized_to_lowercase() {
    let email: Email = Email::new(" Ann.Smith@Example.COM ").unwrap();
    assert_eq!(email.value(), "ann.smith@example.com");
}

#[test]
fn test_new_user_trims_name() {
    let user: NewUser = NewUser::new("  Ann Smith ", "ann@example.com").unwrap();
    assert_eq!(user.name, "Ann Smith");
    assert_eq!(user.email.value(), "ann@example.com");
}

#[test]
fn test_new_user_rejects_invalid_email() {
    assert!(matches!(
        NewUser::new("Ann Smith", "not-an-email"),
        Err(DomainError::InvalidEmail(_))
    ));
}

#[test]
fn test_guide_offered_slots_follow_publication_order() {
    let guide: Guide = Guide {
        id: GuideId::new(1),
        name: String::from("Mara"),
        expertise: String::from("Climbing"),
        availability: Availability::new(vec![
            String::from("2024-05-02T09:00:00Z"),
            String::from("2024-05-01T09:00:00Z"),
        ]),
    };

    let slots: Vec<Slot> = guide.offered_slots();
    assert_eq!(slots[0].to_canonical_string(), "2024-05-02T09:00:00Z");
    assert_eq!(slots[1].to_canonical_string(), "2024-05-01T09:00:00Z");
}
