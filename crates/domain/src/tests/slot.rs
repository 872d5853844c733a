// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for slot parsing, comparison and availability handling.

use crate::{Availability, DomainError, Slot};

#[test]
fn test_parse_utc_slot() {
    let slot: Slot = Slot::parse("2024-01-01T10:00:00Z").unwrap();
    assert_eq!(slot.to_canonical_string(), "2024-01-01T10:00:00Z");
    assert_eq!(slot.unix_nanos(), 1_704_103_200_000_000_000);
}

#[test]
fn test_slots_compare_by_instant_not_text() {
    let utc: Slot = Slot::parse("2024-01-01T10:00:00Z").unwrap();
    let zero_offset: Slot = Slot::parse("2024-01-01T10:00:00+00:00").unwrap();
    let plus_one: Slot = Slot::parse("2024-01-01T11:00:00+01:00").unwrap();
    let minus_five: Slot = Slot::parse("2024-01-01T05:00:00-05:00").unwrap();

    assert_eq!(utc, zero_offset);
    assert_eq!(utc, plus_one);
    assert_eq!(utc, minus_five);
    assert_eq!(plus_one.to_canonical_string(), "2024-01-01T10:00:00Z");
}

#[test]
fn test_slot_ordering_follows_time() {
    let earlier: Slot = Slot::parse("2024-01-01T11:30:00+02:00").unwrap();
    let later: Slot = Slot::parse("2024-01-01T10:00:00Z").unwrap();
    assert!(earlier < later);
}

#[test]
fn test_parse_rejects_missing_offset() {
    let result: Result<Slot, DomainError> = Slot::parse("2024-01-01T10:00:00");
    assert!(matches!(result, Err(DomainError::InvalidSlot { .. })));
}

#[test]
fn test_parse_rejects_date_only_and_garbage() {
    for input in ["2024-01-01", "10:00:00Z", "", "not a date", "2024-13-01T10:00:00Z"] {
        assert!(
            matches!(Slot::parse(input), Err(DomainError::InvalidSlot { .. })),
            "expected {input:?} to be rejected"
        );
    }
}

#[test]
fn test_parse_rejects_instants_outside_storable_range() {
    assert!(Slot::parse("2300-01-01T00:00:00Z").is_err());
    assert!(Slot::parse("1600-01-01T00:00:00Z").is_err());
}

#[test]
fn test_unix_nanos_round_trip_preserves_instant() {
    let slot: Slot = Slot::parse("2025-06-15T08:45:30.25+02:00").unwrap();
    let restored: Slot = Slot::from_unix_nanos(slot.unix_nanos()).unwrap();
    assert_eq!(slot, restored);
}

#[test]
fn test_slot_serializes_as_canonical_string() {
    let slot: Slot = Slot::parse("2024-03-10T09:00:00+09:00").unwrap();
    let json: String = serde_json::to_string(&slot).unwrap();
    assert_eq!(json, "\"2024-03-10T00:00:00Z\"");
}

fn availability(entries: &[&str]) -> Availability {
    Availability::new(entries.iter().map(ToString::to_string).collect())
}

#[test]
fn test_offered_slots_skip_malformed_entries() {
    let availability: Availability = availability(&[
        "2024-01-01T10:00:00Z",
        "next tuesday",
        "2024-01-01T12:00:00+00:00",
    ]);

    let offered: Vec<String> = availability
        .offered_slots()
        .iter()
        .map(Slot::to_canonical_string)
        .collect();
    assert_eq!(
        offered,
        vec!["2024-01-01T10:00:00Z", "2024-01-01T12:00:00Z"]
    );
    assert_eq!(availability.entries().len(), 3);
    assert!(!availability.offers(Slot::parse("2024-01-01T11:00:00Z").unwrap()));
}

#[test]
fn test_offered_slots_collapse_duplicate_instants() {
    let availability: Availability = availability(&[
        "2024-01-01T10:00:00Z",
        "2024-01-01T11:00:00+01:00",
        "2024-01-01T09:00:00Z",
    ]);

    let offered: Vec<Slot> = availability.offered_slots();
    assert_eq!(offered.len(), 2);
    assert_eq!(offered[0].to_canonical_string(), "2024-01-01T10:00:00Z");
    assert_eq!(offered[1].to_canonical_string(), "2024-01-01T09:00:00Z");
}

#[test]
fn test_offers_matches_by_instant() {
    let availability: Availability = availability(&["2024-01-01T10:00:00Z", "garbage"]);

    assert!(availability.offers(Slot::parse("2024-01-01T11:00:00+01:00").unwrap()));
    assert!(!availability.offers(Slot::parse("2024-01-01T10:00:01Z").unwrap()));
}

#[test]
fn test_availability_json_is_a_plain_string_array() {
    let availability: Availability =
        serde_json::from_str(r#"["2024-01-01T10:00:00Z","bad"]"#).unwrap();
    assert_eq!(availability.entries().len(), 2);
    assert_eq!(
        serde_json::to_string(&availability).unwrap(),
        r#"["2024-01-01T10:00:00Z","bad"]"#
    );
}
