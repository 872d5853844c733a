// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot model.
//!
//! A slot is a point-in-time appointment start published by a guide.
//! Slots arrive as RFC 3339 strings with a mandatory offset or `Z`
//! designator and are compared by absolute instant, never by text.
//! Internally every slot is held in UTC with nanosecond precision and
//! must fit a signed 64-bit nanosecond count since the Unix epoch, which
//! is also its storage representation.

use crate::error::DomainError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A guide's offered appointment start, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(OffsetDateTime);

impl Slot {
    /// Parses a slot from its RFC 3339 wire form.
    ///
    /// The input must carry a date, a time and an offset (`+01:00`) or the
    /// UTC designator (`Z`). Bare local times are rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSlot` if the input is not RFC 3339 or the
    /// instant falls outside the storable range.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let parsed: OffsetDateTime =
            OffsetDateTime::parse(input, &Rfc3339).map_err(|e| DomainError::InvalidSlot {
                input: input.to_string(),
                reason: e.to_string(),
            })?;

        let nanos: i64 = i64::try_from(parsed.unix_timestamp_nanos()).map_err(|_| {
            DomainError::InvalidSlot {
                input: input.to_string(),
                reason: String::from("instant is outside the supported range"),
            }
        })?;

        Self::from_unix_nanos(nanos)
    }

    /// Rebuilds a slot from its storage representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSlot` if the value cannot be represented.
    pub fn from_unix_nanos(nanos: i64) -> Result<Self, DomainError> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))
            .map(Self)
            .map_err(|e| DomainError::InvalidSlot {
                input: nanos.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns the storage representation: nanoseconds since the Unix epoch.
    #[must_use]
    pub fn unix_nanos(&self) -> i64 {
        // Every Slot is constructed from an i64 nanosecond count.
        i64::try_from(self.0.unix_timestamp_nanos()).unwrap_or(i64::MAX)
    }

    /// Formats the slot in canonical UTC RFC 3339 (`2024-01-01T10:00:00Z`).
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let formatted: String = self.0.format(&Rfc3339).map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The raw list of slot strings a guide publishes.
///
/// Entries are kept exactly as supplied by the authoring process. Readers
/// only ever see the parseable entries; malformed ones are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(Vec<String>);

impl Availability {
    /// Wraps the raw slot strings of a guide.
    #[must_use]
    pub const fn new(entries: Vec<String>) -> Self {
        Self(entries)
    }

    /// Returns the raw entries, including malformed ones.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// Returns the parseable slots in publication order.
    ///
    /// Malformed entries are skipped. When two entries denote the same
    /// instant only the first is kept.
    #[must_use]
    pub fn offered_slots(&self) -> Vec<Slot> {
        let mut seen: HashSet<Slot> = HashSet::new();
        self.0
            .iter()
            .filter_map(|entry| Slot::parse(entry).ok())
            .filter(|slot| seen.insert(*slot))
            .collect()
    }

    /// Returns true if `slot` equals one of the offered instants.
    #[must_use]
    pub fn offers(&self, slot: Slot) -> bool {
        self.0
            .iter()
            .filter_map(|entry| Slot::parse(entry).ok())
            .any(|offered| offered == slot)
    }
}

impl From<Vec<String>> for Availability {
    fn from(entries: Vec<String>) -> Self {
        Self::new(entries)
    }
}
