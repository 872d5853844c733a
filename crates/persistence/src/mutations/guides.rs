// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guide mutations.
//!
//! Guides are authored outside this service; inserts exist for seeding
//! fixtures and tests.

use diesel::SqliteConnection;
use diesel::prelude::*;
use guide_book_domain::GuideId;
use tracing::{info, warn};

use crate::data_models::GuideSeed;
use crate::diesel_schema::guides;
use crate::error::PersistenceError;

/// Inserts a guide, storing its availability entries verbatim.
///
/// # Errors
///
/// Returns an error if the availability cannot be encoded or the insert fails.
pub fn insert_guide(
    conn: &mut SqliteConnection,
    seed: &GuideSeed,
) -> Result<GuideId, PersistenceError> {
    let availability_json: String = serde_json::to_string(&seed.availability)?;

    let guide_id: i64 = diesel::insert_into(guides::table)
        .values((
            guides::name.eq(&seed.name),
            guides::expertise.eq(&seed.expertise),
            guides::expertise_key.eq(seed.expertise.to_lowercase()),
            guides::availability_json.eq(&availability_json),
        ))
        .returning(guides::guide_id)
        .get_result(conn)?;

    info!(guide_id, name = %seed.name, "Guide created");
    Ok(GuideId::new(guide_id))
}

/// Inserts every guide of a fixture in a single transaction.
///
/// # Errors
///
/// Returns an error if any insert fails; nothing is written in that case.
pub fn import_guides(
    conn: &mut SqliteConnection,
    seeds: &[GuideSeed],
) -> Result<Vec<GuideId>, PersistenceError> {
    conn.transaction(|conn| {
        seeds
            .iter()
            .map(|seed| {
                if seed.availability.is_empty() {
                    warn!(name = %seed.name, "Importing guide without availability");
                }
                insert_guide(conn, seed)
            })
            .collect()
    })
}
