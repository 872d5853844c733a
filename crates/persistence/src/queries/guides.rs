// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guide queries.

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel::sqlite::Sqlite;
use guide_book::{GuidePage, GuideQuery};
use guide_book_domain::{Availability, Guide, GuideId};
use tracing::{debug, warn};

use crate::diesel_schema::guides;
use crate::error::PersistenceError;

/// Diesel Queryable struct for guide rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = guides)]
pub struct GuideRow {
    pub guide_id: i64,
    pub name: String,
    pub expertise: String,
    pub availability_json: String,
}

impl GuideRow {
    /// Converts the row into a domain guide.
    #[must_use]
    pub fn into_guide(self) -> Guide {
        let availability: Availability = parse_availability(self.guide_id, &self.availability_json);
        Guide {
            id: GuideId::new(self.guide_id),
            name: self.name,
            expertise: self.expertise,
            availability,
        }
    }
}

/// Decodes the stored availability column.
///
/// Non-string array entries are dropped. A column that is not a JSON array
/// yields an empty availability; the guide stays listable but offers nothing.
fn parse_availability(guide_id: i64, json: &str) -> Availability {
    match serde_json::from_str::<Vec<serde_json::Value>>(json) {
        Ok(values) => Availability::new(
            values
                .into_iter()
                .filter_map(|value| match value {
                    serde_json::Value::String(entry) => Some(entry),
                    _ => None,
                })
                .collect(),
        ),
        Err(e) => {
            warn!(guide_id, error = %e, "Ignoring unreadable guide availability");
            Availability::default()
        }
    }
}

/// Case-insensitive expertise filter.
///
/// Compares against `expertise_key`, which holds the tag lowercased with
/// Unicode rules when the guide is written. `SQLite`'s `lower()` only folds
/// ASCII.
fn expertise_matches(
    expertise: &str,
) -> Box<dyn BoxableExpression<guides::table, Sqlite, SqlType = Bool>> {
    Box::new(guides::expertise_key.eq(expertise.to_lowercase()))
}

/// Retrieves a guide by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the guide is not found.
pub fn get_guide_by_id(
    conn: &mut SqliteConnection,
    guide_id: GuideId,
) -> Result<Option<Guide>, PersistenceError> {
    debug!("Looking up guide by ID: {}", guide_id);

    let row: Option<GuideRow> = guides::table
        .filter(guides::guide_id.eq(guide_id.value()))
        .select(GuideRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(GuideRow::into_guide))
}

/// Retrieves one page of guides ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_guides(
    conn: &mut SqliteConnection,
    query: &GuideQuery,
) -> Result<GuidePage, PersistenceError> {
    let mut count_query = guides::table.select(count_star()).into_boxed();
    let mut page_query = guides::table
        .select(GuideRow::as_select())
        .order(guides::guide_id.asc())
        .into_boxed();

    if let Some(expertise) = &query.expertise {
        count_query = count_query.filter(expertise_matches(expertise));
        page_query = page_query.filter(expertise_matches(expertise));
    }

    let total: i64 = count_query.get_result(conn)?;

    let limit: i64 = i64::from(query.size);
    let offset: i64 = i64::try_from(query.offset())
        .map_err(|e| PersistenceError::QueryFailed(format!("page offset out of range: {e}")))?;

    let rows: Vec<GuideRow> = page_query.limit(limit).offset(offset).load(conn)?;

    debug!(
        total,
        returned = rows.len(),
        page = query.page,
        size = query.size,
        "Listed guides"
    );

    Ok(GuidePage {
        guides: rows.into_iter().map(GuideRow::into_guide).collect(),
        total: u64::try_from(total).unwrap_or_default(),
    })
}

/// Retrieves the distinct expertise tags, sorted.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_expertises(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(guides::table
        .select(guides::expertise)
        .distinct()
        .order(guides::expertise.asc())
        .load::<String>(conn)?)
}
