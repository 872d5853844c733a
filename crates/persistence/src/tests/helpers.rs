// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use guide_book_domain::{Guide, GuideId, Slot, UserId};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::diesel_schema::users;
use crate::{GuideSeed, Persistence};

static TEMP_DB_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

/// Inserts a user row directly, skipping bcrypt to keep tests fast.
pub fn insert_test_user(persistence: &mut Persistence, email: &str) -> UserId {
    let user_id: i64 = diesel::insert_into(users::table)
        .values((
            users::name.eq("Test User"),
            users::email.eq(email),
            users::password_hash.eq("not-a-real-hash"),
            users::created_at.eq("2024-01-01T00:00:00Z"),
        ))
        .returning(users::user_id)
        .get_result(&mut persistence.conn)
        .unwrap();
    UserId::new(user_id)
}

pub fn guide_seed(name: &str, expertise: &str, slots: &[&str]) -> GuideSeed {
    GuideSeed {
        name: name.to_string(),
        expertise: expertise.to_string(),
        availability: slots.iter().map(ToString::to_string).collect(),
    }
}

pub fn insert_test_guide(persistence: &mut Persistence, slots: &[&str]) -> Guide {
    let guide_id: GuideId = persistence
        .insert_guide(&guide_seed("Ada", "Hiking", slots))
        .unwrap();
    guide_book::BookingStore::find_guide(persistence, guide_id)
        .unwrap()
        .unwrap()
}

pub fn slot(input: &str) -> Slot {
    Slot::parse(input).unwrap()
}

/// A fresh database file path under the system temp directory.
pub fn temp_db_path(label: &str) -> PathBuf {
    let id: u64 = TEMP_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "guide_book_{label}_{}_{id}.sqlite",
        std::process::id()
    ))
}

/// Removes a database file and its WAL companions.
pub fn remove_db_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}
