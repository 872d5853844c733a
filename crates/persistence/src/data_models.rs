// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A user row including its credential hash.
///
/// Only the authentication layer should see this type.
#[derive(Debug, Clone)]
pub struct UserData {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

/// A session row.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub expires_at: String,
}

/// A guide as supplied by the external authoring process.
///
/// Availability entries are stored verbatim; malformed entries are kept
/// and ignored when read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideSeed {
    pub name: String,
    pub expertise: String,
    #[serde(default)]
    pub availability: Vec<String>,
}
