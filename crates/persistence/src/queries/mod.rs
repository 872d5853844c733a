// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `bookings`: Booking lookups, active-slot counts and per-user listings
//! - `guides`: Guide lookups, paginated listings and expertise tags
//! - `users`: User lookups by id or email
//! - `sessions`: Session lookups by token

pub mod bookings;
pub mod guides;
pub mod sessions;
pub mod users;
