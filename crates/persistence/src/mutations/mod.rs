// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `bookings`: Constraint-guarded booking inserts and conditional status updates
//! - `guides`: Guide imports
//! - `users`: User registration
//! - `sessions`: Session creation and removal

pub mod bookings;
pub mod guides;
pub mod sessions;
pub mod users;
