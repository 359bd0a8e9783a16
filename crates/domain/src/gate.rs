// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The activation gate predicate.
//!
//! Whether a profile may act on paid tasks is a property of the profile
//! alone, independent of page routing or any UI affordance. The API
//! layer re-checks this predicate inside every state-mutating operation
//! a writer can reach, so bypassing the UI cannot bypass the gate.

use crate::types::{Profile, Role};

/// Returns true if the profile may claim paid work.
///
/// Admins always pass. For everyone else, only the activation flag
/// matters: subscription tier never gates assignment eligibility.
#[must_use]
pub fn can_claim_work(profile: &Profile) -> bool {
    profile.role == Role::Admin || profile.is_active
}
