// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Server-side activation gate enforcement.
//!
//! The predicate itself lives in the domain crate; this module is the
//! enforcement point the state-mutating operations call. The check runs
//! against a freshly loaded profile on every bid placement and work
//! submission, so a request that bypasses the UI still cannot bypass
//! the gate.

use crate::error::{ApiError, translate_domain_error};
use kazi_domain::{DomainError, Profile, can_claim_work};

/// Ensures the profile may claim paid work.
///
/// # Arguments
///
/// * `profile` - The freshly loaded profile of the caller
///
/// # Errors
///
/// Returns an activation-required error if the profile fails the gate.
pub fn ensure_may_claim(profile: &Profile) -> Result<(), ApiError> {
    if can_claim_work(profile) {
        return Ok(());
    }

    Err(translate_domain_error(DomainError::ActivationRequired {
        writer_id: profile.id.to_string(),
    }))
}
