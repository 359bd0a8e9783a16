// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identifier and payment-reference generation.

use std::time::{SystemTime, UNIX_EPOCH};

/// Generates a fresh opaque identifier with the given prefix.
///
/// Identifiers combine a nanosecond timestamp with a random component;
/// they are opaque to every consumer and only ever compared for
/// equality.
#[must_use]
pub fn fresh_id(prefix: &str) -> String {
    let timestamp: u128 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{prefix}_{timestamp}_{}", rand::random::<u64>())
}

/// Generates an external payment reference in the gateway's format.
///
/// References carry the gateway's `SB` prefix followed by a random
/// uppercase alphanumeric tail.
#[must_use]
pub fn payment_reference() -> String {
    format!("SB{:010X}", rand::random::<u64>() & 0xFF_FFFF_FFFF)
}
