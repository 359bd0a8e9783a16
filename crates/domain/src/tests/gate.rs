// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Amount, Profile, ProfileId, Role, Tier, can_claim_work};

fn create_test_profile(role: Role, tier: Tier, is_active: bool) -> Profile {
    Profile {
        id: ProfileId::new("profile-1"),
        email: String::from("writer@example.com"),
        phone_number: None,
        role,
        tier,
        is_active,
        wallet_balance: Amount::ZERO,
    }
}

#[test]
fn test_admin_always_passes_gate() {
    let profile: Profile = create_test_profile(Role::Admin, Tier::Basic, false);
    assert!(can_claim_work(&profile));
}

#[test]
fn test_activated_writer_passes_gate() {
    let profile: Profile = create_test_profile(Role::Writer, Tier::Basic, true);
    assert!(can_claim_work(&profile));
}

#[test]
fn test_inactive_writer_fails_gate() {
    let profile: Profile = create_test_profile(Role::Writer, Tier::Basic, false);
    assert!(!can_claim_work(&profile));
}

#[test]
fn test_tier_never_substitutes_for_activation() {
    // An Elite subscription without the activation fee still fails.
    let profile: Profile = create_test_profile(Role::Writer, Tier::Elite, false);
    assert!(!can_claim_work(&profile));
}

#[test]
fn test_inactive_guest_fails_gate() {
    let profile: Profile = create_test_profile(Role::Guest, Tier::Basic, false);
    assert!(!can_claim_work(&profile));
}
