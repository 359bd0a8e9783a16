// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistenceError, SqlitePersistence};
use kazi_domain::{Amount, PhoneNumber, Profile, ProfileId, Role, Tier};

use super::{create_test_persistence, insert_writer, test_now};

#[test]
fn test_create_and_get_profile() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let phone: PhoneNumber = PhoneNumber::new("0712345678").unwrap();

    persistence
        .create_profile(
            &ProfileId::new("writer-a"),
            "Writer.A@Example.com",
            Some(&phone),
            "correct horse battery",
            Role::Writer,
            test_now(),
        )
        .unwrap();

    let profile: Profile = persistence
        .get_profile(&ProfileId::new("writer-a"))
        .unwrap()
        .unwrap();

    assert_eq!(profile.email, "writer.a@example.com");
    assert_eq!(profile.phone_number, Some(phone));
    assert_eq!(profile.role, Role::Writer);
    assert_eq!(profile.tier, Tier::Basic);
    assert!(!profile.is_active);
    assert_eq!(profile.wallet_balance, Amount::ZERO);
}

#[test]
fn test_duplicate_email_is_constraint_violation() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    insert_writer(&mut persistence, "writer-a", "writer@example.com");

    let result = persistence.create_profile(
        &ProfileId::new("writer-b"),
        "writer@example.com",
        None,
        "another password",
        Role::Writer,
        test_now(),
    );

    assert!(matches!(
        result.unwrap_err(),
        PersistenceError::ConstraintViolation(_)
    ));
}

#[test]
fn test_verify_credentials_accepts_correct_password() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    insert_writer(&mut persistence, "writer-a", "writer@example.com");

    let profile = persistence
        .verify_credentials("writer@example.com", "correct horse battery")
        .unwrap();

    assert_eq!(profile.unwrap().id, ProfileId::new("writer-a"));
}

#[test]
fn test_verify_credentials_rejects_wrong_password() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    insert_writer(&mut persistence, "writer-a", "writer@example.com");

    let profile = persistence
        .verify_credentials("writer@example.com", "wrong password")
        .unwrap();

    assert!(profile.is_none());
}

#[test]
fn test_verify_credentials_unknown_email_is_not_an_error() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let profile = persistence
        .verify_credentials("nobody@example.com", "anything at all")
        .unwrap();

    assert!(profile.is_none());
}

#[test]
fn test_activate_profile_flips_exactly_once() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: ProfileId = insert_writer(&mut persistence, "writer-a", "writer@example.com");

    assert!(persistence.activate_profile(&writer).unwrap());
    // A second confirmation is a no-op, not a second flip.
    assert!(!persistence.activate_profile(&writer).unwrap());

    let profile: Profile = persistence.get_profile(&writer).unwrap().unwrap();
    assert!(profile.is_active);
}

#[test]
fn test_activate_missing_profile_is_not_found() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let result = persistence.activate_profile(&ProfileId::new("ghost"));

    assert!(matches!(result.unwrap_err(), PersistenceError::NotFound(_)));
}

#[test]
fn test_credit_wallet_accumulates() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: ProfileId = insert_writer(&mut persistence, "writer-a", "writer@example.com");

    persistence
        .credit_wallet(&writer, Amount::from_shillings(2500))
        .unwrap();
    persistence
        .credit_wallet(&writer, Amount::from_shillings(1500))
        .unwrap();

    let profile: Profile = persistence.get_profile(&writer).unwrap().unwrap();
    assert_eq!(profile.wallet_balance, Amount::from_shillings(4000));
}

#[test]
fn test_role_grant_lookup_is_case_insensitive() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    persistence
        .upsert_role_grant("Boss@Example.com", Role::Admin, test_now())
        .unwrap();

    let granted = persistence.get_role_grant("boss@EXAMPLE.com").unwrap();
    assert_eq!(granted.as_deref(), Some("admin"));

    let ungranted = persistence.get_role_grant("writer@example.com").unwrap();
    assert!(ungranted.is_none());
}
