// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registration and password policy tests.

use crate::auth::AuthenticationService;
use crate::error::ApiError;
use crate::password_policy::{PasswordPolicy, PasswordPolicyError};
use kazi_persistence::SqlitePersistence;

use super::helpers::{TEST_PASSWORD, create_test_persistence, register_writer};

#[test]
fn test_policy_rejects_short_password() {
    let policy: PasswordPolicy = PasswordPolicy::default();

    let result = policy.validate("short", "short", "writer@example.com");

    assert_eq!(
        result.unwrap_err(),
        PasswordPolicyError::TooShort { min_length: 8 }
    );
}

#[test]
fn test_policy_rejects_confirmation_mismatch() {
    let policy: PasswordPolicy = PasswordPolicy::default();

    let result = policy.validate("long enough one", "long enough two", "writer@example.com");

    assert_eq!(result.unwrap_err(), PasswordPolicyError::ConfirmationMismatch);
}

#[test]
fn test_policy_rejects_password_matching_email() {
    let policy: PasswordPolicy = PasswordPolicy::default();

    let result = policy.validate(
        "Writer@Example.com",
        "Writer@Example.com",
        "writer@example.com",
    );

    assert_eq!(result.unwrap_err(), PasswordPolicyError::MatchesEmail);
}

#[test]
fn test_register_surfaces_policy_violations() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let result = AuthenticationService::register(
        &mut persistence,
        "writer@example.com",
        "short",
        "short",
        None,
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::PasswordPolicyViolation { .. }
    ));
}

#[test]
fn test_register_rejects_invalid_email() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let result = AuthenticationService::register(
        &mut persistence,
        "not-an-email",
        TEST_PASSWORD,
        TEST_PASSWORD,
        None,
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::InvalidInput { field, .. } if field == "email"
    ));
}

#[test]
fn test_register_rejects_duplicate_email() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    register_writer(&mut persistence, "writer@example.com");

    let result = AuthenticationService::register(
        &mut persistence,
        "writer@example.com",
        TEST_PASSWORD,
        TEST_PASSWORD,
        None,
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "unique_email"
    ));
}

#[test]
fn test_register_rejects_implausible_phone() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let result = AuthenticationService::register(
        &mut persistence,
        "writer@example.com",
        TEST_PASSWORD,
        TEST_PASSWORD,
        Some("12345"),
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::InvalidInput { field, .. } if field == "phone_number"
    ));
}
