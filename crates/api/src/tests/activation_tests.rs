// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Activation payment flow tests.

use crate::auth::AuthenticationService;
use crate::error::ApiError;
use crate::payment::{
    ACTIVATION_FEE, ActivationConfirmed, ActivationInitiated, ActivationService,
    SimulatedMpesaGateway,
};
use kazi_domain::{Profile, TransactionKind, can_claim_work};
use kazi_persistence::SqlitePersistence;

use super::helpers::{TEST_PASSWORD, create_test_persistence, register_writer};

fn create_service() -> ActivationService<SimulatedMpesaGateway> {
    ActivationService::new(SimulatedMpesaGateway)
}

#[test]
fn test_activation_flow_flips_gate_and_records_fee() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: Profile = register_writer(&mut persistence, "writer@example.com");
    assert!(!can_claim_work(&writer));

    let mut service = create_service();
    let initiated: ActivationInitiated = service
        .initiate_activation(&mut persistence, &writer.id)
        .unwrap();
    assert!(initiated.reference.starts_with("SB"));
    assert_eq!(service.pending_len(), 1);

    let confirmed: ActivationConfirmed = service
        .confirm_activation(&mut persistence, &initiated.reference)
        .unwrap();
    assert!(!confirmed.already_active);
    assert!(confirmed.profile.is_active);
    assert!(can_claim_work(&confirmed.profile));
    assert_eq!(service.pending_len(), 0);

    let ledger = persistence.list_transactions_for_user(&writer.id).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].kind, TransactionKind::ActivationFee);
    assert_eq!(ledger[0].amount, ACTIVATION_FEE);
    assert_eq!(ledger[0].external_reference, initiated.reference);
}

#[test]
fn test_initiate_requires_phone_number() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: Profile = AuthenticationService::register(
        &mut persistence,
        "phoneless@example.com",
        TEST_PASSWORD,
        TEST_PASSWORD,
        None,
    )
    .unwrap();

    let result = create_service().initiate_activation(&mut persistence, &writer.id);

    assert!(matches!(
        result.unwrap_err(),
        ApiError::InvalidInput { field, .. } if field == "phone_number"
    ));
}

#[test]
fn test_initiate_rejects_already_active_profile() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: Profile = register_writer(&mut persistence, "writer@example.com");
    persistence.activate_profile(&writer.id).unwrap();

    let result = create_service().initiate_activation(&mut persistence, &writer.id);

    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "single_activation"
    ));
}

#[test]
fn test_confirm_unknown_reference_is_not_found() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let result = create_service().confirm_activation(&mut persistence, "SB0000000000");

    assert!(matches!(
        result.unwrap_err(),
        ApiError::ResourceNotFound { .. }
    ));
}

#[test]
fn test_racing_confirmations_flip_only_once() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: Profile = register_writer(&mut persistence, "writer@example.com");

    // Two checkouts initiated before either confirmation lands.
    let mut service = create_service();
    let first: ActivationInitiated = service
        .initiate_activation(&mut persistence, &writer.id)
        .unwrap();
    let second: ActivationInitiated = service
        .initiate_activation(&mut persistence, &writer.id)
        .unwrap();

    let first_confirmed: ActivationConfirmed = service
        .confirm_activation(&mut persistence, &first.reference)
        .unwrap();
    assert!(!first_confirmed.already_active);

    let second_confirmed: ActivationConfirmed = service
        .confirm_activation(&mut persistence, &second.reference)
        .unwrap();
    assert!(second_confirmed.already_active);

    // The flag flipped once, so exactly one fee was recorded.
    let ledger = persistence.list_transactions_for_user(&writer.id).unwrap();
    assert_eq!(ledger.len(), 1);
}

#[test]
fn test_stale_checkouts_expire() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: Profile = register_writer(&mut persistence, "writer@example.com");

    let mut service = create_service();
    service
        .initiate_activation(&mut persistence, &writer.id)
        .unwrap();
    assert_eq!(service.pending_len(), 1);

    service.expire_stale_checkouts(time::Duration::seconds(0));
    assert_eq!(service.pending_len(), 0);
}
