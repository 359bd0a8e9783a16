// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Amount, Category, DomainError, PhoneNumber, Role, Tier};
use std::str::FromStr;

#[test]
fn test_amount_from_shillings() {
    let amount: Amount = Amount::from_shillings(500);
    assert_eq!(amount.cents(), 50_000);
    assert_eq!(amount.shillings(), 500);
}

#[test]
fn test_amount_is_positive() {
    assert!(Amount::from_cents(1).is_positive());
    assert!(!Amount::ZERO.is_positive());
    assert!(!Amount::from_cents(-100).is_positive());
}

#[test]
fn test_amount_display_formats_cents() {
    let amount: Amount = Amount::from_cents(250_050);
    assert_eq!(amount.to_string(), "KES 2500.50");
}

#[test]
fn test_amount_saturating_add() {
    let a: Amount = Amount::from_cents(i64::MAX);
    let b: Amount = Amount::from_cents(100);
    assert_eq!(a.saturating_add(b).cents(), i64::MAX);
}

#[test]
fn test_phone_number_accepts_ten_digits() {
    let phone = PhoneNumber::new("0712345678");
    assert!(phone.is_ok());
}

#[test]
fn test_phone_number_accepts_formatted_numbers() {
    let phone = PhoneNumber::new("+254 712 345 678");
    assert!(phone.is_ok());
}

#[test]
fn test_phone_number_rejects_short_numbers() {
    let result = PhoneNumber::new("07123");

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidPhoneNumber(_)
    ));
}

#[test]
fn test_role_round_trips_through_strings() {
    for role in [Role::Admin, Role::Writer, Role::Guest] {
        assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
    }
}

#[test]
fn test_role_rejects_unknown_string() {
    assert!(matches!(
        Role::from_str("superuser").unwrap_err(),
        DomainError::InvalidRole(_)
    ));
}

#[test]
fn test_tier_defaults_to_basic() {
    assert_eq!(Tier::default(), Tier::Basic);
}

#[test]
fn test_tier_round_trips_through_strings() {
    for tier in [Tier::Basic, Tier::Pro, Tier::Elite] {
        assert_eq!(Tier::from_str(tier.as_str()).unwrap(), tier);
    }
}

#[test]
fn test_category_set_is_fixed() {
    assert_eq!(Category::ALL.len(), 10);
    for category in Category::ALL {
        assert_eq!(Category::from_str(category.as_str()).unwrap(), category);
    }
}

#[test]
fn test_category_rejects_free_form_input() {
    assert!(matches!(
        Category::from_str("Underwater Basket Weaving").unwrap_err(),
        DomainError::InvalidCategory(_)
    ));
}
