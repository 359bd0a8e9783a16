// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Represents a profile identifier.
///
/// Profile identifiers are opaque and stable: they come from the
/// authentication provider and never change for the lifetime of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(String);

impl ProfileId {
    /// Creates a new profile identifier.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new task identifier.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a bid identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BidId(String);

impl BidId {
    /// Creates a new bid identifier.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BidId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Creates a new transaction identifier.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monetary amount in minor currency units (KES cents).
///
/// Money is always integer cents. Floating point is never used for
/// amounts, so no rounding drift can accumulate across ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    /// A zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a count of minor currency units.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole shillings.
    #[must_use]
    pub const fn from_shillings(shillings: i64) -> Self {
        Self(shillings * 100)
    }

    /// Returns the amount in minor currency units.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-shilling part of the amount.
    #[must_use]
    pub const fn shillings(&self) -> i64 {
        self.0 / 100
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns the sum of this amount and another, saturating at the
    /// representable bounds.
    #[must_use]
    pub const fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KES {}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

/// A mobile-money destination phone number.
///
/// Validated at construction: a plausible number has at least ten digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a phone number after validating it.
    ///
    /// # Arguments
    ///
    /// * `value` - The phone number string
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPhoneNumber` if the value contains
    /// fewer than ten digits.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let digits: usize = value.chars().filter(char::is_ascii_digit).count();
        if digits < 10 {
            return Err(DomainError::InvalidPhoneNumber(String::from(
                "Phone number must contain at least 10 digits",
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the phone number value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marketplace roles.
///
/// Every profile has exactly one role. Roles are a mutually exclusive
/// capability set: admins post and review work, writers bid on and
/// submit work, guests can only browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administrators post tasks, review bids, and approve submissions.
    Admin,
    /// Writers bid on open tasks and submit completed work.
    Writer,
    /// Guests may browse but cannot act on tasks.
    Guest,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Writer => "writer",
            Self::Guest => "guest",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "writer" => Ok(Self::Writer),
            "guest" => Ok(Self::Guest),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription tiers.
///
/// The tier affects pay rate and perks. It is orthogonal to activation:
/// a Pro writer with an unpaid activation fee still cannot claim work,
/// and a Basic writer who has activated can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Default tier for new registrations.
    #[default]
    Basic,
    /// Paid tier with improved rates.
    Pro,
    /// Top tier with priority access.
    Elite,
}

impl Tier {
    /// Returns the string representation of the tier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Elite => "elite",
        }
    }
}

impl FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "pro" => Ok(Self::Pro),
            "elite" => Ok(Self::Elite),
            _ => Err(DomainError::InvalidTier(s.to_string())),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The identity and marketplace standing of a user.
///
/// Profiles are created at registration and never deleted in-flow. The
/// activation flag flips to true exactly once, when an activation payment
/// is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The opaque, stable identifier.
    pub id: ProfileId,
    /// The registered email address.
    pub email: String,
    /// The mobile-payment destination, if provided.
    pub phone_number: Option<PhoneNumber>,
    /// The profile's role.
    pub role: Role,
    /// The subscription tier.
    pub tier: Tier,
    /// Whether the activation fee has been paid.
    pub is_active: bool,
    /// The wallet balance in minor currency units.
    pub wallet_balance: Amount,
}

/// A ledger entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// The one-time account activation fee.
    ActivationFee,
    /// Earnings released for an approved task.
    Payout,
    /// Funds moved out of the wallet.
    Withdrawal,
    /// A subscription tier payment.
    Subscription,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ActivationFee => "activation_fee",
            Self::Payout => "payout",
            Self::Withdrawal => "withdrawal",
            Self::Subscription => "subscription",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activation_fee" => Ok(Self::ActivationFee),
            "payout" => Ok(Self::Payout),
            "withdrawal" => Ok(Self::Withdrawal),
            "subscription" => Ok(Self::Subscription),
            _ => Err(DomainError::InvalidTransactionKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Initiated but not yet settled by the gateway.
    Pending,
    /// Settled successfully.
    Complete,
    /// Declined or timed out.
    Failed,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "complete" => Ok(Self::Complete),
            "failed" => Ok(Self::Failed),
            _ => Err(DomainError::InvalidTransactionStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger entry for money movement.
///
/// Transactions are append-only: they are created as a side effect of
/// payment confirmation or payout release and never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction identifier.
    pub id: TransactionId,
    /// The profile the money moved for.
    pub user_id: ProfileId,
    /// The entry kind.
    pub kind: TransactionKind,
    /// The amount in minor currency units.
    pub amount: Amount,
    /// The external payment reference issued by the gateway.
    pub external_reference: String,
    /// The settlement status.
    pub status: TransactionStatus,
    /// When the entry was recorded.
    pub created_at: OffsetDateTime,
}
