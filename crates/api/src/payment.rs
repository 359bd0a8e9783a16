// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mobile-payment gateway contract and the activation flow.
//!
//! The gateway is confirmation-by-callback: `initiate` asks the
//! gateway to push a payment prompt to the phone and registers a
//! pending checkout under the gateway's reference, and settlement
//! arrives later as a separate confirm call carrying that reference.
//! Nothing in the flow blocks waiting for the subscriber to enter a
//! PIN.
//!
//! The simulated gateway stands in for the real Daraja integration: it
//! accepts any plausible phone number and issues references in the
//! production format.

use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::{ApiError, translate_persistence_error};
use crate::ids;
use kazi_domain::{
    Amount, PhoneNumber, Profile, ProfileId, Transaction, TransactionId, TransactionKind,
    TransactionStatus,
};
use kazi_persistence::SqlitePersistence;

/// The one-time account activation fee (KES 500).
pub const ACTIVATION_FEE: Amount = Amount::from_cents(50_000);

/// Errors from the payment gateway collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The gateway refused to initiate the payment.
    Rejected {
        /// The gateway's stated reason.
        reason: String,
    },
    /// The gateway could not be reached.
    Unavailable(String),
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { reason } => write!(f, "Payment rejected: {reason}"),
            Self::Unavailable(msg) => write!(f, "Payment gateway unavailable: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// A payment prompt pushed to a subscriber's phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StkPush {
    /// The gateway's external reference for this checkout.
    pub reference: String,
    /// A human-readable status message.
    pub message: String,
}

/// The mobile-payment gateway contract.
pub trait PaymentGateway {
    /// Initiates a payment prompt to the given phone.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway refuses or cannot be reached.
    fn initiate(&mut self, phone: &PhoneNumber, amount: Amount) -> Result<StkPush, GatewayError>;
}

/// The simulated M-PESA gateway.
///
/// Accepts every plausible request and issues `SB`-prefixed references
/// in the production format. Settlement still arrives through the
/// confirmation callback like the real integration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedMpesaGateway;

impl PaymentGateway for SimulatedMpesaGateway {
    fn initiate(&mut self, phone: &PhoneNumber, amount: Amount) -> Result<StkPush, GatewayError> {
        if !amount.is_positive() {
            return Err(GatewayError::Rejected {
                reason: format!("Amount must be positive, got {amount}"),
            });
        }

        info!("Simulated STK push of {} to {}", amount, phone);

        Ok(StkPush {
            reference: ids::payment_reference(),
            message: String::from("STK Push sent. Check your phone."),
        })
    }
}

/// A checkout awaiting gateway confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingCheckout {
    profile_id: ProfileId,
    amount: Amount,
    initiated_at: OffsetDateTime,
}

/// The result of initiating an activation payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationInitiated {
    /// The gateway reference to confirm against.
    pub reference: String,
    /// The gateway's status message.
    pub message: String,
}

/// The result of confirming an activation payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationConfirmed {
    /// The profile after confirmation.
    pub profile: Profile,
    /// True if the profile had already been activated by an earlier
    /// confirmation; the flag flips at most once.
    pub already_active: bool,
}

/// The activation payment flow.
///
/// Owns the gateway and the registry of pending checkouts keyed by
/// gateway reference.
pub struct ActivationService<G: PaymentGateway> {
    gateway: G,
    pending: HashMap<String, PendingCheckout>,
}

impl<G: PaymentGateway> ActivationService<G> {
    /// Creates an activation service over the given gateway.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            pending: HashMap::new(),
        }
    }

    /// Returns the number of checkouts awaiting confirmation.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Initiates the activation payment for a profile.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `profile_id` - The profile paying the fee
    ///
    /// # Errors
    ///
    /// Returns an error if the profile does not exist, is already
    /// active, has no phone number on file, or the gateway refuses.
    pub fn initiate_activation(
        &mut self,
        persistence: &mut SqlitePersistence,
        profile_id: &ProfileId,
    ) -> Result<ActivationInitiated, ApiError> {
        let profile: Profile = persistence
            .get_profile(profile_id)
            .map_err(|e| translate_persistence_error(e, "Profile"))?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Profile"),
                message: format!("Profile {profile_id} does not exist"),
            })?;

        if profile.is_active {
            return Err(ApiError::DomainRuleViolation {
                rule: String::from("single_activation"),
                message: String::from("This account is already activated"),
            });
        }

        let Some(phone) = profile.phone_number else {
            return Err(ApiError::InvalidInput {
                field: String::from("phone_number"),
                message: String::from("Add a mobile money number to your profile first"),
            });
        };

        let push: StkPush = self
            .gateway
            .initiate(&phone, ACTIVATION_FEE)
            .map_err(|e| match e {
                GatewayError::Rejected { reason } => ApiError::InvalidInput {
                    field: String::from("payment"),
                    message: reason,
                },
                GatewayError::Unavailable(msg) => ApiError::Internal {
                    message: format!("Payment gateway unavailable: {msg}"),
                },
            })?;

        self.pending.insert(
            push.reference.clone(),
            PendingCheckout {
                profile_id: profile_id.clone(),
                amount: ACTIVATION_FEE,
                initiated_at: OffsetDateTime::now_utc(),
            },
        );

        info!(
            "Activation checkout {} initiated for {}",
            push.reference, profile_id
        );

        Ok(ActivationInitiated {
            reference: push.reference,
            message: push.message,
        })
    }

    /// Confirms an activation payment by gateway reference.
    ///
    /// This is the callback half of the flow. The activation flag flips
    /// exactly once; the ledger entry is best-effort and never reverts
    /// a completed activation.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `reference` - The gateway reference from `initiate_activation`
    ///
    /// # Errors
    ///
    /// Returns an error if no checkout matches the reference or the
    /// profile no longer exists.
    pub fn confirm_activation(
        &mut self,
        persistence: &mut SqlitePersistence,
        reference: &str,
    ) -> Result<ActivationConfirmed, ApiError> {
        let checkout: PendingCheckout =
            self.pending
                .remove(reference)
                .ok_or_else(|| ApiError::ResourceNotFound {
                    resource_type: String::from("Checkout"),
                    message: format!("No pending checkout with reference {reference}"),
                })?;

        let flipped: bool = persistence
            .activate_profile(&checkout.profile_id)
            .map_err(|e| translate_persistence_error(e, "Profile"))?;

        if flipped {
            let entry: Transaction = Transaction {
                id: TransactionId::new(&ids::fresh_id("txn")),
                user_id: checkout.profile_id.clone(),
                kind: TransactionKind::ActivationFee,
                amount: checkout.amount,
                external_reference: reference.to_string(),
                status: TransactionStatus::Complete,
                created_at: OffsetDateTime::now_utc(),
            };

            // The activation already happened; a ledger hiccup must not
            // undo it.
            if let Err(e) = persistence.append_transaction(&entry) {
                warn!(
                    "Activation {} succeeded but the ledger write failed: {}",
                    reference, e
                );
            }

            info!(
                "Activation confirmed for {} (reference {})",
                checkout.profile_id, reference
            );
        } else {
            warn!(
                "Confirmation {} arrived for already-active profile {}",
                reference, checkout.profile_id
            );
        }

        let profile: Profile = persistence
            .get_profile(&checkout.profile_id)
            .map_err(|e| translate_persistence_error(e, "Profile"))?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Profile"),
                message: format!("Profile {} no longer exists", checkout.profile_id),
            })?;

        Ok(ActivationConfirmed {
            profile,
            already_active: !flipped,
        })
    }

    /// Drops pending checkouts older than the given age.
    ///
    /// The simulated gateway never abandons a checkout, but the real
    /// one does; the registry must not grow without bound either way.
    pub fn expire_stale_checkouts(&mut self, older_than: time::Duration) {
        let cutoff: OffsetDateTime = OffsetDateTime::now_utc() - older_than;
        let before: usize = self.pending.len();
        self.pending.retain(|_, checkout| checkout.initiated_at > cutoff);
        let dropped: usize = before - self.pending.len();
        if dropped > 0 {
            info!("Expired {} stale activation checkouts", dropped);
        }
    }
}
