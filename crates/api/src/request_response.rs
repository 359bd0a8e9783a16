// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! DTOs are distinct from domain types and represent the API contract.
//! Timestamps cross the boundary as ISO 8601 strings; amounts cross as
//! integer minor currency units.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::format_description::well_known::Iso8601;

use crate::error::ApiError;
use kazi_domain::{Bid, Profile, Task, Transaction, can_claim_work};

/// Formats a timestamp for the API boundary.
///
/// # Errors
///
/// Returns an internal error if formatting fails.
pub(crate) fn format_timestamp(ts: time::OffsetDateTime) -> Result<String, ApiError> {
    ts.format(&Iso8601::DEFAULT).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

/// API request to register a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// The email to register.
    pub email: String,
    /// The chosen password.
    pub password: String,
    /// The password confirmation.
    pub confirmation: String,
    /// The mobile money number, if provided.
    pub phone_number: Option<String>,
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// The created profile.
    pub profile: ProfileInfo,
    /// A success message.
    pub message: String,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The registered email.
    pub email: String,
    /// The password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token for subsequent requests.
    pub session_token: String,
    /// The authenticated profile.
    pub profile: ProfileInfo,
}

/// API response describing the authenticated profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// The authenticated profile.
    pub profile: ProfileInfo,
    /// Whether the profile passes the activation gate.
    pub can_claim_work: bool,
}

/// Profile information exposed at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    /// The profile identifier.
    pub id: String,
    /// The registered email.
    pub email: String,
    /// The mobile money number, if any.
    pub phone_number: Option<String>,
    /// The role string.
    pub role: String,
    /// The subscription tier string.
    pub tier: String,
    /// Whether the activation fee has been paid.
    pub is_active: bool,
    /// The wallet balance in minor currency units.
    pub wallet_balance_cents: i64,
}

impl ProfileInfo {
    /// Builds the DTO from a domain profile.
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email.clone(),
            phone_number: profile.phone_number.as_ref().map(ToString::to_string),
            role: profile.role.to_string(),
            tier: profile.tier.to_string(),
            is_active: profile.is_active,
            wallet_balance_cents: profile.wallet_balance.cents(),
        }
    }

    /// Builds the who-am-I response for a profile.
    #[must_use]
    pub fn whoami(profile: &Profile) -> WhoAmIResponse {
        WhoAmIResponse {
            profile: Self::from_profile(profile),
            can_claim_work: can_claim_work(profile),
        }
    }
}

/// API request to post a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// The task title.
    pub title: String,
    /// The job category display string.
    pub category: String,
    /// The full job description.
    pub description: String,
    /// The offered price in whole shillings.
    pub price_shillings: i64,
    /// Hours from posting until the deadline.
    pub duration_hours: i64,
}

/// API response for a successful task creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    /// The created task.
    pub task: TaskInfo,
    /// A success message.
    pub message: String,
}

/// Task information exposed at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// The task identifier.
    pub id: String,
    /// The task title.
    pub title: String,
    /// The job category display string.
    pub category: String,
    /// The full job description.
    pub description: String,
    /// The offered price in minor currency units.
    pub price_cents: i64,
    /// The lifecycle status string.
    pub status: String,
    /// The assigned writer, if any.
    pub assigned_to: Option<String>,
    /// The completion deadline (ISO 8601).
    pub deadline: String,
    /// When the task was posted (ISO 8601).
    pub created_at: String,
    /// The submitted artifact reference, if any.
    pub submission_url: Option<String>,
    /// The submission notes, if any.
    pub submission_notes: Option<String>,
}

impl TaskInfo {
    /// Builds the DTO from a domain task.
    ///
    /// # Errors
    ///
    /// Returns an internal error if timestamp formatting fails.
    pub fn from_task(task: &Task) -> Result<Self, ApiError> {
        Ok(Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            category: task.category.to_string(),
            description: task.description.clone(),
            price_cents: task.price.cents(),
            status: task.status.to_string(),
            assigned_to: task.assigned_to.as_ref().map(ToString::to_string),
            deadline: format_timestamp(task.deadline)?,
            created_at: format_timestamp(task.created_at)?,
            submission_url: task.submission_url.clone(),
            submission_notes: task.submission_notes.clone(),
        })
    }
}

/// API response for the open-task browse view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseTasksResponse {
    /// The open tasks, newest first.
    pub tasks: Vec<TaskInfo>,
    /// Applicant counts keyed by task identifier.
    pub bid_counts: HashMap<String, u64>,
}

/// API request to assign a task to a writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignTaskRequest {
    /// The writer to assign.
    pub writer_id: String,
}

/// API response for a successful assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignTaskResponse {
    /// The assigned task.
    pub task: TaskInfo,
    /// A success message.
    pub message: String,
}

/// API request to submit completed work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitWorkRequest {
    /// The writer's submission notes.
    pub notes: String,
    /// The uploaded file's name.
    pub file_name: String,
    /// The uploaded file's bytes.
    pub content: Vec<u8>,
}

/// API response for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitWorkResponse {
    /// The task now in review.
    pub task: TaskInfo,
    /// Whether the artifact upload degraded to a placeholder.
    pub upload_degraded: bool,
    /// A success message.
    pub message: String,
}

/// API response for a review decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResponse {
    /// The task after the decision.
    pub task: TaskInfo,
    /// A success message.
    pub message: String,
}

/// API request to place a bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceBidRequest {
    /// The writer's free-text proposal.
    pub proposal: String,
}

/// The outcome of a bid placement.
///
/// Expected business-rule violations (duplicate bid, task no longer
/// open, activation missing, short proposal) are outcomes, not errors:
/// the row is simply not created and the reason is human-readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidOutcome {
    /// Whether the bid was recorded.
    pub accepted: bool,
    /// A human-readable reason or confirmation.
    pub message: String,
}

impl BidOutcome {
    /// Builds a rejected outcome with the given reason.
    #[must_use]
    pub fn rejected(message: &str) -> Self {
        Self {
            accepted: false,
            message: message.to_string(),
        }
    }
}

/// Bid information exposed at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidInfo {
    /// The bid identifier.
    pub id: String,
    /// The task applied to.
    pub task_id: String,
    /// The writer who applied.
    pub user_id: String,
    /// The writer's proposal.
    pub proposal: String,
    /// The offered amount in minor currency units.
    pub amount_cents: i64,
    /// The decision state string.
    pub status: String,
    /// When the bid was placed (ISO 8601).
    pub created_at: String,
}

impl BidInfo {
    /// Builds the DTO from a domain bid.
    ///
    /// # Errors
    ///
    /// Returns an internal error if timestamp formatting fails.
    pub fn from_bid(bid: &Bid) -> Result<Self, ApiError> {
        Ok(Self {
            id: bid.id.to_string(),
            task_id: bid.task_id.to_string(),
            user_id: bid.user_id.to_string(),
            proposal: bid.proposal.clone(),
            amount_cents: bid.amount.cents(),
            status: bid.status.to_string(),
            created_at: format_timestamp(bid.created_at)?,
        })
    }
}

/// API response listing a writer's own bids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyBidsResponse {
    /// The writer's bids.
    pub bids: Vec<BidInfo>,
    /// The task identifiers the writer has applied to.
    pub applied_task_ids: Vec<String>,
}

/// API response for initiating an activation payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationInitiateResponse {
    /// The gateway reference to confirm against.
    pub reference: String,
    /// The gateway's status message.
    pub message: String,
}

/// API request confirming an activation payment (gateway callback).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationConfirmRequest {
    /// The gateway reference issued at initiation.
    pub reference: String,
}

/// API response for a confirmed activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationConfirmResponse {
    /// The profile after confirmation.
    pub profile: ProfileInfo,
    /// True if an earlier confirmation had already activated it.
    pub already_active: bool,
    /// A success message.
    pub message: String,
}

/// Transaction information exposed at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    /// The transaction identifier.
    pub id: String,
    /// The entry kind string.
    pub kind: String,
    /// The amount in minor currency units.
    pub amount_cents: i64,
    /// The external payment reference.
    pub external_reference: String,
    /// The settlement status string.
    pub status: String,
    /// When the entry was recorded (ISO 8601).
    pub created_at: String,
}

impl TransactionInfo {
    /// Builds the DTO from a domain transaction.
    ///
    /// # Errors
    ///
    /// Returns an internal error if timestamp formatting fails.
    pub fn from_transaction(transaction: &Transaction) -> Result<Self, ApiError> {
        Ok(Self {
            id: transaction.id.to_string(),
            kind: transaction.kind.to_string(),
            amount_cents: transaction.amount.cents(),
            external_reference: transaction.external_reference.clone(),
            status: transaction.status.to_string(),
            created_at: format_timestamp(transaction.created_at)?,
        })
    }
}

/// Builds the writer-facing applied-task id list from bids.
#[must_use]
pub fn applied_task_ids(bids: &[Bid]) -> Vec<String> {
    bids.iter().map(|bid| bid.task_id.to_string()).collect()
}
