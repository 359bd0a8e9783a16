// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The bidding/application subsystem.
//!
//! Every precondition is re-checked here, server-side: the task must be
//! open, the caller must pass the activation gate, the proposal must
//! meet the minimum length, and the (task, writer) pair must be new.
//! Expected business-rule violations return a rejected `BidOutcome`
//! rather than an error; only transport and storage failures propagate.

use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::gate;
use crate::ids;
use crate::request_response::{BidInfo, BidOutcome};
use kazi_domain::{
    Amount, Bid, BidId, BidStatus, Profile, ProfileId, Task, TaskId, validate_proposal,
};
use kazi_persistence::{BidBackend, PersistenceError, TieredBidStore};

/// Places a bid on behalf of a writer.
///
/// The caller resolves the profile and task first (both are fresh
/// reads); this function owns the business rules and the write.
///
/// # Arguments
///
/// * `store` - The tiered bid store
/// * `profile` - The freshly loaded profile of the bidding writer
/// * `task` - The freshly loaded task being applied to
/// * `proposal` - The writer's proposal text
///
/// # Errors
///
/// Returns an error only for transport/storage failures. Business-rule
/// violations are rejected outcomes.
pub fn place_bid<B: BidBackend>(
    store: &mut TieredBidStore<B>,
    profile: &Profile,
    task: &Task,
    proposal: &str,
) -> Result<BidOutcome, ApiError> {
    let actor: AuthenticatedActor = AuthenticatedActor::from_profile(profile);
    AuthorizationService::authorize_place_bid(&actor).map_err(ApiError::from)?;

    // Server-side activation re-check; the UI gating alone is not a
    // boundary.
    if gate::ensure_may_claim(profile).is_err() {
        return Ok(BidOutcome::rejected(
            "Activate your account before applying for tasks.",
        ));
    }

    if !task.status.accepts_bids() {
        return Ok(BidOutcome::rejected(
            "This task is no longer open for applications.",
        ));
    }

    if validate_proposal(proposal).is_err() {
        return Ok(BidOutcome::rejected(
            "Tell the client a little more: proposals need at least 10 characters.",
        ));
    }

    match store.has_bid(&task.id, &profile.id) {
        Ok(true) => {
            return Ok(BidOutcome::rejected(
                "You have already applied for this task.",
            ));
        }
        Ok(false) => {}
        Err(e) => return Err(translate_persistence_error(e, "Bid")),
    }

    let bid: Bid = Bid {
        id: BidId::new(&ids::fresh_id("bid")),
        task_id: task.id.clone(),
        user_id: profile.id.clone(),
        proposal: proposal.to_string(),
        amount: Amount::ZERO,
        status: BidStatus::Pending,
        created_at: OffsetDateTime::now_utc(),
    };

    match store.place(bid) {
        Ok(placement) => {
            info!(
                "Bid placed on task {} by {} ({:?})",
                task.id, profile.id, placement
            );
            Ok(BidOutcome {
                accepted: true,
                message: String::from("Application submitted successfully!"),
            })
        }
        // The unique index is the race-proof backstop behind the
        // pre-check above.
        Err(PersistenceError::ConstraintViolation(_)) => Ok(BidOutcome::rejected(
            "You have already applied for this task.",
        )),
        Err(e) => Err(translate_persistence_error(e, "Bid")),
    }
}

/// Lists the bids on a task for admin review, submission order.
///
/// # Arguments
///
/// * `store` - The tiered bid store
/// * `actor` - The authenticated admin
/// * `task_id` - The task to list bids for
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the lookup fails.
pub fn list_bids_for_task<B: BidBackend>(
    store: &mut TieredBidStore<B>,
    actor: &AuthenticatedActor,
    task_id: &TaskId,
) -> Result<Vec<BidInfo>, ApiError> {
    AuthorizationService::authorize_view_bids(actor).map_err(ApiError::from)?;

    let bids: Vec<Bid> = store
        .bids_for_task(task_id)
        .map_err(|e| translate_persistence_error(e, "Bid"))?;

    bids.iter().map(BidInfo::from_bid).collect()
}

/// Computes applicant counts for every task in one aggregation.
///
/// The browse view joins these against its task list instead of
/// issuing a count query per rendered task.
///
/// # Errors
///
/// Returns an error if the aggregation fails.
pub fn aggregate_bid_counts<B: BidBackend>(
    store: &mut TieredBidStore<B>,
) -> Result<HashMap<String, u64>, ApiError> {
    store
        .bid_counts()
        .map_err(|e| translate_persistence_error(e, "Bid"))
}

/// A writer's own applications, indexed for O(1) membership tests.
///
/// Built once per view from the writer's bid list; the browse view
/// consults it per rendered task to disable the Apply affordance, so a
/// linear scan per task would be quadratic in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterBidSet {
    task_ids: HashSet<String>,
}

impl WriterBidSet {
    /// Builds the set from the writer's bids across both store tiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub fn build<B: BidBackend>(
        store: &mut TieredBidStore<B>,
        writer: &ProfileId,
    ) -> Result<Self, ApiError> {
        let bids: Vec<Bid> = store
            .bids_for_writer(writer)
            .map_err(|e| translate_persistence_error(e, "Bid"))?;

        Ok(Self {
            task_ids: bids
                .into_iter()
                .map(|bid| bid.task_id.value().to_string())
                .collect(),
        })
    }

    /// Returns true if the writer has applied to the task.
    #[must_use]
    pub fn has_bid(&self, task_id: &TaskId) -> bool {
        self.task_ids.contains(task_id.value())
    }

    /// Returns the number of tasks applied to.
    #[must_use]
    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    /// Returns true if the writer has no applications.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }
}
