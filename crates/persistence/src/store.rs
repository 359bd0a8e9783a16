// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Two-tier bid storage.
//!
//! The backing store's authorization policy can reject bid writes even
//! when the business rules pass (a misconfigured policy, a propagation
//! delay after a policy change). Rather than scattering conditional
//! branches through call sites, the fallback is one explicit tier: a
//! rejected write parks the bid in memory, reads merge both tiers, and
//! `reconcile` replays parked bids against the primary.
//!
//! Parked bids are a degraded mode, not durable storage. Every park is
//! logged at warning level so the policy problem is visible, and the
//! reconcile contract reports exactly what was replayed and what is
//! still parked.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::PersistenceError;
use kazi_domain::{Bid, ProfileId, TaskId};

/// The primary tier's bid operations.
///
/// `SqlitePersistence` implements this; tests substitute a
/// policy-denying double to exercise the fallback path.
pub trait BidBackend {
    /// Inserts a bid.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` for a duplicate (task, writer)
    /// pair, `PermissionDenied` for a policy rejection, or another
    /// error kind for storage failures.
    fn insert_bid(&mut self, bid: &Bid) -> Result<(), PersistenceError>;

    /// Checks whether a bid exists for a (task, writer) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn has_bid(&mut self, task_id: &TaskId, writer: &ProfileId)
    -> Result<bool, PersistenceError>;

    /// Lists the bids for a task, ordered by submission time ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn bids_for_task(&mut self, task_id: &TaskId) -> Result<Vec<Bid>, PersistenceError>;

    /// Lists the bids placed by a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn bids_for_writer(&mut self, writer: &ProfileId) -> Result<Vec<Bid>, PersistenceError>;

    /// Computes bid counts grouped by task.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregation fails.
    fn bid_counts(&mut self) -> Result<HashMap<String, u64>, PersistenceError>;
}

/// Where a placed bid ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidPlacement {
    /// The primary tier accepted the write.
    Stored,
    /// The primary tier's policy rejected the write; the bid is parked
    /// in the fallback tier until `reconcile` replays it.
    Parked,
}

/// The result of a reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Bids successfully replayed into the primary tier.
    pub replayed: usize,
    /// Bids still parked after the pass.
    pub parked: usize,
}

/// One interface over a primary bid backend and an in-memory fallback.
pub struct TieredBidStore<B: BidBackend> {
    primary: B,
    parked: Vec<Bid>,
}

impl<B: BidBackend> TieredBidStore<B> {
    /// Creates a tiered store with an empty fallback.
    pub const fn new(primary: B) -> Self {
        Self {
            primary,
            parked: Vec::new(),
        }
    }

    /// Returns a reference to the primary tier.
    pub const fn primary(&self) -> &B {
        &self.primary
    }

    /// Returns a mutable reference to the primary tier.
    ///
    /// Non-bid operations (profiles, tasks, ledger, sessions) go
    /// straight to the primary; only bids have a fallback tier.
    pub const fn primary_mut(&mut self) -> &mut B {
        &mut self.primary
    }

    /// Returns the number of currently parked bids.
    #[must_use]
    pub const fn parked_len(&self) -> usize {
        self.parked.len()
    }

    /// Consumes the store, returning the primary tier.
    ///
    /// Any still-parked bids are dropped; callers reconcile first when
    /// that matters.
    pub fn into_inner(self) -> B {
        self.primary
    }

    /// Places a bid, falling back to the parked tier on a policy
    /// rejection.
    ///
    /// Duplicate detection spans both tiers: a parked bid blocks a
    /// second bid for the same (task, writer) pair exactly as a stored
    /// one would.
    ///
    /// # Arguments
    ///
    /// * `bid` - The bid to place
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` for a duplicate pair, or the
    /// primary tier's error for storage failures. A policy rejection is
    /// not an error: the bid parks and `Ok(BidPlacement::Parked)` is
    /// returned.
    pub fn place(&mut self, bid: Bid) -> Result<BidPlacement, PersistenceError> {
        if self
            .parked
            .iter()
            .any(|parked| parked.task_id == bid.task_id && parked.user_id == bid.user_id)
        {
            return Err(PersistenceError::ConstraintViolation(format!(
                "A bid for task {} by {} is already parked",
                bid.task_id, bid.user_id
            )));
        }

        match self.primary.insert_bid(&bid) {
            Ok(()) => Ok(BidPlacement::Stored),
            Err(PersistenceError::PermissionDenied(reason)) => {
                warn!(
                    "Primary store rejected bid {} on task {} by policy ({}); parking in fallback tier",
                    bid.id, bid.task_id, reason
                );
                self.parked.push(bid);
                Ok(BidPlacement::Parked)
            }
            Err(e) => Err(e),
        }
    }

    /// Checks whether a bid exists for a (task, writer) pair in either
    /// tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary lookup fails.
    pub fn has_bid(
        &mut self,
        task_id: &TaskId,
        writer: &ProfileId,
    ) -> Result<bool, PersistenceError> {
        if self
            .parked
            .iter()
            .any(|bid| &bid.task_id == task_id && &bid.user_id == writer)
        {
            return Ok(true);
        }
        self.primary.has_bid(task_id, writer)
    }

    /// Lists the bids for a task across both tiers, ordered by
    /// submission time ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary lookup fails.
    pub fn bids_for_task(&mut self, task_id: &TaskId) -> Result<Vec<Bid>, PersistenceError> {
        let mut bids: Vec<Bid> = self.primary.bids_for_task(task_id)?;
        bids.extend(
            self.parked
                .iter()
                .filter(|bid| &bid.task_id == task_id)
                .cloned(),
        );
        bids.sort_by_key(|bid| bid.created_at);
        Ok(bids)
    }

    /// Lists the bids placed by a writer across both tiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary lookup fails.
    pub fn bids_for_writer(&mut self, writer: &ProfileId) -> Result<Vec<Bid>, PersistenceError> {
        let mut bids: Vec<Bid> = self.primary.bids_for_writer(writer)?;
        bids.extend(
            self.parked
                .iter()
                .filter(|bid| &bid.user_id == writer)
                .cloned(),
        );
        bids.sort_by_key(|bid| bid.created_at);
        Ok(bids)
    }

    /// Computes bid counts grouped by task across both tiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary aggregation fails.
    pub fn bid_counts(&mut self) -> Result<HashMap<String, u64>, PersistenceError> {
        let mut counts: HashMap<String, u64> = self.primary.bid_counts()?;
        for bid in &self.parked {
            *counts.entry(bid.task_id.value().to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Replays parked bids against the primary tier.
    ///
    /// Bids the primary now accepts are drained from the fallback. Bids
    /// it still rejects by policy stay parked. A duplicate rejection
    /// means the primary already holds a row for the pair (the original
    /// write landed after all); the parked copy is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error on a storage failure; bids not yet attempted
    /// remain parked.
    pub fn reconcile(&mut self) -> Result<ReconcileOutcome, PersistenceError> {
        let pending: Vec<Bid> = std::mem::take(&mut self.parked);
        let total: usize = pending.len();
        let mut replayed: usize = 0;

        let mut remaining = pending.into_iter();
        while let Some(bid) = remaining.next() {
            match self.primary.insert_bid(&bid) {
                Ok(()) => replayed += 1,
                Err(PersistenceError::PermissionDenied(_)) => {
                    self.parked.push(bid);
                }
                Err(PersistenceError::ConstraintViolation(_)) => {
                    warn!(
                        "Dropping parked bid {} on task {}: primary already holds a row for this pair",
                        bid.id, bid.task_id
                    );
                }
                Err(e) => {
                    // Bids not yet attempted stay parked for the next pass.
                    self.parked.push(bid);
                    self.parked.extend(remaining);
                    return Err(e);
                }
            }
        }

        let outcome: ReconcileOutcome = ReconcileOutcome {
            replayed,
            parked: self.parked.len(),
        };

        if total > 0 {
            info!(
                "Reconcile pass replayed {} of {} parked bids ({} still parked)",
                outcome.replayed, total, outcome.parked
            );
        }

        Ok(outcome)
    }
}
