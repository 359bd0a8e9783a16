// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the two-tier bid store's fallback and reconcile contract.

use crate::{BidBackend, BidPlacement, PersistenceError, ReconcileOutcome, TieredBidStore};
use kazi_domain::{Bid, ProfileId, TaskId};
use std::collections::HashMap;

use super::sample_bid;

/// A primary tier double whose policy can be toggled between allowing
/// and denying writes.
struct PolicyBackend {
    denying: bool,
    rows: Vec<Bid>,
}

impl PolicyBackend {
    const fn new(denying: bool) -> Self {
        Self {
            denying,
            rows: Vec::new(),
        }
    }
}

impl BidBackend for PolicyBackend {
    fn insert_bid(&mut self, bid: &Bid) -> Result<(), PersistenceError> {
        if self.denying {
            return Err(PersistenceError::PermissionDenied(String::from(
                "row-level policy rejected insert",
            )));
        }
        if self
            .rows
            .iter()
            .any(|row| row.task_id == bid.task_id && row.user_id == bid.user_id)
        {
            return Err(PersistenceError::ConstraintViolation(String::from(
                "duplicate (task_id, user_id)",
            )));
        }
        self.rows.push(bid.clone());
        Ok(())
    }

    fn has_bid(
        &mut self,
        task_id: &TaskId,
        writer: &ProfileId,
    ) -> Result<bool, PersistenceError> {
        Ok(self
            .rows
            .iter()
            .any(|row| &row.task_id == task_id && &row.user_id == writer))
    }

    fn bids_for_task(&mut self, task_id: &TaskId) -> Result<Vec<Bid>, PersistenceError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| &row.task_id == task_id)
            .cloned()
            .collect())
    }

    fn bids_for_writer(&mut self, writer: &ProfileId) -> Result<Vec<Bid>, PersistenceError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| &row.user_id == writer)
            .cloned()
            .collect())
    }

    fn bid_counts(&mut self) -> Result<HashMap<String, u64>, PersistenceError> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for row in &self.rows {
            *counts.entry(row.task_id.value().to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[test]
fn test_allowed_write_goes_to_primary() {
    let mut store: TieredBidStore<PolicyBackend> = TieredBidStore::new(PolicyBackend::new(false));
    let bid: Bid = sample_bid("bid-1", &TaskId::new("task-1"), &ProfileId::new("writer-a"), 0);

    let placement: BidPlacement = store.place(bid).unwrap();

    assert_eq!(placement, BidPlacement::Stored);
    assert_eq!(store.parked_len(), 0);
}

#[test]
fn test_policy_rejection_parks_instead_of_failing() {
    let mut store: TieredBidStore<PolicyBackend> = TieredBidStore::new(PolicyBackend::new(true));
    let bid: Bid = sample_bid("bid-1", &TaskId::new("task-1"), &ProfileId::new("writer-a"), 0);

    let placement: BidPlacement = store.place(bid).unwrap();

    assert_eq!(placement, BidPlacement::Parked);
    assert_eq!(store.parked_len(), 1);
}

#[test]
fn test_parked_bids_appear_in_reads() {
    let mut store: TieredBidStore<PolicyBackend> = TieredBidStore::new(PolicyBackend::new(true));
    let task: TaskId = TaskId::new("task-1");
    let writer: ProfileId = ProfileId::new("writer-a");

    store.place(sample_bid("bid-1", &task, &writer, 0)).unwrap();

    assert!(store.has_bid(&task, &writer).unwrap());
    assert_eq!(store.bids_for_task(&task).unwrap().len(), 1);
    assert_eq!(store.bids_for_writer(&writer).unwrap().len(), 1);
    assert_eq!(store.bid_counts().unwrap().get("task-1"), Some(&1));
}

#[test]
fn test_duplicate_detection_spans_tiers() {
    let mut store: TieredBidStore<PolicyBackend> = TieredBidStore::new(PolicyBackend::new(true));
    let task: TaskId = TaskId::new("task-1");
    let writer: ProfileId = ProfileId::new("writer-a");

    store.place(sample_bid("bid-1", &task, &writer, 0)).unwrap();

    // A second bid for the same pair is a duplicate even though the
    // first one only exists in the fallback tier.
    let result = store.place(sample_bid("bid-2", &task, &writer, 1));

    assert!(matches!(
        result.unwrap_err(),
        PersistenceError::ConstraintViolation(_)
    ));
}

#[test]
fn test_reads_merge_tiers_in_submission_order() {
    let mut store: TieredBidStore<PolicyBackend> = TieredBidStore::new(PolicyBackend::new(false));
    let task: TaskId = TaskId::new("task-1");

    store
        .place(sample_bid("bid-early", &task, &ProfileId::new("writer-a"), 0))
        .unwrap();

    store.primary_mut().denying = true;
    store
        .place(sample_bid("bid-late", &task, &ProfileId::new("writer-b"), 5))
        .unwrap();
    store
        .place(sample_bid("bid-mid", &task, &ProfileId::new("writer-c"), 2))
        .unwrap();

    let bids: Vec<Bid> = store.bids_for_task(&task).unwrap();
    let order: Vec<&str> = bids.iter().map(|bid| bid.id.value()).collect();
    assert_eq!(order, vec!["bid-early", "bid-mid", "bid-late"]);
}

#[test]
fn test_reconcile_replays_once_policy_allows() {
    let mut store: TieredBidStore<PolicyBackend> = TieredBidStore::new(PolicyBackend::new(true));
    let task: TaskId = TaskId::new("task-1");

    store
        .place(sample_bid("bid-1", &task, &ProfileId::new("writer-a"), 0))
        .unwrap();
    store
        .place(sample_bid("bid-2", &task, &ProfileId::new("writer-b"), 1))
        .unwrap();

    // Policy still denying: nothing moves.
    let stuck: ReconcileOutcome = store.reconcile().unwrap();
    assert_eq!(stuck, ReconcileOutcome { replayed: 0, parked: 2 });

    // Policy fixed: both bids drain into the primary.
    store.primary_mut().denying = false;
    let drained: ReconcileOutcome = store.reconcile().unwrap();
    assert_eq!(drained, ReconcileOutcome { replayed: 2, parked: 0 });

    assert_eq!(store.parked_len(), 0);
    assert_eq!(store.primary_mut().bids_for_task(&task).unwrap().len(), 2);
}

#[test]
fn test_reconcile_drops_parked_duplicates() {
    let mut store: TieredBidStore<PolicyBackend> = TieredBidStore::new(PolicyBackend::new(true));
    let task: TaskId = TaskId::new("task-1");
    let writer: ProfileId = ProfileId::new("writer-a");

    store.place(sample_bid("bid-parked", &task, &writer, 0)).unwrap();

    // The pair lands in the primary through another path while parked.
    store.primary_mut().denying = false;
    store
        .primary_mut()
        .insert_bid(&sample_bid("bid-direct", &task, &writer, 1))
        .unwrap();

    let outcome: ReconcileOutcome = store.reconcile().unwrap();

    assert_eq!(outcome, ReconcileOutcome { replayed: 0, parked: 0 });
    assert_eq!(store.primary_mut().bids_for_task(&task).unwrap().len(), 1);
}
