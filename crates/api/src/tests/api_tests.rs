// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end flows through the API layer.

use crate::auth::{AuthenticatedActor, AuthenticationService};
use crate::bidding::{self, WriterBidSet};
use crate::handlers;
use crate::request_response::{AssignTaskRequest, BidOutcome, TaskInfo};
use crate::storage::InMemoryBlobStore;
use kazi_domain::{Amount, Profile, Task, TaskId, TaskStatus, TransactionKind};
use kazi_persistence::{SqlitePersistence, TieredBidStore};

use super::helpers::{
    TEST_PASSWORD, actor_for, create_test_persistence, post_sample_task, register_active_writer,
    register_admin, sample_submission,
};

#[test]
fn test_full_marketplace_scenario() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let admin: AuthenticatedActor = actor_for(&register_admin(&mut persistence, "boss@kazisoko.com"));
    let writer: Profile = register_active_writer(&mut persistence, "writer@example.com");
    let writer_actor: AuthenticatedActor = actor_for(&writer);

    // Admin posts a task; it opens at 2500 KES.
    let posted: TaskInfo = post_sample_task(&mut persistence, &admin);
    assert_eq!(posted.status, "open");
    assert_eq!(posted.price_cents, 250_000);
    let task_id: TaskId = TaskId::new(&posted.id);

    // Writer applies.
    let mut store: TieredBidStore<SqlitePersistence> = TieredBidStore::new(persistence);
    let task: Task = store
        .primary_mut()
        .get_task(&task_id)
        .unwrap()
        .unwrap();
    let outcome: BidOutcome = bidding::place_bid(
        &mut store,
        &writer,
        &task,
        "I have 3 years experience writing fintech content.",
    )
    .unwrap();
    assert!(outcome.accepted);

    let bid_set: WriterBidSet = WriterBidSet::build(&mut store, &writer.id).unwrap();
    assert!(bid_set.has_bid(&task_id));
    assert_eq!(
        bidding::aggregate_bid_counts(&mut store)
            .unwrap()
            .get(task_id.value()),
        Some(&1)
    );

    // Admin reviews the bids and assigns the writer.
    let bids = bidding::list_bids_for_task(&mut store, &admin, &task_id).unwrap();
    assert_eq!(bids.len(), 1);

    let mut persistence: SqlitePersistence = into_primary(store);
    let assigned = handlers::assign_task(
        &mut persistence,
        &admin,
        &task_id,
        &AssignTaskRequest {
            writer_id: writer.id.to_string(),
        },
    )
    .unwrap();
    assert_eq!(assigned.task.status, "assigned");
    assert_eq!(assigned.task.assigned_to, Some(writer.id.to_string()));

    // Writer submits; the task enters review with a stored artifact.
    let mut blob_store: InMemoryBlobStore = InMemoryBlobStore::default();
    let submitted = handlers::submit_work(
        &mut persistence,
        &mut blob_store,
        &writer_actor,
        &task_id,
        &sample_submission(),
    )
    .unwrap();
    assert_eq!(submitted.task.status, "review");
    assert!(!submitted.upload_degraded);
    assert!(submitted.task.submission_url.is_some());

    // Admin approves; the task completes and the payout lands.
    let approved = handlers::approve_submission(&mut persistence, &admin, &task_id).unwrap();
    assert_eq!(approved.task.status, "completed");

    let stored: Task = persistence.get_task(&task_id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);

    let ledger = persistence.list_transactions_for_user(&writer.id).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].kind, TransactionKind::Payout);
    assert_eq!(ledger[0].amount, Amount::from_shillings(2500));

    let paid: Profile = persistence.get_profile(&writer.id).unwrap().unwrap();
    assert_eq!(paid.wallet_balance, Amount::from_shillings(2500));
}

#[test]
fn test_register_login_and_session_round_trip() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let registered: Profile = register_active_writer(&mut persistence, "writer@example.com");

    let (token, actor, profile) =
        AuthenticationService::login(&mut persistence, "writer@example.com", TEST_PASSWORD)
            .unwrap();
    assert_eq!(profile.id, registered.id);
    assert_eq!(actor.id, registered.id);

    let (validated_actor, validated_profile) =
        AuthenticationService::validate_session(&mut persistence, &token).unwrap();
    assert_eq!(validated_actor.id, registered.id);
    assert!(validated_profile.is_active);

    AuthenticationService::logout(&mut persistence, &token).unwrap();
    assert!(AuthenticationService::validate_session(&mut persistence, &token).is_err());
}

#[test]
fn test_login_rejects_wrong_password() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    register_active_writer(&mut persistence, "writer@example.com");

    let result = AuthenticationService::login(&mut persistence, "writer@example.com", "nope");

    assert!(result.is_err());
}

#[test]
fn test_my_jobs_lists_assigned_tasks_by_deadline() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let admin: AuthenticatedActor = actor_for(&register_admin(&mut persistence, "boss@kazisoko.com"));
    let writer: Profile = register_active_writer(&mut persistence, "writer@example.com");
    let writer_actor: AuthenticatedActor = actor_for(&writer);

    let mut request = super::helpers::sample_task_request();
    request.duration_hours = 96;
    let far: TaskInfo = handlers::create_task(&mut persistence, &admin, request)
        .unwrap()
        .task;
    let near: TaskInfo = post_sample_task(&mut persistence, &admin);

    for id in [&far.id, &near.id] {
        handlers::assign_task(
            &mut persistence,
            &admin,
            &TaskId::new(id),
            &AssignTaskRequest {
                writer_id: writer.id.to_string(),
            },
        )
        .unwrap();
    }

    let jobs = handlers::list_my_jobs(&mut persistence, &writer_actor).unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, near.id);
    assert_eq!(jobs[1].id, far.id);
}

/// Unwraps the tiered store back into its primary for handler calls.
fn into_primary(store: TieredBidStore<SqlitePersistence>) -> SqlitePersistence {
    store.into_inner()
}
