// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistenceError, SqlitePersistence};
use kazi_domain::{Bid, ProfileId, Task, TaskId};
use std::collections::HashMap;

use super::{create_test_persistence, insert_writer, sample_bid, sample_task};

#[test]
fn test_duplicate_bid_is_rejected_by_unique_index() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: ProfileId = insert_writer(&mut persistence, "writer-a", "a@example.com");
    let task: Task = sample_task("task-1");
    persistence.insert_task(&task).unwrap();

    persistence
        .insert_bid(&sample_bid("bid-1", &task.id, &writer, 0))
        .unwrap();

    // Same (task, writer) pair under a fresh bid id: the index, not an
    // application-level check, rejects it.
    let result = persistence.insert_bid(&sample_bid("bid-2", &task.id, &writer, 1));

    assert!(matches!(
        result.unwrap_err(),
        PersistenceError::ConstraintViolation(_)
    ));

    let bids: Vec<Bid> = persistence.list_bids_for_task(&task.id).unwrap();
    assert_eq!(bids.len(), 1);
}

#[test]
fn test_same_writer_may_bid_on_different_tasks() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: ProfileId = insert_writer(&mut persistence, "writer-a", "a@example.com");
    let task_1: Task = sample_task("task-1");
    let task_2: Task = sample_task("task-2");
    persistence.insert_task(&task_1).unwrap();
    persistence.insert_task(&task_2).unwrap();

    persistence
        .insert_bid(&sample_bid("bid-1", &task_1.id, &writer, 0))
        .unwrap();
    persistence
        .insert_bid(&sample_bid("bid-2", &task_2.id, &writer, 1))
        .unwrap();

    assert_eq!(persistence.list_bids_for_writer(&writer).unwrap().len(), 2);
}

#[test]
fn test_bid_for_unknown_task_violates_foreign_key() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer: ProfileId = insert_writer(&mut persistence, "writer-a", "a@example.com");

    let result = persistence.insert_bid(&sample_bid("bid-1", &TaskId::new("ghost"), &writer, 0));

    assert!(matches!(
        result.unwrap_err(),
        PersistenceError::ConstraintViolation(_)
    ));
}

#[test]
fn test_bids_for_task_are_submission_ordered() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer_a: ProfileId = insert_writer(&mut persistence, "writer-a", "a@example.com");
    let writer_b: ProfileId = insert_writer(&mut persistence, "writer-b", "b@example.com");
    let writer_c: ProfileId = insert_writer(&mut persistence, "writer-c", "c@example.com");
    let task: Task = sample_task("task-1");
    persistence.insert_task(&task).unwrap();

    // Inserted out of submission order.
    persistence
        .insert_bid(&sample_bid("bid-b", &task.id, &writer_b, 5))
        .unwrap();
    persistence
        .insert_bid(&sample_bid("bid-a", &task.id, &writer_a, 1))
        .unwrap();
    persistence
        .insert_bid(&sample_bid("bid-c", &task.id, &writer_c, 9))
        .unwrap();

    let bids: Vec<Bid> = persistence.list_bids_for_task(&task.id).unwrap();
    let order: Vec<&str> = bids.iter().map(|bid| bid.id.value()).collect();
    assert_eq!(order, vec!["bid-a", "bid-b", "bid-c"]);
}

#[test]
fn test_aggregate_counts_match_per_task_tallies() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writers: Vec<ProfileId> = (0..4)
        .map(|i| {
            insert_writer(
                &mut persistence,
                &format!("writer-{i}"),
                &format!("writer{i}@example.com"),
            )
        })
        .collect();

    let task_1: Task = sample_task("task-1");
    let task_2: Task = sample_task("task-2");
    let task_3: Task = sample_task("task-3");
    for task in [&task_1, &task_2, &task_3] {
        persistence.insert_task(task).unwrap();
    }

    // 3 bids on task-1, 1 on task-2, none on task-3.
    for (i, writer) in writers.iter().take(3).enumerate() {
        persistence
            .insert_bid(&sample_bid(
                &format!("bid-1-{i}"),
                &task_1.id,
                writer,
                i64::try_from(i).unwrap(),
            ))
            .unwrap();
    }
    persistence
        .insert_bid(&sample_bid("bid-2-0", &task_2.id, &writers[3], 0))
        .unwrap();

    let counts: HashMap<String, u64> = persistence.aggregate_bid_counts().unwrap();

    assert_eq!(counts.get("task-1"), Some(&3));
    assert_eq!(counts.get("task-2"), Some(&1));
    assert_eq!(counts.get("task-3"), None);

    // The aggregate agrees with per-task listings.
    for task in [&task_1, &task_2, &task_3] {
        let listed: u64 =
            u64::try_from(persistence.list_bids_for_task(&task.id).unwrap().len()).unwrap();
        let counted: u64 = counts.get(task.id.value()).copied().unwrap_or(0);
        assert_eq!(listed, counted);
    }
}

#[test]
fn test_has_bid_membership() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let writer_a: ProfileId = insert_writer(&mut persistence, "writer-a", "a@example.com");
    let writer_b: ProfileId = insert_writer(&mut persistence, "writer-b", "b@example.com");
    let task: Task = sample_task("task-1");
    persistence.insert_task(&task).unwrap();

    persistence
        .insert_bid(&sample_bid("bid-1", &task.id, &writer_a, 0))
        .unwrap();

    assert!(persistence.has_bid(&task.id, &writer_a).unwrap());
    assert!(!persistence.has_bid(&task.id, &writer_b).unwrap());
}
