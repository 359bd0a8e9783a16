// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests walking full task lifecycles through the engine.

use crate::{Command, apply};
use kazi_domain::{ProfileId, Task, TaskStatus};

use super::helpers::{create_open_task, create_task_in_review};

#[test]
fn test_happy_path_open_to_completed() {
    let task: Task = create_open_task();
    assert_eq!(task.status, TaskStatus::Open);

    let assigned = apply(
        &task,
        Command::AssignWriter {
            writer: ProfileId::new("writer-a"),
        },
    )
    .unwrap()
    .task;
    assert_eq!(assigned.status, TaskStatus::Assigned);

    let in_review = apply(
        &assigned,
        Command::SubmitWork {
            writer: ProfileId::new("writer-a"),
            notes: String::from("Final copy attached."),
            artifact_url: String::from("blob://assignments/task-1_final.zip"),
        },
    )
    .unwrap()
    .task;
    assert_eq!(in_review.status, TaskStatus::Review);

    let completed = apply(&in_review, Command::ApproveSubmission).unwrap();
    assert_eq!(completed.task.status, TaskStatus::Completed);
    assert!(completed.payout.is_some());
}

#[test]
fn test_reject_then_resubmit_reenters_review() {
    let task: Task = create_task_in_review("writer-a");

    let rejected = apply(&task, Command::RejectSubmission).unwrap().task;
    assert_eq!(rejected.status, TaskStatus::Rejected);

    let resubmitted = apply(
        &rejected,
        Command::SubmitWork {
            writer: ProfileId::new("writer-a"),
            notes: String::from("Revised per feedback."),
            artifact_url: String::from("blob://assignments/task-1_rev2.zip"),
        },
    )
    .unwrap()
    .task;
    assert_eq!(resubmitted.status, TaskStatus::Review);

    let completed = apply(&resubmitted, Command::ApproveSubmission).unwrap().task;
    assert_eq!(completed.status, TaskStatus::Completed);
}

#[test]
fn test_resubmission_still_restricted_to_assignee() {
    let task: Task = create_task_in_review("writer-a");
    let rejected = apply(&task, Command::RejectSubmission).unwrap().task;

    let result = apply(
        &rejected,
        Command::SubmitWork {
            writer: ProfileId::new("writer-b"),
            notes: String::from("Let me take over."),
            artifact_url: String::from("blob://assignments/task-1_hijack.zip"),
        },
    );

    assert!(result.is_err());
}

#[test]
fn test_completed_task_accepts_no_further_commands() {
    let task: Task = create_task_in_review("writer-a");
    let completed = apply(&task, Command::ApproveSubmission).unwrap().task;

    assert!(apply(&completed, Command::ApproveSubmission).is_err());
    assert!(apply(&completed, Command::RejectSubmission).is_err());
    assert!(
        apply(
            &completed,
            Command::AssignWriter {
                writer: ProfileId::new("writer-b"),
            },
        )
        .is_err()
    );
    assert!(
        apply(
            &completed,
            Command::SubmitWork {
                writer: ProfileId::new("writer-a"),
                notes: String::from("One more revision."),
                artifact_url: String::from("blob://assignments/task-1_rev3.zip"),
            },
        )
        .is_err()
    );
}
