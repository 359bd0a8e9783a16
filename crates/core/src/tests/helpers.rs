// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, apply, apply_create};
use kazi_domain::{Amount, Category, ProfileId, Task, TaskId};
use time::macros::datetime;
use time::OffsetDateTime;

/// A fixed posting time shared by core tests.
pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-02 07:00 UTC)
}

/// Creates a representative open task.
pub fn create_open_task() -> Task {
    let command: Command = Command::CreateTask {
        title: String::from("5 Blog Posts on Fintech Trends"),
        category: Category::ContentWriting,
        description: String::from("Write 5 engaging blog posts about mobile money."),
        price: Amount::from_shillings(2500),
        deadline_hours: 48,
    };
    apply_create(command, TaskId::new("task-1"), test_now()).unwrap()
}

/// Creates a task assigned to the given writer.
pub fn create_assigned_task(writer: &str) -> Task {
    let task: Task = create_open_task();
    let result = apply(
        &task,
        Command::AssignWriter {
            writer: ProfileId::new(writer),
        },
    )
    .unwrap();
    result.task
}

/// Creates a task in review, submitted by the given writer.
pub fn create_task_in_review(writer: &str) -> Task {
    let task: Task = create_assigned_task(writer);
    let result = apply(
        &task,
        Command::SubmitWork {
            writer: ProfileId::new(writer),
            notes: String::from("All five drafts attached."),
            artifact_url: String::from("blob://assignments/task-1_draft.zip"),
        },
    )
    .unwrap();
    result.task
}
