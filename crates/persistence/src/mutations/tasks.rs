// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Task insertion and lifecycle mutations.
//!
//! Every transition re-states its precondition in the `WHERE` clause.
//! Two concurrent assignments of the same open task therefore cannot
//! both succeed: the loser's update matches zero rows and is reported
//! as `Conflict`.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::format_timestamp;
use crate::diesel_schema::tasks;
use crate::error::PersistenceError;
use kazi_domain::{ProfileId, Task, TaskId, TaskStatus};

/// Inserts a newly created task.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `task` - The task produced by the lifecycle engine
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_task(conn: &mut SqliteConnection, task: &Task) -> Result<(), PersistenceError> {
    info!("Inserting task {} ({})", task.id, task.title);

    diesel::insert_into(tasks::table)
        .values((
            tasks::task_id.eq(task.id.value()),
            tasks::title.eq(&task.title),
            tasks::category.eq(task.category.as_str()),
            tasks::description.eq(&task.description),
            tasks::price_cents.eq(task.price.cents()),
            tasks::status.eq(task.status.as_str()),
            tasks::assigned_to.eq(task.assigned_to.as_ref().map(ProfileId::value)),
            tasks::deadline.eq(format_timestamp(task.deadline)?),
            tasks::created_at.eq(format_timestamp(task.created_at)?),
            tasks::submission_url.eq(task.submission_url.as_deref()),
            tasks::submission_notes.eq(task.submission_notes.as_deref()),
        ))
        .execute(conn)?;

    Ok(())
}

/// Assigns an open task to a writer.
///
/// The update is conditioned on the task still being open. When two
/// admins race to assign the same task, exactly one conditional update
/// matches; the other receives `Conflict` and must re-fetch.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `task_id` - The task to assign
/// * `writer` - The writer to assign it to
///
/// # Errors
///
/// Returns `Conflict` if the task exists but is no longer open,
/// `NotFound` if it does not exist, or another error kind if the
/// update fails.
pub fn assign_task(
    conn: &mut SqliteConnection,
    task_id: &TaskId,
    writer: &ProfileId,
) -> Result<(), PersistenceError> {
    info!("Assigning task {} to writer {}", task_id, writer);

    let affected: usize = diesel::update(
        tasks::table
            .filter(tasks::task_id.eq(task_id.value()))
            .filter(tasks::status.eq(TaskStatus::Open.as_str())),
    )
    .set((
        tasks::status.eq(TaskStatus::Assigned.as_str()),
        tasks::assigned_to.eq(writer.value()),
    ))
    .execute(conn)?;

    if affected == 0 {
        return Err(not_matched(conn, task_id, "assign"));
    }

    Ok(())
}

/// Records a submission, moving the task into review.
///
/// The update is conditioned on the task being assigned (or rejected,
/// for resubmission) to this writer.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `task_id` - The task being submitted
/// * `writer` - The submitting writer; must be the assignee
/// * `notes` - The writer's submission notes
/// * `artifact_url` - The stored artifact reference
///
/// # Errors
///
/// Returns `Conflict` if the task is not in a submittable state for
/// this writer, `NotFound` if it does not exist, or another error kind
/// if the update fails.
pub fn record_submission(
    conn: &mut SqliteConnection,
    task_id: &TaskId,
    writer: &ProfileId,
    notes: &str,
    artifact_url: &str,
) -> Result<(), PersistenceError> {
    info!("Recording submission for task {} by {}", task_id, writer);

    let affected: usize = diesel::update(
        tasks::table
            .filter(tasks::task_id.eq(task_id.value()))
            .filter(tasks::assigned_to.eq(writer.value()))
            .filter(
                tasks::status
                    .eq(TaskStatus::Assigned.as_str())
                    .or(tasks::status.eq(TaskStatus::Rejected.as_str())),
            ),
    )
    .set((
        tasks::status.eq(TaskStatus::Review.as_str()),
        tasks::submission_notes.eq(notes),
        tasks::submission_url.eq(artifact_url),
    ))
    .execute(conn)?;

    if affected == 0 {
        return Err(not_matched(conn, task_id, "submit"));
    }

    Ok(())
}

/// Records a review decision for a task in review.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `task_id` - The task under review
/// * `outcome` - `Completed` for approval, `Rejected` for refusal
///
/// # Errors
///
/// Returns `Conflict` if the task is not in review, `NotFound` if it
/// does not exist, or another error kind if the update fails.
pub fn set_review_outcome(
    conn: &mut SqliteConnection,
    task_id: &TaskId,
    outcome: TaskStatus,
) -> Result<(), PersistenceError> {
    info!("Recording review outcome {} for task {}", outcome, task_id);

    let affected: usize = diesel::update(
        tasks::table
            .filter(tasks::task_id.eq(task_id.value()))
            .filter(tasks::status.eq(TaskStatus::Review.as_str())),
    )
    .set(tasks::status.eq(outcome.as_str()))
    .execute(conn)?;

    if affected == 0 {
        return Err(not_matched(conn, task_id, "review"));
    }

    Ok(())
}

/// Distinguishes a conditional-update miss from a missing task.
fn not_matched(
    conn: &mut SqliteConnection,
    task_id: &TaskId,
    operation: &str,
) -> PersistenceError {
    let exists: Result<bool, diesel::result::Error> = diesel::select(diesel::dsl::exists(
        tasks::table.filter(tasks::task_id.eq(task_id.value())),
    ))
    .get_result(conn);

    match exists {
        Ok(true) => PersistenceError::Conflict(format!(
            "Task {task_id} changed state before this {operation} could apply"
        )),
        Ok(false) => PersistenceError::NotFound(format!("Task {task_id} does not exist")),
        Err(e) => PersistenceError::from(e),
    }
}
