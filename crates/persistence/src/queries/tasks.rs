// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Task queries.
//!
//! Each listing carries the ordering its view depends on: the browse
//! view shows newest tasks first, a writer's job list is ordered by the
//! nearest deadline, and the review queue is first-come-first-served.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::TaskRow;
use crate::diesel_schema::tasks;
use crate::error::PersistenceError;
use kazi_domain::{ProfileId, Task, TaskId, TaskStatus};

/// Retrieves a task by its identifier.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `task_id` - The task identifier
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the task is not found.
pub fn get_task(
    conn: &mut SqliteConnection,
    task_id: &TaskId,
) -> Result<Option<Task>, PersistenceError> {
    debug!("Looking up task by id: {}", task_id);

    let result: Result<TaskRow, diesel::result::Error> = tasks::table
        .filter(tasks::task_id.eq(task_id.value()))
        .select(TaskRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_task()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists all open tasks, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_open_tasks(conn: &mut SqliteConnection) -> Result<Vec<Task>, PersistenceError> {
    let rows: Vec<TaskRow> = tasks::table
        .filter(tasks::status.eq(TaskStatus::Open.as_str()))
        .order(tasks::created_at.desc())
        .select(TaskRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TaskRow::into_task).collect()
}

/// Lists the tasks assigned to a writer, nearest deadline first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `writer` - The assignee to filter by
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_tasks_assigned_to(
    conn: &mut SqliteConnection,
    writer: &ProfileId,
) -> Result<Vec<Task>, PersistenceError> {
    let rows: Vec<TaskRow> = tasks::table
        .filter(tasks::assigned_to.eq(writer.value()))
        .order(tasks::deadline.asc())
        .select(TaskRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TaskRow::into_task).collect()
}

/// Lists the tasks awaiting review, oldest submission first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_tasks_in_review(conn: &mut SqliteConnection) -> Result<Vec<Task>, PersistenceError> {
    let rows: Vec<TaskRow> = tasks::table
        .filter(tasks::status.eq(TaskStatus::Review.as_str()))
        .order(tasks::created_at.asc())
        .select(TaskRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TaskRow::into_task).collect()
}
