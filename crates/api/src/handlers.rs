// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for task lifecycle and read operations.
//!
//! Handlers compose the layers: authorize the actor, validate through
//! the pure lifecycle engine against a fresh read, then persist through
//! the conditional mutations that settle races. The engine's verdict is
//! advisory until the store's conditional update agrees.

use std::str::FromStr;

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::gate;
use crate::ids;
use crate::request_response::{
    AssignTaskRequest, AssignTaskResponse, CreateTaskRequest, CreateTaskResponse, ReviewResponse,
    SubmitWorkRequest, SubmitWorkResponse, TaskInfo, TransactionInfo,
};
use crate::storage::{BlobStore, StoredArtifact, store_submission_artifact};
use kazi::{Command, PayoutInstruction, TransitionResult, apply, apply_create};
use kazi_domain::{
    Amount, Category, Profile, ProfileId, Task, TaskId, TaskStatus, Transaction, TransactionId,
    TransactionKind, TransactionStatus,
};
use kazi_persistence::SqlitePersistence;

/// Resolves a task or reports a stale reference.
fn require_task(
    persistence: &mut SqlitePersistence,
    task_id: &TaskId,
) -> Result<Task, ApiError> {
    persistence
        .get_task(task_id)
        .map_err(|e| translate_persistence_error(e, "Task"))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Task"),
            message: format!("Task {task_id} does not exist"),
        })
}

/// Resolves a profile or reports a stale reference.
fn require_profile(
    persistence: &mut SqlitePersistence,
    profile_id: &ProfileId,
) -> Result<Profile, ApiError> {
    persistence
        .get_profile(profile_id)
        .map_err(|e| translate_persistence_error(e, "Profile"))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Profile"),
            message: format!("Profile {profile_id} does not exist"),
        })
}

/// Posts a new task.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated actor (must be Admin)
/// * `request` - The task to post
///
/// # Errors
///
/// Returns an error if the actor is not an admin, a field fails
/// validation, or the insert fails.
pub fn create_task(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
    request: CreateTaskRequest,
) -> Result<CreateTaskResponse, ApiError> {
    AuthorizationService::authorize_create_task(actor).map_err(ApiError::from)?;

    let category: Category =
        Category::from_str(&request.category).map_err(crate::error::translate_domain_error)?;

    let command: Command = Command::CreateTask {
        title: request.title,
        category,
        description: request.description,
        price: Amount::from_shillings(request.price_shillings),
        deadline_hours: request.duration_hours,
    };

    let task: Task = apply_create(
        command,
        TaskId::new(&ids::fresh_id("task")),
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    persistence
        .insert_task(&task)
        .map_err(|e| translate_persistence_error(e, "Task"))?;

    info!("Task {} posted by {}", task.id, actor.id);

    Ok(CreateTaskResponse {
        task: TaskInfo::from_task(&task)?,
        message: String::from("Task posted."),
    })
}

/// Assigns an open task to a writer.
///
/// The assignee must pass the activation gate: tier never substitutes
/// for the activation fee. The store's conditional update settles
/// concurrent assignments; the loser receives a conflict and the
/// winning bid settlement never runs for it.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated actor (must be Admin)
/// * `task_id` - The task to assign
/// * `request` - The chosen writer
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the task or writer
/// does not exist, the writer fails the gate, or the assignment lost a
/// race (`Conflict`).
pub fn assign_task(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
    task_id: &TaskId,
    request: &AssignTaskRequest,
) -> Result<AssignTaskResponse, ApiError> {
    AuthorizationService::authorize_assign_task(actor).map_err(ApiError::from)?;

    let task: Task = require_task(persistence, task_id)?;
    let writer_id: ProfileId = ProfileId::new(&request.writer_id);
    let writer: Profile = require_profile(persistence, &writer_id)?;

    gate::ensure_may_claim(&writer)?;

    // Validate the transition against the engine before writing.
    let result: TransitionResult = apply(
        &task,
        Command::AssignWriter {
            writer: writer_id.clone(),
        },
    )
    .map_err(translate_core_error)?;

    persistence
        .assign_task_and_settle_bids(task_id, &writer_id)
        .map_err(|e| translate_persistence_error(e, "Task"))?;

    info!("Task {} assigned to {} by {}", task_id, writer_id, actor.id);

    Ok(AssignTaskResponse {
        task: TaskInfo::from_task(&result.task)?,
        message: String::from("Task assigned successfully!"),
    })
}

/// Submits completed work for review.
///
/// The artifact upload happens first and may degrade to a placeholder;
/// the status transition itself is never blocked by storage trouble.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `blob_store` - The artifact store
/// * `actor` - The authenticated actor (must be the assigned Writer)
/// * `task_id` - The task being submitted
/// * `request` - The notes and artifact
///
/// # Errors
///
/// Returns an error if the actor is not a writer, fails the activation
/// gate, is not the assignee, or the task is not in a submittable
/// state.
pub fn submit_work(
    persistence: &mut SqlitePersistence,
    blob_store: &mut dyn BlobStore,
    actor: &AuthenticatedActor,
    task_id: &TaskId,
    request: &SubmitWorkRequest,
) -> Result<SubmitWorkResponse, ApiError> {
    AuthorizationService::authorize_submit_work(actor).map_err(ApiError::from)?;

    // Server-side activation re-check against a fresh profile read.
    let profile: Profile = require_profile(persistence, &actor.id)?;
    gate::ensure_may_claim(&profile)?;

    let task: Task = require_task(persistence, task_id)?;

    let artifact: StoredArtifact =
        store_submission_artifact(blob_store, task_id, &request.file_name, &request.content);

    let result: TransitionResult = apply(
        &task,
        Command::SubmitWork {
            writer: actor.id.clone(),
            notes: request.notes.clone(),
            artifact_url: artifact.url.clone(),
        },
    )
    .map_err(translate_core_error)?;

    persistence
        .record_submission(task_id, &actor.id, &request.notes, &artifact.url)
        .map_err(|e| translate_persistence_error(e, "Task"))?;

    info!("Task {} submitted for review by {}", task_id, actor.id);

    Ok(SubmitWorkResponse {
        task: TaskInfo::from_task(&result.task)?,
        upload_degraded: artifact.degraded,
        message: String::from("Task submitted for review."),
    })
}

/// Approves the submission under review, releasing the payout.
///
/// The payout ledger entry and wallet credit are recorded after the
/// status transition commits; a ledger failure degrades with a warning
/// rather than reverting a completed task.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated actor (must be Admin)
/// * `task_id` - The task under review
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the task does not
/// exist, or it is not in review.
pub fn approve_submission(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
    task_id: &TaskId,
) -> Result<ReviewResponse, ApiError> {
    AuthorizationService::authorize_review(actor).map_err(ApiError::from)?;

    let task: Task = require_task(persistence, task_id)?;

    let result: TransitionResult =
        apply(&task, Command::ApproveSubmission).map_err(translate_core_error)?;

    persistence
        .set_review_outcome(task_id, TaskStatus::Completed)
        .map_err(|e| translate_persistence_error(e, "Task"))?;

    if let Some(payout) = result.payout {
        record_payout(persistence, task_id, &payout);
    }

    info!("Task {} approved by {}", task_id, actor.id);

    Ok(ReviewResponse {
        task: TaskInfo::from_task(&result.task)?,
        message: String::from("Submission approved. Funds released."),
    })
}

/// Refuses the submission under review, allowing resubmission.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated actor (must be Admin)
/// * `task_id` - The task under review
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the task does not
/// exist, or it is not in review.
pub fn reject_submission(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
    task_id: &TaskId,
) -> Result<ReviewResponse, ApiError> {
    AuthorizationService::authorize_review(actor).map_err(ApiError::from)?;

    let task: Task = require_task(persistence, task_id)?;

    let result: TransitionResult =
        apply(&task, Command::RejectSubmission).map_err(translate_core_error)?;

    persistence
        .set_review_outcome(task_id, TaskStatus::Rejected)
        .map_err(|e| translate_persistence_error(e, "Task"))?;

    info!("Task {} rejected by {}", task_id, actor.id);

    Ok(ReviewResponse {
        task: TaskInfo::from_task(&result.task)?,
        message: String::from("Submission rejected. The writer may resubmit."),
    })
}

/// Records the payout released by an approval.
///
/// The completed transition is authoritative; ledger or wallet trouble
/// is logged and never propagated.
fn record_payout(
    persistence: &mut SqlitePersistence,
    task_id: &TaskId,
    payout: &PayoutInstruction,
) {
    let entry: Transaction = Transaction {
        id: TransactionId::new(&ids::fresh_id("txn")),
        user_id: payout.writer.clone(),
        kind: TransactionKind::Payout,
        amount: payout.amount,
        external_reference: format!("PAYOUT-{task_id}"),
        status: TransactionStatus::Complete,
        created_at: OffsetDateTime::now_utc(),
    };

    if let Err(e) = persistence.append_transaction(&entry) {
        warn!(
            "Payout ledger write for task {} failed ({}); task remains completed",
            task_id, e
        );
        return;
    }

    if let Err(e) = persistence.credit_wallet(&payout.writer, payout.amount) {
        warn!(
            "Wallet credit for task {} failed ({}); ledger entry {} stands",
            task_id, e, entry.id
        );
    }
}

/// Lists all open tasks for the browse view, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_open_tasks(persistence: &mut SqlitePersistence) -> Result<Vec<TaskInfo>, ApiError> {
    let tasks: Vec<Task> = persistence
        .list_open_tasks()
        .map_err(|e| translate_persistence_error(e, "Task"))?;

    tasks.iter().map(TaskInfo::from_task).collect()
}

/// Lists the caller's assigned tasks, nearest deadline first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_my_jobs(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<TaskInfo>, ApiError> {
    let tasks: Vec<Task> = persistence
        .list_tasks_assigned_to(&actor.id)
        .map_err(|e| translate_persistence_error(e, "Task"))?;

    tasks.iter().map(TaskInfo::from_task).collect()
}

/// Lists the tasks awaiting review, oldest first.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated actor (must be Admin)
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_reviews(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<TaskInfo>, ApiError> {
    AuthorizationService::authorize_review(actor).map_err(ApiError::from)?;

    let tasks: Vec<Task> = persistence
        .list_tasks_in_review()
        .map_err(|e| translate_persistence_error(e, "Task"))?;

    tasks.iter().map(TaskInfo::from_task).collect()
}

/// Lists the caller's ledger entries, most recent first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_transactions(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<TransactionInfo>, ApiError> {
    let transactions: Vec<Transaction> = persistence
        .list_transactions_for_user(&actor.id)
        .map_err(|e| translate_persistence_error(e, "Transaction"))?;

    transactions
        .iter()
        .map(TransactionInfo::from_transaction)
        .collect()
}
