// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{PayoutInstruction, TransitionResult};
use kazi_domain::{
    DomainError, Task, TaskId, TaskStatus, validate_deadline_hours, validate_description,
    validate_price_cents, validate_title,
};
use time::{Duration, OffsetDateTime};

/// Applies a creation command, producing a new task in the Open state.
///
/// The engine performs no I/O and never reads the clock: the caller
/// supplies both the task identifier and the posting time.
///
/// # Arguments
///
/// * `command` - The `CreateTask` command to apply
/// * `id` - The identifier for the new task
/// * `now` - The posting time; the deadline is computed from it
///
/// # Returns
///
/// * `Ok(Task)` in the Open state
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if the title, description, price, or deadline
/// offset violates domain rules.
pub fn apply_create(command: Command, id: TaskId, now: OffsetDateTime) -> Result<Task, CoreError> {
    match command {
        Command::CreateTask {
            title,
            category,
            description,
            price,
            deadline_hours,
        } => {
            validate_title(&title)?;
            validate_description(&description)?;
            validate_price_cents(price.cents())?;
            validate_deadline_hours(deadline_hours)?;

            let deadline: OffsetDateTime = now
                .checked_add(Duration::hours(deadline_hours))
                .ok_or_else(|| {
                    CoreError::DomainViolation(DomainError::InvalidDeadline(String::from(
                        "Deadline overflows the representable time range",
                    )))
                })?;

            Ok(Task {
                id,
                title,
                category,
                description,
                price,
                status: TaskStatus::Open,
                assigned_to: None,
                deadline,
                created_at: now,
                submission_url: None,
                submission_notes: None,
            })
        }
        _ => {
            // Transition commands should use apply() instead
            unreachable!("apply_create called with a non-creation command")
        }
    }
}

/// Applies a transition command to a task, producing the new task state.
///
/// This function is pure: it validates the command against the current
/// task and returns a new task value. Persisting the result — and doing
/// so atomically against concurrent writers — is the caller's concern.
///
/// # Arguments
///
/// * `task` - The current task (immutable)
/// * `command` - The transition command to apply
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new task and, for approvals,
///   the payout instruction to record
/// * `Err(CoreError)` if the command is invalid for the current state
///
/// # Errors
///
/// Returns an error if:
/// - The transition is not in the lifecycle graph
/// - The command's writer is not the task's assignee
pub fn apply(task: &Task, command: Command) -> Result<TransitionResult, CoreError> {
    match command {
        Command::AssignWriter { writer } => {
            // Assignment demands an open task. An already-assigned task
            // cannot be reassigned through this path; the race between
            // two concurrent assignments is settled by the store.
            if task.status != TaskStatus::Open {
                return Err(CoreError::DomainViolation(DomainError::TaskNotOpen {
                    status: task.status,
                }));
            }

            let mut new_task: Task = task.clone();
            new_task.status = TaskStatus::Assigned;
            new_task.assigned_to = Some(writer);

            Ok(TransitionResult {
                task: new_task,
                payout: None,
            })
        }
        Command::SubmitWork {
            writer,
            notes,
            artifact_url,
        } => {
            if !task.status.accepts_submission() {
                return Err(CoreError::DomainViolation(DomainError::InvalidTransition {
                    from: task.status,
                    to: TaskStatus::Review,
                }));
            }

            if !task.is_assigned_to(&writer) {
                return Err(CoreError::DomainViolation(DomainError::NotAssignee {
                    assignee: task.assigned_to.as_ref().map(ToString::to_string),
                }));
            }

            let mut new_task: Task = task.clone();
            new_task.status = TaskStatus::Review;
            new_task.submission_notes = Some(notes);
            new_task.submission_url = Some(artifact_url);

            Ok(TransitionResult {
                task: new_task,
                payout: None,
            })
        }
        Command::ApproveSubmission => {
            if task.status != TaskStatus::Review {
                return Err(CoreError::DomainViolation(DomainError::NotInReview {
                    status: task.status,
                }));
            }

            let writer: kazi_domain::ProfileId =
                task.assigned_to.clone().ok_or_else(|| {
                    CoreError::Internal(String::from(
                        "Task in review has no assignee",
                    ))
                })?;

            let mut new_task: Task = task.clone();
            new_task.status = TaskStatus::Completed;

            Ok(TransitionResult {
                task: new_task,
                payout: Some(PayoutInstruction {
                    writer,
                    amount: task.price,
                }),
            })
        }
        Command::RejectSubmission => {
            if task.status != TaskStatus::Review {
                return Err(CoreError::DomainViolation(DomainError::NotInReview {
                    status: task.status,
                }));
            }

            // Rejection keeps the assignee so the writer can resubmit.
            let mut new_task: Task = task.clone();
            new_task.status = TaskStatus::Rejected;

            Ok(TransitionResult {
                task: new_task,
                payout: None,
            })
        }
        Command::CreateTask { .. } => {
            // Creation commands should use apply_create() instead
            unreachable!("apply called with a creation command")
        }
    }
}
