// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::task::TaskStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Task title is empty or invalid.
    InvalidTitle(String),
    /// Task description is empty or invalid.
    InvalidDescription(String),
    /// Task price is not a positive amount of minor currency units.
    InvalidPrice(String),
    /// Task category is not a member of the fixed category set.
    InvalidCategory(String),
    /// Task deadline offset is out of range.
    InvalidDeadline(String),
    /// Bid proposal text does not meet the minimum length.
    InvalidProposal(String),
    /// Phone number is not a plausible mobile-money destination.
    InvalidPhoneNumber(String),
    /// Role string is not a valid role.
    InvalidRole(String),
    /// Tier string is not a valid subscription tier.
    InvalidTier(String),
    /// Task status string is not a valid status.
    InvalidTaskStatus(String),
    /// Bid status string is not a valid status.
    InvalidBidStatus(String),
    /// Transaction kind string is not a valid kind.
    InvalidTransactionKind(String),
    /// Transaction status string is not a valid status.
    InvalidTransactionStatus(String),
    /// The requested status transition is not in the lifecycle graph.
    InvalidTransition {
        /// The current status.
        from: TaskStatus,
        /// The requested status.
        to: TaskStatus,
    },
    /// The task is not open for the attempted operation.
    TaskNotOpen {
        /// The current status of the task.
        status: TaskStatus,
    },
    /// The caller is not the writer the task is assigned to.
    NotAssignee {
        /// The task's assignee, if any.
        assignee: Option<String>,
    },
    /// The task has no submission in review.
    NotInReview {
        /// The current status of the task.
        status: TaskStatus,
    },
    /// A bid already exists for this (task, writer) pair.
    DuplicateBid {
        /// The task identifier.
        task_id: String,
        /// The writer identifier.
        writer_id: String,
    },
    /// The writer has not paid the activation fee.
    ActivationRequired {
        /// The writer identifier.
        writer_id: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidDescription(msg) => write!(f, "Invalid description: {msg}"),
            Self::InvalidPrice(msg) => write!(f, "Invalid price: {msg}"),
            Self::InvalidCategory(msg) => write!(f, "Invalid category: {msg}"),
            Self::InvalidDeadline(msg) => write!(f, "Invalid deadline: {msg}"),
            Self::InvalidProposal(msg) => write!(f, "Invalid proposal: {msg}"),
            Self::InvalidPhoneNumber(msg) => write!(f, "Invalid phone number: {msg}"),
            Self::InvalidRole(msg) => write!(f, "Invalid role: {msg}"),
            Self::InvalidTier(msg) => write!(f, "Invalid tier: {msg}"),
            Self::InvalidTaskStatus(msg) => write!(f, "Invalid task status: {msg}"),
            Self::InvalidBidStatus(msg) => write!(f, "Invalid bid status: {msg}"),
            Self::InvalidTransactionKind(msg) => write!(f, "Invalid transaction kind: {msg}"),
            Self::InvalidTransactionStatus(msg) => {
                write!(f, "Invalid transaction status: {msg}")
            }
            Self::InvalidTransition { from, to } => {
                write!(f, "Invalid transition from {from} to {to}")
            }
            Self::TaskNotOpen { status } => {
                write!(f, "Task is not open for applications (status: {status})")
            }
            Self::NotAssignee { assignee } => match assignee {
                Some(id) => write!(f, "Task is assigned to a different writer ({id})"),
                None => write!(f, "Task is not assigned to any writer"),
            },
            Self::NotInReview { status } => {
                write!(f, "Task has no submission in review (status: {status})")
            }
            Self::DuplicateBid { task_id, writer_id } => {
                write!(f, "Writer {writer_id} has already bid on task {task_id}")
            }
            Self::ActivationRequired { writer_id } => {
                write!(f, "Writer {writer_id} must activate their account first")
            }
        }
    }
}

impl std::error::Error for DomainError {}
