// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Task entity and lifecycle states.
//!
//! Status transitions are admin- or assignee-initiated only; the system
//! never advances a task based on time alone. Deadlines are advisory.

use crate::category::Category;
use crate::error::DomainError;
use crate::types::{Amount, ProfileId, TaskId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Represents the lifecycle state of a task.
///
/// Explicit lifecycle states govern which operations are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Initial state after posting. Writers may bid.
    #[default]
    Open,
    /// A writer has been assigned. Bidding is closed.
    Assigned,
    /// Work has been submitted and awaits an admin decision.
    Review,
    /// The submission was approved. Terminal.
    Completed,
    /// The submission was refused. The assignee may resubmit.
    Rejected,
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "assigned" => Ok(Self::Assigned),
            "review" => Ok(Self::Review),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidTaskStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TaskStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::Review => "review",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - Open → Assigned
    /// - Assigned → Review
    /// - Review → Completed
    /// - Review → Rejected
    /// - Rejected → Review (resubmission)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Assigned)
                | (Self::Assigned | Self::Rejected, Self::Review)
                | (Self::Review, Self::Completed | Self::Rejected)
        )
    }

    /// Returns whether this status is terminal.
    ///
    /// Completed is the only terminal state; rejected tasks remain live
    /// so the assignee can resubmit.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns whether writers may place bids in this status.
    #[must_use]
    pub const fn accepts_bids(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns whether the assignee may submit work in this status.
    #[must_use]
    pub const fn accepts_submission(&self) -> bool {
        matches!(self, Self::Assigned | Self::Rejected)
    }
}

/// A postable, biddable, assignable unit of paid work.
///
/// Tasks are created by admin action, mutated only through lifecycle
/// transitions, and never physically deleted: rejected tasks remain
/// visible so the writer can resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// The task identifier.
    pub id: TaskId,
    /// The task title.
    pub title: String,
    /// The job category.
    pub category: Category,
    /// The full job description.
    pub description: String,
    /// The offered price in minor currency units.
    pub price: Amount,
    /// The lifecycle status.
    pub status: TaskStatus,
    /// The assigned writer, once one has been chosen.
    pub assigned_to: Option<ProfileId>,
    /// The completion deadline.
    pub deadline: OffsetDateTime,
    /// When the task was posted.
    pub created_at: OffsetDateTime,
    /// The submitted artifact reference, once work is submitted.
    pub submission_url: Option<String>,
    /// The writer's submission notes, once work is submitted.
    pub submission_notes: Option<String>,
}

impl Task {
    /// Returns true if the given writer is the task's assignee.
    #[must_use]
    pub fn is_assigned_to(&self, writer: &ProfileId) -> bool {
        self.assigned_to.as_ref() == Some(writer)
    }
}
