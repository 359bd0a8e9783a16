// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Amount, BidId, ProfileId, TaskId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The decision state of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Awaiting an admin decision.
    #[default]
    Pending,
    /// This bid won the assignment.
    Accepted,
    /// A sibling bid won the assignment.
    Rejected,
}

impl BidStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for BidStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidBidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A writer's application to a task.
///
/// At most one bid exists per (task, writer) pair. Bids are created
/// pending and settled exactly once, when the task is assigned: the
/// winner becomes accepted, every sibling becomes rejected. They are
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// The bid identifier.
    pub id: BidId,
    /// The task applied to.
    pub task_id: TaskId,
    /// The writer who applied.
    pub user_id: ProfileId,
    /// The writer's free-text proposal.
    pub proposal: String,
    /// The offered amount. Currently always zero: pricing is fixed by
    /// the task, and the field is carried for forward compatibility.
    pub amount: Amount,
    /// The decision state.
    pub status: BidStatus,
    /// When the bid was placed.
    pub created_at: OffsetDateTime,
}
