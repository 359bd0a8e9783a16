// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, TaskStatus};
use std::str::FromStr;

// ============================================================================
// Transition Graph Tests
// ============================================================================

#[test]
fn test_open_transitions_only_to_assigned() {
    assert!(TaskStatus::Open.can_transition_to(TaskStatus::Assigned));
    assert!(!TaskStatus::Open.can_transition_to(TaskStatus::Review));
    assert!(!TaskStatus::Open.can_transition_to(TaskStatus::Completed));
    assert!(!TaskStatus::Open.can_transition_to(TaskStatus::Rejected));
    assert!(!TaskStatus::Open.can_transition_to(TaskStatus::Open));
}

#[test]
fn test_assigned_transitions_only_to_review() {
    assert!(TaskStatus::Assigned.can_transition_to(TaskStatus::Review));
    assert!(!TaskStatus::Assigned.can_transition_to(TaskStatus::Open));
    assert!(!TaskStatus::Assigned.can_transition_to(TaskStatus::Completed));
    assert!(!TaskStatus::Assigned.can_transition_to(TaskStatus::Rejected));
}

#[test]
fn test_review_transitions_to_completed_or_rejected() {
    assert!(TaskStatus::Review.can_transition_to(TaskStatus::Completed));
    assert!(TaskStatus::Review.can_transition_to(TaskStatus::Rejected));
    assert!(!TaskStatus::Review.can_transition_to(TaskStatus::Open));
    assert!(!TaskStatus::Review.can_transition_to(TaskStatus::Assigned));
}

#[test]
fn test_rejected_transitions_back_to_review_only() {
    assert!(TaskStatus::Rejected.can_transition_to(TaskStatus::Review));
    assert!(!TaskStatus::Rejected.can_transition_to(TaskStatus::Open));
    assert!(!TaskStatus::Rejected.can_transition_to(TaskStatus::Assigned));
    assert!(!TaskStatus::Rejected.can_transition_to(TaskStatus::Completed));
}

#[test]
fn test_completed_is_terminal() {
    assert!(TaskStatus::Completed.is_terminal());
    for target in [
        TaskStatus::Open,
        TaskStatus::Assigned,
        TaskStatus::Review,
        TaskStatus::Completed,
        TaskStatus::Rejected,
    ] {
        assert!(!TaskStatus::Completed.can_transition_to(target));
    }
}

#[test]
fn test_rejected_is_not_terminal() {
    assert!(!TaskStatus::Rejected.is_terminal());
}

#[test]
fn test_default_status_is_open() {
    assert_eq!(TaskStatus::default(), TaskStatus::Open);
}

// ============================================================================
// Capability Predicate Tests
// ============================================================================

#[test]
fn test_only_open_accepts_bids() {
    assert!(TaskStatus::Open.accepts_bids());
    assert!(!TaskStatus::Assigned.accepts_bids());
    assert!(!TaskStatus::Review.accepts_bids());
    assert!(!TaskStatus::Completed.accepts_bids());
    assert!(!TaskStatus::Rejected.accepts_bids());
}

#[test]
fn test_assigned_and_rejected_accept_submission() {
    assert!(TaskStatus::Assigned.accepts_submission());
    assert!(TaskStatus::Rejected.accepts_submission());
    assert!(!TaskStatus::Open.accepts_submission());
    assert!(!TaskStatus::Review.accepts_submission());
    assert!(!TaskStatus::Completed.accepts_submission());
}

// ============================================================================
// String Round-Trip Tests
// ============================================================================

#[test]
fn test_status_round_trips_through_strings() {
    for status in [
        TaskStatus::Open,
        TaskStatus::Assigned,
        TaskStatus::Review,
        TaskStatus::Completed,
        TaskStatus::Rejected,
    ] {
        assert_eq!(TaskStatus::from_str(status.as_str()).unwrap(), status);
    }
}

#[test]
fn test_status_rejects_unknown_string() {
    let result = TaskStatus::from_str("archived");

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidTaskStatus(_)
    ));
}
