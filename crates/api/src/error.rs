// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use kazi::CoreError;
use kazi_domain::DomainError;
use kazi_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract. Each kind carries a different remediation: invalid input
/// is fixed client-side, a conflict is retried after a re-fetch, and a
/// permission denial needs an access-policy fix rather than a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The operation lost a race against a concurrent client.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The store's authorization policy rejected the operation.
    PermissionDenied {
        /// A description of the rejection.
        message: String,
        /// What needs fixing (an access-policy change, not a retry).
        remediation: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => {
                write!(f, "Conflict: {message}")
            }
            Self::PermissionDenied {
                message,
                remediation,
            } => {
                write!(f, "Permission denied: {message} ({remediation})")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not
/// leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTitle(msg) => ApiError::InvalidInput {
            field: String::from("title"),
            message: msg,
        },
        DomainError::InvalidDescription(msg) => ApiError::InvalidInput {
            field: String::from("description"),
            message: msg,
        },
        DomainError::InvalidPrice(msg) => ApiError::InvalidInput {
            field: String::from("price"),
            message: msg,
        },
        DomainError::InvalidCategory(msg) => ApiError::InvalidInput {
            field: String::from("category"),
            message: format!("'{msg}' is not a recognized job category"),
        },
        DomainError::InvalidDeadline(msg) => ApiError::InvalidInput {
            field: String::from("deadline"),
            message: msg,
        },
        DomainError::InvalidProposal(msg) => ApiError::InvalidInput {
            field: String::from("proposal"),
            message: msg,
        },
        DomainError::InvalidPhoneNumber(msg) => ApiError::InvalidInput {
            field: String::from("phone_number"),
            message: msg,
        },
        DomainError::InvalidRole(msg) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("'{msg}' is not a valid role"),
        },
        DomainError::InvalidTier(msg) => ApiError::InvalidInput {
            field: String::from("tier"),
            message: format!("'{msg}' is not a valid tier"),
        },
        DomainError::InvalidTaskStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("'{msg}' is not a valid task status"),
        },
        DomainError::InvalidBidStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("'{msg}' is not a valid bid status"),
        },
        DomainError::InvalidTransactionKind(msg) => ApiError::InvalidInput {
            field: String::from("kind"),
            message: format!("'{msg}' is not a valid transaction kind"),
        },
        DomainError::InvalidTransactionStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("'{msg}' is not a valid transaction status"),
        },
        DomainError::InvalidTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("lifecycle_graph"),
            message: format!("A task cannot move from {from} to {to}"),
        },
        DomainError::TaskNotOpen { status } => ApiError::DomainRuleViolation {
            rule: String::from("task_open"),
            message: format!("Task is not open (status: {status})"),
        },
        DomainError::NotAssignee { assignee } => ApiError::DomainRuleViolation {
            rule: String::from("assignee_only"),
            message: match assignee {
                Some(id) => format!("Only the assigned writer ({id}) may submit work"),
                None => String::from("Task has no assigned writer"),
            },
        },
        DomainError::NotInReview { status } => ApiError::DomainRuleViolation {
            rule: String::from("review_pending"),
            message: format!("Task has no submission awaiting review (status: {status})"),
        },
        DomainError::DuplicateBid { task_id, writer_id } => ApiError::DomainRuleViolation {
            rule: String::from("single_bid_per_task"),
            message: format!("Writer {writer_id} has already applied to task {task_id}"),
        },
        DomainError::ActivationRequired { writer_id } => ApiError::DomainRuleViolation {
            rule: String::from("activation_required"),
            message: format!(
                "Writer {writer_id} must pay the activation fee before claiming work"
            ),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Permission denials keep their distinct kind and gain remediation
/// text: the fix is an access-policy change, not user retry.
///
/// # Arguments
///
/// * `err` - The persistence error
/// * `resource_type` - What was being operated on, for not-found text
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, resource_type: &str) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message,
        },
        PersistenceError::Conflict(message) => ApiError::Conflict { message },
        PersistenceError::PermissionDenied(message) => ApiError::PermissionDenied {
            message,
            remediation: String::from(
                "Review the store's access policy for this collection; retrying will not help",
            ),
        },
        PersistenceError::ConstraintViolation(message) => ApiError::DomainRuleViolation {
            rule: String::from("storage_constraint"),
            message,
        },
        other => ApiError::Internal {
            message: format!("Storage failure: {other}"),
        },
    }
}
