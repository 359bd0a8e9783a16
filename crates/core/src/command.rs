// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use kazi_domain::{Amount, Category, ProfileId};

/// A command represents admin or writer intent as data only.
///
/// Commands are the only way to request task state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Post a new task. Admin only.
    CreateTask {
        /// The task title.
        title: String,
        /// The job category.
        category: Category,
        /// The full job description.
        description: String,
        /// The offered price in minor currency units.
        price: Amount,
        /// Hours from posting time until the deadline.
        deadline_hours: i64,
    },
    /// Assign an open task to a writer. Admin only.
    AssignWriter {
        /// The writer to assign.
        writer: ProfileId,
    },
    /// Submit completed work for review. Assignee only.
    SubmitWork {
        /// The writer submitting the work.
        writer: ProfileId,
        /// The writer's submission notes.
        notes: String,
        /// The stored artifact reference.
        artifact_url: String,
    },
    /// Approve the submission under review. Admin only.
    ApproveSubmission,
    /// Refuse the submission under review, allowing resubmission.
    /// Admin only.
    RejectSubmission,
}
