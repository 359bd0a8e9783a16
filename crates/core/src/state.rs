// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use kazi_domain::{Amount, ProfileId, Task};

/// A ledger instruction produced by an approval.
///
/// Approving a submission releases the task price to the assignee. The
/// engine itself performs no I/O, so the instruction travels with the
/// transition result for the caller to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutInstruction {
    /// The writer to pay.
    pub writer: ProfileId,
    /// The amount to release, in minor currency units.
    pub amount: Amount,
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail
/// without side effects. The input task is never half-mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The task after the transition.
    pub task: Task,
    /// The payout the caller must record, if the transition released one.
    pub payout: Option<PayoutInstruction>,
}
