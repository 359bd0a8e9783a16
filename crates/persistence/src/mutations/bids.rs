// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid insertion and assignment settlement.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, info};

use crate::data_models::format_timestamp;
use crate::diesel_schema::bids;
use crate::error::PersistenceError;
use kazi_domain::{Bid, BidStatus, ProfileId, TaskId};

/// Inserts a new bid.
///
/// The unique index on `(task_id, user_id)` is the authoritative
/// duplicate check: a racing second bid from the same writer surfaces
/// as `ConstraintViolation` no matter what the caller pre-checked.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `bid` - The bid to insert
///
/// # Errors
///
/// Returns `ConstraintViolation` if a bid already exists for this
/// (task, writer) pair, or another error kind if the insert fails.
pub fn insert_bid(conn: &mut SqliteConnection, bid: &Bid) -> Result<(), PersistenceError> {
    info!("Inserting bid {} on task {} by {}", bid.id, bid.task_id, bid.user_id);

    diesel::insert_into(bids::table)
        .values((
            bids::bid_id.eq(bid.id.value()),
            bids::task_id.eq(bid.task_id.value()),
            bids::user_id.eq(bid.user_id.value()),
            bids::proposal.eq(&bid.proposal),
            bids::amount_cents.eq(bid.amount.cents()),
            bids::status.eq(bid.status.as_str()),
            bids::created_at.eq(format_timestamp(bid.created_at)?),
        ))
        .execute(conn)?;

    Ok(())
}

/// Settles the bids of a task when it is assigned.
///
/// The winning writer's bid becomes accepted; every sibling bid becomes
/// rejected. Runs in the same transaction as the assignment itself, so
/// bid state can never disagree with the task's assignee.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `task_id` - The assigned task
/// * `winner` - The writer whose bid won
///
/// # Errors
///
/// Returns an error if either update fails.
pub fn settle_bids_for_assignment(
    conn: &mut SqliteConnection,
    task_id: &TaskId,
    winner: &ProfileId,
) -> Result<(), PersistenceError> {
    let accepted: usize = diesel::update(
        bids::table
            .filter(bids::task_id.eq(task_id.value()))
            .filter(bids::user_id.eq(winner.value())),
    )
    .set(bids::status.eq(BidStatus::Accepted.as_str()))
    .execute(conn)?;

    let rejected: usize = diesel::update(
        bids::table
            .filter(bids::task_id.eq(task_id.value()))
            .filter(bids::user_id.ne(winner.value())),
    )
    .set(bids::status.eq(BidStatus::Rejected.as_str()))
    .execute(conn)?;

    debug!(
        "Settled bids for task {}: {} accepted, {} rejected",
        task_id, accepted, rejected
    );

    Ok(())
}
