// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::collections::HashMap;
use tracing::debug;

use crate::data_models::BidRow;
use crate::diesel_schema::bids;
use crate::error::PersistenceError;
use kazi_domain::{Bid, ProfileId, TaskId};

/// Lists all bids for a task, ordered by submission time ascending.
///
/// First-come bids are visible first in the admin review view. There is
/// no pagination: per-task bid volumes stay small at this scale.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `task_id` - The task to list bids for
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bids_for_task(
    conn: &mut SqliteConnection,
    task_id: &TaskId,
) -> Result<Vec<Bid>, PersistenceError> {
    debug!("Listing bids for task: {}", task_id);

    let rows: Vec<BidRow> = bids::table
        .filter(bids::task_id.eq(task_id.value()))
        .order(bids::created_at.asc())
        .select(BidRow::as_select())
        .load(conn)?;

    rows.into_iter().map(BidRow::into_bid).collect()
}

/// Lists all bids placed by a writer.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `writer` - The writer to list bids for
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bids_for_writer(
    conn: &mut SqliteConnection,
    writer: &ProfileId,
) -> Result<Vec<Bid>, PersistenceError> {
    let rows: Vec<BidRow> = bids::table
        .filter(bids::user_id.eq(writer.value()))
        .order(bids::created_at.asc())
        .select(BidRow::as_select())
        .load(conn)?;

    rows.into_iter().map(BidRow::into_bid).collect()
}

/// Computes bid counts for every task in one aggregation.
///
/// The browse view renders an applicant count next to each open task;
/// computing the counts here avoids an N+1 query per rendered task.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn aggregate_bid_counts(
    conn: &mut SqliteConnection,
) -> Result<HashMap<String, u64>, PersistenceError> {
    let counts: Vec<(String, i64)> = bids::table
        .group_by(bids::task_id)
        .select((bids::task_id, diesel::dsl::count_star()))
        .load(conn)?;

    Ok(counts
        .into_iter()
        .map(|(task_id, count)| (task_id, count.unsigned_abs()))
        .collect())
}

/// Checks whether a bid exists for a (task, writer) pair.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `task_id` - The task
/// * `writer` - The writer
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn has_bid(
    conn: &mut SqliteConnection,
    task_id: &TaskId,
    writer: &ProfileId,
) -> Result<bool, PersistenceError> {
    let exists: bool = diesel::select(diesel::dsl::exists(
        bids::table
            .filter(bids::task_id.eq(task_id.value()))
            .filter(bids::user_id.eq(writer.value())),
    ))
    .get_result(conn)?;

    Ok(exists)
}
