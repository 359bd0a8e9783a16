// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod bid_tests;
mod profile_tests;
mod store_tests;

use crate::SqlitePersistence;
use kazi_domain::{
    Amount, Bid, BidId, BidStatus, Category, ProfileId, Role, Task, TaskId, TaskStatus,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

/// A fixed reference time shared by persistence tests.
pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-02 07:00 UTC)
}

/// Creates an in-memory persistence instance.
pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("In-memory database")
}

/// Inserts a writer profile and returns its identifier.
pub fn insert_writer(persistence: &mut SqlitePersistence, id: &str, email: &str) -> ProfileId {
    let profile_id: ProfileId = ProfileId::new(id);
    persistence
        .create_profile(&profile_id, email, None, "correct horse battery", Role::Writer, test_now())
        .expect("Profile insert");
    profile_id
}

/// Builds an open task value with the given identifier.
pub fn sample_task(id: &str) -> Task {
    Task {
        id: TaskId::new(id),
        title: String::from("5 Blog Posts on Fintech Trends"),
        category: Category::ContentWriting,
        description: String::from("Write 5 engaging blog posts about mobile money."),
        price: Amount::from_shillings(2500),
        status: TaskStatus::Open,
        assigned_to: None,
        deadline: test_now() + Duration::hours(48),
        created_at: test_now(),
        submission_url: None,
        submission_notes: None,
    }
}

/// Builds a pending bid value.
///
/// The `minute_offset` staggers creation times so ordering assertions
/// are meaningful.
pub fn sample_bid(id: &str, task_id: &TaskId, user_id: &ProfileId, minute_offset: i64) -> Bid {
    Bid {
        id: BidId::new(id),
        task_id: task_id.clone(),
        user_id: user_id.clone(),
        proposal: String::from("I have 3 years experience with fintech content."),
        amount: Amount::ZERO,
        status: BidStatus::Pending,
        created_at: test_now() + Duration::minutes(minute_offset),
    }
}
