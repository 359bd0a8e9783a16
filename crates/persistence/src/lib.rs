// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the KaziSoko marketplace.
//!
//! This crate provides `SQLite` persistence (via Diesel with embedded
//! migrations) for the four entity collections — profiles, tasks, bids,
//! and transactions — plus sessions and the role-grant policy table.
//!
//! ## Concurrency Contract
//!
//! The store is the system of record shared by independent clients, so
//! the race-sensitive invariants live here rather than in application
//! code:
//!
//! - Assignment is a conditional update on `status = 'open'`; the loser
//!   of a race receives `PersistenceError::Conflict`.
//! - The at-most-one-bid-per-(task, writer) invariant is a unique index,
//!   surfaced as `PersistenceError::ConstraintViolation`.
//! - Activation flips exactly once via a conditional update on
//!   `is_active = 0`.
//!
//! ## Testing
//!
//! Standard tests run against unique in-memory databases; no external
//! infrastructure is required.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::{Connection, SqliteConnection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;
mod store;

#[cfg(test)]
mod tests;

pub use data_models::SessionData;
pub use error::PersistenceError;
pub use store::{BidBackend, BidPlacement, ReconcileOutcome, TieredBidStore};

use kazi_domain::{
    Amount, Bid, PhoneNumber, Profile, ProfileId, Role, Task, TaskId, TaskStatus, Transaction,
};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, so
/// tests are isolated without time-based collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the marketplace entity collections.
pub struct SqlitePersistence {
    conn: SqliteConnection,
}

impl SqlitePersistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Creates a new profile with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` if the email is already registered.
    pub fn create_profile(
        &mut self,
        profile_id: &ProfileId,
        email: &str,
        phone_number: Option<&PhoneNumber>,
        password: &str,
        role: Role,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::profiles::create_profile(
            &mut self.conn,
            profile_id,
            email,
            phone_number,
            password,
            role,
            now,
        )
    }

    /// Retrieves a profile by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_profile(
        &mut self,
        profile_id: &ProfileId,
    ) -> Result<Option<Profile>, PersistenceError> {
        queries::profiles::get_profile(&mut self.conn, profile_id)
    }

    /// Verifies an email/password pair against the stored credentials.
    ///
    /// # Returns
    ///
    /// The profile if the credentials match, `None` if the email is
    /// unknown or the password is wrong. The two failure cases are
    /// deliberately indistinguishable to callers.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or hash verification fails.
    pub fn verify_credentials(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<Profile>, PersistenceError> {
        let Some(credentials) = queries::profiles::get_profile_by_email(&mut self.conn, email)?
        else {
            return Ok(None);
        };

        let matches: bool = bcrypt::verify(password, &credentials.password_hash)
            .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))?;

        if matches {
            Ok(Some(credentials.profile))
        } else {
            Ok(None)
        }
    }

    /// Flips a profile's activation flag, exactly once.
    ///
    /// # Returns
    ///
    /// `true` if this call performed the flip, `false` if the profile
    /// was already active.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the profile does not exist.
    pub fn activate_profile(&mut self, profile_id: &ProfileId) -> Result<bool, PersistenceError> {
        mutations::profiles::activate_profile(&mut self.conn, profile_id)
    }

    /// Credits a wallet balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the profile does not exist.
    pub fn credit_wallet(
        &mut self,
        profile_id: &ProfileId,
        amount: Amount,
    ) -> Result<(), PersistenceError> {
        mutations::profiles::credit_wallet(&mut self.conn, profile_id, amount)
    }

    /// Records or replaces a role grant for an email.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_role_grant(
        &mut self,
        email: &str,
        role: Role,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::profiles::upsert_role_grant(&mut self.conn, email, role, now)
    }

    /// Retrieves the granted role string for an email, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_role_grant(&mut self, email: &str) -> Result<Option<String>, PersistenceError> {
        queries::profiles::get_role_grant(&mut self.conn, email)
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Inserts a newly created task.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_task(&mut self, task: &Task) -> Result<(), PersistenceError> {
        mutations::tasks::insert_task(&mut self.conn, task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_task(&mut self, task_id: &TaskId) -> Result<Option<Task>, PersistenceError> {
        queries::tasks::get_task(&mut self.conn, task_id)
    }

    /// Lists all open tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_open_tasks(&mut self) -> Result<Vec<Task>, PersistenceError> {
        queries::tasks::list_open_tasks(&mut self.conn)
    }

    /// Lists the tasks assigned to a writer, nearest deadline first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tasks_assigned_to(
        &mut self,
        writer: &ProfileId,
    ) -> Result<Vec<Task>, PersistenceError> {
        queries::tasks::list_tasks_assigned_to(&mut self.conn, writer)
    }

    /// Lists the tasks awaiting review, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tasks_in_review(&mut self) -> Result<Vec<Task>, PersistenceError> {
        queries::tasks::list_tasks_in_review(&mut self.conn)
    }

    /// Assigns an open task to a writer and settles its bids, in one
    /// transaction.
    ///
    /// The winning (task, writer) bid becomes accepted and all sibling
    /// bids become rejected atomically with the status change, so bid
    /// state can never disagree with the task's assignee.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the task is no longer open (another
    /// assignment won the race), `NotFound` if it does not exist.
    pub fn assign_task_and_settle_bids(
        &mut self,
        task_id: &TaskId,
        writer: &ProfileId,
    ) -> Result<(), PersistenceError> {
        self.conn
            .transaction::<_, PersistenceError, _>(|conn| {
                mutations::tasks::assign_task(conn, task_id, writer)?;
                mutations::bids::settle_bids_for_assignment(conn, task_id, writer)?;
                Ok(())
            })
    }

    /// Records a submission, moving the task into review.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the task is not submittable by this writer,
    /// `NotFound` if it does not exist.
    pub fn record_submission(
        &mut self,
        task_id: &TaskId,
        writer: &ProfileId,
        notes: &str,
        artifact_url: &str,
    ) -> Result<(), PersistenceError> {
        mutations::tasks::record_submission(&mut self.conn, task_id, writer, notes, artifact_url)
    }

    /// Records a review decision for a task in review.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the task is not in review, `NotFound` if it
    /// does not exist.
    pub fn set_review_outcome(
        &mut self,
        task_id: &TaskId,
        outcome: TaskStatus,
    ) -> Result<(), PersistenceError> {
        mutations::tasks::set_review_outcome(&mut self.conn, task_id, outcome)
    }

    // ------------------------------------------------------------------
    // Bids
    // ------------------------------------------------------------------

    /// Inserts a new bid.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` for a duplicate (task, writer)
    /// pair.
    pub fn insert_bid(&mut self, bid: &Bid) -> Result<(), PersistenceError> {
        mutations::bids::insert_bid(&mut self.conn, bid)
    }

    /// Checks whether a bid exists for a (task, writer) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_bid(
        &mut self,
        task_id: &TaskId,
        writer: &ProfileId,
    ) -> Result<bool, PersistenceError> {
        queries::bids::has_bid(&mut self.conn, task_id, writer)
    }

    /// Lists all bids for a task, submission order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bids_for_task(&mut self, task_id: &TaskId) -> Result<Vec<Bid>, PersistenceError> {
        queries::bids::list_bids_for_task(&mut self.conn, task_id)
    }

    /// Lists all bids placed by a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bids_for_writer(
        &mut self,
        writer: &ProfileId,
    ) -> Result<Vec<Bid>, PersistenceError> {
        queries::bids::list_bids_for_writer(&mut self.conn, writer)
    }

    /// Computes bid counts for every task in one aggregation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn aggregate_bid_counts(&mut self) -> Result<HashMap<String, u64>, PersistenceError> {
        queries::bids::aggregate_bid_counts(&mut self.conn)
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Appends a ledger entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn append_transaction(
        &mut self,
        transaction: &Transaction,
    ) -> Result<(), PersistenceError> {
        mutations::transactions::append_transaction(&mut self.conn, transaction)
    }

    /// Lists a user's ledger entries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_transactions_for_user(
        &mut self,
        user: &ProfileId,
    ) -> Result<Vec<Transaction>, PersistenceError> {
        queries::transactions::list_transactions_for_user(&mut self.conn, user)
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Creates a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        profile_id: &ProfileId,
        now: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_token, profile_id, now, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all sessions that expired before the given time.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }
}

impl BidBackend for SqlitePersistence {
    fn insert_bid(&mut self, bid: &Bid) -> Result<(), PersistenceError> {
        Self::insert_bid(self, bid)
    }

    fn has_bid(
        &mut self,
        task_id: &TaskId,
        writer: &ProfileId,
    ) -> Result<bool, PersistenceError> {
        Self::has_bid(self, task_id, writer)
    }

    fn bids_for_task(&mut self, task_id: &TaskId) -> Result<Vec<Bid>, PersistenceError> {
        self.list_bids_for_task(task_id)
    }

    fn bids_for_writer(&mut self, writer: &ProfileId) -> Result<Vec<Bid>, PersistenceError> {
        self.list_bids_for_writer(writer)
    }

    fn bid_counts(&mut self) -> Result<HashMap<String, u64>, PersistenceError> {
        self.aggregate_bid_counts()
    }
}
