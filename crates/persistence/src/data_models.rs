// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and conversions between stored rows and domain types.
//!
//! Timestamps are stored as ISO 8601 text. Status, role, tier, and kind
//! columns are stored as their canonical string representations and
//! parsed through the domain `FromStr` implementations, so an invalid
//! row surfaces as a `SerializationError` instead of a panic.

use diesel::prelude::*;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use crate::diesel_schema::{bids, profiles, sessions, tasks, transactions};
use crate::error::PersistenceError;
use kazi_domain::{
    Amount, Bid, BidId, BidStatus, Category, PhoneNumber, Profile, ProfileId, Role, Task, TaskId,
    TaskStatus, Tier, Transaction, TransactionId, TransactionKind, TransactionStatus,
};

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub(crate) fn format_timestamp(ts: OffsetDateTime) -> Result<String, PersistenceError> {
    ts.format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::SerializationError(format!("Failed to format timestamp: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the stored text is not valid ISO 8601.
pub(crate) fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT).map_err(|e| {
        PersistenceError::SerializationError(format!("Failed to parse timestamp '{value}': {e}"))
    })
}

/// Diesel Queryable struct for profile rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = profiles)]
pub(crate) struct ProfileRow {
    pub profile_id: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub tier: String,
    pub is_active: i32,
    pub wallet_balance_cents: i64,
    #[allow(dead_code)]
    pub created_at: String,
}

impl ProfileRow {
    /// Converts the row to a domain profile, discarding the credential
    /// hash.
    pub(crate) fn into_profile(self) -> Result<Profile, PersistenceError> {
        let role: Role = Role::from_str(&self.role)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let tier: Tier = Tier::from_str(&self.tier)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let phone_number: Option<PhoneNumber> = match self.phone_number {
            Some(value) => Some(
                PhoneNumber::new(&value)
                    .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Profile {
            id: ProfileId::new(&self.profile_id),
            email: self.email,
            phone_number,
            role,
            tier,
            is_active: self.is_active != 0,
            wallet_balance: Amount::from_cents(self.wallet_balance_cents),
        })
    }
}

/// A profile row paired with its credential hash, for login flows.
#[derive(Debug, Clone)]
pub struct ProfileCredentials {
    /// The domain profile.
    pub profile: Profile,
    /// The bcrypt password hash.
    pub password_hash: String,
}

/// Diesel Queryable struct for task rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = tasks)]
pub(crate) struct TaskRow {
    pub task_id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub price_cents: i64,
    pub status: String,
    pub assigned_to: Option<String>,
    pub deadline: String,
    pub created_at: String,
    pub submission_url: Option<String>,
    pub submission_notes: Option<String>,
}

impl TaskRow {
    /// Converts the row to a domain task.
    pub(crate) fn into_task(self) -> Result<Task, PersistenceError> {
        let category: Category = Category::from_str(&self.category)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let status: TaskStatus = TaskStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        Ok(Task {
            id: TaskId::new(&self.task_id),
            title: self.title,
            category,
            description: self.description,
            price: Amount::from_cents(self.price_cents),
            status,
            assigned_to: self.assigned_to.map(|id| ProfileId::new(&id)),
            deadline: parse_timestamp(&self.deadline)?,
            created_at: parse_timestamp(&self.created_at)?,
            submission_url: self.submission_url,
            submission_notes: self.submission_notes,
        })
    }
}

/// Diesel Queryable struct for bid rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = bids)]
pub(crate) struct BidRow {
    pub bid_id: String,
    pub task_id: String,
    pub user_id: String,
    pub proposal: String,
    pub amount_cents: i64,
    pub status: String,
    pub created_at: String,
}

impl BidRow {
    /// Converts the row to a domain bid.
    pub(crate) fn into_bid(self) -> Result<Bid, PersistenceError> {
        let status: BidStatus = BidStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        Ok(Bid {
            id: BidId::new(&self.bid_id),
            task_id: TaskId::new(&self.task_id),
            user_id: ProfileId::new(&self.user_id),
            proposal: self.proposal,
            amount: Amount::from_cents(self.amount_cents),
            status,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Diesel Queryable struct for transaction rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = transactions)]
pub(crate) struct TransactionRow {
    pub transaction_id: String,
    pub user_id: String,
    pub kind: String,
    pub amount_cents: i64,
    pub external_reference: String,
    pub status: String,
    pub created_at: String,
}

impl TransactionRow {
    /// Converts the row to a domain transaction.
    pub(crate) fn into_transaction(self) -> Result<Transaction, PersistenceError> {
        let kind: TransactionKind = TransactionKind::from_str(&self.kind)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let status: TransactionStatus = TransactionStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        Ok(Transaction {
            id: TransactionId::new(&self.transaction_id),
            user_id: ProfileId::new(&self.user_id),
            kind,
            amount: Amount::from_cents(self.amount_cents),
            external_reference: self.external_reference,
            status,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub(crate) struct SessionRow {
    pub session_id: i64,
    pub session_token: String,
    pub profile_id: String,
    pub created_at: String,
    pub expires_at: String,
}

/// Session data returned to the API layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    /// The session row identifier.
    pub session_id: i64,
    /// The opaque bearer token.
    pub session_token: String,
    /// The profile this session authenticates.
    pub profile_id: String,
    /// When the session was created (ISO 8601).
    pub created_at: String,
    /// When the session expires (ISO 8601).
    pub expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            session_token: row.session_token,
            profile_id: row.profile_id,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}
