// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ledger queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::TransactionRow;
use crate::diesel_schema::transactions;
use crate::error::PersistenceError;
use kazi_domain::{ProfileId, Transaction};

/// Lists a user's ledger entries, most recent first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user` - The profile whose ledger to list
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_transactions_for_user(
    conn: &mut SqliteConnection,
    user: &ProfileId,
) -> Result<Vec<Transaction>, PersistenceError> {
    let rows: Vec<TransactionRow> = transactions::table
        .filter(transactions::user_id.eq(user.value()))
        .order(transactions::created_at.desc())
        .select(TransactionRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TransactionRow::into_transaction).collect()
}
