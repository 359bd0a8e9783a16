// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Append-only ledger writes.
//!
//! Transactions are never updated or deleted; money movement history is
//! only ever added to.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::format_timestamp;
use crate::diesel_schema::transactions;
use crate::error::PersistenceError;
use kazi_domain::Transaction;

/// Appends a ledger entry.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `transaction` - The entry to append
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn append_transaction(
    conn: &mut SqliteConnection,
    transaction: &Transaction,
) -> Result<(), PersistenceError> {
    info!(
        "Recording {} transaction {} for {} ({})",
        transaction.kind, transaction.id, transaction.user_id, transaction.amount
    );

    diesel::insert_into(transactions::table)
        .values((
            transactions::transaction_id.eq(transaction.id.value()),
            transactions::user_id.eq(transaction.user_id.value()),
            transactions::kind.eq(transaction.kind.as_str()),
            transactions::amount_cents.eq(transaction.amount.cents()),
            transactions::external_reference.eq(&transaction.external_reference),
            transactions::status.eq(transaction.status.as_str()),
            transactions::created_at.eq(format_timestamp(transaction.created_at)?),
        ))
        .execute(conn)?;

    Ok(())
}
