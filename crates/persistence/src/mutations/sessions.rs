// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::data_models::format_timestamp;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;
use kazi_domain::ProfileId;

/// Creates a new session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The opaque bearer token
/// * `profile_id` - The profile this session authenticates
/// * `now` - The creation time
/// * `expires_at` - When the session lapses
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    profile_id: &ProfileId,
    now: OffsetDateTime,
    expires_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    debug!("Creating session for profile {}", profile_id);

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::profile_id.eq(profile_id.value()),
            sessions::created_at.eq(format_timestamp(now)?),
            sessions::expires_at.eq(format_timestamp(expires_at)?),
        ))
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The token to delete
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session");

    diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
        .execute(conn)?;

    Ok(())
}

/// Deletes all sessions that expired before the given time.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `now` - The cutoff time
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let cutoff: String = format_timestamp(now)?;

    let deleted: usize = diesel::delete(sessions::table.filter(sessions::expires_at.lt(&cutoff)))
        .execute(conn)?;

    if deleted > 0 {
        info!("Pruned {} expired sessions", deleted);
    }

    Ok(deleted)
}
