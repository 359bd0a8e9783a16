// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Profile and role-grant queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{ProfileCredentials, ProfileRow};
use crate::diesel_schema::{profiles, role_grants};
use crate::error::PersistenceError;
use kazi_domain::{Profile, ProfileId};

/// Retrieves a profile by its identifier.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `profile_id` - The profile identifier
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the profile is not found.
pub fn get_profile(
    conn: &mut SqliteConnection,
    profile_id: &ProfileId,
) -> Result<Option<Profile>, PersistenceError> {
    debug!("Looking up profile by id: {}", profile_id);

    let result: Result<ProfileRow, diesel::result::Error> = profiles::table
        .filter(profiles::profile_id.eq(profile_id.value()))
        .select(ProfileRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_profile()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a profile with its credential hash by email.
///
/// The email is normalized to lowercase for case-insensitive lookup.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The registered email address
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no profile has this email.
pub fn get_profile_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<ProfileCredentials>, PersistenceError> {
    let normalized_email: String = email.to_lowercase();

    debug!("Looking up profile by email: {}", normalized_email);

    let result: Result<ProfileRow, diesel::result::Error> = profiles::table
        .filter(profiles::email.eq(&normalized_email))
        .select(ProfileRow::as_select())
        .first(conn);

    match result {
        Ok(row) => {
            let password_hash: String = row.password_hash.clone();
            Ok(Some(ProfileCredentials {
                profile: row.into_profile()?,
                password_hash,
            }))
        }
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the granted role for an email, if any.
///
/// Role grants are the out-of-band admin policy: registration consults
/// this table instead of branching on literal email strings.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The email to look up
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no grant exists for this email.
pub fn get_role_grant(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<String>, PersistenceError> {
    let normalized_email: String = email.to_lowercase();

    let result: Result<String, diesel::result::Error> = role_grants::table
        .filter(role_grants::email.eq(&normalized_email))
        .select(role_grants::role)
        .first(conn);

    match result {
        Ok(role) => Ok(Some(role)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
