// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Profile, activation, wallet, and role-grant mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::data_models::format_timestamp;
use crate::diesel_schema::{profiles, role_grants};
use crate::error::PersistenceError;
use kazi_domain::{Amount, PhoneNumber, ProfileId, Role, Tier};

/// Creates a new profile.
///
/// The email is normalized to lowercase for case-insensitive uniqueness
/// and the password is bcrypt-hashed before storage. New profiles are
/// always inactive with a zero wallet balance.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `profile_id` - The identifier issued by the auth provider
/// * `email` - The registered email (will be normalized)
/// * `phone_number` - The mobile-payment destination, if provided
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The role determined by the grant policy
/// * `now` - The registration time
///
/// # Errors
///
/// Returns `ConstraintViolation` if the email is already registered, or
/// another error kind if the insert fails.
pub fn create_profile(
    conn: &mut SqliteConnection,
    profile_id: &ProfileId,
    email: &str,
    phone_number: Option<&PhoneNumber>,
    password: &str,
    role: Role,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let normalized_email: String = email.to_lowercase();

    info!(
        "Creating profile {} with email: {}, role: {}",
        profile_id, normalized_email, role
    );

    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(profiles::table)
        .values((
            profiles::profile_id.eq(profile_id.value()),
            profiles::email.eq(&normalized_email),
            profiles::phone_number.eq(phone_number.map(PhoneNumber::value)),
            profiles::password_hash.eq(&password_hash),
            profiles::role.eq(role.as_str()),
            profiles::tier.eq(Tier::default().as_str()),
            profiles::is_active.eq(0),
            profiles::wallet_balance_cents.eq(0),
            profiles::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    info!("Profile {} created successfully", profile_id);
    Ok(())
}

/// Flips a profile's activation flag to true, exactly once.
///
/// The update is conditioned on the flag still being false, so repeated
/// payment confirmations cannot double-activate.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `profile_id` - The profile to activate
///
/// # Returns
///
/// `true` if this call performed the flip, `false` if the profile was
/// already active.
///
/// # Errors
///
/// Returns `NotFound` if the profile does not exist, or another error
/// kind if the update fails.
pub fn activate_profile(
    conn: &mut SqliteConnection,
    profile_id: &ProfileId,
) -> Result<bool, PersistenceError> {
    info!("Activating profile: {}", profile_id);

    let affected: usize = diesel::update(
        profiles::table
            .filter(profiles::profile_id.eq(profile_id.value()))
            .filter(profiles::is_active.eq(0)),
    )
    .set(profiles::is_active.eq(1))
    .execute(conn)?;

    if affected == 0 {
        // Distinguish a missing profile from an already-active one.
        let exists: bool = diesel::select(diesel::dsl::exists(
            profiles::table.filter(profiles::profile_id.eq(profile_id.value())),
        ))
        .get_result(conn)?;

        if !exists {
            return Err(PersistenceError::NotFound(format!(
                "Profile {profile_id} does not exist"
            )));
        }

        debug!("Profile {} was already active", profile_id);
        return Ok(false);
    }

    Ok(true)
}

/// Credits a wallet balance.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `profile_id` - The profile to credit
/// * `amount` - The amount to add, in minor currency units
///
/// # Errors
///
/// Returns `NotFound` if the profile does not exist, or another error
/// kind if the update fails.
pub fn credit_wallet(
    conn: &mut SqliteConnection,
    profile_id: &ProfileId,
    amount: Amount,
) -> Result<(), PersistenceError> {
    info!("Crediting {} to wallet of {}", amount, profile_id);

    let affected: usize =
        diesel::update(profiles::table.filter(profiles::profile_id.eq(profile_id.value())))
            .set(
                profiles::wallet_balance_cents
                    .eq(profiles::wallet_balance_cents + amount.cents()),
            )
            .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Profile {profile_id} does not exist"
        )));
    }

    Ok(())
}

/// Records or replaces a role grant for an email.
///
/// Grants are seeded out-of-band (server bootstrap) and consulted at
/// registration time.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The email to grant a role to (will be normalized)
/// * `role` - The role to grant
/// * `now` - The grant time
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_role_grant(
    conn: &mut SqliteConnection,
    email: &str,
    role: Role,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let normalized_email: String = email.to_lowercase();

    info!("Granting role {} to {}", role, normalized_email);

    diesel::replace_into(role_grants::table)
        .values((
            role_grants::email.eq(&normalized_email),
            role_grants::role.eq(role.as_str()),
            role_grants::granted_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    Ok(())
}
