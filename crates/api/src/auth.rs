// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization services.

use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::error::{ApiError, AuthError};
use crate::ids;
use crate::password_policy::PasswordPolicy;
use kazi_domain::{PhoneNumber, Profile, ProfileId, Role};
use kazi_persistence::{PersistenceError, SessionData, SqlitePersistence};

/// An authenticated actor with an associated role.
///
/// This represents a profile that has been authenticated and may
/// perform certain actions based on its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The profile identifier.
    pub id: ProfileId,
    /// The role assigned to this profile.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The profile identifier
    /// * `role` - The role assigned to this profile
    #[must_use]
    pub const fn new(id: ProfileId, role: Role) -> Self {
        Self { id, role }
    }

    /// Creates an actor from an authenticated profile.
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self::new(profile.id.clone(), profile.role)
    }
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether an authenticated actor has
/// permission to perform a specific action based on its role. Every
/// check exists server-side even where the UI also hides the
/// affordance.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor is authorized to post a task.
    ///
    /// Only Admin actors may post tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_create_task(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "create_task")
    }

    /// Checks if an actor is authorized to assign a task to a writer.
    ///
    /// Only Admin actors may assign tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_assign_task(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "assign_task")
    }

    /// Checks if an actor is authorized to review submissions.
    ///
    /// Only Admin actors may approve or reject submissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_review(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "review_submission")
    }

    /// Checks if an actor is authorized to view the bids on a task.
    ///
    /// Only Admin actors see other writers' proposals.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_view_bids(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "view_bids")
    }

    /// Checks if an actor is authorized to place a bid.
    ///
    /// Only Writer actors bid; admins post and review work instead of
    /// applying to it, and guests may browse only.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Writer role.
    pub fn authorize_place_bid(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_writer(actor, "place_bid")
    }

    /// Checks if an actor is authorized to submit work.
    ///
    /// Only Writer actors submit work.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Writer role.
    pub fn authorize_submit_work(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_writer(actor, "submit_work")
    }

    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Writer | Role::Guest => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin"),
            }),
        }
    }

    fn require_writer(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Writer => Ok(()),
            Role::Admin | Role::Guest => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Writer"),
            }),
        }
    }
}

/// Authentication service for registration and session-based login.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Registers a new profile.
    ///
    /// The role comes from the role-grant policy table (seeded
    /// out-of-band); ungranted emails default to Writer. New profiles
    /// are inactive with a zero balance regardless of role grants.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The email to register
    /// * `password` - The chosen password
    /// * `confirmation` - The password confirmation
    /// * `phone_number` - The mobile-money destination, if provided
    ///
    /// # Errors
    ///
    /// Returns an error if the password violates policy, the phone
    /// number is implausible, or the email is already registered.
    pub fn register(
        persistence: &mut SqlitePersistence,
        email: &str,
        password: &str,
        confirmation: &str,
        phone_number: Option<&str>,
    ) -> Result<Profile, ApiError> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(ApiError::InvalidInput {
                field: String::from("email"),
                message: String::from("A valid email address is required"),
            });
        }

        PasswordPolicy::default().validate(password, confirmation, email)?;

        let phone: Option<PhoneNumber> = match phone_number {
            Some(value) => Some(
                PhoneNumber::new(value).map_err(crate::error::translate_domain_error)?,
            ),
            None => None,
        };

        // Role assignment is a policy lookup, never an email comparison
        // in code.
        let role: Role = match persistence.get_role_grant(email).map_err(|e| {
            crate::error::translate_persistence_error(e, "Role grant")
        })? {
            Some(granted) => granted.parse().map_err(|_| ApiError::Internal {
                message: format!("Role grant table holds an invalid role for {email}"),
            })?,
            None => Role::Writer,
        };

        let profile_id: ProfileId = ProfileId::new(&ids::fresh_id("profile"));
        let now: OffsetDateTime = OffsetDateTime::now_utc();

        persistence
            .create_profile(&profile_id, email, phone.as_ref(), password, role, now)
            .map_err(|e| match e {
                PersistenceError::ConstraintViolation(_) => ApiError::DomainRuleViolation {
                    rule: String::from("unique_email"),
                    message: format!("An account already exists for {email}"),
                },
                other => crate::error::translate_persistence_error(other, "Profile"),
            })?;

        info!("Registered profile {} with role {}", profile_id, role);

        persistence
            .get_profile(&profile_id)
            .map_err(|e| crate::error::translate_persistence_error(e, "Profile"))?
            .ok_or_else(|| ApiError::Internal {
                message: String::from("Profile vanished immediately after registration"),
            })
    }

    /// Authenticates a profile and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The registered email
    /// * `password` - The password to verify
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `profile`).
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails. Unknown emails and
    /// wrong passwords produce the same error.
    pub fn login(
        persistence: &mut SqlitePersistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, Profile), AuthError> {
        let profile: Profile = persistence
            .verify_credentials(email, password)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            })?;

        let session_token: String = Self::generate_session_token();
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let expires_at: OffsetDateTime = now + Self::DEFAULT_SESSION_EXPIRATION;

        persistence
            .create_session(&session_token, &profile.id, now, expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        let actor: AuthenticatedActor = AuthenticatedActor::from_profile(&profile);

        Ok((session_token, actor, profile))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `profile`).
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired.
    pub fn validate_session(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, Profile), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let profile: Profile = persistence
            .get_profile(&ProfileId::new(&session.profile_id))
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Profile not found"),
            })?;

        let actor: AuthenticatedActor = AuthenticatedActor::from_profile(&profile);

        Ok((actor, profile))
    }

    /// Logs out by deleting the session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to delete
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Generates a session token.
    fn generate_session_token() -> String {
        ids::fresh_id("session")
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionExpired(msg) | PersistenceError::SessionNotFound(msg) => {
                AuthError::AuthenticationFailed { reason: msg }
            }
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}
