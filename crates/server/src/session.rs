// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server boundary.
//!
//! This module provides an Axum extractor that validates the session
//! token from the Authorization header and returns the authenticated
//! profile context.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use kazi_api::{AuthenticatedActor, AuthenticationService};
use kazi_domain::Profile;

use crate::AppState;

/// Extractor for authenticated profiles.
///
/// # Authentication Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Validate the session token via
///    `AuthenticationService::validate_session`
/// 3. Check session expiration and resolve the profile
///
/// # Errors
///
/// Rejects with HTTP 401 Unauthorized if the header is missing or
/// malformed, the token is invalid, or the session is expired.
pub struct SessionProfile(pub AuthenticatedActor, pub Profile);

impl FromRequestParts<AppState> for SessionProfile {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract Authorization header
        let auth_header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        // Parse Bearer token
        let token: &str = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        // Validate session
        let mut store = state.store.lock().await;
        let (actor, profile) =
            AuthenticationService::validate_session(store.primary_mut(), token).map_err(|e| {
                debug!("Session validation failed: {}", e);
                SessionError::InvalidSession(e.to_string())
            })?;

        Ok(Self(actor, profile))
    }
}

/// Session extraction failures.
#[derive(Debug)]
pub enum SessionError {
    /// No Authorization header was provided.
    MissingAuthorizationHeader,
    /// The Authorization header was malformed.
    InvalidAuthorizationHeader,
    /// The session token did not validate.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingAuthorizationHeader => String::from("Missing Authorization header"),
            Self::InvalidAuthorizationHeader => String::from("Invalid Authorization header"),
            Self::InvalidSession(reason) => reason,
        };
        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}
