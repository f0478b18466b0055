//! Bearer-token authentication as an explicit extractor.
//!
//! Handlers that take an `AuthenticatedUser` argument only run once the token
//! in the `Authorization` header has been verified by the identity provider.
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use log::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

/// User on whose behalf the request runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: Option<String>,
}

/// Strips a leading `Bearer ` scheme; a bare token is accepted as is.
fn bearer_token(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header)
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;

        let identity = state
            .identity
            .as_ref()
            .ok_or_else(|| AppError::Configuration("Server configuration error".into()))?;

        let raw = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authentication".into()))?;

        match identity.verify(bearer_token(raw)).await {
            Ok(user) => {
                debug!("User authenticated: {}", user.id);
                Ok(AuthenticatedUser {
                    id: user.id,
                    email: user.email,
                })
            }
            Err(e) => {
                warn!("Invalid authentication: {}", e);
                Err(AppError::Unauthorized("Invalid authentication".into()))
            }
        }
    }
}
