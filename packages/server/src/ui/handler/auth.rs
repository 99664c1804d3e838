//! Bearer-token extractor for the HTTP API.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
};

use crate::{
    domain::{AuthError, Authenticator, Identity},
    ui::state::AppState,
};

/// The caller of an HTTP endpoint, verified from `Authorization: Bearer`.
/// Requests without a valid token are rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers, state.authenticator.as_ref())
            .map(AuthUser)
            .map_err(|e| {
                tracing::debug!("Rejecting {} {}: {}", parts.method, parts.uri.path(), e);
                StatusCode::UNAUTHORIZED
            })
    }
}

fn identity_from_headers(
    headers: &HeaderMap,
    authenticator: &dyn Authenticator,
) -> Result<Identity, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("expected a Bearer token".to_string()))?;
    authenticator.authenticate(token)
}
