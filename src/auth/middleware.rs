//! Request authentication and access guard middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use super::errors::{ApiAuthError, AuthErrorKind};
use crate::claim::Claim;
use crate::jwt::{AuthError, JwtConfig};

const BEARER: &str = "Bearer";

/// Extract the credential from the `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent. The token is whatever follows
/// the first `Bearer` literal, trimmed; without the literal the whole trimmed
/// header is taken as the token.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiAuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiAuthError::new(AuthErrorKind::InvalidToken))?;
    if value.is_empty() {
        return Ok(None);
    }

    let token = match value.find(BEARER) {
        Some(index) => &value[index + BEARER.len()..],
        None => value,
    };
    Ok(Some(token.trim()))
}

/// Verify a bearer credential, if any, and attach its claim to the request.
///
/// Requests without an `Authorization` header pass through untouched. A
/// credential that fails validation ends the request with 401.
pub async fn authenticate(
    State(jwt): State<Arc<JwtConfig>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiAuthError> {
    let Some(token) = bearer_token(request.headers())? else {
        return Ok(next.run(request).await);
    };

    let claim = jwt.validate(token, Utc::now()).map_err(|e| {
        match &e {
            AuthError::InvalidToken(cause) => {
                tracing::warn!(uri = %request.uri(), cause = %cause, "Rejected access token")
            }
            _ => tracing::debug!(uri = %request.uri(), error = %e, "Rejected access token"),
        }
        ApiAuthError::new(AuthErrorKind::InvalidToken)
    })?;

    request.extensions_mut().insert(claim);
    Ok(next.run(request).await)
}

/// Reject the request unless [`authenticate`] attached a claim.
pub async fn require_auth(request: Request, next: Next) -> Result<Response, ApiAuthError> {
    if request.extensions().get::<Claim>().is_none() {
        tracing::warn!(uri = %request.uri(), "No valid credentials");
        return Err(ApiAuthError::new(AuthErrorKind::NotAuthenticated));
    }
    Ok(next.run(request).await)
}
