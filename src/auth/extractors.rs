//! Axum extractors for the verified claim.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::{ApiAuthError, AuthErrorKind};
use crate::claim::Claim;

/// Extractor for handlers that require a verified identity.
/// Reads the claim attached by [`authenticate`](super::authenticate).
pub struct Auth(pub Claim);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claim>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| {
                tracing::warn!(uri = %parts.uri, "No valid credentials");
                ApiAuthError::new(AuthErrorKind::NotAuthenticated)
            })
    }
}

/// Optional authentication extractor - never fails.
pub struct MaybeAuth(pub Option<Claim>);

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<Claim>().cloned()))
    }
}
