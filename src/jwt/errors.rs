//! Token error types.

use thiserror::Error;

use crate::claim::CodecError;

/// Startup-time configuration error. Fatal to the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT secret must not be empty")]
    EmptySecret,
}

/// Why a token was judged invalid.
///
/// Only used for logging; every cause renders as the same `InvalidToken`
/// message so a caller cannot learn which check failed.
#[derive(Debug, Error)]
pub enum InvalidTokenCause {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("expected HS256 but token declares {0}")]
    AlgorithmMismatch(String),

    #[error("signature verification failed")]
    BadSignature,

    #[error("undecodable claim: {0}")]
    BadClaim(#[from] CodecError),
}

/// Errors returned by token validation, issuance and refresh.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid access token")]
    InvalidToken(InvalidTokenCause),

    #[error("access token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthError::Expired)
    }

    /// Internal cause of an `InvalidToken`, for diagnostics.
    pub fn invalid_cause(&self) -> Option<&InvalidTokenCause> {
        match self {
            AuthError::InvalidToken(cause) => Some(cause),
            _ => None,
        }
    }
}

impl From<InvalidTokenCause> for AuthError {
    fn from(cause: InvalidTokenCause) -> Self {
        AuthError::InvalidToken(cause)
    }
}
