//! Member directory seam.
//!
//! Credential checks and member records live outside this crate; an embedding
//! application plugs them in through [`MemberDirectory`].

use async_trait::async_trait;
use thiserror::Error;

use crate::claim::Claim;

#[derive(Debug, Error)]
pub enum SignInError {
    #[error("not found")]
    NotFound,

    #[error("error authentication")]
    BadCredentials,

    #[error("unapproved")]
    Unapproved,

    #[error("member directory error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Check sign-in credentials and return the member's claim.
    async fn authenticate(&self, sign_id: &str, password: &str) -> Result<Claim, SignInError>;

    /// Record that a member just used their refresh token.
    async fn record_access(&self, member_id: u64) -> Result<(), SignInError>;
}
