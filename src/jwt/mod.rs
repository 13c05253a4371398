//! JWT token issuance, validation and refresh.
//!
//! Access tokens live for 15 minutes and refresh tokens for 7 days. Both carry
//! the same encoded [`Claim`] plus an `exp` field, and both are signed with
//! HS256 using the single secret held by [`JwtConfig`].

mod errors;
mod validate;

use std::collections::HashSet;

use chrono::{DateTime, Local, SubsecRound, TimeDelta, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;

use crate::claim::{self, Claim};

pub use errors::{AuthError, ConfigError, InvalidTokenCause};

/// Name of the expiry field in the token payload.
pub const EXPIRY_FIELD: &str = "exp";

/// The only signing algorithm issued or accepted.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Access token duration: 15 minutes
pub const ACCESS_TOKEN_DURATION_SECS: i64 = 15 * 60;

/// Refresh token duration: 7 days
pub const REFRESH_TOKEN_DURATION_SECS: i64 = 7 * 24 * 60 * 60;

/// Signing and verification keys, built once at startup and shared read-only.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

/// Access and refresh tokens issued together for one claim.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Refresh expiry shifted by the local UTC offset, for the cookie `Expires`
    /// attribute.
    pub fn refresh_expires_for_cookie(&self) -> DateTime<Utc> {
        let offset = Local
            .offset_from_utc_datetime(&self.refresh_expires_at.naive_utc())
            .local_minus_utc();
        self.refresh_expires_at + TimeDelta::seconds(i64::from(offset))
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        // Expiry is checked against the caller's clock, and service tokens
        // have no `exp` at all, so the library checks are switched off.
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Issue an access/refresh token pair for a claim.
    ///
    /// `now` is truncated to whole seconds, so the access token expires at
    /// exactly `now + 15min` for whole-second issuance times.
    pub fn issue_pair(&self, claim: &Claim, now: DateTime<Utc>) -> Result<TokenPair, AuthError> {
        let issued_at = now.trunc_subsecs(0);
        let access_expires_at = issued_at + TimeDelta::seconds(ACCESS_TOKEN_DURATION_SECS);
        let refresh_expires_at = issued_at + TimeDelta::seconds(REFRESH_TOKEN_DURATION_SECS);

        let access_token = self.sign(claim, Some(access_expires_at))?;
        let refresh_token = self.sign(claim, Some(refresh_expires_at))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Issue an access token with no expiry.
    ///
    /// Such a token never invalidates itself; only hand it to trusted internal
    /// services.
    pub fn issue_non_expiring(&self, claim: &Claim) -> Result<String, AuthError> {
        self.sign(claim, None)
    }

    /// Exchange a valid refresh token for a new access token.
    ///
    /// A whole new pair is issued, but only the access token is returned: the
    /// presented refresh token stays in force until its own expiry.
    pub fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claim = self.validate(refresh_token, now)?;
        let pair = self.issue_pair(&claim, now)?;
        Ok(pair.access_token)
    }

    fn sign(&self, claim: &Claim, expires_at: Option<DateTime<Utc>>) -> Result<String, AuthError> {
        let mut payload = claim::to_payload(claim);
        if let Some(expires_at) = expires_at {
            payload.insert(
                EXPIRY_FIELD.to_string(),
                Value::from(expires_at.timestamp()),
            );
        }

        let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &payload, &self.encoding_key)?;
        Ok(token)
    }
}
