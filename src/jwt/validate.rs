//! Token validation.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use serde_json::Value;

use super::{ALGORITHM, AuthError, EXPIRY_FIELD, InvalidTokenCause, JwtConfig};
use crate::claim::{self, Claim, Payload};

impl JwtConfig {
    /// Validate and decode a token.
    ///
    /// Checks run in order and stop at the first failure: structure, declared
    /// algorithm, signature, expiry against `now`, then claim decoding. Only
    /// an elapsed expiry yields [`AuthError::Expired`].
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claim, AuthError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| InvalidTokenCause::Malformed(e.to_string()))?;

        if header.alg != ALGORITHM {
            return Err(InvalidTokenCause::AlgorithmMismatch(format!("{:?}", header.alg)).into());
        }

        let payload = jsonwebtoken::decode::<Payload>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => InvalidTokenCause::BadSignature,
                _ => InvalidTokenCause::Malformed(e.to_string()),
            })?
            .claims;

        match payload.get(EXPIRY_FIELD) {
            None | Some(Value::Null) => {}
            Some(exp) => {
                let exp = exp.as_i64().ok_or_else(|| {
                    InvalidTokenCause::Malformed(format!("`{}` is not an integer", EXPIRY_FIELD))
                })?;
                if now.timestamp() >= exp {
                    return Err(AuthError::Expired);
                }
            }
        }

        let claim = claim::from_payload(&payload).map_err(InvalidTokenCause::from)?;
        Ok(claim)
    }

    /// Check a token without keeping the decoded claim.
    pub fn validate_token(&self, token: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        self.validate(token, now).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::json;

    use super::*;
    use crate::jwt::ACCESS_TOKEN_DURATION_SECS;

    const SECRET: &[u8] = b"test-secret-key-for-testing";

    fn config() -> JwtConfig {
        JwtConfig::new(SECRET).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn sign_raw(header: Header, payload: &serde_json::Value) -> String {
        jsonwebtoken::encode(&header, payload, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    #[test]
    fn test_valid_token_decodes() {
        let config = config();
        let claim = Claim::new(5, ["user"], ["read"]).unwrap();
        let pair = config.issue_pair(&claim, at(1_000)).unwrap();

        assert_eq!(config.validate(&pair.access_token, at(1_000)).unwrap(), claim);
        assert!(config.validate_token(&pair.access_token, at(1_000)).is_ok());
    }

    #[test]
    fn test_expiry_boundary() {
        let config = config();
        let claim = Claim::new(5, ["user"], ["read"]).unwrap();
        let pair = config.issue_pair(&claim, at(1_000)).unwrap();

        let last_valid = at(1_000 + ACCESS_TOKEN_DURATION_SECS - 1);
        let first_expired = at(1_000 + ACCESS_TOKEN_DURATION_SECS);

        assert!(config.validate(&pair.access_token, last_valid).is_ok());
        assert!(matches!(
            config.validate(&pair.access_token, first_expired),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let config = config();
        for token in ["", "invalid-token", "a.b.c", "a.b"] {
            let err = config.validate(token, at(0)).unwrap_err();
            assert!(
                matches!(err.invalid_cause(), Some(InvalidTokenCause::Malformed(_))),
                "{:?} should be malformed, got {:?}",
                token,
                err
            );
        }
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let claim = Claim::new(5, ["user"], ["read"]).unwrap();
        let other = JwtConfig::new(b"some-other-secret").unwrap();
        let token = other.issue_non_expiring(&claim).unwrap();

        let err = config().validate(&token, at(0)).unwrap_err();
        assert!(matches!(
            err.invalid_cause(),
            Some(InvalidTokenCause::BadSignature)
        ));
    }

    #[test]
    fn test_other_hmac_algorithm_rejected() {
        let token = sign_raw(
            Header::new(Algorithm::HS384),
            &json!({ "id": 1, "roles": [], "permissions": [] }),
        );

        let err = config().validate(&token, at(0)).unwrap_err();
        assert!(matches!(
            err.invalid_cause(),
            Some(InvalidTokenCause::AlgorithmMismatch(_))
        ));
    }

    #[test]
    fn test_expired_checked_before_claim_decoding() {
        // Signed and expired, but with no `id`: expiry wins.
        let token = sign_raw(Header::new(Algorithm::HS256), &json!({ "exp": 100 }));

        assert!(matches!(
            config().validate(&token, at(200)),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_undecodable_claim_is_invalid() {
        let token = sign_raw(
            Header::new(Algorithm::HS256),
            &json!({ "roles": ["admin"], "exp": 10_000 }),
        );

        let err = config().validate(&token, at(0)).unwrap_err();
        assert!(matches!(
            err.invalid_cause(),
            Some(InvalidTokenCause::BadClaim(_))
        ));
    }

    #[test]
    fn test_non_integer_expiry_is_invalid() {
        let token = sign_raw(
            Header::new(Algorithm::HS256),
            &json!({ "id": 1, "exp": "tomorrow" }),
        );

        let err = config().validate(&token, at(0)).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_future_token_is_valid() {
        // No not-before semantics: a token validated before its issuance time still passes.
        let config = config();
        let claim = Claim::new(5, ["user"], ["read"]).unwrap();
        let pair = config.issue_pair(&claim, at(10_000)).unwrap();

        assert!(
            config
                .validate(&pair.access_token, at(10_000) - TimeDelta::hours(1))
                .is_ok()
        );
    }
}
