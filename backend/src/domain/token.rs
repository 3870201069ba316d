//! Bearer token codec: issues and verifies HMAC-signed JWTs.
//!
//! The signing secret and algorithm are fixed when the codec is built and
//! never change afterwards. Every token names its owner under both `sub` and
//! `user_id`, carries the account email, and expires seven days after issue.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::{Email, UserId};

/// Lifetime of every issued token.
pub const TOKEN_TTL: TimeDelta = TimeDelta::days(7);

/// Invalid codec configuration. Raised at startup, never per request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenConfigError {
    #[error("auth secret must not be empty")]
    EmptySecret,
    #[error("unsupported signing algorithm `{name}`; expected HS256, HS384 or HS512")]
    UnsupportedAlgorithm { name: String },
}

/// Failures raised while issuing or verifying a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is malformed or its signature is invalid")]
    Malformed,
    #[error("token signing failed: {message}")]
    Signing { message: String },
}

/// Immutable signing configuration.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Zeroizing<Vec<u8>>,
    algorithm: Algorithm,
}

impl TokenConfig {
    /// Validate a secret and an HMAC algorithm name.
    ///
    /// # Examples
    /// ```
    /// use taskboard::domain::TokenConfig;
    ///
    /// assert!(TokenConfig::new("s3cret", "HS512").is_ok());
    /// assert!(TokenConfig::new("", "HS256").is_err());
    /// assert!(TokenConfig::new("s3cret", "RS256").is_err());
    /// ```
    pub fn new(
        secret: impl Into<String>,
        algorithm: &str,
    ) -> Result<Self, TokenConfigError> {
        let secret = Zeroizing::new(secret.into().into_bytes());
        if secret.is_empty() {
            return Err(TokenConfigError::EmptySecret);
        }
        let algorithm = match algorithm {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(TokenConfigError::UnsupportedAlgorithm {
                    name: other.to_owned(),
                });
            }
        };
        Ok(Self { secret, algorithm })
    }

    /// HMAC algorithm used to sign and verify tokens.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Claims embedded in a token. Every field is optional on the way in so the
/// identity gate can decide which absences matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// A freshly signed token and its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Build a codec signing with `config` and reading time from `clock`.
    pub fn new(config: &TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&config.secret),
            decoding: DecodingKey::from_secret(&config.secret),
            algorithm: config.algorithm,
            clock,
        }
    }

    /// Sign a token for `subject`, valid for [`TOKEN_TTL`].
    pub fn issue(&self, subject: &UserId, email: &Email) -> Result<IssuedToken, TokenError> {
        // Whole seconds so `expires_at` matches the embedded `exp` exactly.
        let issued_at = truncate_to_seconds(self.clock.utc());
        let expires_at = issued_at + TOKEN_TTL;
        let claims = TokenClaims {
            sub: Some(subject.to_string()),
            user_id: Some(subject.to_string()),
            email: Some(email.to_string()),
            iat: Some(issued_at.timestamp()),
            exp: Some(expires_at.timestamp()),
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding).map_err(
            |error| TokenError::Signing {
                message: error.to_string(),
            },
        )?;
        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Verify the signature, then the expiry, and return the claims.
    ///
    /// A token is expired once the current time reaches its `exp`. Tokens
    /// without `exp` are malformed.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        let claims = decode::<TokenClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Malformed)?
            .claims;
        let exp = claims.exp.ok_or(TokenError::Malformed)?;
        if self.clock.utc().timestamp() >= exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(instant.timestamp(), 0).unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::test_support::{MutableClock, TEST_SECRET, test_token_codec};
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        MutableClock::at_fixture_instant()
    }

    fn subject() -> (UserId, Email) {
        (
            UserId::new("user-1").expect("valid id"),
            Email::new("ada@example.com").expect("valid email"),
        )
    }

    #[rstest]
    fn issued_tokens_carry_both_identity_claims(clock: Arc<MutableClock>) {
        let codec = test_token_codec(clock);
        let (id, email) = subject();
        let issued = codec.issue(&id, &email).expect("issue succeeds");

        let claims = codec.verify(&issued.token).expect("fresh token verifies");
        assert_eq!(claims.sub.as_deref(), Some("user-1"));
        assert_eq!(claims.user_id.as_deref(), Some("user-1"));
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
        assert_eq!(claims.exp, Some(issued.expires_at.timestamp()));
        assert!(issued.expires_at > issued.issued_at);
        assert_eq!(issued.expires_at - issued.issued_at, TOKEN_TTL);
    }

    #[rstest]
    fn token_expires_exactly_at_exp(clock: Arc<MutableClock>) {
        let codec = test_token_codec(clock.clone());
        let (id, email) = subject();
        let issued = codec.issue(&id, &email).expect("issue succeeds");

        clock.set(issued.expires_at - TimeDelta::seconds(1));
        assert!(codec.verify(&issued.token).is_ok());

        clock.set(issued.expires_at);
        assert_eq!(codec.verify(&issued.token), Err(TokenError::Expired));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn garbage_is_malformed(clock: Arc<MutableClock>, #[case] raw: &str) {
        let codec = test_token_codec(clock);
        assert_eq!(codec.verify(raw), Err(TokenError::Malformed));
    }

    #[rstest]
    fn foreign_signature_is_malformed(clock: Arc<MutableClock>) {
        let other = TokenCodec::new(
            &TokenConfig::new("a-different-secret", "HS256").expect("valid config"),
            clock.clone(),
        );
        let (id, email) = subject();
        let issued = other.issue(&id, &email).expect("issue succeeds");

        let codec = test_token_codec(clock);
        assert_eq!(codec.verify(&issued.token), Err(TokenError::Malformed));
    }

    #[rstest]
    fn signature_is_checked_before_expiry(clock: Arc<MutableClock>) {
        let other = TokenCodec::new(
            &TokenConfig::new("a-different-secret", "HS256").expect("valid config"),
            clock.clone(),
        );
        let (id, email) = subject();
        let issued = other.issue(&id, &email).expect("issue succeeds");
        clock.advance_seconds(TOKEN_TTL.num_seconds() * 2);

        let codec = test_token_codec(clock);
        assert_eq!(codec.verify(&issued.token), Err(TokenError::Malformed));
    }

    #[rstest]
    fn algorithm_mismatch_is_malformed(clock: Arc<MutableClock>) {
        let hs512 = TokenCodec::new(
            &TokenConfig::new(TEST_SECRET, "HS512").expect("valid config"),
            clock.clone(),
        );
        let (id, email) = subject();
        let issued = hs512.issue(&id, &email).expect("issue succeeds");

        let codec = test_token_codec(clock);
        assert_eq!(codec.verify(&issued.token), Err(TokenError::Malformed));
    }

    #[rstest]
    fn token_without_exp_is_malformed(clock: Arc<MutableClock>) {
        let claims = TokenClaims {
            sub: Some("user-1".to_owned()),
            ..TokenClaims::default()
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode succeeds");

        let codec = test_token_codec(clock);
        assert_eq!(codec.verify(&token), Err(TokenError::Malformed));
    }

    #[rstest]
    #[case("", "HS256", TokenConfigError::EmptySecret)]
    #[case("secret", "RS256", TokenConfigError::UnsupportedAlgorithm { name: "RS256".to_owned() })]
    #[case("secret", "none", TokenConfigError::UnsupportedAlgorithm { name: "none".to_owned() })]
    fn config_rejects_invalid_input(
        #[case] secret: &str,
        #[case] algorithm: &str,
        #[case] expected: TokenConfigError,
    ) {
        assert_eq!(
            TokenConfig::new(secret, algorithm).expect_err("invalid config"),
            expected
        );
    }

    #[rstest]
    fn config_debug_hides_secret() {
        let config = TokenConfig::new(TEST_SECRET, "HS384").expect("valid config");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains(TEST_SECRET));
        assert_eq!(config.algorithm(), Algorithm::HS384);
    }
}
