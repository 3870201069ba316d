//! Identity gate: turns a raw `Authorization` value into a verified owner.
//!
//! The owner identifier is read from the claims in a fixed preference order:
//! the standard `sub` claim first, then `user_id`. Blank values count as
//! absent. Nothing is cached between requests; every call re-verifies.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{Error, TokenClaims, TokenCodec, TokenError, UserId};

/// Claim keys consulted for the owner identifier, most preferred first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityClaim {
    Subject,
    UserId,
}

/// Fallback order used by [`IdentityGate::authenticate`].
pub const IDENTITY_CLAIM_PREFERENCE: [IdentityClaim; 2] =
    [IdentityClaim::Subject, IdentityClaim::UserId];

impl IdentityClaim {
    fn read(self, claims: &TokenClaims) -> Option<&str> {
        let value = match self {
            Self::Subject => claims.sub.as_deref(),
            Self::UserId => claims.user_id.as_deref(),
        };
        value.filter(|raw| !raw.is_empty())
    }
}

/// The caller, as established by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: UserId,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Verifies bearer credentials through the [`TokenCodec`].
#[derive(Clone)]
pub struct IdentityGate {
    codec: TokenCodec,
}

impl IdentityGate {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Authenticate a raw `Authorization` header value.
    ///
    /// Fails with an unauthorized error when the header is missing, is not a
    /// bearer credential, the token is expired or malformed, or no identity
    /// claim is present.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<VerifiedIdentity, Error> {
        let token = bearer_token(authorization).ok_or_else(|| {
            debug!("rejecting request without bearer credential");
            Error::unauthorized("missing bearer token")
        })?;
        self.verify_token(token)
    }

    /// Verify an already extracted token string.
    pub fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, Error> {
        let claims = self.codec.verify(token).map_err(|error| {
            debug!(%error, "rejecting bearer credential");
            match error {
                TokenError::Expired => Error::unauthorized("token has expired"),
                TokenError::Malformed | TokenError::Signing { .. } => {
                    Error::unauthorized("invalid token")
                }
            }
        })?;

        let raw = IDENTITY_CLAIM_PREFERENCE
            .iter()
            .find_map(|claim| claim.read(&claims))
            .ok_or_else(|| {
                debug!("rejecting bearer credential without identity claim");
                Error::unauthorized("identity missing from token")
            })?;
        let user_id = UserId::new(raw).map_err(|error| {
            debug!(%error, "rejecting bearer credential with unusable identity claim");
            Error::unauthorized("invalid token")
        })?;

        Ok(VerifiedIdentity {
            user_id,
            email: claims.email,
            expires_at: claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
        })
    }
}

/// Extract the token from `Bearer <token>`; the scheme is case-insensitive.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    let (scheme, token) = authorization?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use super::*;
    use crate::domain::{Email, ErrorCode};
    use crate::test_support::{MutableClock, TEST_SECRET, test_token_codec};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        MutableClock::at_fixture_instant()
    }

    fn sign(claims: &TokenClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode succeeds")
    }

    fn future_exp(clock: &MutableClock) -> Option<i64> {
        use mockable::Clock;
        Some(clock.utc().timestamp() + 3600)
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("Bearer"), None)]
    #[case(Some("Bearer    "), None)]
    #[case(Some("Basic abc"), None)]
    #[case(Some("Bearer abc"), Some("abc"))]
    #[case(Some("bearer abc"), Some("abc"))]
    #[case(Some("BEARER  abc "), Some("abc"))]
    fn bearer_token_extraction(#[case] header: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }

    #[rstest]
    fn authenticates_issued_token(clock: Arc<MutableClock>) {
        let codec = test_token_codec(clock);
        let id = UserId::new("user-1").expect("valid id");
        let email = Email::new("ada@example.com").expect("valid email");
        let issued = codec.issue(&id, &email).expect("issue succeeds");
        let gate = IdentityGate::new(codec);

        let identity = gate
            .authenticate(Some(&format!("Bearer {}", issued.token)))
            .expect("valid token");
        assert_eq!(identity.user_id, id);
        assert_eq!(identity.email.as_deref(), Some("ada@example.com"));
        assert_eq!(identity.expires_at, Some(issued.expires_at));
    }

    #[rstest]
    fn expired_token_is_unauthorized(clock: Arc<MutableClock>) {
        let codec = test_token_codec(clock.clone());
        let issued = codec
            .issue(
                &UserId::new("user-1").expect("valid id"),
                &Email::new("ada@example.com").expect("valid email"),
            )
            .expect("issue succeeds");
        let gate = IdentityGate::new(codec);
        clock.set(issued.expires_at + chrono::TimeDelta::seconds(1));

        let err = gate
            .authenticate(Some(&format!("Bearer {}", issued.token)))
            .expect_err("expired");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "token has expired");
    }

    #[rstest]
    #[case(Some("Bearer nonsense"), "invalid token")]
    #[case(None, "missing bearer token")]
    #[case(Some("Token abc"), "missing bearer token")]
    fn bad_credentials_are_unauthorized(
        clock: Arc<MutableClock>,
        #[case] header: Option<&str>,
        #[case] message: &str,
    ) {
        let gate = IdentityGate::new(test_token_codec(clock));
        let err = gate.authenticate(header).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    fn subject_claim_is_preferred(clock: Arc<MutableClock>) {
        let token = sign(&TokenClaims {
            sub: Some("from-sub".to_owned()),
            user_id: Some("from-user-id".to_owned()),
            exp: future_exp(&clock),
            ..TokenClaims::default()
        });
        let gate = IdentityGate::new(test_token_codec(clock));

        let identity = gate.verify_token(&token).expect("valid token");
        assert_eq!(identity.user_id.as_ref(), "from-sub");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    fn user_id_claim_is_the_fallback(clock: Arc<MutableClock>, #[case] sub: Option<String>) {
        let token = sign(&TokenClaims {
            sub,
            user_id: Some("from-user-id".to_owned()),
            exp: future_exp(&clock),
            ..TokenClaims::default()
        });
        let gate = IdentityGate::new(test_token_codec(clock));

        let identity = gate.verify_token(&token).expect("valid token");
        assert_eq!(identity.user_id.as_ref(), "from-user-id");
    }

    #[rstest]
    fn missing_identity_claims_are_unauthorized(clock: Arc<MutableClock>) {
        let token = sign(&TokenClaims {
            email: Some("ada@example.com".to_owned()),
            exp: future_exp(&clock),
            ..TokenClaims::default()
        });
        let gate = IdentityGate::new(test_token_codec(clock));

        let err = gate.verify_token(&token).expect_err("no identity");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "identity missing from token");
    }
}
