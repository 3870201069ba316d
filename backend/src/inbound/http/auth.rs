//! Bearer authentication for HTTP handlers.
//!
//! [`AuthenticatedUser`] runs the identity gate; [`OwnerScope`] additionally
//! runs the ownership guard against the `{owner_id}` path segment. Both
//! resolve before any body extractor, so credential and ownership failures
//! win over payload errors.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, UserId, VerifiedIdentity, assert_owner_match};

use super::state::HttpState;

/// Path segment naming the owner on task routes.
pub const OWNER_PATH_SEGMENT: &str = "owner_id";

fn state(req: &HttpRequest) -> Result<&web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

fn authorization(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

fn authenticate(req: &HttpRequest) -> Result<VerifiedIdentity, Error> {
    state(req)?.identity.authenticate(authorization(req))
}

/// Caller identity established from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub VerifiedIdentity);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0.user_id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(Self))
    }
}

/// Authenticated caller whose identity matches the `{owner_id}` path segment.
#[derive(Debug, Clone)]
pub struct OwnerScope {
    owner: UserId,
}

impl OwnerScope {
    /// The verified owner every task operation is scoped to.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }
}

fn owner_scope(req: &HttpRequest) -> Result<OwnerScope, Error> {
    let identity = authenticate(req)?;
    let path_owner = req
        .match_info()
        .get(OWNER_PATH_SEGMENT)
        .ok_or_else(|| Error::internal("route is missing the owner path segment"))?;
    assert_owner_match(path_owner, &identity.user_id)?;
    Ok(OwnerScope {
        owner: identity.user_id,
    })
}

impl FromRequest for OwnerScope {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(owner_scope(req))
    }
}

/// Bearer credential when present and valid; never an error.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<(VerifiedIdentity, String)>);

impl FromRequest for OptionalSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = state(req).ok().and_then(|state| {
            let token = crate::domain::bearer_token(authorization(req))?;
            let identity = state.identity.verify_token(token).ok()?;
            Some((identity, token.to_owned()))
        });
        ready(Ok(Self(session)))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Email, ErrorCode};
    use crate::inbound::http::test_utils::{TestHarness, bearer};
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn user(raw: &str) -> UserId {
        UserId::new(raw).expect("valid id")
    }

    fn email() -> Email {
        Email::new("ada@example.com").expect("valid email")
    }

    #[rstest]
    #[actix_web::test]
    async fn authenticated_user_reads_bearer_subject() {
        let harness = TestHarness::new();
        let token = harness.token_for(&user("u1"), &email());
        let req = TestRequest::default()
            .app_data(harness.state())
            .insert_header(bearer(&token))
            .to_http_request();

        let caller = AuthenticatedUser::extract(&req).await.expect("authenticated");

        assert_eq!(caller.user_id(), &user("u1"));
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let harness = TestHarness::new();
        let req = TestRequest::default()
            .app_data(harness.state())
            .to_http_request();

        let error = AuthenticatedUser::extract(&req).await.expect_err("rejected");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "missing bearer token");
    }

    #[rstest]
    #[case("u1", None)]
    #[case("u2", Some(ErrorCode::Forbidden))]
    #[actix_web::test]
    async fn owner_scope_enforces_path_owner(
        #[case] path_owner: &str,
        #[case] expected: Option<ErrorCode>,
    ) {
        let harness = TestHarness::new();
        let token = harness.token_for(&user("u1"), &email());
        let req = TestRequest::default()
            .app_data(harness.state())
            .insert_header(bearer(&token))
            .param(OWNER_PATH_SEGMENT, path_owner.to_owned())
            .to_http_request();

        let result = OwnerScope::extract(&req).await;

        assert_eq!(result.err().map(|error| error.code()), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn optional_session_ignores_bad_tokens() {
        let harness = TestHarness::new();
        let req = TestRequest::default()
            .app_data(harness.state())
            .insert_header(bearer("not-a-token"))
            .to_http_request();

        let session = OptionalSession::extract(&req).await.expect("never fails");

        assert!(session.0.is_none());
    }
}
