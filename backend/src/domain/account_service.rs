//! Account registration and login.
//!
//! Implements [`AccountCommand`] over a [`UserRepository`] and a
//! [`PasswordHasher`], issuing tokens with the shared [`TokenCodec`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::{AccountCommand, PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::{
    AccountSummary, AuthSession, Error, LoginCredentials, SignupDetails, TokenCodec, User, UserId,
};

/// Returned for unknown emails and wrong passwords alike.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// Returned when signup targets an email that is already registered.
pub const EMAIL_TAKEN_MESSAGE: &str = "email already registered";

fn map_user_error(error: UserPersistenceError) -> Error {
    error!(%error, "user repository failure");
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        // Only reachable when two signups race past the pre-check.
        UserPersistenceError::DuplicateEmail => {
            Error::internal("user repository rejected a duplicate email")
        }
    }
}

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: TokenCodec,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: TokenCodec, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    fn start_session(&self, user: &User) -> Result<AuthSession, Error> {
        let issued = self.tokens.issue(&user.id, &user.email).map_err(|error| {
            error!(%error, "token signing failed");
            Error::internal("failed to issue token")
        })?;
        Ok(AuthSession::new(AccountSummary::from(user), issued))
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn signup(&self, details: SignupDetails) -> Result<AuthSession, Error> {
        let existing = self
            .users
            .find_by_email(details.email())
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            debug!("signup rejected: email already registered");
            return Err(Error::invalid_request(EMAIL_TAKEN_MESSAGE));
        }

        let password_hash = self.hasher.hash(details.password()).map_err(|error| {
            error!(%error, "password hashing failed");
            Error::internal("failed to hash password")
        })?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            email: details.email().clone(),
            name: details.name().cloned(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(&user).await.map_err(map_user_error)?;
        self.start_session(&user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?;
        let Some(user) = user else {
            debug!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };
        if !self
            .hasher
            .verify(credentials.password(), &user.password_hash)
        {
            debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }
        self.start_session(&user)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository, PasswordHashError};
    use crate::domain::{Email, ErrorCode, PasswordHash, TOKEN_TTL};
    use crate::test_support::{MutableClock, fixture_instant, test_token_codec};
    use rstest::rstest;

    type Service = AccountService<MockUserRepository, MockPasswordHasher>;

    fn make_service(users: MockUserRepository, hasher: MockPasswordHasher) -> Service {
        let clock = MutableClock::at_fixture_instant();
        AccountService::new(
            Arc::new(users),
            Arc::new(hasher),
            test_token_codec(clock.clone()),
            clock,
        )
    }

    fn existing_user() -> User {
        User {
            id: UserId::new("user-1").expect("valid id"),
            email: Email::new("ada@example.com").expect("valid email"),
            name: None,
            password_hash: PasswordHash::new("sha256$00$00"),
            created_at: fixture_instant(),
            updated_at: fixture_instant(),
        }
    }

    fn signup_details() -> SignupDetails {
        SignupDetails::try_from_parts("ada@example.com", "correct horse", Some("Ada"))
            .expect("valid signup")
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", password).expect("valid credentials")
    }

    #[tokio::test]
    async fn signup_stores_user_and_issues_token() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().times(1).returning(|_| Ok(None));
        users
            .expect_insert()
            .times(1)
            .withf(|user| {
                user.email.as_ref() == "ada@example.com"
                    && user.password_hash.as_str() == "hashed"
                    && user.name.as_ref().is_some_and(|name| name.as_ref() == "Ada")
            })
            .returning(|_| Ok(()));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok(PasswordHash::new("hashed")));
        let service = make_service(users, hasher);

        let session = service.signup(signup_details()).await.expect("signup");

        assert_eq!(session.user.email.as_ref(), "ada@example.com");
        assert_eq!(session.expires_at, fixture_instant() + TOKEN_TTL);
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn signup_rejects_registered_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(existing_user())));
        users.expect_insert().never();
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();
        let service = make_service(users, hasher);

        let error = service.signup(signup_details()).await.expect_err("taken");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), EMAIL_TAKEN_MESSAGE);
    }

    #[tokio::test]
    async fn signup_surfaces_hashing_failure_as_internal() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_insert().never();
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(PasswordHashError::hashing("rng unavailable")));
        let service = make_service(users, hasher);

        let error = service.signup(signup_details()).await.expect_err("hash");

        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::DuplicateEmail, ErrorCode::InternalError)]
    #[tokio::test]
    async fn signup_maps_insert_failures(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_insert().return_once(move |_| Err(failure));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Ok(PasswordHash::new("hashed")));
        let service = make_service(users, hasher);

        let error = service.signup(signup_details()).await.expect_err("insert");

        assert_eq!(error.code(), expected);
    }

    #[tokio::test]
    async fn login_issues_token_for_matching_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(existing_user())));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .withf(|password, _| password == "correct horse")
            .returning(|_, _| true);
        let service = make_service(users, hasher);

        let session = service
            .login(credentials("correct horse"))
            .await
            .expect("login");

        assert_eq!(session.user.id.as_ref(), "user-1");
    }

    #[rstest]
    #[case::unknown_email(None, false)]
    #[case::wrong_password(Some(()), false)]
    #[tokio::test]
    async fn login_failures_are_indistinguishable(
        #[case] user: Option<()>,
        #[case] verifies: bool,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(user.map(|()| existing_user())));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(move |_, _| verifies);
        let service = make_service(users, hasher);

        let error = service
            .login(credentials("wrong password"))
            .await
            .expect_err("rejected");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), INVALID_CREDENTIALS_MESSAGE);
    }
}
