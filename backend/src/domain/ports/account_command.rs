//! Driving port for account registration and login.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, LoginCredentials, SignupDetails};

/// Issues bearer tokens for new and returning users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a user and sign them in. Duplicate emails are rejected.
    async fn signup(&self, details: SignupDetails) -> Result<AuthSession, Error>;

    /// Check credentials and issue a token. Unknown emails and wrong
    /// passwords fail identically.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;
}
