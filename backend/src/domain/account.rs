//! Signup and login inputs plus the session handed back to clients.
//!
//! Plaintext passwords are held in [`Zeroizing`] buffers and never leave
//! this module except through [`SignupDetails::password`] and
//! [`LoginCredentials::password`].

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::domain::{Email, IssuedToken, User, UserId, UserName, UserValidationError};

/// Minimum password length at signup.
pub const PASSWORD_MIN: usize = 8;

/// Rejected signup or login input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    InvalidEmail,
    PasswordTooShort { min: usize },
    EmptyPassword,
    InvalidName(UserValidationError),
}

impl AccountValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::PasswordTooShort { .. } | Self::EmptyPassword => "password",
            Self::InvalidName(_) => "name",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::EmptyPassword => "empty_password",
            Self::InvalidName(_) => "invalid_name",
        }
    }
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidName(inner) => inner.fmt(f),
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetails {
    email: Email,
    password: Zeroizing<String>,
    name: Option<UserName>,
}

impl SignupDetails {
    /// Validate raw signup fields. A missing or empty name is accepted.
    ///
    /// # Examples
    /// ```
    /// use taskboard::domain::SignupDetails;
    ///
    /// let details = SignupDetails::try_from_parts("ada@example.com", "correct horse", None)
    ///     .expect("valid signup");
    /// assert_eq!(details.email().as_ref(), "ada@example.com");
    /// assert!(SignupDetails::try_from_parts("ada@example.com", "short", None).is_err());
    /// ```
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Self, AccountValidationError> {
        let email = Email::new(email).map_err(|_| AccountValidationError::InvalidEmail)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(AccountValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        let name = name
            .filter(|raw| !raw.is_empty())
            .map(UserName::new)
            .transpose()
            .map_err(AccountValidationError::InvalidName)?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            name,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn name(&self) -> Option<&UserName> {
        self.name.as_ref()
    }
}

/// Validated login request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AccountValidationError> {
        let email = Email::new(email).map_err(|_| AccountValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(AccountValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: UserId,
    pub email: Email,
    pub name: Option<UserName>,
}

impl From<&User> for AccountSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Result of a successful signup or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: AccountSummary,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(user: AccountSummary, issued: IssuedToken) -> Self {
        Self {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}
