//! Application settings loaded via OrthoConfig.
//!
//! Values come from `TASKS_*` environment variables, an optional config file
//! and command-line flags. They are resolved once at startup and injected;
//! nothing reads the environment while serving requests.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{TokenConfig, TokenConfigError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_JWT_ALGORITHM: &str = "HS256";

/// Settings that cannot be turned into a runnable configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("auth secret is required (set TASKS_AUTH_SECRET)")]
    MissingAuthSecret,
    #[error("invalid bind address `{value}`")]
    InvalidBindAddr { value: String },
    #[error("db_max_connections must be at least 1")]
    ZeroConnections,
    #[error(transparent)]
    Token(#[from] TokenConfigError),
}

/// Process-wide settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASKS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// HMAC signing secret for bearer tokens.
    pub auth_secret: Option<String>,
    /// `HS256`, `HS384` or `HS512`.
    pub jwt_algorithm: Option<String>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<redacted>"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("auth_secret", &self.auth_secret.as_ref().map(|_| "<redacted>"))
            .field("jwt_algorithm", &self.jwt_algorithm)
            .finish()
    }
}

impl AppSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size, rejecting zero.
    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections {
            0 => Err(SettingsError::ZeroConnections),
            size => Ok(size),
        }
    }

    /// Signing algorithm name, defaulting to `HS256`.
    pub fn jwt_algorithm(&self) -> &str {
        self.jwt_algorithm.as_deref().unwrap_or(DEFAULT_JWT_ALGORITHM)
    }

    /// Token signing configuration. Fails when the secret is absent or empty,
    /// or the algorithm is not an HMAC variant.
    pub fn token_config(&self) -> Result<TokenConfig, SettingsError> {
        let secret = self
            .auth_secret
            .as_deref()
            .ok_or(SettingsError::MissingAuthSecret)?;
        Ok(TokenConfig::new(secret, self.jwt_algorithm())?)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

    const VARS: [&str; 5] = [
        "TASKS_BIND_ADDR",
        "TASKS_DATABASE_URL",
        "TASKS_DB_MAX_CONNECTIONS",
        "TASKS_AUTH_SECRET",
        "TASKS_JWT_ALGORITHM",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("taskboard")]).expect("config should load")
    }

    fn unset() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            auth_secret: None,
            jwt_algorithm: None,
        }
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid literal")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), Ok(DEFAULT_DB_MAX_CONNECTIONS));
        assert_eq!(settings.jwt_algorithm(), "HS256");
        assert_eq!(
            settings.token_config().expect_err("secret required"),
            SettingsError::MissingAuthSecret
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("TASKS_BIND_ADDR", "127.0.0.1:9000"),
            ("TASKS_DATABASE_URL", "postgres://localhost/tasks"),
            ("TASKS_DB_MAX_CONNECTIONS", "4"),
            ("TASKS_AUTH_SECRET", "s3cret"),
            ("TASKS_JWT_ALGORITHM", "HS512"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("valid literal")
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/tasks"));
        assert_eq!(settings.db_max_connections(), Ok(4));
        assert!(settings.token_config().is_ok());
    }

    #[rstest]
    fn zero_connections_are_rejected() {
        let _guard = lock_env(env_with(&[("TASKS_DB_MAX_CONNECTIONS", "0")]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.db_max_connections(),
            Err(SettingsError::ZeroConnections)
        );
    }

    #[rstest]
    fn non_hmac_algorithm_is_rejected() {
        let _guard = lock_env(env_with(&[
            ("TASKS_AUTH_SECRET", "s3cret"),
            ("TASKS_JWT_ALGORITHM", "RS256"),
        ]));

        let settings = load_from_empty_args();

        assert!(matches!(
            settings.token_config(),
            Err(SettingsError::Token(TokenConfigError::UnsupportedAlgorithm { .. }))
        ));
    }

    #[rstest]
    fn blank_secret_is_rejected() {
        let settings = AppSettings {
            auth_secret: Some(String::new()),
            ..unset()
        };

        assert_eq!(
            settings.token_config().expect_err("blank secret"),
            SettingsError::Token(TokenConfigError::EmptySecret)
        );
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let settings = AppSettings {
            database_url: Some("postgres://user:pw@db/tasks".to_owned()),
            auth_secret: Some("s3cret".to_owned()),
            ..unset()
        };

        let rendered = format!("{settings:?}");

        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("pw@db"));
    }
}
