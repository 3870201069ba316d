//! Account HTTP handlers.
//!
//! ```text
//! POST /auth/signup
//! POST /auth/login
//! POST /auth/logout
//! GET  /auth/session
//! ```
//!
//! Tokens are stateless: logout only tells the client to discard its token,
//! and the session probe reports whatever a presented token asserts.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountSummary, AuthSession, Error, LoginCredentials, SignupDetails};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::OptionalSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, account_validation_error, missing_field_error};

/// Message returned by logout.
pub const LOGOUT_MESSAGE: &str = "Logged out successfully";

/// Request payload for registration.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    /// At least 8 characters.
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Request payload for login.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public account fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<AccountSummary> for AccountResponse {
    fn from(value: AccountSummary) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email.to_string(),
            name: value.name.map(String::from),
        }
    }
}

/// Response payload for signup and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: AccountResponse,
    pub token: String,
    pub expires_at: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(value: AuthSession) -> Self {
        Self {
            user: value.user.into(),
            token: value.token,
            expires_at: value.expires_at.to_rfc3339(),
        }
    }
}

/// Identity asserted by a presented token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUserResponse {
    pub id: String,
    pub email: Option<String>,
}

/// Response payload for the session probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: SessionUserResponse,
    pub token: String,
    pub expires_at: Option<String>,
}

/// Response payload for logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(FieldName::new(field)))
}

fn parse_signup_request(payload: SignupRequest) -> Result<SignupDetails, Error> {
    let email = required(payload.email, "email")?;
    let password = required(payload.password, "password")?;
    SignupDetails::try_from_parts(&email, &password, payload.name.as_deref())
        .map_err(account_validation_error)
}

fn parse_login_request(payload: LoginRequest) -> Result<LoginCredentials, Error> {
    let email = required(payload.email, "email")?;
    let password = required(payload.password, "password")?;
    LoginCredentials::try_from_parts(&email, &password).map_err(account_validation_error)
}

/// Register an account and issue a token.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request or email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let details = parse_signup_request(payload.into_inner())?;
    let session = state.accounts.signup(details).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

/// Exchange credentials for a token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid email or password", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = parse_login_request(payload.into_inner())?;
    let session = state.accounts.login(credentials).await?;
    Ok(web::Json(AuthResponse::from(session)))
}

/// Acknowledge a sign-out. Issued tokens stay valid until they expire.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Signed out", body = LogoutResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout() -> web::Json<LogoutResponse> {
    web::Json(LogoutResponse {
        message: LOGOUT_MESSAGE.to_owned(),
    })
}

/// Describe the presented bearer token, or `null` when it is absent or invalid.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses((status = 200, description = "Current session, or null without a valid token", body = SessionResponse)),
    tags = ["auth"],
    operation_id = "getSession",
    security([])
)]
#[get("/session")]
pub async fn current_session(
    session: OptionalSession,
) -> web::Json<Option<SessionResponse>> {
    web::Json(session.0.map(|(identity, token)| SessionResponse {
        user: SessionUserResponse {
            id: identity.user_id.to_string(),
            email: identity.email,
        },
        token,
        expires_at: identity.expires_at.map(|at| at.to_rfc3339()),
    }))
}

/// Register the account handlers on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(logout)
        .service(current_session);
}
