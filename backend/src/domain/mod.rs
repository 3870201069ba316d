//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that implement the driving ports.
//! Adapters depend on this module; it never depends on them.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - Task, TaskPatch, TaskSelection — task aggregate, edits and list plans.
//! - TokenCodec, IdentityGate — bearer token issue and verification.
//! - TaskService, AccountService — driving port implementations.

pub mod account;
pub mod account_service;
pub mod error;
pub mod identity;
pub mod ownership;
pub mod ports;
pub mod task;
pub mod task_query;
pub mod task_service;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::account::{
    AccountSummary, AccountValidationError, AuthSession, LoginCredentials, PASSWORD_MIN,
    SignupDetails,
};
pub use self::account_service::AccountService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{
    IDENTITY_CLAIM_PREFERENCE, IdentityClaim, IdentityGate, VerifiedIdentity, bearer_token,
};
pub use self::ownership::{OWNER_MISMATCH_MESSAGE, assert_owner_match};
pub use self::task::{
    FieldUpdate, NewTask, Priority, Tags, Task, TaskDescription, TaskDraft, TaskId, TaskPatch,
    TaskTitle, TaskValidationError,
};
pub use self::task_query::{
    SortOrder, StatusFilter, TaskListQuery, TaskPredicate, TaskQueryBuilder,
    TaskQueryValidationError, TaskSelection, TaskSortKey,
};
pub use self::task_service::TaskService;
pub use self::token::{
    IssuedToken, TOKEN_TTL, TokenClaims, TokenCodec, TokenConfig, TokenConfigError, TokenError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, PasswordHash, User, UserId, UserName, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use taskboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
