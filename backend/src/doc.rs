//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request and response
//! schemas, and the bearer security scheme. The document is served by
//! Swagger UI in debug builds and exported via `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Priority, SortOrder, StatusFilter};
use crate::inbound::http::accounts::{
    AccountResponse, AuthResponse, LoginRequest, LogoutResponse, SessionResponse,
    SessionUserResponse, SignupRequest,
};
use crate::inbound::http::health::HealthSummary;
use crate::inbound::http::root::ApiIndex;
use crate::inbound::http::tasks::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};

/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /auth/signup or /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Taskboard API",
        description = "Multi-tenant task management with bearer-token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::root::index,
        crate::inbound::http::health::summary,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_session,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::get_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::tasks::toggle_task_complete,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Priority,
        StatusFilter,
        SortOrder,
        TaskResponse,
        CreateTaskRequest,
        UpdateTaskRequest,
        SignupRequest,
        LoginRequest,
        AccountResponse,
        AuthResponse,
        SessionResponse,
        SessionUserResponse,
        LogoutResponse,
        HealthSummary,
        ApiIndex
    )),
    tags(
        (name = "tasks", description = "Owner-scoped task operations"),
        (name = "auth", description = "Account registration and token issuance"),
        (name = "health", description = "Endpoints for health checks"),
        (name = "meta", description = "API index")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn task_response_schema_uses_snake_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let task = schemas.get("TaskResponse").expect("TaskResponse schema");

        for field in [
            "id",
            "user_id",
            "title",
            "completed",
            "priority",
            "tags",
            "created_at",
            "updated_at",
        ] {
            assert_object_schema_has_field(task, field);
        }
    }

    #[rstest]
    fn auth_response_schema_keeps_expires_at() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let auth = schemas.get("AuthResponse").expect("AuthResponse schema");

        assert_object_schema_has_field(auth, "expiresAt");
    }

    #[rstest]
    #[case("/api/{owner_id}/tasks")]
    #[case("/api/{owner_id}/tasks/{task_id}")]
    #[case("/api/{owner_id}/tasks/{task_id}/complete")]
    #[case("/auth/signup")]
    #[case("/auth/session")]
    #[case("/health")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn registers_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }
}
