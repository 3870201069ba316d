//! API root: name, version and where the documentation lives.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response payload for `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiIndex {
    #[schema(example = "Taskboard API")]
    pub message: String,
    pub version: String,
    /// Swagger UI path; served by debug builds.
    pub docs: String,
    pub openapi: String,
    pub authentication: String,
}

/// Describe the API.
#[utoipa::path(
    get,
    path = "/",
    tags = ["meta"],
    security([]),
    responses((status = 200, description = "API index", body = ApiIndex))
)]
#[get("/")]
pub async fn index() -> web::Json<ApiIndex> {
    web::Json(ApiIndex {
        message: "Taskboard API".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        docs: "/docs/".to_owned(),
        openapi: "/api-docs/openapi.json".to_owned(),
        authentication: "Bearer tokens required for /api endpoints".to_owned(),
    })
}
