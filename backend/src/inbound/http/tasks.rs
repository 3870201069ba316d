//! Task HTTP handlers.
//!
//! ```text
//! GET    /api/{owner_id}/tasks
//! POST   /api/{owner_id}/tasks
//! GET    /api/{owner_id}/tasks/{task_id}
//! PUT    /api/{owner_id}/tasks/{task_id}
//! DELETE /api/{owner_id}/tasks/{task_id}
//! PATCH  /api/{owner_id}/tasks/{task_id}/complete
//! ```
//!
//! Every handler takes [`OwnerScope`] before any other request-derived
//! extractor, so a bad credential or a foreign `{owner_id}` is rejected
//! before the path id or body is looked at.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::OwnerScope;
use crate::inbound::http::state::HttpState;

pub use super::tasks_dto::{CreateTaskRequest, ListTasksParams, TaskResponse, UpdateTaskRequest};
use super::tasks_dto::{TaskPath, parse_create_request, parse_update_request};

/// List the owner's tasks, filtered and sorted.
#[utoipa::path(
    get,
    path = "/api/{owner_id}/tasks",
    params(
        ("owner_id" = String, Path, description = "Owner; must match the bearer identity"),
        ListTasksParams
    ),
    responses(
        (status = 200, description = "Matching tasks", body = [TaskResponse]),
        (status = 400, description = "Invalid query", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/{owner_id}/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    scope: OwnerScope,
    params: web::Query<ListTasksParams>,
) -> ApiResult<web::Json<Vec<TaskResponse>>> {
    let query = params.into_inner().into_query()?;
    let tasks = state.tasks_query.list(scope.owner(), &query).await?;
    Ok(web::Json(
        tasks.into_iter().map(TaskResponse::from).collect(),
    ))
}

/// Create a task owned by the caller.
#[utoipa::path(
    post,
    path = "/api/{owner_id}/tasks",
    params(("owner_id" = String, Path, description = "Owner; must match the bearer identity")),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Created task", body = TaskResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/{owner_id}/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    scope: OwnerScope,
    payload: web::Json<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_create_request(payload.into_inner())?;
    let task = state.tasks.create(scope.owner(), draft).await?;
    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

/// Fetch one task.
#[utoipa::path(
    get,
    path = "/api/{owner_id}/tasks/{task_id}",
    params(
        ("owner_id" = String, Path, description = "Owner; must match the bearer identity"),
        ("task_id" = i64, Path, description = "Task identifier")
    ),
    responses(
        (status = 200, description = "Task", body = TaskResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "getTask"
)]
#[get("/{owner_id}/tasks/{task_id}")]
pub async fn get_task(
    state: web::Data<HttpState>,
    scope: OwnerScope,
    path: web::Path<TaskPath>,
) -> ApiResult<web::Json<TaskResponse>> {
    let task = state.tasks_query.get(scope.owner(), path.id()).await?;
    Ok(web::Json(TaskResponse::from(task)))
}

/// Apply a partial update to a task.
#[utoipa::path(
    put,
    path = "/api/{owner_id}/tasks/{task_id}",
    params(
        ("owner_id" = String, Path, description = "Owner; must match the bearer identity"),
        ("task_id" = i64, Path, description = "Task identifier")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[put("/{owner_id}/tasks/{task_id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    scope: OwnerScope,
    path: web::Path<TaskPath>,
    payload: web::Json<UpdateTaskRequest>,
) -> ApiResult<web::Json<TaskResponse>> {
    let patch = parse_update_request(payload.into_inner())?;
    let task = state.tasks.update(scope.owner(), path.id(), patch).await?;
    Ok(web::Json(TaskResponse::from(task)))
}

/// Permanently delete a task.
#[utoipa::path(
    delete,
    path = "/api/{owner_id}/tasks/{task_id}",
    params(
        ("owner_id" = String, Path, description = "Owner; must match the bearer identity"),
        ("task_id" = i64, Path, description = "Task identifier")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/{owner_id}/tasks/{task_id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    scope: OwnerScope,
    path: web::Path<TaskPath>,
) -> ApiResult<HttpResponse> {
    state.tasks.delete(scope.owner(), path.id()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Flip a task's completion flag.
#[utoipa::path(
    patch,
    path = "/api/{owner_id}/tasks/{task_id}/complete",
    params(
        ("owner_id" = String, Path, description = "Owner; must match the bearer identity"),
        ("task_id" = i64, Path, description = "Task identifier")
    ),
    responses(
        (status = 200, description = "Toggled task", body = TaskResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "toggleTaskComplete"
)]
#[patch("/{owner_id}/tasks/{task_id}/complete")]
pub async fn toggle_task_complete(
    state: web::Data<HttpState>,
    scope: OwnerScope,
    path: web::Path<TaskPath>,
) -> ApiResult<web::Json<TaskResponse>> {
    let task = state.tasks.toggle_complete(scope.owner(), path.id()).await?;
    Ok(web::Json(TaskResponse::from(task)))
}

/// Register the task handlers on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_tasks)
        .service(create_task)
        .service(get_task)
        .service(update_task)
        .service(delete_task)
        .service(toggle_task_complete);
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
