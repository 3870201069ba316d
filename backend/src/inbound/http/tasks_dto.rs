//! Task DTOs and parsing helpers.
//!
//! Request payloads keep every field optional so that missing and null
//! values produce field-level validation errors instead of opaque JSON
//! decoding failures. Unknown fields, including any client-supplied owner,
//! are ignored.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, FieldUpdate, Priority, SortOrder, StatusFilter, Tags, Task, TaskDescription, TaskDraft,
    TaskId, TaskListQuery, TaskPatch, TaskTitle, TaskValidationError,
};
use crate::inbound::http::validation::{
    FieldName, missing_field_error, null_field_error, query_validation_error,
    task_validation_error,
};

#[derive(Debug, Deserialize)]
pub(super) struct TaskPath {
    pub(super) task_id: i64,
}

impl TaskPath {
    pub(super) fn id(&self) -> TaskId {
        TaskId::new(self.task_id)
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request payload for creating a task.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateTaskRequest {
    /// 1 to 200 characters.
    pub title: Option<String>,
    /// At most 1000 characters.
    pub description: Option<String>,
    /// `high`, `medium` or `low`; defaults to `medium`.
    #[schema(example = "medium")]
    pub priority: Option<String>,
    /// At most 20 tags of 1 to 50 characters each.
    #[schema(max_items = 20)]
    pub tags: Option<Vec<String>>,
}

/// Request payload for a partial task update.
///
/// Absent fields are left unchanged. `description: null` clears the
/// description; `null` for any other field is rejected.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<bool>)]
    pub completed: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub priority: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<String>>, max_items = 20)]
    pub tags: Option<Option<Vec<String>>>,
}

/// Response payload for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.get(),
            user_id: task.owner_id.to_string(),
            title: task.title.as_str().to_owned(),
            description: task
                .description
                .as_ref()
                .map(|description| description.as_str().to_owned()),
            completed: task.completed,
            priority: task.priority,
            tags: task.tags.into(),
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for listing tasks. Every filter is optional.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksParams {
    /// Case-insensitive substring of the title or description.
    pub search: Option<String>,
    /// `pending` or `completed`.
    pub status: Option<StatusFilter>,
    /// Exact priority.
    pub priority: Option<Priority>,
    /// Keep tasks carrying this exact tag.
    #[serde(alias = "tags")]
    pub tag: Option<String>,
    /// `date` (default), `alpha` or `priority`.
    pub sort: Option<SortOrder>,
}

impl ListTasksParams {
    pub(super) fn into_query(self) -> Result<TaskListQuery, Error> {
        TaskListQuery::new(
            self.search,
            self.status,
            self.priority,
            self.tag,
            self.sort,
        )
        .map_err(query_validation_error)
    }
}

fn parse_priority(raw: &str) -> Result<Priority, TaskValidationError> {
    Priority::from_str(raw)
}

fn parse_description(raw: Option<String>) -> Result<Option<TaskDescription>, Error> {
    raw.map(TaskDescription::new)
        .transpose()
        .map_err(task_validation_error)
}

pub(super) fn parse_create_request(payload: CreateTaskRequest) -> Result<TaskDraft, Error> {
    let CreateTaskRequest {
        title,
        description,
        priority,
        tags,
    } = payload;
    let title = title.ok_or_else(|| missing_field_error(FieldName::new("title")))?;

    Ok(TaskDraft {
        title: TaskTitle::new(title).map_err(task_validation_error)?,
        description: parse_description(description)?,
        priority: priority
            .as_deref()
            .map(parse_priority)
            .transpose()
            .map_err(task_validation_error)?
            .unwrap_or_default(),
        tags: Tags::new(tags.unwrap_or_default()).map_err(task_validation_error)?,
    })
}

/// Reject explicit `null` for a non-nullable field.
fn non_null<T>(value: Option<Option<T>>, field: &'static str) -> Result<FieldUpdate<T>, Error> {
    match value {
        None => Ok(FieldUpdate::Unchanged),
        Some(None) => Err(null_field_error(FieldName::new(field))),
        Some(Some(value)) => Ok(FieldUpdate::Set(value)),
    }
}

fn validate<T, U>(
    update: FieldUpdate<T>,
    parse: impl FnOnce(T) -> Result<U, TaskValidationError>,
) -> Result<FieldUpdate<U>, Error> {
    match update {
        FieldUpdate::Unchanged => Ok(FieldUpdate::Unchanged),
        FieldUpdate::Set(value) => parse(value)
            .map(FieldUpdate::Set)
            .map_err(task_validation_error),
    }
}

pub(super) fn parse_update_request(payload: UpdateTaskRequest) -> Result<TaskPatch, Error> {
    let UpdateTaskRequest {
        title,
        description,
        completed,
        priority,
        tags,
    } = payload;

    let description = match description {
        None => FieldUpdate::Unchanged,
        Some(raw) => FieldUpdate::Set(parse_description(raw)?),
    };

    Ok(TaskPatch {
        title: validate(non_null(title, "title")?, TaskTitle::new)?,
        description,
        completed: non_null(completed, "completed")?,
        priority: validate(non_null(priority, "priority")?, |raw: String| {
            parse_priority(&raw)
        })?,
        tags: validate(non_null(tags, "tags")?, Tags::new)?,
    })
}
