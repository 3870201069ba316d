//! Task entity and its validated field types.
//!
//! Field constraints:
//! - title: 1 to 200 characters
//! - description: at most 1000 characters
//! - priority: `high`, `medium` (default) or `low`
//! - tags: at most 20 entries, each 1 to 50 characters
//!
//! Lengths are counted in Unicode scalar values, not bytes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserId;

/// Maximum title length.
pub const TITLE_MAX: usize = 200;
/// Maximum description length.
pub const DESCRIPTION_MAX: usize = 1000;
/// Maximum length of a single tag.
pub const TAG_MAX: usize = 50;
/// Maximum number of tags on one task.
pub const TAGS_MAX: usize = 20;

/// Field-level validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    #[error("title must be between 1 and {TITLE_MAX} characters")]
    TitleLength,
    #[error("description must be at most {DESCRIPTION_MAX} characters")]
    DescriptionTooLong,
    #[error("priority must be one of high, medium or low")]
    UnknownPriority,
    #[error("each tag must be between 1 and {TAG_MAX} characters")]
    TagLength { index: usize },
    #[error("at most {TAGS_MAX} tags are allowed")]
    TooManyTags,
}

impl TaskValidationError {
    /// Request field the failure belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::TitleLength => "title",
            Self::DescriptionTooLong => "description",
            Self::UnknownPriority => "priority",
            Self::TagLength { .. } | Self::TooManyTags => "tags",
        }
    }

    /// Stable machine-readable code for error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TitleLength => "title_length",
            Self::DescriptionTooLong => "description_too_long",
            Self::UnknownPriority => "unknown_priority",
            Self::TagLength { .. } => "tag_length",
            Self::TooManyTags => "too_many_tags",
        }
    }
}

/// Store-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wrap a storage-assigned identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task title, 1 to 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Validate a title, counting characters rather than bytes.
    pub fn new(title: impl Into<String>) -> Result<Self, TaskValidationError> {
        let title = title.into();
        let length = title.chars().count();
        if length == 0 || length > TITLE_MAX {
            return Err(TaskValidationError::TitleLength);
        }
        Ok(Self(title))
    }

    /// Borrow the title text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TaskTitle> for String {
    fn from(value: TaskTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for TaskTitle {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-form description, at most 1000 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Validate a description of at most 1000 characters.
    pub fn new(description: impl Into<String>) -> Result<Self, TaskValidationError> {
        let description = description.into();
        if description.chars().count() > DESCRIPTION_MAX {
            return Err(TaskValidationError::DescriptionTooLong);
        }
        Ok(Self(description))
    }

    /// Borrow the description text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TaskDescription> for String {
    fn from(value: TaskDescription) -> Self {
        value.0
    }
}

impl TryFrom<String> for TaskDescription {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Task urgency.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: high sorts first.
    pub const fn rank(self) -> i16 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(TaskValidationError::UnknownPriority),
        }
    }
}

/// Ordered, bounded tag list. Each tag is 1 to 50 characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(Vec<String>);

impl Tags {
    /// Validate the tag count and each tag's length.
    pub fn new(tags: Vec<String>) -> Result<Self, TaskValidationError> {
        if tags.len() > TAGS_MAX {
            return Err(TaskValidationError::TooManyTags);
        }
        if let Some(index) = tags.iter().position(|tag| {
            let length = tag.chars().count();
            length == 0 || length > TAG_MAX
        }) {
            return Err(TaskValidationError::TagLength { index });
        }
        Ok(Self(tags))
    }

    /// Tags in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|candidate| candidate == tag)
    }
}

impl From<Tags> for Vec<String> {
    fn from(value: Tags) -> Self {
        value.0
    }
}

impl TryFrom<Vec<String>> for Tags {
    type Error = TaskValidationError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated fields for a task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
    pub priority: Priority,
    pub tags: Tags,
}

/// A task ready for insertion; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub owner_id: UserId,
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
    pub completed: bool,
    pub priority: Priority,
    pub tags: Tags,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTask {
    /// Stamp a draft for `owner_id` at `now`. New tasks start pending.
    pub fn from_draft(owner_id: UserId, draft: TaskDraft, now: DateTime<Utc>) -> Self {
        let TaskDraft {
            title,
            description,
            priority,
            tags,
        } = draft;
        Self {
            owner_id,
            title,
            description,
            completed: false,
            priority,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the store-assigned id.
    pub fn with_id(self, id: TaskId) -> Task {
        Task {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            priority: self.priority,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A stored task.
///
/// ## Invariants
/// - `owner_id` never changes after creation.
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub owner_id: UserId,
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
    pub completed: bool,
    pub priority: Priority,
    pub tags: Tags,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Apply a partial update and refresh `updated_at`.
    ///
    /// The timestamp is refreshed even when the patch is empty and never
    /// drops below `created_at`.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        let TaskPatch {
            title,
            description,
            completed,
            priority,
            tags,
        } = patch;
        title.apply_to(&mut self.title);
        description.apply_to(&mut self.description);
        completed.apply_to(&mut self.completed);
        priority.apply_to(&mut self.priority);
        tags.apply_to(&mut self.tags);
        self.touch(now);
    }

    /// Flip the completion flag and refresh `updated_at`.
    pub fn toggle_complete(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Presence-aware wrapper for a single updatable attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// The field was absent from the request.
    #[default]
    Unchanged,
    /// The field was supplied with this value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// True for `Set`.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    fn apply_to(self, target: &mut T) {
        if let Self::Set(value) = self {
            *target = value;
        }
    }
}

/// Partial task update. `description: Set(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: FieldUpdate<TaskTitle>,
    pub description: FieldUpdate<Option<TaskDescription>>,
    pub completed: FieldUpdate<bool>,
    pub priority: FieldUpdate<Priority>,
    pub tags: FieldUpdate<Tags>,
}

impl TaskPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        !(self.title.is_set()
            || self.description.is_set()
            || self.completed.is_set()
            || self.priority.is_set()
            || self.tags.is_set())
    }
}
