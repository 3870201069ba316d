//! Task query builder.
//!
//! Turns independent optional list parameters into a [`TaskSelection`]: a
//! conjunction of predicates, always headed by the owner scope, plus an
//! ordered list of sort keys. Repositories either translate the selection
//! into SQL or evaluate it with [`TaskSelection::matches`] and
//! [`TaskSelection::compare`]; both must yield the same sequence.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Priority, Task, UserId};

/// Maximum length of the `search` parameter.
pub const SEARCH_MAX: usize = 100;
/// Maximum length of the `tag` parameter.
pub const TAG_FILTER_MAX: usize = 200;

/// Completion filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Pending,
    Completed,
}

impl StatusFilter {
    const fn completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Requested ordering; `date` unless stated otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Date,
    /// Title ascending, compared as stored.
    Alpha,
    /// High before medium before low, newest first within a rank.
    Priority,
}

/// Rejected list parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskQueryValidationError {
    #[error("search must be at most {SEARCH_MAX} characters")]
    SearchTooLong,
    #[error("tag must be at most {TAG_FILTER_MAX} characters")]
    TagTooLong,
}

impl TaskQueryValidationError {
    /// Query parameter that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::SearchTooLong => "search",
            Self::TagTooLong => "tag",
        }
    }

    /// Machine-readable rejection code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SearchTooLong => "search_too_long",
            Self::TagTooLong => "tag_too_long",
        }
    }
}

/// Validated list parameters. Every dimension is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    search: Option<String>,
    status: Option<StatusFilter>,
    priority: Option<Priority>,
    tag: Option<String>,
    sort: SortOrder,
}

impl TaskListQuery {
    /// Validate raw parameters.
    ///
    /// Empty `search` and `tag` values mean "no restriction".
    pub fn new(
        search: Option<String>,
        status: Option<StatusFilter>,
        priority: Option<Priority>,
        tag: Option<String>,
        sort: Option<SortOrder>,
    ) -> Result<Self, TaskQueryValidationError> {
        let search = search.filter(|term| !term.is_empty());
        if search
            .as_deref()
            .is_some_and(|term| term.chars().count() > SEARCH_MAX)
        {
            return Err(TaskQueryValidationError::SearchTooLong);
        }
        let tag = tag.filter(|tag| !tag.is_empty());
        if tag
            .as_deref()
            .is_some_and(|tag| tag.chars().count() > TAG_FILTER_MAX)
        {
            return Err(TaskQueryValidationError::TagTooLong);
        }
        Ok(Self {
            search,
            status,
            priority,
            tag,
            sort: sort.unwrap_or_default(),
        })
    }

    /// Requested ordering, `Date` when none was given.
    pub fn sort(&self) -> SortOrder {
        self.sort
    }
}

/// One conjunct of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPredicate {
    OwnedBy(UserId),
    /// Case-insensitive literal substring of the title or the description.
    TextContains(String),
    Completed(bool),
    PriorityIs(Priority),
    /// Exact membership in the tag list.
    HasTag(String),
}

impl TaskPredicate {
    /// Evaluate the predicate against one task.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::OwnedBy(owner) => &task.owner_id == owner,
            Self::TextContains(term) => {
                let needle = term.to_lowercase();
                task.title.as_str().to_lowercase().contains(&needle)
                    || task
                        .description
                        .as_ref()
                        .is_some_and(|d| d.as_str().to_lowercase().contains(&needle))
            }
            Self::Completed(completed) => task.completed == *completed,
            Self::PriorityIs(priority) => task.priority == *priority,
            Self::HasTag(tag) => task.tags.contains(tag),
        }
    }
}

/// One sort key; earlier keys dominate later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortKey {
    CreatedAtDesc,
    TitleAsc,
    PriorityRankAsc,
    /// Final tie-break so equal keys still order deterministically.
    IdDesc,
}

impl TaskSortKey {
    /// Order two tasks by this key alone.
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::CreatedAtDesc => b.created_at.cmp(&a.created_at),
            Self::TitleAsc => a.title.as_str().cmp(b.title.as_str()),
            Self::PriorityRankAsc => a.priority.rank().cmp(&b.priority.rank()),
            Self::IdDesc => b.id.cmp(&a.id),
        }
    }
}

/// Owner-scoped filter and ordering handed to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSelection {
    owner: UserId,
    predicates: Vec<TaskPredicate>,
    order: Vec<TaskSortKey>,
}

impl TaskSelection {
    /// The owner every result belongs to.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// All conjuncts, starting with [`TaskPredicate::OwnedBy`].
    pub fn predicates(&self) -> &[TaskPredicate] {
        &self.predicates
    }

    /// Sort keys, most significant first.
    pub fn order(&self) -> &[TaskSortKey] {
        &self.order
    }

    /// True when every predicate holds.
    pub fn matches(&self, task: &Task) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(task))
    }

    /// Lexicographic comparison over the sort keys.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        self.order
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Filter and sort an in-memory collection.
    pub fn apply<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> Vec<Task> {
        let mut selected: Vec<Task> = tasks
            .into_iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect();
        selected.sort_by(|a, b| self.compare(a, b));
        selected
    }
}

/// Builds a [`TaskSelection`] for one verified owner.
///
/// # Examples
/// ```
/// use taskboard::domain::{Priority, TaskListQuery, TaskPredicate, TaskQueryBuilder, UserId};
///
/// let owner = UserId::new("user-1").expect("valid id");
/// let query = TaskListQuery::new(None, None, Some(Priority::High), None, None)
///     .expect("valid query");
/// let selection = TaskQueryBuilder::new(owner.clone()).with_query(&query).build();
/// assert_eq!(selection.predicates()[0], TaskPredicate::OwnedBy(owner));
/// assert_eq!(selection.predicates().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TaskQueryBuilder {
    owner: UserId,
    predicates: Vec<TaskPredicate>,
    sort: SortOrder,
}

impl TaskQueryBuilder {
    /// Start an owner-scoped selection in date order.
    pub fn new(owner: UserId) -> Self {
        Self {
            predicates: vec![TaskPredicate::OwnedBy(owner.clone())],
            owner,
            sort: SortOrder::default(),
        }
    }

    /// Add every restriction present in `query` and adopt its ordering.
    pub fn with_query(mut self, query: &TaskListQuery) -> Self {
        if let Some(term) = &query.search {
            self.predicates.push(TaskPredicate::TextContains(term.clone()));
        }
        if let Some(status) = query.status {
            self.predicates
                .push(TaskPredicate::Completed(status.completed()));
        }
        if let Some(priority) = query.priority {
            self.predicates.push(TaskPredicate::PriorityIs(priority));
        }
        if let Some(tag) = &query.tag {
            self.predicates.push(TaskPredicate::HasTag(tag.clone()));
        }
        self.sort = query.sort;
        self
    }

    /// Finish the selection, appending the id tie-break.
    pub fn build(self) -> TaskSelection {
        let order = match self.sort {
            SortOrder::Date => vec![TaskSortKey::CreatedAtDesc, TaskSortKey::IdDesc],
            SortOrder::Alpha => vec![TaskSortKey::TitleAsc, TaskSortKey::IdDesc],
            SortOrder::Priority => vec![
                TaskSortKey::PriorityRankAsc,
                TaskSortKey::CreatedAtDesc,
                TaskSortKey::IdDesc,
            ],
        };
        TaskSelection {
            owner: self.owner,
            predicates: self.predicates,
            order,
        }
    }
}
