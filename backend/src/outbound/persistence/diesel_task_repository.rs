//! PostgreSQL-backed `TaskRepository` implementation using Diesel ORM.
//!
//! Translates a [`TaskSelection`] into one boxed query: predicates become
//! `WHERE` conjuncts and sort keys become `ORDER BY` terms in the same order,
//! so results match [`TaskSelection::apply`] over the same rows.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{
    NewTask, Tags, Task, TaskDescription, TaskId, TaskPredicate, TaskSelection, TaskSortKey,
    TaskTitle, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTaskRow, TaskChangeset, TaskRow};
use super::pool::{DbPool, PoolError};
use super::schema::tasks;

/// Diesel-backed implementation of the `TaskRepository` port.
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TaskRepositoryError {
    map_basic_pool_error(error, TaskRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TaskRepositoryError {
    map_basic_diesel_error(
        error,
        TaskRepositoryError::query,
        TaskRepositoryError::connection,
    )
}

/// Escape `ILIKE` metacharacters so the term matches literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_task(row: TaskRow) -> Result<Task, TaskRepositoryError> {
    let invalid = |field: &str| {
        warn!(task_id = row.id, field, "stored task failed validation");
        TaskRepositoryError::query(format!("stored task {} has an invalid {field}", row.id))
    };
    Ok(Task {
        id: TaskId::new(row.id),
        owner_id: UserId::new(row.user_id.as_str()).map_err(|_| invalid("user_id"))?,
        title: TaskTitle::new(row.title.as_str()).map_err(|_| invalid("title"))?,
        description: row
            .description
            .as_deref()
            .map(TaskDescription::new)
            .transpose()
            .map_err(|_| invalid("description"))?,
        completed: row.completed,
        priority: row.priority.parse().map_err(|_| invalid("priority"))?,
        tags: Tags::new(row.tags.clone()).map_err(|_| invalid("tags"))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

type BoxedTaskQuery<'a> = tasks::BoxedQuery<'a, Pg>;

fn filter_by<'a>(query: BoxedTaskQuery<'a>, predicate: &'a TaskPredicate) -> BoxedTaskQuery<'a> {
    match predicate {
        TaskPredicate::OwnedBy(owner) => query.filter(tasks::user_id.eq(owner.as_ref())),
        TaskPredicate::TextContains(term) => {
            let pattern = like_pattern(term);
            query.filter(
                tasks::title
                    .ilike(pattern.clone())
                    .or(tasks::description.ilike(pattern)),
            )
        }
        TaskPredicate::Completed(completed) => query.filter(tasks::completed.eq(*completed)),
        TaskPredicate::PriorityIs(priority) => {
            query.filter(tasks::priority.eq(priority.as_str()))
        }
        TaskPredicate::HasTag(tag) => query.filter(tasks::tags.contains(vec![tag.clone()])),
    }
}

/// Code-point title order, matching `str` ordering.
fn title_in_byte_order() -> diesel::expression::SqlLiteral<diesel::sql_types::Text> {
    diesel::dsl::sql::<diesel::sql_types::Text>(r#""tasks"."title" COLLATE "C""#)
}

fn order_by(query: BoxedTaskQuery<'_>, key: TaskSortKey) -> BoxedTaskQuery<'_> {
    match key {
        TaskSortKey::CreatedAtDesc => query.then_order_by(tasks::created_at.desc()),
        TaskSortKey::TitleAsc => query.then_order_by(title_in_byte_order().asc()),
        TaskSortKey::PriorityRankAsc => query.then_order_by(tasks::priority_rank.asc()),
        TaskSortKey::IdDesc => query.then_order_by(tasks::id.desc()),
    }
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn insert(&self, task: &NewTask) -> Result<Task, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTaskRow {
            user_id: task.owner_id.as_ref(),
            title: task.title.as_str(),
            description: task.description.as_ref().map(TaskDescription::as_str),
            completed: task.completed,
            priority: task.priority.as_str(),
            tags: task.tags.as_slice(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        };

        let stored = diesel::insert_into(tasks::table)
            .values(&row)
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_task(stored)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tasks::table
            .find(id.get())
            .select(TaskRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_task).transpose()
    }

    async fn list(&self, selection: &TaskSelection) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // The owner filter is applied unconditionally as well as via the
        // selection's own predicates.
        let scoped = tasks::table
            .filter(tasks::user_id.eq(selection.owner().as_ref()))
            .into_boxed();
        let filtered = selection.predicates().iter().fold(scoped, filter_by);
        let ordered = selection.order().iter().copied().fold(filtered, order_by);

        let rows = ordered
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_task).collect()
    }

    async fn update(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = TaskChangeset {
            title: task.title.as_str(),
            description: task.description.as_ref().map(TaskDescription::as_str),
            completed: task.completed,
            priority: task.priority.as_str(),
            tags: task.tags.as_slice(),
            updated_at: task.updated_at,
        };

        let updated = diesel::update(tasks::table.find(task.id.get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(TaskRepositoryError::query(format!(
                "task {} vanished before update",
                task.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(tasks::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{DateTime, Utc};
    use diesel::debug_query;
    use rstest::rstest;

    use crate::domain::{Priority, SortOrder, StatusFilter, TaskListQuery, TaskQueryBuilder};

    fn stamp() -> DateTime<Utc> {
        DateTime::from_timestamp(1_767_225_600, 0).expect("valid timestamp")
    }

    fn row() -> TaskRow {
        TaskRow {
            id: 12,
            user_id: "owner-1".to_owned(),
            title: "Buy milk".to_owned(),
            description: None,
            completed: false,
            priority: "high".to_owned(),
            tags: vec!["errand".to_owned()],
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    #[rstest]
    #[case("milk", "%milk%")]
    #[case("100%", "%100\\%%")]
    #[case("snake_case", "%snake\\_case%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_patterns_escape_metacharacters(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(term), expected);
    }

    #[rstest]
    fn converts_valid_rows() {
        let task = row_to_task(row()).expect("valid row");

        assert_eq!(task.id, TaskId::new(12));
        assert_eq!(task.priority, Priority::High);
        assert!(task.tags.contains("errand"));
    }

    #[rstest]
    fn rejects_rows_with_unknown_priority() {
        let mut bad = row();
        bad.priority = "urgent".to_owned();

        let error = row_to_task(bad).expect_err("invalid priority");

        assert!(error.to_string().contains("priority"));
    }

    #[rstest]
    fn list_sql_combines_filters_and_priority_order() {
        let owner = UserId::new("owner-1").expect("valid owner");
        let query = TaskListQuery::new(
            Some("milk".to_owned()),
            Some(StatusFilter::Pending),
            Some(Priority::High),
            Some("errand".to_owned()),
            Some(SortOrder::Priority),
        )
        .expect("valid query");
        let selection = TaskQueryBuilder::new(owner.clone())
            .with_query(&query)
            .build();

        let scoped = tasks::table
            .filter(tasks::user_id.eq(owner.as_ref()))
            .into_boxed();
        let filtered = selection.predicates().iter().fold(scoped, filter_by);
        let ordered = selection.order().iter().copied().fold(filtered, order_by);
        let sql = debug_query::<Pg, _>(&ordered.select(TaskRow::as_select())).to_string();

        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("@>"));
        let order = sql.split("ORDER BY").nth(1).expect("order clause");
        let rank = order.find("priority_rank").expect("rank key");
        let created = order.find("created_at").expect("created key");
        let id = order.find("\"id\"").expect("id key");
        assert!(rank < created && created < id);
    }

    #[rstest]
    fn alpha_order_collates_only_in_order_by() {
        let owner = UserId::new("owner-1").expect("valid owner");
        let query = TaskListQuery::new(
            Some("éclair".to_owned()),
            None,
            None,
            None,
            Some(SortOrder::Alpha),
        )
        .expect("valid query");
        let selection = TaskQueryBuilder::new(owner.clone())
            .with_query(&query)
            .build();

        let scoped = tasks::table
            .filter(tasks::user_id.eq(owner.as_ref()))
            .into_boxed();
        let filtered = selection.predicates().iter().fold(scoped, filter_by);
        let ordered = selection.order().iter().copied().fold(filtered, order_by);
        let sql = debug_query::<Pg, _>(&ordered.select(TaskRow::as_select())).to_string();

        let (filter, order) = sql.split_once("ORDER BY").expect("order clause");
        assert!(filter.contains("ILIKE"));
        assert!(!filter.contains("COLLATE"));
        assert!(order.contains(r#""tasks"."title" COLLATE "C""#));
    }
}
