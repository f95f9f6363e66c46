use std::collections::HashMap;

use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryFilter, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::{ColumnFilter, DaoBase, DaoLayerError, DaoResult, PaginatedResponse};
use crate::db::entities::prelude::{Task, TaskComment};
use crate::db::entities::task::{self, TaskPriority, TaskStatus};
use crate::db::entities::task_comment;

#[derive(Debug, Default, serde::Serialize)]
pub struct TaskStats {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub overdue: u64,
    pub due_soon: u64,
    pub high_priority: u64,
    pub critical_priority: u64,
    pub completion_rate: f64,
}

#[derive(Clone)]
pub struct TaskDao {
    db: DatabaseConnection,
}

impl DaoBase for TaskDao {
    type Entity = Task;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Clone)]
struct TaskCommentDao {
    db: DatabaseConnection,
}

impl DaoBase for TaskCommentDao {
    type Entity = TaskComment;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TaskDao {
    fn comment_dao(&self) -> TaskCommentDao {
        TaskCommentDao::new(&self.db)
    }

    fn scoped(&self, scope: &Option<Condition>) -> Select<Task> {
        let mut query = Task::find();
        if let Some(scope) = scope {
            query = query.filter(scope.clone());
        }
        query
    }

    /// Page of tasks the scope condition admits, narrowed by the column
    /// filters and an optional title/description search.
    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(task::Column, Order)>,
        scope: Option<Condition>,
        filters: &[ColumnFilter<task::Column>],
        search: Option<&str>,
    ) -> DaoResult<PaginatedResponse<task::Model>> {
        let search = search.map(|term| term.to_string());
        self.find_with_filters(page, page_size, order, filters, move |query| {
            let query = match scope {
                Some(scope) => query.filter(scope),
                None => query,
            };
            match search {
                Some(term) => query.filter(
                    Condition::any()
                        .add(task::Column::Title.contains(&term))
                        .add(task::Column::Description.contains(&term)),
                ),
                None => query,
            }
        })
        .await
    }

    /// The scope is part of the lookup: a task outside it is
    /// indistinguishable from a task that does not exist.
    pub async fn find_scoped_by_id(
        &self,
        id: &Uuid,
        scope: Option<Condition>,
    ) -> DaoResult<Option<task::Model>> {
        let id = *id;
        self.find(1, 1, None, move |query| {
            let query = query.filter(task::Column::Id.eq(id));
            match scope {
                Some(scope) => query.filter(scope),
                None => query,
            }
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn stats(&self, scope: Option<Condition>) -> DaoResult<TaskStats> {
        let now = Utc::now().fixed_offset();
        let soon = now + Duration::days(2);
        let completed = TaskStatus::Completed.as_i32();

        let total = self.count(self.scoped(&scope)).await?;
        let pending = self
            .count(
                self.scoped(&scope)
                    .filter(task::Column::Status.eq(TaskStatus::Pending.as_i32())),
            )
            .await?;
        let in_progress = self
            .count(
                self.scoped(&scope)
                    .filter(task::Column::Status.eq(TaskStatus::InProgress.as_i32())),
            )
            .await?;
        let completed_count = self
            .count(self.scoped(&scope).filter(task::Column::Status.eq(completed)))
            .await?;
        let overdue = self
            .count(
                self.scoped(&scope)
                    .filter(task::Column::DueDate.lt(now))
                    .filter(task::Column::Status.ne(completed)),
            )
            .await?;
        let due_soon = self
            .count(
                self.scoped(&scope)
                    .filter(task::Column::DueDate.lte(soon))
                    .filter(task::Column::Status.ne(completed)),
            )
            .await?;
        let high_priority = self
            .count(
                self.scoped(&scope)
                    .filter(task::Column::Priority.eq(TaskPriority::High.as_i32()))
                    .filter(task::Column::Status.ne(completed)),
            )
            .await?;
        let critical_priority = self
            .count(
                self.scoped(&scope)
                    .filter(task::Column::Priority.eq(TaskPriority::Critical.as_i32()))
                    .filter(task::Column::Status.ne(completed)),
            )
            .await?;

        let completion_rate = if total > 0 {
            completed_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Ok(TaskStats {
            total,
            pending,
            in_progress,
            completed: completed_count,
            overdue,
            due_soon,
            high_priority,
            critical_priority,
            completion_rate,
        })
    }

    async fn count(&self, query: Select<Task>) -> DaoResult<u64> {
        query.count(&self.db).await.map_err(DaoLayerError::Db)
    }

    /// Task totals per category, for category listings.
    pub async fn count_by_category(&self) -> DaoResult<HashMap<Uuid, u64>> {
        #[derive(Debug, FromQueryResult)]
        struct CategoryCount {
            category_id: Option<Uuid>,
            count: i64,
        }

        let rows = Task::find()
            .select_only()
            .column(task::Column::CategoryId)
            .column_as(task::Column::Id.count(), "count")
            .group_by(task::Column::CategoryId)
            .into_model::<CategoryCount>()
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.category_id.map(|id| (id, row.count.max(0) as u64)))
            .collect())
    }

    pub async fn list_comments(&self, task_id: &Uuid) -> DaoResult<Vec<task_comment::Model>> {
        let task_id = *task_id;
        let mut pager = self.comment_dao().find_iter(
            None,
            Some((task_comment::Column::CreatedAt, Order::Asc)),
            move |query| query.filter(task_comment::Column::TaskId.eq(task_id)),
        );
        let mut comments = Vec::new();
        while let Some(mut response) = pager.next_page().await? {
            comments.append(&mut response.data);
        }
        Ok(comments)
    }

    pub async fn create_comment(
        &self,
        task_id: &Uuid,
        user_id: &Uuid,
        content: &str,
    ) -> DaoResult<task_comment::Model> {
        let model = task_comment::ActiveModel {
            task_id: Set(*task_id),
            user_id: Set(*user_id),
            content: Set(content.to_string()),
            ..Default::default()
        };
        self.comment_dao().create(model).await
    }

    pub async fn find_comment_by_id(
        &self,
        comment_id: &Uuid,
    ) -> DaoResult<Option<task_comment::Model>> {
        match self.comment_dao().find_by_id(*comment_id).await {
            Ok(model) => Ok(Some(model)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn delete_comment(&self, comment_id: &Uuid) -> DaoResult<()> {
        self.comment_dao().delete(*comment_id).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{ColumnTrait, Condition, DatabaseBackend, DbErr, MockDatabase};
    use uuid::Uuid;

    use crate::db::dao::{ColumnFilter, DaoBase, DaoLayerError, FilterOp};
    use crate::db::entities::{task, task_comment};

    use super::TaskDao;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn task_model(id: Uuid, created_by: Uuid, title: &str) -> task::Model {
        let now = ts();
        task::Model {
            id,
            title: title.to_string(),
            description: String::new(),
            priority: 2,
            status: 1,
            due_date: None,
            completed_at: None,
            created_by,
            assigned_to: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn list_applies_filters_and_returns_page() {
        let creator = Uuid::new_v4();
        let task_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[task_model(task_id, creator, "Ship the report")]])
            .into_connection();
        let dao = TaskDao::new(&db);

        let filters = [ColumnFilter {
            column: task::Column::Status,
            op: FilterOp::Eq(1.into()),
        }];
        let scope = Condition::any()
            .add(task::Column::CreatedBy.eq(creator))
            .add(task::Column::AssignedTo.eq(creator));
        let page = dao
            .list(1, 20, None, Some(scope), &filters, Some("report"))
            .await
            .expect("query should succeed");

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, task_id);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn find_scoped_by_id_returns_none_outside_scope() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<task::Model>::new()])
            .into_connection();
        let dao = TaskDao::new(&db);

        let scope = Condition::all().add(task::Column::CreatedBy.eq(Uuid::new_v4()));
        let result = dao
            .find_scoped_by_id(&Uuid::new_v4(), Some(scope))
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn find_comment_by_id_maps_not_found_to_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<task_comment::Model>::new()])
            .into_connection();
        let dao = TaskDao::new(&db);

        let result = dao
            .find_comment_by_id(&Uuid::new_v4())
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn stats_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("count failed".to_string())])
            .into_connection();
        let dao = TaskDao::new(&db);

        let err = dao.stats(None).await.expect_err("count should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
