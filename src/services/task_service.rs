use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::{Order, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{Principal, access},
    db::dao::{
        CategoryDao, ColumnFilter, CompareOp, DaoBase, FilterOp, PaginatedResponse, TaskDao,
        TaskStats, UserDao,
    },
    db::entities::task::{self, TaskPriority, TaskStatus},
    db::entities::{category, task_comment, user},
    error::AppError,
};

/// Query parameters for task listing. Everything is optional; scope is
/// derived from the principal, never from the request.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub due_from: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub due_to: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_desc: bool,
    pub page: u64,
    pub page_size: u64,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            category_id: None,
            assigned_to: None,
            due_from: None,
            due_to: None,
            search: None,
            sort_by: None,
            sort_desc: false,
            page: 1,
            page_size: 20,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub due_date: Option<chrono::DateTime<chrono::FixedOffset>>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

/// Full replacement, like the form it backs. Omitted nullable fields clear
/// their column.
#[derive(Debug, Deserialize)]
pub struct UpdateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<chrono::DateTime<chrono::FixedOffset>>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub completed_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub updated_at: chrono::DateTime<chrono::FixedOffset>,
    pub created_by: Uuid,
    pub created_by_name: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub assigned_to_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

impl TaskView {
    fn build(
        task: task::Model,
        users: &HashMap<Uuid, user::Model>,
        categories: &HashMap<Uuid, category::Model>,
    ) -> Self {
        let category = task.category_id.and_then(|id| categories.get(&id));
        Self {
            id: task.id,
            priority: TaskPriority::try_from(task.priority).unwrap_or(TaskPriority::Medium),
            status: TaskStatus::try_from(task.status).unwrap_or(TaskStatus::Pending),
            due_date: task.due_date,
            completed_at: task.completed_at,
            created_at: task.created_at,
            updated_at: task.updated_at,
            created_by: task.created_by,
            created_by_name: users.get(&task.created_by).map(|u| u.name.clone()),
            assigned_to: task.assigned_to,
            assigned_to_name: task
                .assigned_to
                .and_then(|id| users.get(&id))
                .map(|u| u.name.clone()),
            category_id: task.category_id,
            category_name: category.map(|c| c.name.clone()),
            category_color: category.map(|c| c.color.clone()),
            title: task.title,
            description: task.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl CommentView {
    fn build(comment: task_comment::Model, users: &HashMap<Uuid, user::Model>) -> Self {
        Self {
            id: comment.id,
            task_id: comment.task_id,
            user_id: comment.user_id,
            user_name: users.get(&comment.user_id).map(|u| u.name.clone()),
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

#[derive(Clone)]
pub struct TaskService {
    task_dao: TaskDao,
    user_dao: UserDao,
    category_dao: CategoryDao,
}

impl TaskService {
    pub fn new(task_dao: TaskDao, user_dao: UserDao, category_dao: CategoryDao) -> Self {
        Self {
            task_dao,
            user_dao,
            category_dao,
        }
    }

    pub async fn list(
        &self,
        principal: &Principal,
        filter: &TaskFilter,
    ) -> Result<PaginatedResponse<TaskView>, AppError> {
        let scope = access::task_scope(principal);
        let page = self
            .task_dao
            .list(
                filter.page,
                filter.page_size,
                Some(sort_order(filter)),
                scope,
                &column_filters(filter),
                filter.search.as_deref(),
            )
            .await?;

        let data = self.to_views(page.data).await?;
        Ok(PaginatedResponse {
            data,
            page: page.page,
            page_size: page.page_size,
            has_next: page.has_next,
            total: page.total,
        })
    }

    pub async fn get(&self, principal: &Principal, id: &Uuid) -> Result<TaskView, AppError> {
        let scope = access::task_scope(principal);
        let task = self
            .task_dao
            .find_scoped_by_id(id, scope)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;
        self.to_view(task).await
    }

    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateTask,
    ) -> Result<TaskView, AppError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::bad_request("Title required"));
        }

        let model = task::ActiveModel {
            title: Set(title),
            description: Set(input.description),
            priority: Set(input.priority.unwrap_or(TaskPriority::Medium).as_i32()),
            status: Set(TaskStatus::Pending.as_i32()),
            due_date: Set(input.due_date),
            completed_at: Set(None),
            created_by: Set(principal.user_id),
            assigned_to: Set(input.assigned_to),
            category_id: Set(input.category_id),
            ..Default::default()
        };
        let task = self.task_dao.create(model).await?;
        self.to_view(task).await
    }

    /// A task the principal may not touch is reported exactly like a task
    /// that does not exist.
    pub async fn update(
        &self,
        principal: &Principal,
        id: &Uuid,
        input: UpdateTask,
    ) -> Result<TaskView, AppError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::bad_request("Title required"));
        }

        let task = self
            .task_dao
            .find_scoped_by_id(id, None)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;
        if !access::can_modify_task(principal, &task) {
            return Err(AppError::not_found("Task not found"));
        }

        let was_completed = task.status == TaskStatus::Completed.as_i32();
        let becomes_completed = input.status == TaskStatus::Completed;
        let now = Utc::now().fixed_offset();

        let updated = self
            .task_dao
            .update(task.id, move |active| {
                active.title = Set(title);
                active.description = Set(input.description);
                active.priority = Set(input.priority.as_i32());
                active.status = Set(input.status.as_i32());
                active.due_date = Set(input.due_date);
                active.assigned_to = Set(input.assigned_to);
                active.category_id = Set(input.category_id);
                if becomes_completed && !was_completed {
                    active.completed_at = Set(Some(now));
                } else if was_completed && !becomes_completed {
                    active.completed_at = Set(None);
                }
            })
            .await?;
        self.to_view(updated).await
    }

    pub async fn delete(&self, principal: &Principal, id: &Uuid) -> Result<(), AppError> {
        let task = self
            .task_dao
            .find_scoped_by_id(id, None)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;
        if !access::can_delete_task(principal, &task) {
            return Err(AppError::not_found("Task not found"));
        }

        self.task_dao.delete(task.id).await?;
        Ok(())
    }

    pub async fn complete(&self, principal: &Principal, id: &Uuid) -> Result<TaskView, AppError> {
        let task = self
            .task_dao
            .find_scoped_by_id(id, None)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;
        if !access::can_modify_task(principal, &task) {
            return Err(AppError::not_found("Task not found"));
        }

        let now = Utc::now().fixed_offset();
        let updated = self
            .task_dao
            .update(task.id, move |active| {
                active.status = Set(TaskStatus::Completed.as_i32());
                active.completed_at = Set(Some(now));
            })
            .await?;
        self.to_view(updated).await
    }

    pub async fn stats(&self, principal: &Principal) -> Result<TaskStats, AppError> {
        Ok(self.task_dao.stats(access::task_scope(principal)).await?)
    }

    pub async fn list_comments(
        &self,
        principal: &Principal,
        task_id: &Uuid,
    ) -> Result<Vec<CommentView>, AppError> {
        let scope = access::task_scope(principal);
        let task = self
            .task_dao
            .find_scoped_by_id(task_id, scope)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        let comments = self.task_dao.list_comments(&task.id).await?;
        let user_ids: Vec<Uuid> = comments
            .iter()
            .map(|c| c.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let users = self.users_by_id(&user_ids).await?;
        Ok(comments
            .into_iter()
            .map(|comment| CommentView::build(comment, &users))
            .collect())
    }

    pub async fn add_comment(
        &self,
        principal: &Principal,
        task_id: &Uuid,
        content: &str,
    ) -> Result<CommentView, AppError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::bad_request("Comment required"));
        }

        let scope = access::task_scope(principal);
        let task = self
            .task_dao
            .find_scoped_by_id(task_id, scope)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        let comment = self
            .task_dao
            .create_comment(&task.id, &principal.user_id, content)
            .await?;
        let users = self.users_by_id(&[principal.user_id]).await?;
        Ok(CommentView::build(comment, &users))
    }

    pub async fn delete_comment(
        &self,
        principal: &Principal,
        comment_id: &Uuid,
    ) -> Result<(), AppError> {
        let comment = self
            .task_dao
            .find_comment_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))?;
        if !access::can_delete_comment(principal, &comment) {
            return Err(AppError::not_found("Comment not found"));
        }

        self.task_dao.delete_comment(&comment.id).await?;
        Ok(())
    }

    async fn to_view(&self, task: task::Model) -> Result<TaskView, AppError> {
        let mut views = self.to_views(vec![task]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::internal("task view construction failed"))
    }

    async fn to_views(&self, tasks: Vec<task::Model>) -> Result<Vec<TaskView>, AppError> {
        let user_ids: Vec<Uuid> = tasks
            .iter()
            .flat_map(|t| [Some(t.created_by), t.assigned_to])
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let category_ids: Vec<Uuid> = tasks
            .iter()
            .filter_map(|t| t.category_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let users = self.users_by_id(&user_ids).await?;
        let categories: HashMap<Uuid, category::Model> = self
            .category_dao
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(tasks
            .into_iter()
            .map(|task| TaskView::build(task, &users, &categories))
            .collect())
    }

    async fn users_by_id(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, user::Model>, AppError> {
        Ok(self
            .user_dao
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }
}

fn sort_order(filter: &TaskFilter) -> (task::Column, Order) {
    let column = match filter.sort_by.as_deref() {
        Some("title") => task::Column::Title,
        Some("priority") => task::Column::Priority,
        Some("status") => task::Column::Status,
        Some("due_date") => task::Column::DueDate,
        _ => task::Column::CreatedAt,
    };
    let order = if filter.sort_desc {
        Order::Desc
    } else {
        Order::Asc
    };
    (column, order)
}

fn column_filters(filter: &TaskFilter) -> Vec<ColumnFilter<task::Column>> {
    let mut filters = Vec::new();
    if let Some(status) = filter.status {
        filters.push(ColumnFilter {
            column: task::Column::Status,
            op: FilterOp::Eq(status.as_i32().into()),
        });
    }
    if let Some(priority) = filter.priority {
        filters.push(ColumnFilter {
            column: task::Column::Priority,
            op: FilterOp::Eq(priority.as_i32().into()),
        });
    }
    if let Some(category_id) = filter.category_id {
        filters.push(ColumnFilter {
            column: task::Column::CategoryId,
            op: FilterOp::Eq(category_id.into()),
        });
    }
    if let Some(assigned_to) = filter.assigned_to {
        filters.push(ColumnFilter {
            column: task::Column::AssignedTo,
            op: FilterOp::Eq(assigned_to.into()),
        });
    }
    if let Some(due_from) = filter.due_from {
        filters.push(ColumnFilter {
            column: task::Column::DueDate,
            op: FilterOp::Compare {
                op: CompareOp::Gte,
                value: due_from.into(),
            },
        });
    }
    if let Some(due_to) = filter.due_to {
        filters.push(ColumnFilter {
            column: task::Column::DueDate,
            op: FilterOp::Compare {
                op: CompareOp::Lte,
                value: due_to.into(),
            },
        });
    }
    filters
}
