use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored as integers; round-tripped through the enums below the way user
/// roles round-trip through strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub fn as_i32(self) -> i32 {
        match self {
            TaskPriority::Low => 1,
            TaskPriority::Medium => 2,
            TaskPriority::High => 3,
            TaskPriority::Critical => 4,
        }
    }
}

impl TryFrom<i32> for TaskPriority {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskPriority::Low),
            2 => Ok(TaskPriority::Medium),
            3 => Ok(TaskPriority::High),
            4 => Ok(TaskPriority::Critical),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_i32(self) -> i32 {
        match self {
            TaskStatus::Pending => 1,
            TaskStatus::InProgress => 2,
            TaskStatus::Completed => 3,
            TaskStatus::Cancelled => 4,
        }
    }
}

impl TryFrom<i32> for TaskStatus {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskStatus::Pending),
            2 => Ok(TaskStatus::InProgress),
            3 => Ok(TaskStatus::Completed),
            4 => Ok(TaskStatus::Cancelled),
            _ => Err(()),
        }
    }
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(default_value = "")]
    pub description: String,
    pub priority: i32,
    pub status: i32,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(indexed)]
    pub created_by: Uuid,
    #[sea_orm(indexed)]
    pub assigned_to: Option<Uuid>,
    pub category_id: Option<Uuid>,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "created_by", to = "id")]
    pub creator: HasOne<super::user::Entity>,
    #[sea_orm(has_many)]
    pub comments: HasMany<super::task_comment::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::db::dao::HasCreatedAtColumn for Entity {
    fn created_at_column() -> Self::Column {
        Column::CreatedAt
    }
}

impl crate::db::dao::HasIdActiveModel for ActiveModel {
    fn set_id(&mut self, id: Uuid) {
        self.id = sea_orm::Set(id);
    }
}

impl crate::db::dao::TimestampedActiveModel for ActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone) {
        self.created_at = sea_orm::Set(ts);
    }

    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone) {
        self.updated_at = sea_orm::Set(ts);
    }
}
