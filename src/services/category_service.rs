use std::collections::HashMap;

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::dao::{CategoryDao, DaoBase, TaskDao},
    db::entities::category,
    error::AppError,
};

const DEFAULT_COLOR: &str = "#007bff";

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub is_active: bool,
    pub task_count: u64,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl CategoryView {
    fn build(category: category::Model, counts: &HashMap<Uuid, u64>) -> Self {
        Self {
            task_count: counts.get(&category.id).copied().unwrap_or(0),
            id: category.id,
            name: category.name,
            description: category.description,
            color: category.color,
            is_active: category.is_active,
            created_at: category.created_at,
        }
    }
}

/// Role gating (create: manager/admin, delete: admin) lives in the route
/// guards; this service assumes an already-authorized caller.
#[derive(Clone)]
pub struct CategoryService {
    category_dao: CategoryDao,
    task_dao: TaskDao,
}

impl CategoryService {
    pub fn new(category_dao: CategoryDao, task_dao: TaskDao) -> Self {
        Self {
            category_dao,
            task_dao,
        }
    }

    pub async fn list(&self) -> Result<Vec<CategoryView>, AppError> {
        let categories = self.category_dao.list_active().await?;
        let counts = self.task_dao.count_by_category().await?;
        Ok(categories
            .into_iter()
            .map(|category| CategoryView::build(category, &counts))
            .collect())
    }

    pub async fn create(&self, input: CreateCategory) -> Result<CategoryView, AppError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::bad_request("Name required"));
        }

        let model = category::ActiveModel {
            name: Set(name),
            description: Set(input.description),
            color: Set(input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string())),
            is_active: Set(true),
            ..Default::default()
        };
        let created = self.category_dao.create(model).await?;
        Ok(CategoryView::build(created, &HashMap::new()))
    }

    /// Soft delete: the category disappears from listings, tasks keep the
    /// reference.
    pub async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        let category = self
            .category_dao
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))?;

        self.category_dao
            .update(category.id, |active| {
                active.is_active = Set(false);
            })
            .await?;
        Ok(())
    }
}
