use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::category::{self, Entity as Category};

#[derive(Clone)]
pub struct CategoryDao {
    db: DatabaseConnection,
}

impl DaoBase for CategoryDao {
    type Entity = Category;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl CategoryDao {
    pub async fn list_active(&self) -> DaoResult<Vec<category::Model>> {
        let mut pager = self.find_iter(
            None,
            Some((category::Column::Name, Order::Asc)),
            |query| query.filter(category::Column::IsActive.eq(true)),
        );
        let mut categories = Vec::new();
        while let Some(mut response) = pager.next_page().await? {
            categories.append(&mut response.data);
        }
        Ok(categories)
    }

    pub async fn find_active_by_id(&self, id: &Uuid) -> DaoResult<Option<category::Model>> {
        let id = *id;
        self.find(1, 1, None, move |query| {
            query
                .filter(category::Column::Id.eq(id))
                .filter(category::Column::IsActive.eq(true))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> DaoResult<Vec<category::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Category::find()
            .filter(category::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }
}
