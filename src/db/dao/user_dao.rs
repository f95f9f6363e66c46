use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::User;
use crate::db::entities::user;

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    /// Any user, active or not. The registration email-taken check must see
    /// deactivated accounts too.
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(user::Column::Email.eq(email))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn find_active_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find(1, 1, None, move |query| {
            query
                .filter(user::Column::Email.eq(email))
                .filter(user::Column::IsActive.eq(true))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn find_active_by_id(&self, id: &Uuid) -> DaoResult<Option<user::Model>> {
        let id = *id;
        self.find(1, 1, None, move |query| {
            query
                .filter(user::Column::Id.eq(id))
                .filter(user::Column::IsActive.eq(true))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// Insert on an explicit connection so registration can share a
    /// transaction with the ledger write.
    pub async fn insert_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> DaoResult<user::Model> {
        let now = Utc::now().fixed_offset();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };
        model.insert(conn).await.map_err(DaoLayerError::Db)
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> DaoResult<user::Model> {
        self.insert_user(&self.db, name, email, password_hash, role)
            .await
    }

    /// Single-statement stamp, transaction-aware for the login flow.
    pub async fn stamp_last_login<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &Uuid,
        at: &chrono::DateTime<chrono::FixedOffset>,
    ) -> DaoResult<()> {
        User::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(*at))
            .col_expr(user::Column::UpdatedAt, Expr::value(*at))
            .filter(user::Column::Id.eq(*id))
            .exec(conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(())
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> DaoResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        User::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }
}
