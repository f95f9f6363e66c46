use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::refresh_token::{self, Entity as RefreshToken};

/// Persistence for refresh-token rows: the ledger behind session rotation
/// and revocation. Rows are only ever inserted or flipped to revoked.
#[derive(Clone)]
pub struct RefreshTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RefreshTokenDao {
    type Entity = RefreshToken;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RefreshTokenDao {
    /// Insert a fresh non-revoked, non-used row. Takes an explicit
    /// connection so issuance can share a transaction with the user write.
    pub async fn record<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &Uuid,
        jti: &Uuid,
        token: &str,
        expires_at: chrono::DateTime<chrono::FixedOffset>,
    ) -> DaoResult<refresh_token::Model> {
        let now = Utc::now().fixed_offset();
        let model = refresh_token::ActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(token.to_string()),
            jti: Set(*jti),
            user_id: Set(*user_id),
            expires_at: Set(expires_at),
            used: Set(false),
            revoked: Set(false),
            revoked_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(conn).await.map_err(DaoLayerError::Db)
    }

    /// A row matches only when the opaque value AND the jti line up; a
    /// refresh token is bound to exactly one access-token lineage. Revoked
    /// rows never match. Expiry is the caller's branch.
    pub async fn find_active(
        &self,
        token: &str,
        jti: &Uuid,
    ) -> DaoResult<Option<refresh_token::Model>> {
        let token = token.to_string();
        let jti = *jti;
        self.find(1, 1, None, move |query| {
            query
                .filter(refresh_token::Column::Token.eq(token))
                .filter(refresh_token::Column::Jti.eq(jti))
                .filter(refresh_token::Column::Revoked.eq(false))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// Consume a row during rotation. Returns how many rows flipped: zero
    /// means another rotation already won the race. The statement itself is
    /// idempotent and safe to retry.
    pub async fn revoke<C: ConnectionTrait>(&self, conn: &C, token: &str) -> DaoResult<u64> {
        let now = Utc::now().fixed_offset();
        let result = RefreshToken::update_many()
            .col_expr(refresh_token::Column::Revoked, Expr::value(true))
            .col_expr(refresh_token::Column::Used, Expr::value(true))
            .col_expr(refresh_token::Column::RevokedAt, Expr::value(now))
            .col_expr(refresh_token::Column::UpdatedAt, Expr::value(now))
            .filter(refresh_token::Column::Token.eq(token))
            .filter(refresh_token::Column::Revoked.eq(false))
            .exec(conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    /// Bulk revocation: one session when a jti is given (logout), every
    /// session otherwise (revoke-all, password change).
    pub async fn revoke_all_for_user(
        &self,
        user_id: &Uuid,
        jti: Option<&Uuid>,
    ) -> DaoResult<u64> {
        let now = Utc::now().fixed_offset();
        let mut update = RefreshToken::update_many()
            .col_expr(refresh_token::Column::Revoked, Expr::value(true))
            .col_expr(refresh_token::Column::RevokedAt, Expr::value(now))
            .col_expr(refresh_token::Column::UpdatedAt, Expr::value(now))
            .filter(refresh_token::Column::UserId.eq(*user_id))
            .filter(refresh_token::Column::Revoked.eq(false));

        if let Some(jti) = jti {
            update = update.filter(refresh_token::Column::Jti.eq(*jti));
        }

        let result = update.exec(&self.db).await.map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
