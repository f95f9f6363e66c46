use sea_orm::entity::prelude::*;

/// Ledger row backing one issued access/refresh pair. Rows are never
/// deleted: expiry is enforced at validation time and revocation is one-way.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "refresh_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub token: String,
    // Access-token id this row is bound to. Indexed but deliberately not
    // unique; the pairing invariant lives in the rotation logic.
    #[sea_orm(indexed)]
    pub jti: Uuid,
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    pub expires_at: DateTimeWithTimeZone,
    #[sea_orm(default_value = false)]
    pub used: bool,
    #[sea_orm(default_value = false)]
    pub revoked: bool,
    pub revoked_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
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
