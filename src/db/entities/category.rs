use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(default_value = "#007bff")]
    pub color: String,
    // Category deletion is soft; tasks keep their category_id.
    #[sea_orm(default_value = true)]
    pub is_active: bool,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
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
