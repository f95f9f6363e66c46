pub mod base;
pub mod base_traits;
pub mod category_dao;
mod context;
pub mod error;
pub mod refresh_token_dao;
pub mod task_dao;
pub mod user_dao;

pub use base::{ColumnFilter, CompareOp, DaoBase, DaoPager, FilterOp, PaginatedResponse};
pub use base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
pub use category_dao::CategoryDao;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use refresh_token_dao::RefreshTokenDao;
pub use task_dao::{TaskDao, TaskStats};
pub use user_dao::UserDao;
