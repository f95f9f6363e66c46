use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    // The caller-facing message stays generic; the DbErr itself goes to the
    // logs when this converts into an AppError.
    #[error("database operation failed. Please check the logs for more details")]
    Db(#[source] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;
