pub mod faq_service;
pub mod feedback_service;
pub mod object_service;
pub mod reservation_service;
pub mod role_service;
pub mod tag_service;
pub mod user_service;

pub use faq_service::FaqService;
pub use feedback_service::FeedbackService;
pub use object_service::ObjectService;
pub use reservation_service::ReservationService;
pub use role_service::RoleService;
pub use tag_service::TagService;
pub use user_service::UserService;

use sqlx::PgPool;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::error::ApiError;

/// Outcome of a rejected mutation
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A submitted field is well-formed but unacceptable (taken, dangling reference)
    #[error("{field}: {message}")]
    Invalid { field: &'static str, message: String },

    /// The request is valid but conflicts with stored state
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(err.into())
    }
}

impl ServiceError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Invalid { field, message: message.into() }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(db) => db.into(),
            ServiceError::Invalid { field, message } => ApiError::field(field, message),
            ServiceError::Conflict(message) => ApiError::unprocessable_entity(message),
            ServiceError::NotFound(message) => ApiError::not_found(message),
        }
    }
}

/// `SELECT COUNT(*)` with a single bigint parameter
pub(crate) async fn count_where(pool: &PgPool, query: &'static str, id: i64) -> Result<i64, ServiceError> {
    let count: (i64,) = sqlx::query_as(query).bind(id).fetch_one(pool).await?;
    Ok(count.0)
}
