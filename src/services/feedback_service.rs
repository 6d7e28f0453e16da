use sqlx::PgPool;

use crate::auth::Actor;
use crate::database::models::feedback::FeedbackInput;

use super::{count_where, ServiceError};

pub struct FeedbackService {
    pool: PgPool,
}

impl FeedbackService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, actor: &Actor, input: &FeedbackInput) -> Result<i64, ServiceError> {
        if count_where(&self.pool, "SELECT COUNT(*) FROM objects WHERE id = $1", input.object_id).await? == 0 {
            return Err(ServiceError::invalid("object_id", "The selected object id is invalid."));
        }
        let author = input.author_name.as_deref().unwrap_or(&actor.name);

        let row: (i64,) = sqlx::query_as(
            "INSERT INTO feedback (object_id, user_id, author_name, text, rating, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING id",
        )
        .bind(input.object_id)
        .bind(actor.id)
        .bind(author)
        .bind(&input.text)
        .bind(input.rating)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Feedback not found".to_string()));
        }
        tracing::info!("Deleted feedback {}", id);
        Ok(())
    }
}
