use sqlx::PgPool;

use crate::database::models::tag::TagInput;

use super::{count_where, ServiceError};

pub struct TagService {
    pool: PgPool,
}

impl TagService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &TagInput) -> Result<i64, ServiceError> {
        let taken: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tags WHERE lower(title) = lower($1))")
            .bind(&input.title)
            .fetch_one(&self.pool)
            .await?;
        if taken.0 {
            return Err(ServiceError::invalid("title", "The title has already been taken."));
        }

        let row: (i64,) = sqlx::query_as("INSERT INTO tags (title, created_at) VALUES ($1, NOW()) RETURNING id")
            .bind(&input.title)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Delete a tag no object carries
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let used = count_where(&self.pool, "SELECT COUNT(*) FROM object_tags WHERE tag_id = $1", id).await?;
        if used > 0 {
            return Err(ServiceError::Conflict(format!(
                "The tag is attached to {} object(s) and cannot be deleted.",
                used
            )));
        }

        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Tag not found".to_string()));
        }
        Ok(())
    }
}
