use sqlx::PgPool;

use crate::database::models::faq::FaqInput;

use super::ServiceError;

pub struct FaqService {
    pool: PgPool,
}

impl FaqService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &FaqInput) -> Result<i64, ServiceError> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO faqs (question, answer, sort_order, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) RETURNING id",
        )
        .bind(&input.question)
        .bind(&input.answer)
        .bind(input.sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    pub async fn update(&self, id: i64, input: &FaqInput) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "UPDATE faqs SET question = $2, answer = $3, sort_order = $4, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&input.question)
        .bind(&input.answer)
        .bind(input.sort_order)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("FAQ entry not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM faqs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("FAQ entry not found".to_string()));
        }
        Ok(())
    }
}
