use sqlx::{PgPool, Postgres, Transaction};

use crate::database::models::object::ObjectInput;

use super::{count_where, ServiceError};

pub struct ObjectService {
    pool: PgPool,
}

impl ObjectService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &ObjectInput) -> Result<i64, ServiceError> {
        let tag_ids = self.checked_tags(input).await?;
        let mut tx = self.pool.begin().await?;

        let row: (i64,) = sqlx::query_as(
            "INSERT INTO objects (title, city, address, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.city)
        .bind(&input.address)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(tag_ids) = tag_ids {
            Self::sync_tags(&mut tx, row.0, &tag_ids).await?;
        }
        tx.commit().await?;

        tracing::info!("Created object {} ({})", row.0, input.title);
        Ok(row.0)
    }

    pub async fn update(&self, id: i64, input: &ObjectInput) -> Result<(), ServiceError> {
        let tag_ids = self.checked_tags(input).await?;
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE objects SET title = $2, city = $3, address = $4, description = $5, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.city)
        .bind(&input.address)
        .bind(&input.description)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Object not found".to_string()));
        }

        if let Some(tag_ids) = tag_ids {
            Self::sync_tags(&mut tx, id, &tag_ids).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Delete an object that has never been booked, with its tags and feedback
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let booked = count_where(&self.pool, "SELECT COUNT(*) FROM reservations WHERE object_id = $1", id).await?;
        if booked > 0 {
            return Err(ServiceError::Conflict(format!(
                "The object has {} reservation(s) and cannot be deleted.",
                booked
            )));
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM object_tags WHERE object_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM feedback WHERE object_id = $1").bind(id).execute(&mut *tx).await?;
        let result = sqlx::query("DELETE FROM objects WHERE id = $1").bind(id).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Object not found".to_string()));
        }
        tx.commit().await?;

        tracing::info!("Deleted object {}", id);
        Ok(())
    }

    /// Deduplicated tag ids, all of which must exist
    async fn checked_tags(&self, input: &ObjectInput) -> Result<Option<Vec<i64>>, ServiceError> {
        let Some(tag_ids) = &input.tag_ids else {
            return Ok(None);
        };
        let mut ids = tag_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(Some(ids));
        }

        let found: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_one(&self.pool)
            .await?;
        if found.0 != ids.len() as i64 {
            return Err(ServiceError::invalid("tag_ids", "The selected tag ids are invalid."));
        }
        Ok(Some(ids))
    }

    async fn sync_tags(tx: &mut Transaction<'_, Postgres>, object_id: i64, tag_ids: &[i64]) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM object_tags WHERE object_id = $1")
            .bind(object_id)
            .execute(&mut **tx)
            .await?;
        if !tag_ids.is_empty() {
            sqlx::query("INSERT INTO object_tags (object_id, tag_id) SELECT $1, UNNEST($2::bigint[])")
                .bind(object_id)
                .bind(tag_ids)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}
