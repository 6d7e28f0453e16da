use sqlx::PgPool;

use crate::auth::password;
use crate::database::models::user::UserUpdate;

use super::{count_where, ServiceError};

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check credentials, returning `(user_id, role_id)` on success
    pub async fn authenticate(&self, email: &str, plain: &str) -> Result<Option<(i64, i64)>, ServiceError> {
        let row: Option<(i64, i64, String)> =
            sqlx::query_as("SELECT id, role_id, password FROM users WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row
            .filter(|(_, _, hash)| password::verify_password(plain, hash))
            .map(|(id, role_id, _)| (id, role_id)))
    }

    /// Apply an administrative update; absent fields are left unchanged
    pub async fn update(&self, id: i64, input: &UserUpdate) -> Result<(), ServiceError> {
        if count_where(&self.pool, "SELECT COUNT(*) FROM users WHERE id = $1", id).await? == 0 {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        if let Some(email) = &input.email {
            let taken: (bool,) = sqlx::query_as(
                "SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1) AND id <> $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
            if taken.0 {
                return Err(ServiceError::invalid("email", "The email has already been taken."));
            }
        }

        if let Some(role_id) = input.role_id {
            if count_where(&self.pool, "SELECT COUNT(*) FROM roles WHERE id = $1", role_id).await? == 0 {
                return Err(ServiceError::invalid("role_id", "The selected role id is invalid."));
            }
        }

        let password_hash = match &input.password {
            Some(plain) => Some(password::hash_password(plain).map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                ServiceError::invalid("password", "The password could not be processed.")
            })?),
            None => None,
        };

        sqlx::query(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                phone = COALESCE($4, phone), \
                role_id = COALESCE($5, role_id), \
                password = COALESCE($6, password), \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.role_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        tracing::info!("Updated user {}", id);
        Ok(())
    }

    /// Delete a user other than the acting one, with no bookings or feedback on record
    pub async fn delete(&self, id: i64, actor_id: i64) -> Result<(), ServiceError> {
        if id == actor_id {
            return Err(ServiceError::Conflict("You cannot delete your own account.".to_string()));
        }

        let reservations = count_where(&self.pool, "SELECT COUNT(*) FROM reservations WHERE user_id = $1", id).await?;
        let feedback = count_where(&self.pool, "SELECT COUNT(*) FROM feedback WHERE user_id = $1", id).await?;
        if reservations > 0 || feedback > 0 {
            return Err(ServiceError::Conflict(format!(
                "The user has {} reservation(s) and {} feedback entry(ies) and cannot be deleted.",
                reservations, feedback
            )));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}
