use serde_json::Value;
use sqlx::PgPool;

use crate::auth::PermissionSet;
use crate::database::models::role::RoleInput;

use super::{count_where, ServiceError};

pub struct RoleService {
    pool: PgPool,
}

impl RoleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a role, returning its id
    pub async fn create(&self, input: &RoleInput) -> Result<i64, ServiceError> {
        let permissions = Self::permissions(input)?;
        self.ensure_name_free(&input.name, None).await?;

        let row: (i64,) = sqlx::query_as(
            "INSERT INTO roles (name, title, permissions, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.title)
        .bind(permissions)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created role {} ({})", row.0, input.name);
        Ok(row.0)
    }

    /// Replace a role's name, title and permission flags
    pub async fn update(&self, id: i64, input: &RoleInput) -> Result<(), ServiceError> {
        let permissions = Self::permissions(input)?;
        self.ensure_name_free(&input.name, Some(id)).await?;

        let result = sqlx::query(
            "UPDATE roles SET name = $2, title = $3, permissions = $4, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.title)
        .bind(permissions)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Role not found".to_string()));
        }
        Ok(())
    }

    /// Delete a role no user is assigned to
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let assigned = count_where(&self.pool, "SELECT COUNT(*) FROM users WHERE role_id = $1", id).await?;
        if assigned > 0 {
            return Err(ServiceError::Conflict(format!(
                "The role is assigned to {} user(s); reassign them before deleting it.",
                assigned
            )));
        }

        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Role not found".to_string()));
        }

        tracing::info!("Deleted role {}", id);
        Ok(())
    }

    /// Stored as the full vocabulary so every flag is explicit
    fn permissions(input: &RoleInput) -> Result<Value, ServiceError> {
        let set = PermissionSet::parse_flags(&input.permissions).map_err(|unknown| {
            ServiceError::invalid("permissions", format!("Unknown permissions: {}.", unknown.join(", ")))
        })?;
        Ok(Value::Object(set.to_flags()))
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i64>) -> Result<(), ServiceError> {
        let taken: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1 AND ($2::bigint IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        if taken.0 {
            return Err(ServiceError::invalid("name", "The name has already been taken."));
        }
        Ok(())
    }
}
