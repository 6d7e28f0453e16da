use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::{PgPool, Row};

use crate::database::DatabaseError;

use super::permission::{Permission, PermissionSet};

/// The authenticated requester, with its role loaded for this request only
#[derive(Debug, Clone, Serialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: ActorRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActorRole {
    pub id: i64,
    pub name: String,
    pub permissions: PermissionSet,
}

impl Actor {
    pub fn can(&self, permission: Permission) -> bool {
        self.role.permissions.contains(permission)
    }
}

/// Turns a verified credential subject into an actor.
#[async_trait]
pub trait ActorResolver: Send + Sync {
    /// `Ok(None)` when the subject no longer exists.
    async fn resolve(&self, user_id: i64) -> Result<Option<Actor>, DatabaseError>;
}

pub struct PgActorResolver {
    pool: PgPool,
}

impl PgActorResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActorResolver for PgActorResolver {
    async fn resolve(&self, user_id: i64) -> Result<Option<Actor>, DatabaseError> {
        let query = r#"
            SELECT
                u.id, u.name, u.email,
                r.id AS role_id, r.name AS role_name, r.permissions
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let flags: Option<Value> = row.try_get("permissions")?;
        let flags = flags.and_then(|v| v.as_object().cloned()).unwrap_or_default();
        let (permissions, unknown) = PermissionSet::from_flags(&flags);
        if !unknown.is_empty() {
            tracing::warn!("User {} role carries unknown permission slugs: {:?}", user_id, unknown);
        }

        Ok(Some(Actor {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role: ActorRole {
                id: row.try_get("role_id")?,
                name: row.try_get("role_name")?,
                permissions,
            },
        }))
    }
}
