use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{gate, validate_jwt, Actor, ActorResolver, Permission};
use crate::error::ApiError;

/// Per-route gate configuration: who resolves actors, and what the route requires
#[derive(Clone)]
pub struct Guard {
    actors: Arc<dyn ActorResolver>,
    permission: Option<Permission>,
}

impl Guard {
    /// Any authenticated actor passes
    pub fn authenticated(actors: Arc<dyn ActorResolver>) -> Self {
        Self { actors, permission: None }
    }

    /// Only actors whose role grants `permission` pass
    pub fn require(actors: Arc<dyn ActorResolver>, permission: Permission) -> Self {
        Self { actors, permission: Some(permission) }
    }

    pub fn permission(&self) -> Option<Permission> {
        self.permission
    }
}

/// Resolve the bearer credential, run the gate once, and hand the actor to the
/// handler through request extensions. Rejections end the request here.
pub async fn authorize(
    State(guard): State<Guard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let actor = resolve_actor(&guard, request.headers()).await?;

    if let Err(err) = gate::authorize(actor.as_ref(), guard.permission) {
        match &actor {
            Some(actor) => tracing::warn!(
                "Denied {} {} to user {} (role {}): {}",
                request.method(),
                request.uri().path(),
                actor.id,
                actor.role.name,
                err
            ),
            None => tracing::debug!("Unauthenticated {} {}", request.method(), request.uri().path()),
        }
        return Err(err.into());
    }

    if let Some(actor) = actor {
        request.extensions_mut().insert(actor);
    }
    Ok(next.run(request).await)
}

/// A missing, malformed or expired credential yields no actor rather than an
/// error; the gate turns that into 401. Only store failures propagate.
async fn resolve_actor(guard: &Guard, headers: &HeaderMap) -> Result<Option<Actor>, ApiError> {
    let token = match extract_jwt_from_headers(headers) {
        Ok(token) => token,
        Err(msg) => {
            tracing::debug!("No usable credential: {}", msg);
            return Ok(None);
        }
    };

    let claims = match validate_jwt(&token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!("Rejected credential: {}", err);
            return Ok(None);
        }
    };

    let actor = guard.actors.resolve(claims.sub).await?;
    if actor.is_none() {
        tracing::debug!("Credential subject {} no longer exists", claims.sub);
    }
    Ok(actor)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
