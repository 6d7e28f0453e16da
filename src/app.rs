use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{ActorResolver, PgActorResolver, Permission};
use crate::config;
use crate::database::{DatabaseManager, ListExecutor, PgListExecutor};
use crate::handlers::{protected, public};
use crate::middleware::{authorize, Guard};

/// Shared per-process state: the pool plus the two seams handlers query through
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub lists: Arc<dyn ListExecutor>,
    pub actors: Arc<dyn ActorResolver>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            lists: Arc::new(PgListExecutor::new(pool.clone())),
            actors: Arc::new(PgActorResolver::new(pool.clone())),
            pool,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/auth/login", post(public::auth::login))
        // Protected
        .merge(auth_routes(&state))
        .merge(role_routes(&state))
        .merge(user_routes(&state))
        .merge(object_routes(&state))
        .merge(reservation_routes(&state))
        .merge(faq_routes(&state))
        .merge(tag_routes(&state))
        .merge(feedback_routes(&state))
        // Global middleware
        .layer(cors_layer());

    if config::config().api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router.with_state(state)
}

/// Any authenticated actor
fn authenticated(state: &AppState, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(Guard::authenticated(state.actors.clone()), authorize))
}

/// Actors whose role grants `permission`
fn requires(state: &AppState, permission: Permission, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(Guard::require(state.actors.clone(), permission), authorize))
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    use protected::{auth, permissions};

    Router::new()
        .route("/api/auth/whoami", authenticated(state, get(auth::whoami)))
        .route("/api/permissions", requires(state, Permission::RoleRead, get(permissions::list)))
}

fn role_routes(state: &AppState) -> Router<AppState> {
    use protected::roles;

    Router::new()
        .route("/api/roles/search", requires(state, Permission::RoleRead, get(roles::search)))
        .route("/api/roles", requires(state, Permission::RoleWrite, post(roles::create)))
        .route(
            "/api/roles/:id",
            requires(state, Permission::RoleRead, get(roles::show))
                .merge(requires(state, Permission::RoleWrite, put(roles::update)))
                .merge(requires(state, Permission::RoleWrite, delete(roles::delete))),
        )
}

fn user_routes(state: &AppState) -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/api/users/search", requires(state, Permission::UserRead, get(users::search)))
        .route(
            "/api/users/:id",
            requires(state, Permission::UserRead, get(users::show))
                .merge(requires(state, Permission::UserWrite, put(users::update)))
                .merge(requires(state, Permission::UserWrite, delete(users::delete))),
        )
}

fn object_routes(state: &AppState) -> Router<AppState> {
    use protected::objects;

    Router::new()
        .route("/api/objects/search", requires(state, Permission::ObjectRead, get(objects::search)))
        .route("/api/objects", requires(state, Permission::ObjectWrite, post(objects::create)))
        .route(
            "/api/objects/:id",
            requires(state, Permission::ObjectRead, get(objects::show))
                .merge(requires(state, Permission::ObjectWrite, put(objects::update)))
                .merge(requires(state, Permission::ObjectWrite, delete(objects::delete))),
        )
}

fn reservation_routes(state: &AppState) -> Router<AppState> {
    use protected::reservations;

    Router::new()
        .route(
            "/api/reservations/search",
            requires(state, Permission::ReservationRead, get(reservations::search)),
        )
        .route("/api/reservations", authenticated(state, post(reservations::create)))
        .route(
            "/api/reservations/:id",
            requires(state, Permission::ReservationRead, get(reservations::show)),
        )
        .route(
            "/api/reservations/:id/status",
            requires(state, Permission::ReservationWrite, put(reservations::update_status)),
        )
}

fn faq_routes(state: &AppState) -> Router<AppState> {
    use protected::faqs;

    Router::new()
        .route("/api/faqs/search", authenticated(state, get(faqs::search)))
        .route("/api/faqs", requires(state, Permission::FaqWrite, post(faqs::create)))
        .route(
            "/api/faqs/:id",
            requires(state, Permission::FaqWrite, put(faqs::update))
                .merge(requires(state, Permission::FaqWrite, delete(faqs::delete))),
        )
}

fn tag_routes(state: &AppState) -> Router<AppState> {
    use protected::tags;

    Router::new()
        .route("/api/tags/search", requires(state, Permission::TagRead, get(tags::search)))
        .route("/api/tags", requires(state, Permission::TagWrite, post(tags::create)))
        .route("/api/tags/:id", requires(state, Permission::TagWrite, delete(tags::delete)))
}

fn feedback_routes(state: &AppState) -> Router<AppState> {
    use protected::feedback;

    Router::new()
        .route("/api/feedback/search", requires(state, Permission::FeedbackRead, get(feedback::search)))
        .route("/api/feedback", authenticated(state, post(feedback::create)))
        .route("/api/feedback/:id", requires(state, Permission::FeedbackWrite, delete(feedback::delete)))
}

fn cors_layer() -> CorsLayer {
    if crate::is_development!() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Sanatorium API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth/login (public), /api/auth/whoami",
            "roles": "/api/roles[/search|/:id]",
            "users": "/api/users[/search|/:id]",
            "objects": "/api/objects[/search|/:id]",
            "reservations": "/api/reservations[/search|/:id|/:id/status]",
            "faqs": "/api/faqs[/search|/:id]",
            "tags": "/api/tags[/search|/:id]",
            "feedback": "/api/feedback[/search|/:id]",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
