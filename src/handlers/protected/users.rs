use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::auth::Actor;
use crate::database::models::user::{self, UserUpdate};
use crate::database::models::User;
use crate::database::select_404;
use crate::error::ApiError;
use crate::filter::Page;
use crate::handlers::list;
use crate::middleware::{ApiResponse, ApiResult, EntityId, ListParams, ValidJson};
use crate::services::UserService;

/// GET /api/users/search
pub async fn search(State(state): State<AppState>, ListParams(params): ListParams) -> ApiResult<Page<User>> {
    Ok(ApiResponse::success(list::search(&state, &user::LISTING, &params).await?))
}

/// GET /api/users/:id
pub async fn show(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<User> {
    Ok(ApiResponse::success(select_404(state.lists.as_ref(), &user::LISTING, id, "User").await?))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(input): ValidJson<UserUpdate>,
) -> ApiResult<User> {
    if input.is_empty() {
        return Err(ApiError::bad_request("Nothing to update."));
    }
    UserService::new(state.pool.clone()).update(id, &input).await?;
    Ok(ApiResponse::success(select_404(state.lists.as_ref(), &user::LISTING, id, "User").await?))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    EntityId(id): EntityId,
) -> ApiResult<()> {
    UserService::new(state.pool.clone()).delete(id, actor.id).await?;
    Ok(ApiResponse::no_content())
}
