use axum::extract::State;

use crate::app::AppState;
use crate::database::models::role::{self, RoleInput};
use crate::database::models::Role;
use crate::database::select_404;
use crate::filter::Page;
use crate::handlers::list;
use crate::middleware::{ApiResponse, ApiResult, EntityId, ListParams, ValidJson};
use crate::services::RoleService;

/// GET /api/roles/search
pub async fn search(State(state): State<AppState>, ListParams(params): ListParams) -> ApiResult<Page<Role>> {
    Ok(ApiResponse::success(list::search(&state, &role::LISTING, &params).await?))
}

/// GET /api/roles/:id
pub async fn show(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Role> {
    Ok(ApiResponse::success(select_404(state.lists.as_ref(), &role::LISTING, id, "Role").await?))
}

/// POST /api/roles
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<RoleInput>) -> ApiResult<Role> {
    let id = RoleService::new(state.pool.clone()).create(&input).await?;
    Ok(ApiResponse::created(select_404(state.lists.as_ref(), &role::LISTING, id, "Role").await?))
}

/// PUT /api/roles/:id
pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(input): ValidJson<RoleInput>,
) -> ApiResult<Role> {
    RoleService::new(state.pool.clone()).update(id, &input).await?;
    Ok(ApiResponse::success(select_404(state.lists.as_ref(), &role::LISTING, id, "Role").await?))
}

/// DELETE /api/roles/:id - refused while any user holds the role
pub async fn delete(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<()> {
    RoleService::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::no_content())
}
