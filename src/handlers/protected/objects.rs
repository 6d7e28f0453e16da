use axum::extract::State;

use crate::app::AppState;
use crate::database::models::object::{self, ObjectInput};
use crate::database::models::Object;
use crate::database::select_404;
use crate::filter::Page;
use crate::handlers::list;
use crate::middleware::{ApiResponse, ApiResult, EntityId, ListParams, ValidJson};
use crate::services::ObjectService;

/// GET /api/objects/search
pub async fn search(State(state): State<AppState>, ListParams(params): ListParams) -> ApiResult<Page<Object>> {
    Ok(ApiResponse::success(list::search(&state, &object::LISTING, &params).await?))
}

/// GET /api/objects/:id
pub async fn show(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Object> {
    Ok(ApiResponse::success(select_404(state.lists.as_ref(), &object::LISTING, id, "Object").await?))
}

/// POST /api/objects
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<ObjectInput>) -> ApiResult<Object> {
    let id = ObjectService::new(state.pool.clone()).create(&input).await?;
    Ok(ApiResponse::created(select_404(state.lists.as_ref(), &object::LISTING, id, "Object").await?))
}

/// PUT /api/objects/:id
pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(input): ValidJson<ObjectInput>,
) -> ApiResult<Object> {
    ObjectService::new(state.pool.clone()).update(id, &input).await?;
    Ok(ApiResponse::success(select_404(state.lists.as_ref(), &object::LISTING, id, "Object").await?))
}

/// DELETE /api/objects/:id
pub async fn delete(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<()> {
    ObjectService::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::no_content())
}
