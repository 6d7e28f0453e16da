use axum::extract::State;

use crate::app::AppState;
use crate::database::models::tag::{self, TagInput};
use crate::database::models::Tag;
use crate::database::select_404;
use crate::filter::Page;
use crate::handlers::list;
use crate::middleware::{ApiResponse, ApiResult, EntityId, ListParams, ValidJson};
use crate::services::TagService;

/// GET /api/tags/search
pub async fn search(State(state): State<AppState>, ListParams(params): ListParams) -> ApiResult<Page<Tag>> {
    Ok(ApiResponse::success(list::search(&state, &tag::LISTING, &params).await?))
}

/// POST /api/tags
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<TagInput>) -> ApiResult<Tag> {
    let id = TagService::new(state.pool.clone()).create(&input).await?;
    Ok(ApiResponse::created(select_404(state.lists.as_ref(), &tag::LISTING, id, "Tag").await?))
}

/// DELETE /api/tags/:id - refused while any object carries the tag
pub async fn delete(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<()> {
    TagService::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::no_content())
}
