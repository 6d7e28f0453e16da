use axum::extract::State;

use crate::app::AppState;
use crate::database::models::faq::{self, FaqInput};
use crate::database::models::Faq;
use crate::database::select_404;
use crate::filter::Page;
use crate::handlers::list;
use crate::middleware::{ApiResponse, ApiResult, EntityId, ListParams, ValidJson};
use crate::services::FaqService;

/// GET /api/faqs/search
pub async fn search(State(state): State<AppState>, ListParams(params): ListParams) -> ApiResult<Page<Faq>> {
    Ok(ApiResponse::success(list::search(&state, &faq::LISTING, &params).await?))
}

/// POST /api/faqs
pub async fn create(State(state): State<AppState>, ValidJson(input): ValidJson<FaqInput>) -> ApiResult<Faq> {
    let id = FaqService::new(state.pool.clone()).create(&input).await?;
    Ok(ApiResponse::created(select_404(state.lists.as_ref(), &faq::LISTING, id, "FAQ entry").await?))
}

/// PUT /api/faqs/:id
pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(input): ValidJson<FaqInput>,
) -> ApiResult<Faq> {
    FaqService::new(state.pool.clone()).update(id, &input).await?;
    Ok(ApiResponse::success(select_404(state.lists.as_ref(), &faq::LISTING, id, "FAQ entry").await?))
}

/// DELETE /api/faqs/:id
pub async fn delete(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<()> {
    FaqService::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::no_content())
}
