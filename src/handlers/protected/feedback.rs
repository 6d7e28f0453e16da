use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::auth::Actor;
use crate::database::models::feedback::{self, FeedbackInput};
use crate::database::models::Feedback;
use crate::database::select_404;
use crate::filter::Page;
use crate::handlers::list;
use crate::middleware::{ApiResponse, ApiResult, EntityId, ListParams, ValidJson};
use crate::services::FeedbackService;

/// GET /api/feedback/search
pub async fn search(State(state): State<AppState>, ListParams(params): ListParams) -> ApiResult<Page<Feedback>> {
    Ok(ApiResponse::success(list::search(&state, &feedback::LISTING, &params).await?))
}

/// POST /api/feedback
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidJson(input): ValidJson<FeedbackInput>,
) -> ApiResult<Feedback> {
    let id = FeedbackService::new(state.pool.clone()).create(&actor, &input).await?;
    Ok(ApiResponse::created(
        select_404(state.lists.as_ref(), &feedback::LISTING, id, "Feedback").await?,
    ))
}

/// DELETE /api/feedback/:id
pub async fn delete(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<()> {
    FeedbackService::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::no_content())
}
