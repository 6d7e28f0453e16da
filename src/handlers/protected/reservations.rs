use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::auth::Actor;
use crate::database::models::reservation::{self, ReservationInput, ReservationStatusInput};
use crate::database::models::Reservation;
use crate::database::select_404;
use crate::filter::Page;
use crate::handlers::list;
use crate::middleware::{ApiResponse, ApiResult, EntityId, ListParams, ValidJson};
use crate::services::ReservationService;

/// GET /api/reservations/search
pub async fn search(State(state): State<AppState>, ListParams(params): ListParams) -> ApiResult<Page<Reservation>> {
    Ok(ApiResponse::success(list::search(&state, &reservation::LISTING, &params).await?))
}

/// GET /api/reservations/:id
pub async fn show(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Reservation> {
    Ok(ApiResponse::success(
        select_404(state.lists.as_ref(), &reservation::LISTING, id, "Reservation").await?,
    ))
}

/// POST /api/reservations - book on behalf of the current actor
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidJson(input): ValidJson<ReservationInput>,
) -> ApiResult<Reservation> {
    let id = ReservationService::new(state.pool.clone()).create(&actor, &input).await?;
    Ok(ApiResponse::created(
        select_404(state.lists.as_ref(), &reservation::LISTING, id, "Reservation").await?,
    ))
}

/// PUT /api/reservations/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(input): ValidJson<ReservationStatusInput>,
) -> ApiResult<Reservation> {
    ReservationService::new(state.pool.clone()).set_status(id, input.status).await?;
    Ok(ApiResponse::success(
        select_404(state.lists.as_ref(), &reservation::LISTING, id, "Reservation").await?,
    ))
}
