use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::auth::{generate_jwt, Claims};
use crate::database::models::user::LoginRequest;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::UserService;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Seconds
    pub expires_in: i64,
}

/// POST /api/auth/login - exchange email and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let users = UserService::new(state.pool.clone());
    let Some((user_id, role_id)) = users.authenticate(&request.email, &request.password).await? else {
        tracing::info!("Failed login for {}", request.email);
        return Err(ApiError::unauthorized("These credentials do not match our records."));
    };

    let claims = Claims::new(user_id, role_id);
    let token = generate_jwt(&claims).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    tracing::info!("User {} logged in", user_id);
    Ok(ApiResponse::success(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in: claims.expires_in(),
    }))
}
