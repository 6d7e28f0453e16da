use axum::Extension;

use crate::auth::Actor;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/auth/whoami - the resolved actor with its role and permission flags
pub async fn whoami(Extension(actor): Extension<Actor>) -> ApiResult<Actor> {
    Ok(ApiResponse::success(actor))
}
