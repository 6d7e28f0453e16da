use serde::Serialize;

use crate::auth::Permission;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct PermissionInfo {
    pub slug: &'static str,
    pub description: &'static str,
}

/// GET /api/permissions - the closed permission vocabulary, for role editors
pub async fn list() -> ApiResult<Vec<PermissionInfo>> {
    let permissions = Permission::ALL
        .into_iter()
        .map(|p| PermissionInfo {
            slug: p.slug(),
            description: p.description(),
        })
        .collect();
    Ok(ApiResponse::success(permissions))
}
