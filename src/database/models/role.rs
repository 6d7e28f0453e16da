use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::auth::PermissionSet;
use crate::filter::{Column, Listing, SortDirection, UnknownSort};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub title: Option<String>,
    pub permissions: PermissionSet,
    pub users_count: i64,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

pub static LISTING: Listing = Listing {
    name: "roles",
    source: "roles r",
    key: "r.id",
    columns: &[
        Column { name: "id", sql: "r.id" },
        Column { name: "name", sql: "r.name" },
        Column { name: "title", sql: "r.title" },
        Column { name: "permissions", sql: "r.permissions" },
        Column { name: "users_count", sql: "(SELECT COUNT(*) FROM users u WHERE u.role_id = r.id)" },
        Column { name: "created_at", sql: "r.created_at" },
        Column { name: "updated_at", sql: "r.updated_at" },
    ],
    search: &["name", "title"],
    sortable: &["id", "name", "title", "users_count", "created_at"],
    filters: &[],
    default_order: &[("id", SortDirection::Asc)],
    default_rows_per_page: 20,
    unknown_sort: UnknownSort::Reject,
};

/// Body of role create and update. `permissions` may omit slugs (omitted means
/// not granted) but may not name slugs outside the vocabulary.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleInput {
    #[validate(length(min = 2, max = 64, message = "The name must be between 2 and 64 characters."))]
    pub name: String,
    #[validate(length(max = 255, message = "The title may not be greater than 255 characters."))]
    pub title: Option<String>,
    #[serde(default)]
    pub permissions: BTreeMap<String, bool>,
}
