use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::filter::{Column, FilterDef, FilterKind, FilterMatch, Listing, SortDirection, UnknownSort};

/// User as exposed by the API; the password hash is never projected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role_id: i64,
    pub role_name: String,
    pub role_title: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

pub static LISTING: Listing = Listing {
    name: "users",
    source: "users u JOIN roles r ON r.id = u.role_id",
    key: "u.id",
    columns: &[
        Column { name: "id", sql: "u.id" },
        Column { name: "name", sql: "u.name" },
        Column { name: "email", sql: "u.email" },
        Column { name: "phone", sql: "u.phone" },
        Column { name: "role_id", sql: "u.role_id" },
        Column { name: "role_name", sql: "r.name" },
        Column { name: "role_title", sql: "r.title" },
        Column { name: "created_at", sql: "u.created_at" },
        Column { name: "updated_at", sql: "u.updated_at" },
    ],
    search: &["name", "email", "phone"],
    sortable: &["id", "name", "email", "role_id", "created_at"],
    filters: &[FilterDef { key: "role_id", column: "role_id", kind: FilterKind::Integer, matcher: FilterMatch::Exact }],
    default_order: &[("id", SortDirection::Asc)],
    default_rows_per_page: 20,
    unknown_sort: UnknownSort::Reject,
};

/// Administrative update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."))]
    pub name: Option<String>,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 32, message = "The phone may not be greater than 32 characters."))]
    pub phone: Option<String>,
    pub role_id: Option<i64>,
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.role_id.is_none()
            && self.password.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}
