use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::filter::{Column, FilterDef, FilterKind, FilterMatch, Listing, SortDirection, UnknownSort};

/// A guest review of an object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub object_id: i64,
    pub object_title: String,
    pub user_id: Option<i64>,
    pub author_name: String,
    pub text: String,
    pub rating: i16,
    pub created_at: Option<NaiveDateTime>,
}

pub static LISTING: Listing = Listing {
    name: "feedback",
    source: "feedback fb JOIN objects o ON o.id = fb.object_id",
    key: "fb.id",
    columns: &[
        Column { name: "id", sql: "fb.id" },
        Column { name: "object_id", sql: "fb.object_id" },
        Column { name: "object_title", sql: "o.title" },
        Column { name: "user_id", sql: "fb.user_id" },
        Column { name: "author_name", sql: "fb.author_name" },
        Column { name: "text", sql: "fb.text" },
        Column { name: "rating", sql: "fb.rating" },
        Column { name: "created_at", sql: "fb.created_at" },
    ],
    search: &["author_name", "text", "object_title"],
    sortable: &["id", "rating", "created_at"],
    filters: &[
        FilterDef { key: "object_id", column: "object_id", kind: FilterKind::Integer, matcher: FilterMatch::Exact },
        FilterDef { key: "rating", column: "rating", kind: FilterKind::Integer, matcher: FilterMatch::Exact },
        FilterDef { key: "date_from", column: "created_at", kind: FilterKind::Date, matcher: FilterMatch::AtLeast },
        FilterDef { key: "date_to", column: "created_at", kind: FilterKind::Date, matcher: FilterMatch::AtMost },
    ],
    default_order: &[("id", SortDirection::Desc)],
    default_rows_per_page: 20,
    unknown_sort: UnknownSort::Ignore,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackInput {
    pub object_id: i64,
    /// Defaults to the actor's name
    #[validate(length(min = 1, max = 255, message = "The author name must be between 1 and 255 characters."))]
    pub author_name: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "The text must be between 1 and 2000 characters."))]
    pub text: String,
    #[validate(range(min = 1, max = 5, message = "The rating must be between 1 and 5."))]
    pub rating: i16,
}
