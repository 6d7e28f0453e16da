use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::filter::{Column, Listing, SortDirection, UnknownSort};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub title: String,
    pub objects_count: i64,
    pub created_at: Option<NaiveDateTime>,
}

pub static LISTING: Listing = Listing {
    name: "tags",
    source: "tags t",
    key: "t.id",
    columns: &[
        Column { name: "id", sql: "t.id" },
        Column { name: "title", sql: "t.title" },
        Column { name: "objects_count", sql: "(SELECT COUNT(*) FROM object_tags ot WHERE ot.tag_id = t.id)" },
        Column { name: "created_at", sql: "t.created_at" },
    ],
    search: &["title"],
    sortable: &["id", "title", "objects_count", "created_at"],
    filters: &[],
    default_order: &[("title", SortDirection::Asc), ("id", SortDirection::Asc)],
    default_rows_per_page: 50,
    unknown_sort: UnknownSort::Ignore,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TagInput {
    #[validate(length(min = 1, max = 64, message = "The title must be between 1 and 64 characters."))]
    pub title: String,
}
