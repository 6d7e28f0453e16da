use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::filter::{Column, FilterDef, FilterKind, FilterMatch, Listing, SortDirection, UnknownSort};

/// A sanatorium or resort guests can book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object {
    pub id: i64,
    pub title: String,
    pub city: String,
    pub address: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<ObjectTag>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectTag {
    pub id: i64,
    pub title: String,
}

pub static LISTING: Listing = Listing {
    name: "objects",
    source: "objects o",
    key: "o.id",
    columns: &[
        Column { name: "id", sql: "o.id" },
        Column { name: "title", sql: "o.title" },
        Column { name: "city", sql: "o.city" },
        Column { name: "address", sql: "o.address" },
        Column { name: "description", sql: "o.description" },
        Column {
            name: "tags",
            sql: "COALESCE((SELECT json_agg(json_build_object('id', t.id, 'title', t.title) ORDER BY t.title) \
                  FROM object_tags ot JOIN tags t ON t.id = ot.tag_id WHERE ot.object_id = o.id), '[]'::json)",
        },
        Column { name: "created_at", sql: "o.created_at" },
        Column { name: "updated_at", sql: "o.updated_at" },
    ],
    search: &["title", "city", "address"],
    sortable: &["id", "title", "city", "created_at"],
    filters: &[FilterDef { key: "city", column: "city", kind: FilterKind::Text, matcher: FilterMatch::Exact }],
    default_order: &[("id", SortDirection::Asc)],
    default_rows_per_page: 10,
    unknown_sort: UnknownSort::Ignore,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ObjectInput {
    #[validate(length(min = 1, max = 255, message = "The title must be between 1 and 255 characters."))]
    pub title: String,
    #[validate(length(min = 1, max = 128, message = "The city must be between 1 and 128 characters."))]
    pub city: String,
    #[validate(length(max = 255, message = "The address may not be greater than 255 characters."))]
    pub address: Option<String>,
    pub description: Option<String>,
    /// Replaces the object's tag set when present
    pub tag_ids: Option<Vec<i64>>,
}
