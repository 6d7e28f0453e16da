use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::filter::{Column, Listing, SortDirection, UnknownSort};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

pub static LISTING: Listing = Listing {
    name: "faqs",
    source: "faqs f",
    key: "f.id",
    columns: &[
        Column { name: "id", sql: "f.id" },
        Column { name: "question", sql: "f.question" },
        Column { name: "answer", sql: "f.answer" },
        Column { name: "sort_order", sql: "f.sort_order" },
        Column { name: "created_at", sql: "f.created_at" },
        Column { name: "updated_at", sql: "f.updated_at" },
    ],
    search: &["question", "answer"],
    sortable: &["id", "question", "sort_order", "created_at"],
    filters: &[],
    default_order: &[("sort_order", SortDirection::Asc), ("id", SortDirection::Asc)],
    default_rows_per_page: 50,
    unknown_sort: UnknownSort::Ignore,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FaqInput {
    #[validate(length(min = 1, max = 500, message = "The question must be between 1 and 500 characters."))]
    pub question: String,
    #[validate(length(min = 1, message = "The answer field is required."))]
    pub answer: String,
    #[serde(default)]
    pub sort_order: i32,
}
