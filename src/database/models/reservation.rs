use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::filter::{Column, FilterDef, FilterKind, FilterMatch, Listing, SortDirection, UnknownSort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    New,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::New => "new",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub object_id: i64,
    pub object_title: String,
    pub user_id: Option<i64>,
    pub guest_name: String,
    pub phone: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub status: ReservationStatus,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

pub static LISTING: Listing = Listing {
    name: "reservations",
    source: "reservations r JOIN objects o ON o.id = r.object_id",
    key: "r.id",
    columns: &[
        Column { name: "id", sql: "r.id" },
        Column { name: "object_id", sql: "r.object_id" },
        Column { name: "object_title", sql: "o.title" },
        Column { name: "user_id", sql: "r.user_id" },
        Column { name: "guest_name", sql: "r.guest_name" },
        Column { name: "phone", sql: "r.phone" },
        Column { name: "date_from", sql: "r.date_from" },
        Column { name: "date_to", sql: "r.date_to" },
        Column { name: "status", sql: "r.status" },
        Column { name: "created_at", sql: "r.created_at" },
        Column { name: "updated_at", sql: "r.updated_at" },
    ],
    search: &["object_title"],
    sortable: &["id", "object_title", "guest_name", "date_from", "date_to", "status", "created_at"],
    filters: &[
        FilterDef { key: "object_id", column: "object_id", kind: FilterKind::Integer, matcher: FilterMatch::Exact },
        FilterDef { key: "user_id", column: "user_id", kind: FilterKind::Integer, matcher: FilterMatch::Exact },
        FilterDef { key: "status", column: "status", kind: FilterKind::Text, matcher: FilterMatch::Exact },
        FilterDef { key: "date_from", column: "date_from", kind: FilterKind::Date, matcher: FilterMatch::AtLeast },
        FilterDef { key: "date_to", column: "date_to", kind: FilterKind::Date, matcher: FilterMatch::AtMost },
    ],
    default_order: &[("id", SortDirection::Desc)],
    default_rows_per_page: 10,
    unknown_sort: UnknownSort::Ignore,
};

/// A booking made by the current actor
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReservationInput {
    pub object_id: i64,
    #[validate(length(min = 1, max = 255, message = "The guest name must be between 1 and 255 characters."))]
    pub guest_name: String,
    #[validate(length(min = 5, max = 32, message = "The phone must be between 5 and 32 characters."))]
    pub phone: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReservationStatusInput {
    pub status: ReservationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_uses_lowercase_slugs() {
        assert_eq!(json!(ReservationStatus::Cancelled), json!("cancelled"));
        let input: ReservationStatusInput = serde_json::from_value(json!({ "status": "confirmed" })).unwrap();
        assert_eq!(input.status, ReservationStatus::Confirmed);
        assert!(serde_json::from_value::<ReservationStatusInput>(json!({ "status": "lost" })).is_err());
    }

    #[test]
    fn search_key_only_matches_object_title() {
        use crate::filter::{Filter, ListQuery, QueryParams};

        let params = QueryParams::from_pairs([("searchKey".to_string(), "Фрунзе".to_string())]);
        let query = ListQuery::parse(&params, &LISTING, &crate::config::config().list).unwrap();
        let sql = Filter::compile(&LISTING, &query).unwrap().to_count_sql();

        assert!(sql.query.contains("((o.title)::text ILIKE $1)"), "{}", sql.query);
        assert!(!sql.query.contains("guest_name"));
        assert!(!sql.query.contains("r.phone"));
    }

    #[test]
    fn decodes_row_json() {
        let row = json!({
            "id": 7,
            "object_id": 2,
            "object_title": "Санаторий им. Фрунзе",
            "user_id": null,
            "guest_name": "Ivan",
            "phone": "+79990000000",
            "date_from": "2024-07-01",
            "date_to": "2024-07-14",
            "status": "new",
            "created_at": "2024-06-01T10:00:00.123456",
            "updated_at": null
        });
        let reservation: Reservation = serde_json::from_value(row).unwrap();
        assert_eq!(reservation.date_to, NaiveDate::from_ymd_opt(2024, 7, 14).unwrap());
        assert_eq!(reservation.user_id, None);
    }
}
