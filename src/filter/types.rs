use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Case-insensitive `asc` / `desc`; anything else is not a direction
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// A client-supplied sort directive, before the column is checked against a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub column: String,
    pub direction: SortDirection,
}

/// Value type a declared filter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Integer,
    Date,
    Text,
}

/// How a filter value constrains its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMatch {
    Exact,
    AtLeast,
    AtMost,
}

/// A parsed, type-checked filter value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Integers(Vec<i64>),
    Date(NaiveDate),
    Text(String),
}

impl FilterValue {
    /// Bind values in the order they appear in the generated SQL
    pub fn params(&self) -> Vec<Value> {
        match self {
            FilterValue::Integer(i) => vec![Value::from(*i)],
            FilterValue::Integers(values) => values.iter().map(|i| Value::from(*i)).collect(),
            FilterValue::Date(d) => vec![Value::String(d.format("%Y-%m-%d").to_string())],
            FilterValue::Text(s) => vec![Value::String(s.clone())],
        }
    }
}

/// Response envelope for every list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: u32,
    pub rows_per_page: u32,
    /// Rows matching filters and search, ignoring pagination
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty(page: u32, rows_per_page: u32, total: u64) -> Self {
        Self {
            page,
            rows_per_page,
            total,
            items: Vec::new(),
        }
    }

    /// Number of items a page must hold for a given total
    pub fn expected_len(total: u64, page: u32, rows_per_page: u32) -> u64 {
        let skipped = (page.max(1) as u64 - 1) * rows_per_page as u64;
        total.saturating_sub(skipped).min(rows_per_page as u64)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            rows_per_page: self.rows_per_page,
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
