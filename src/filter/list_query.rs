use chrono::NaiveDate;

use crate::config::ListConfig;
use crate::error::FieldErrors;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::listing::{FilterDef, Listing};
use super::types::{FilterKind, FilterValue, SortDirective};

/// Query-string pairs split into plain scalars (`page=2`) and bracketed groups
/// (`sorting[title]=asc`, `object_id[]=3`).
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    scalars: Vec<(String, String)>,
    nested: Vec<(String, String, String)>,
}

impl QueryParams {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match split_bracketed(&key) {
                Some((group, member)) => params.nested.push((group.to_string(), member.to_string(), value)),
                None => params.scalars.push((key, value)),
            }
        }
        params
    }

    /// Last occurrence wins, as with PHP-style query parsing
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.scalars
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `(member, value)` pairs of a bracketed group, in request order
    pub fn group(&self, key: &str) -> Vec<(&str, &str)> {
        self.nested
            .iter()
            .filter(|(g, _, _)| g == key)
            .map(|(_, m, v)| (m.as_str(), v.as_str()))
            .collect()
    }
}

fn split_bracketed(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let rest = key[open + 1..].strip_suffix(']')?;
    if open == 0 || rest.contains('[') || rest.contains(']') {
        return None;
    }
    Some((&key[..open], rest))
}

/// Normalized list request for one listing
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: u32,
    pub rows_per_page: u32,
    pub search_key: Option<String>,
    pub sorting: Vec<SortDirective>,
    pub filters: Vec<(&'static FilterDef, FilterValue)>,
}

impl ListQuery {
    /// Pagination and sorting never fail: bad values fall back to defaults.
    /// Declared filters are type-checked and fail with per-field messages.
    pub fn parse(params: &QueryParams, listing: &'static Listing, limits: &ListConfig) -> Result<Self, FilterError> {
        let page = positive(params.scalar("page")).unwrap_or(1);

        let default_rows = if listing.default_rows_per_page > 0 {
            listing.default_rows_per_page
        } else {
            limits.default_rows_per_page
        };
        let mut rows_per_page = positive(params.scalar("rowsPerPage")).unwrap_or(default_rows);
        if rows_per_page > limits.max_rows_per_page {
            if limits.debug_logging {
                tracing::warn!(
                    "rowsPerPage {} exceeds max {}, capping to max",
                    rows_per_page,
                    limits.max_rows_per_page
                );
            }
            rows_per_page = limits.max_rows_per_page;
        }

        let search_key = params
            .scalar("searchKey")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let sorting = FilterOrder::parse(params);

        let mut filters = Vec::new();
        let mut errors = FieldErrors::new();
        for def in listing.filters {
            match parse_filter(params, def) {
                Ok(Some(value)) => filters.push((def, value)),
                Ok(None) => {}
                Err(message) => errors.entry(def.key.to_string()).or_default().push(message),
            }
        }
        if !errors.is_empty() {
            return Err(FilterError::InvalidParams(errors));
        }

        Ok(Self {
            page,
            rows_per_page,
            search_key,
            sorting,
            filters,
        })
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.rows_per_page as u64
    }
}

fn positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n >= 1)
}

fn label(key: &str) -> String {
    key.replace('_', " ")
}

fn parse_filter(params: &QueryParams, def: &FilterDef) -> Result<Option<FilterValue>, String> {
    if def.kind == FilterKind::Integer {
        let listed: Vec<&str> = params
            .group(def.key)
            .into_iter()
            .filter(|(member, _)| member.is_empty())
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect();
        if !listed.is_empty() {
            let values = listed
                .iter()
                .map(|v| v.parse::<i64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| format!("The {} field must be an array of integers.", label(def.key)))?;
            return Ok(Some(FilterValue::Integers(values)));
        }
    }

    let raw = match params.scalar(def.key).map(str::trim) {
        Some(raw) if !raw.is_empty() && raw != "null" => raw,
        _ => return Ok(None),
    };

    match def.kind {
        FilterKind::Integer => raw
            .parse::<i64>()
            .map(|i| Some(FilterValue::Integer(i)))
            .map_err(|_| format!("The {} field must be an integer.", label(def.key))),
        FilterKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| Some(FilterValue::Date(d)))
            .map_err(|_| format!("The {} field must be a valid date (YYYY-MM-DD).", label(def.key))),
        FilterKind::Text => Ok(Some(FilterValue::Text(raw.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::listing::{Column, UnknownSort};
    use crate::filter::types::{FilterMatch, SortDirection};

    static VISITS: Listing = Listing {
        name: "visits",
        source: "visits v",
        key: "v.id",
        columns: &[
            Column { name: "id", sql: "v.id" },
            Column { name: "guest_id", sql: "v.guest_id" },
            Column { name: "day", sql: "v.day" },
            Column { name: "status", sql: "v.status" },
        ],
        search: &[],
        sortable: &["id", "day"],
        filters: &[
            FilterDef { key: "guest_id", column: "guest_id", kind: FilterKind::Integer, matcher: FilterMatch::Exact },
            FilterDef { key: "day_from", column: "day", kind: FilterKind::Date, matcher: FilterMatch::AtLeast },
            FilterDef { key: "status", column: "status", kind: FilterKind::Text, matcher: FilterMatch::Exact },
        ],
        default_order: &[("id", SortDirection::Asc)],
        default_rows_per_page: 15,
        unknown_sort: UnknownSort::Ignore,
    };

    fn limits() -> ListConfig {
        ListConfig { default_rows_per_page: 20, max_rows_per_page: 100, debug_logging: false }
    }

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn splits_bracketed_keys() {
        let p = params(&[("sorting[day]", "desc"), ("guest_id[]", "4"), ("page", "2"), ("[x]", "1")]);
        assert_eq!(p.group("sorting"), vec![("day", "desc")]);
        assert_eq!(p.group("guest_id"), vec![("", "4")]);
        assert_eq!(p.scalar("page"), Some("2"));
        assert_eq!(p.scalar("[x]"), Some("1"));
    }

    #[test]
    fn pagination_defaults_when_absent_or_garbage() {
        let q = ListQuery::parse(&params(&[]), &VISITS, &limits()).unwrap();
        assert_eq!((q.page, q.rows_per_page), (1, 15));

        let q = ListQuery::parse(&params(&[("page", "abc"), ("rowsPerPage", "-3")]), &VISITS, &limits()).unwrap();
        assert_eq!((q.page, q.rows_per_page), (1, 15));

        let q = ListQuery::parse(&params(&[("page", "0"), ("rowsPerPage", "0")]), &VISITS, &limits()).unwrap();
        assert_eq!((q.page, q.rows_per_page), (1, 15));
    }

    #[test]
    fn rows_per_page_is_capped() {
        let q = ListQuery::parse(&params(&[("page", "3"), ("rowsPerPage", "5000")]), &VISITS, &limits()).unwrap();
        assert_eq!((q.page, q.rows_per_page), (3, 100));
        assert_eq!(q.offset(), 200);
    }

    #[test]
    fn blank_search_key_is_absent() {
        let q = ListQuery::parse(&params(&[("searchKey", "   ")]), &VISITS, &limits()).unwrap();
        assert_eq!(q.search_key, None);
        let q = ListQuery::parse(&params(&[("searchKey", " Sochi ")]), &VISITS, &limits()).unwrap();
        assert_eq!(q.search_key.as_deref(), Some("Sochi"));
    }

    #[test]
    fn absent_and_empty_filters_impose_nothing() {
        let q = ListQuery::parse(&params(&[("guest_id", ""), ("status", "null")]), &VISITS, &limits()).unwrap();
        assert!(q.filters.is_empty());
    }

    #[test]
    fn typed_filters_parse() {
        let q = ListQuery::parse(
            &params(&[("guest_id", "12"), ("day_from", "2024-06-01"), ("status", "new")]),
            &VISITS,
            &limits(),
        )
        .unwrap();
        let values: Vec<_> = q.filters.iter().map(|(d, v)| (d.key, v.clone())).collect();
        assert_eq!(
            values,
            vec![
                ("guest_id", FilterValue::Integer(12)),
                ("day_from", FilterValue::Date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())),
                ("status", FilterValue::Text("new".into())),
            ]
        );
    }

    #[test]
    fn integer_filters_accept_array_form() {
        let q = ListQuery::parse(&params(&[("guest_id[]", "1"), ("guest_id[]", "2")]), &VISITS, &limits()).unwrap();
        assert_eq!(q.filters[0].1, FilterValue::Integers(vec![1, 2]));
    }

    #[test]
    fn malformed_filters_report_every_field() {
        let err = ListQuery::parse(&params(&[("guest_id", "abc"), ("day_from", "01.06.2024")]), &VISITS, &limits())
            .unwrap_err();
        match err {
            FilterError::InvalidParams(fields) => {
                assert_eq!(fields["guest_id"], vec!["The guest id field must be an integer.".to_string()]);
                assert!(fields.contains_key("day_from"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
