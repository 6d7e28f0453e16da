use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::{Condition, FilterWhere, Search};
use super::list_query::ListQuery;
use super::listing::{Column, Listing};
use super::types::{SortDirection, SqlResult};

/// A list query checked against its listing and ready to execute.
///
/// Keeps the resolved pieces (not just SQL text) so executors other than
/// Postgres can evaluate the same selection.
#[derive(Debug, Clone)]
pub struct Filter {
    listing: &'static Listing,
    conditions: Vec<Condition>,
    search: Option<Search>,
    order: Vec<(&'static Column, SortDirection)>,
    page: u32,
    rows_per_page: u32,
}

impl Filter {
    pub fn compile(listing: &'static Listing, query: &ListQuery) -> Result<Self, FilterError> {
        let mut conditions = Vec::with_capacity(query.filters.len());
        for (def, value) in &query.filters {
            conditions.push(Condition {
                column: listing.column(def.column)?,
                kind: def.kind,
                matcher: def.matcher,
                value: value.clone(),
            });
        }

        let search = match &query.search_key {
            Some(key) => {
                let columns = listing
                    .search
                    .iter()
                    .map(|name| listing.column(name))
                    .collect::<Result<Vec<_>, _>>()?;
                Some(Search { key: key.clone(), columns })
            }
            None => None,
        };

        let order = FilterOrder::resolve(listing, &query.sorting)?;

        Ok(Self {
            listing,
            conditions,
            search,
            order,
            page: query.page,
            rows_per_page: query.rows_per_page,
        })
    }

    pub fn listing(&self) -> &'static Listing {
        self.listing
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn search(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    pub fn order(&self) -> &[(&'static Column, SortDirection)] {
        &self.order
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    pub fn limit(&self) -> u64 {
        self.rows_per_page as u64
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.rows_per_page as u64
    }

    /// One JSON object per row, in page order
    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = self.where_parts();
        let inner = [
            format!("SELECT {}", self.listing.projection()),
            format!("FROM {}", self.listing.source),
            where_clause,
            FilterOrder::generate(&self.order),
            format!("LIMIT {} OFFSET {}", self.limit(), self.offset()),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult {
            query: format!("SELECT row_to_json(t) AS row FROM ({}) t", inner),
            params,
        }
    }

    /// Rows matching filters and search, ignoring pagination
    pub fn to_count_sql(&self) -> SqlResult {
        let (where_clause, params) = self.where_parts();
        let query = [
            "SELECT COUNT(*) AS count".to_string(),
            format!("FROM {}", self.listing.source),
            where_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
        SqlResult { query, params }
    }

    fn where_parts(&self) -> (String, Vec<serde_json::Value>) {
        let (body, params) = FilterWhere::generate(&self.conditions, self.search.as_ref());
        if body.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", body), params)
        }
    }
}
