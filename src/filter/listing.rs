use super::error::FilterError;
use super::types::{FilterKind, FilterMatch, SortDirection};

/// A projected column: the public name clients see and sort by, and the SQL
/// expression that produces it.
#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    pub sql: &'static str,
}

/// A query-string filter a listing accepts
#[derive(Debug)]
pub struct FilterDef {
    pub key: &'static str,
    pub column: &'static str,
    pub kind: FilterKind,
    pub matcher: FilterMatch,
}

/// What to do with a sort directive naming a column outside the allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownSort {
    Ignore,
    Reject,
}

/// Static description of one searchable entity collection.
///
/// Every name a client can influence (sort columns, filter keys) is looked up
/// here, so no client string ever reaches generated SQL.
#[derive(Debug)]
pub struct Listing {
    pub name: &'static str,
    /// FROM clause, including joins
    pub source: &'static str,
    /// Primary key expression used by single-row lookups
    pub key: &'static str,
    pub columns: &'static [Column],
    pub search: &'static [&'static str],
    pub sortable: &'static [&'static str],
    pub filters: &'static [FilterDef],
    /// Appended after client directives so pages are deterministic
    pub default_order: &'static [(&'static str, SortDirection)],
    pub default_rows_per_page: u32,
    pub unknown_sort: UnknownSort,
}

impl Listing {
    pub fn column(&self, name: &str) -> Result<&'static Column, FilterError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| FilterError::UnknownColumn {
                listing: self.name,
                column: name.to_string(),
            })
    }

    pub fn is_sortable(&self, name: &str) -> bool {
        self.sortable.contains(&name)
    }

    /// `expr AS "name", ...` for every projected column
    pub fn projection(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{} AS \"{}\"", c.sql, c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Single row by primary key, as JSON
    pub fn find_sql(&self) -> String {
        format!(
            "SELECT row_to_json(t) AS row FROM (SELECT {} FROM {} WHERE {} = $1) t",
            self.projection(),
            self.source,
            self.key
        )
    }

    /// Checks that every column name the listing refers to is projected
    pub fn validate(&self) -> Result<(), FilterError> {
        let referenced = self
            .search
            .iter()
            .chain(self.sortable.iter())
            .chain(self.filters.iter().map(|f| &f.column))
            .chain(self.default_order.iter().map(|(c, _)| c));
        for name in referenced {
            self.column(name)?;
        }
        Ok(())
    }
}
