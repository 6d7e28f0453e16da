use serde_json::Value;

use super::error::FilterError;
use super::list_query::QueryParams;
use super::listing::{Column, Listing, UnknownSort};
use super::types::{SortDirection, SortDirective};

pub struct FilterOrder;

impl FilterOrder {
    /// Read `sorting` from the request.
    ///
    /// The structured form (`sorting[col]=dir`) wins; otherwise a JSON-encoded
    /// string (`{"col":"dir"}` or `[{"col":"dir"}, ...]`) is decoded. Anything
    /// that is neither yields no directives rather than an error.
    pub fn parse(params: &QueryParams) -> Vec<SortDirective> {
        let structured = params.group("sorting");
        if !structured.is_empty() {
            return structured
                .into_iter()
                .filter_map(|(column, dir)| Self::directive(column, dir))
                .collect();
        }

        match params.scalar("sorting") {
            Some(raw) if !raw.trim().is_empty() => Self::parse_encoded(raw),
            _ => vec![],
        }
    }

    fn parse_encoded(raw: &str) -> Vec<SortDirective> {
        let decoded: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(_) => {
                tracing::debug!("Ignoring undecodable sorting parameter: {}", raw);
                return vec![];
            }
        };

        match decoded {
            Value::Object(obj) => Self::from_object(&obj),
            Value::Array(arr) => arr
                .iter()
                .filter_map(Value::as_object)
                .flat_map(Self::from_object)
                .collect(),
            _ => vec![],
        }
    }

    fn from_object(obj: &serde_json::Map<String, Value>) -> Vec<SortDirective> {
        obj.iter()
            .filter_map(|(column, dir)| Self::directive(column, dir.as_str()?))
            .collect()
    }

    fn directive(column: &str, dir: &str) -> Option<SortDirective> {
        let column = column.trim();
        if column.is_empty() {
            return None;
        }
        let direction = SortDirection::parse(dir)?;
        Some(SortDirective { column: column.to_string(), direction })
    }

    /// Map directives onto the listing's allow-list, then append its default
    /// order for columns not already sorted on.
    pub fn resolve(
        listing: &'static Listing,
        directives: &[SortDirective],
    ) -> Result<Vec<(&'static Column, SortDirection)>, FilterError> {
        let mut order: Vec<(&'static Column, SortDirection)> = Vec::new();

        for directive in directives {
            if !listing.is_sortable(&directive.column) {
                match listing.unknown_sort {
                    UnknownSort::Reject => {
                        return Err(FilterError::UnsupportedSortColumn(directive.column.clone()))
                    }
                    UnknownSort::Ignore => {
                        tracing::debug!("Ignoring sort on '{}' for {}", directive.column, listing.name);
                        continue;
                    }
                }
            }
            let column = listing.column(&directive.column)?;
            if !order.iter().any(|(c, _)| c.name == column.name) {
                order.push((column, directive.direction));
            }
        }

        for (name, direction) in listing.default_order {
            let column = listing.column(name)?;
            if !order.iter().any(|(c, _)| c.name == column.name) {
                order.push((column, *direction));
            }
        }

        Ok(order)
    }

    pub fn generate(order: &[(&'static Column, SortDirection)]) -> String {
        if order.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = order
            .iter()
            .map(|(column, direction)| format!("{} {}", column.sql, direction.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}
