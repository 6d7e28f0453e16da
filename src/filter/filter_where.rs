use serde_json::Value;

use super::listing::Column;
use super::types::{FilterKind, FilterMatch, FilterValue};

/// One declared filter bound to its column
#[derive(Debug, Clone)]
pub struct Condition {
    pub column: &'static Column,
    pub kind: FilterKind,
    pub matcher: FilterMatch,
    pub value: FilterValue,
}

/// Case-insensitive substring search across several columns
#[derive(Debug, Clone)]
pub struct Search {
    pub key: String,
    pub columns: Vec<&'static Column>,
}

impl Search {
    /// `%key%` with LIKE metacharacters escaped so they match literally
    pub fn pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.key.len() + 2);
        escaped.push('%');
        for c in self.key.chars() {
            if matches!(c, '\\' | '%' | '_') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        escaped
    }
}

pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Returns the WHERE body (empty when unconstrained) and its bind values
    pub fn generate(conditions: &[Condition], search: Option<&Search>) -> (String, Vec<Value>) {
        let mut filter_where = Self::new(0);
        filter_where.build(conditions, search)
    }

    fn build(&mut self, conditions: &[Condition], search: Option<&Search>) -> (String, Vec<Value>) {
        let mut sql_conditions = vec![];
        for condition in conditions {
            sql_conditions.push(self.build_sql_condition(condition));
        }
        if let Some(search) = search {
            if let Some(sql) = self.build_search(search) {
                sql_conditions.push(sql);
            }
        }
        (sql_conditions.join(" AND "), std::mem::take(&mut self.param_values))
    }

    fn build_sql_condition(&mut self, condition: &Condition) -> String {
        let (column, cast) = match condition.kind {
            FilterKind::Date => (format!("({})::date", condition.column.sql), "::date"),
            FilterKind::Integer | FilterKind::Text => (condition.column.sql.to_string(), ""),
        };

        if let FilterValue::Integers(values) = &condition.value {
            if values.is_empty() {
                return "1=0".to_string();
            }
            let params: Vec<String> = condition
                .value
                .params()
                .into_iter()
                .map(|v| self.param(v))
                .collect();
            return format!("{} IN ({})", column, params.join(", "));
        }

        let operator = match condition.matcher {
            FilterMatch::Exact => "=",
            FilterMatch::AtLeast => ">=",
            FilterMatch::AtMost => "<=",
        };
        let placeholders: Vec<String> = condition
            .value
            .params()
            .into_iter()
            .map(|v| self.param(v))
            .collect();
        format!("{} {} {}{}", column, operator, placeholders.join(", "), cast)
    }

    fn build_search(&mut self, search: &Search) -> Option<String> {
        if search.columns.is_empty() {
            return None;
        }
        let placeholder = self.param(Value::String(search.pattern()));
        let parts: Vec<String> = search
            .columns
            .iter()
            .map(|c| format!("({})::text ILIKE {}", c.sql, placeholder))
            .collect();
        Some(format!("({})", parts.join(" OR ")))
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    static ID: Column = Column { name: "object_id", sql: "r.object_id" };
    static DAY: Column = Column { name: "date_from", sql: "r.date_from" };
    static TITLE: Column = Column { name: "object_title", sql: "o.title" };
    static GUEST: Column = Column { name: "guest_name", sql: "r.guest_name" };

    #[test]
    fn empty_input_has_no_where_body() {
        let (sql, params) = FilterWhere::generate(&[], None);
        assert_eq!(sql, "");
        assert!(params.is_empty());
    }

    #[test]
    fn conditions_and_search_share_one_param_sequence() {
        let conditions = vec![
            Condition { column: &ID, kind: FilterKind::Integer, matcher: FilterMatch::Exact, value: FilterValue::Integer(5) },
            Condition {
                column: &DAY,
                kind: FilterKind::Date,
                matcher: FilterMatch::AtLeast,
                value: FilterValue::Date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
            },
        ];
        let search = Search { key: "Фрунзе".into(), columns: vec![&TITLE, &GUEST] };
        let (sql, params) = FilterWhere::generate(&conditions, Some(&search));
        assert_eq!(
            sql,
            "r.object_id = $1 AND (r.date_from)::date >= $2::date AND ((o.title)::text ILIKE $3 OR (r.guest_name)::text ILIKE $3)"
        );
        assert_eq!(params, vec![json!(5), json!("2024-07-01"), json!("%Фрунзе%")]);
    }

    #[test]
    fn integer_lists_expand_to_in() {
        let conditions = vec![Condition {
            column: &ID,
            kind: FilterKind::Integer,
            matcher: FilterMatch::Exact,
            value: FilterValue::Integers(vec![1, 2, 3]),
        }];
        let (sql, params) = FilterWhere::generate(&conditions, None);
        assert_eq!(sql, "r.object_id IN ($1, $2, $3)");
        assert_eq!(params, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        let search = Search { key: r"50%_off\".into(), columns: vec![] };
        assert_eq!(search.pattern(), r"%50\%\_off\\%");
    }
}
