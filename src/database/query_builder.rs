use serde_json::Value;
use sqlx::{postgres::PgArguments, PgPool, Row};
use std::time::Instant;

use crate::config;
use crate::database::manager::DatabaseError;
use crate::filter::SqlResult;

/// Runs rendered SQL with JSON-typed bind values.
///
/// Row queries are expected to project a single `row` column holding
/// `row_to_json(...)`; count queries a single `count` column.
pub struct QueryBuilder<'a> {
    sql: &'a SqlResult,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(sql: &'a SqlResult) -> Self {
        Self { sql }
    }

    fn query(&self) -> sqlx::query::Query<'a, sqlx::Postgres, PgArguments> {
        let mut q = sqlx::query(&self.sql.query);
        for p in self.sql.params.iter() {
            q = bind_param_query(q, p);
        }
        q
    }

    pub async fn fetch_rows(self, pool: &PgPool) -> Result<Vec<Value>, DatabaseError> {
        let started = Instant::now();
        let rows = self.query().fetch_all(pool).await?;
        self.warn_if_slow(started);
        rows.iter()
            .map(|row| row.try_get::<Value, _>("row").map_err(DatabaseError::from))
            .collect()
    }

    pub async fn fetch_optional(self, pool: &PgPool) -> Result<Option<Value>, DatabaseError> {
        let started = Instant::now();
        let row = self.query().fetch_optional(pool).await?;
        self.warn_if_slow(started);
        match row {
            Some(row) => Ok(Some(row.try_get::<Value, _>("row")?)),
            None => Ok(None),
        }
    }

    pub async fn fetch_count(self, pool: &PgPool) -> Result<u64, DatabaseError> {
        let started = Instant::now();
        let row = self.query().fetch_one(pool).await?;
        self.warn_if_slow(started);
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }

    fn warn_if_slow(&self, started: Instant) {
        let db = &config::config().database;
        if !db.enable_slow_query_warning {
            return;
        }
        let elapsed = started.elapsed().as_millis() as u64;
        if elapsed >= db.slow_query_threshold_ms {
            tracing::warn!("Slow query ({} ms): {}", elapsed, self.sql.query);
        }
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Integer lists are expanded to one placeholder per element before binding
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
