use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{Filter, Listing, Page, SqlResult};

/// Executes compiled list filters. The Postgres implementation renders SQL;
/// test doubles evaluate the same `Filter` over in-memory rows.
#[async_trait]
pub trait ListExecutor: Send + Sync {
    /// Rows matching filters and search, ignoring pagination
    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError>;

    /// The requested page of rows, in order, as JSON objects
    async fn fetch(&self, filter: &Filter) -> Result<Vec<Value>, DatabaseError>;

    /// One row of a listing by primary key
    async fn find(&self, listing: &'static Listing, id: i64) -> Result<Option<Value>, DatabaseError>;
}

pub struct PgListExecutor {
    pool: PgPool,
}

impl PgListExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListExecutor for PgListExecutor {
    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError> {
        let sql = filter.to_count_sql();
        QueryBuilder::new(&sql).fetch_count(&self.pool).await
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<Value>, DatabaseError> {
        let sql = filter.to_sql();
        QueryBuilder::new(&sql).fetch_rows(&self.pool).await
    }

    async fn find(&self, listing: &'static Listing, id: i64) -> Result<Option<Value>, DatabaseError> {
        let sql = SqlResult {
            query: listing.find_sql(),
            params: vec![Value::from(id)],
        };
        QueryBuilder::new(&sql).fetch_optional(&self.pool).await
    }
}

/// Count, then fetch the page unless it lies past the last matching row
pub async fn select_page<T: DeserializeOwned>(
    executor: &dyn ListExecutor,
    filter: &Filter,
) -> Result<Page<T>, DatabaseError> {
    let total = executor.count(filter).await?;
    if total == 0 || filter.offset() >= total {
        return Ok(Page::empty(filter.page(), filter.rows_per_page(), total));
    }

    let rows = executor.fetch(filter).await?;
    let items = rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()?;

    Ok(Page {
        page: filter.page(),
        rows_per_page: filter.rows_per_page(),
        total,
        items,
    })
}

/// Single typed row, or `NotFound` naming the entity
pub async fn select_404<T: DeserializeOwned>(
    executor: &dyn ListExecutor,
    listing: &'static Listing,
    id: i64,
    entity: &str,
) -> Result<T, DatabaseError> {
    match executor.find(listing, id).await? {
        Some(row) => Ok(serde_json::from_value(row)?),
        None => Err(DatabaseError::NotFound(format!("{} not found", entity))),
    }
}
