use serde::de::DeserializeOwned;

use crate::app::AppState;
use crate::config;
use crate::database::select_page;
use crate::error::ApiError;
use crate::filter::{Filter, ListQuery, Listing, Page, QueryParams};

/// Run the list query contract for one listing: parse, compile, count, page
pub async fn search<T: DeserializeOwned>(
    state: &AppState,
    listing: &'static Listing,
    params: &QueryParams,
) -> Result<Page<T>, ApiError> {
    let limits = &config::config().list;
    let query = ListQuery::parse(params, listing, limits)?;
    let filter = Filter::compile(listing, &query)?;

    if limits.debug_logging {
        let sql = filter.to_sql();
        tracing::debug!("{} search: {} {:?}", listing.name, sql.query, sql.params);
    }

    Ok(select_page(state.lists.as_ref(), &filter).await?)
}
