//! The JSON endpoint for searching transactions a page at a time.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    pagination::{PageWindow, PaginationConfig},
};

use super::{
    core::Transaction,
    query::{SearchFilter, count_transactions, query_transactions},
};

/// The state needed for searching transactions.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The default page and page size.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for SearchState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query string for [get_transactions_endpoint].
///
/// The page parameters are kept as raw strings so that bad values fall back
/// to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Free text matched against title, description and price.
    pub search: Option<String>,
    /// The page number, starting from 1.
    pub page: Option<String>,
    /// The maximum number of transactions per page.
    pub per_page: Option<String>,
}

/// One page of search results.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// The number of transactions matching the search, across all pages.
    pub total: u64,
    /// The transactions on the requested page.
    pub transactions: Vec<Transaction>,
}

/// Count the matches for `filter` and fetch the page of them given by `window`.
///
/// # Errors
/// Returns [Error::SqlError] if a query fails.
pub fn search_transactions(
    filter: &SearchFilter,
    window: PageWindow,
    connection: &Connection,
) -> Result<SearchResults, Error> {
    let total = count_transactions(filter, connection)?;
    let transactions = query_transactions(filter, window, connection)?;

    Ok(SearchResults {
        total,
        transactions,
    })
}

/// A route handler that lists transactions matching a search, one page at a time.
pub async fn get_transactions_endpoint(
    State(state): State<SearchState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>, Error> {
    let filter = SearchFilter::new(query.search.as_deref().unwrap_or_default());
    let window = PageWindow::from_query(
        query.page.as_deref(),
        query.per_page.as_deref(),
        &state.pagination_config,
    );

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    search_transactions(&filter, window, &connection)
        .inspect_err(|error| tracing::error!("could not search transactions: {error}"))
        .map(Json)
}
