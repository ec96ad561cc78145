//! JSON endpoints for the monthly summaries.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    month::parse_month,
    transaction::{Transaction, get_transactions_in_month},
};

use super::aggregation::{
    CategoryBreakdown, HistogramBucket, MonthlyReport, Statistics, category_breakdown,
    price_histogram,
};

/// The state needed for the statistics endpoints.
#[derive(Debug, Clone)]
pub struct StatisticsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatisticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string shared by the statistics endpoints.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MonthQuery {
    /// A full English month name, e.g. "March".
    pub month: Option<String>,
}

impl MonthQuery {
    /// The requested month. A missing month is treated like an empty name.
    fn parse(&self) -> Result<Month, Error> {
        parse_month(self.month.as_deref().unwrap_or_default())
    }
}

/// Fetch the transactions sold in `month` and reduce them with `summarise`.
///
/// The database lock is held until the reduction is done.
fn summarise_month<T>(
    state: &StatisticsState,
    month: Month,
    summarise: impl FnOnce(&[Transaction]) -> T,
) -> Result<T, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_in_month(month, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions for {month}: {error}"))?;

    Ok(summarise(&transactions))
}

/// A route handler for the sale totals of a month.
pub async fn get_statistics_endpoint(
    State(state): State<StatisticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, Error> {
    let month = query.parse()?;

    summarise_month(&state, month, Statistics::from_transactions).map(Json)
}

/// A route handler for the price histogram of a month.
pub async fn get_histogram_endpoint(
    State(state): State<StatisticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<HistogramBucket>>, Error> {
    let month = query.parse()?;

    summarise_month(&state, month, price_histogram).map(Json)
}

/// A route handler for the number of transactions per category in a month.
pub async fn get_category_breakdown_endpoint(
    State(state): State<StatisticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CategoryBreakdown>, Error> {
    let month = query.parse()?;

    summarise_month(&state, month, category_breakdown).map(Json)
}

/// A route handler for all three summaries of a month, from a single fetch.
pub async fn get_combined_endpoint(
    State(state): State<StatisticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlyReport>, Error> {
    let month = query.parse()?;

    summarise_month(&state, month, MonthlyReport::from_transactions).map(Json)
}
