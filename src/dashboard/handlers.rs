//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    dashboard::{
        charts::{
            DashboardChart, ECHARTS_SCRIPT_URL, category_chart, charts_script, charts_view,
            price_range_chart,
        },
        tables::{pagination_nav, statistics_box, transactions_table},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, base, link,
    },
    month::{DEFAULT_MONTH, MONTHS, parse_month},
    pagination::{PageWindow, PaginationConfig, create_pagination_indicators},
    statistics::MonthlyReport,
    transaction::{
        SearchFilter, SearchResults, get_transactions_in_month, search_transactions,
    },
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The page size and how many page links to show.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query string for the dashboard page.
///
/// This is also used to build the page links, so it serializes back to the
/// same form.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct DashboardQuery {
    /// The month to summarise, [DEFAULT_MONTH] if not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Free text to filter the transaction table by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// The page of the transaction table to show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

/// Everything shown on the dashboard, read in one go while holding the
/// database lock.
struct DashboardData {
    month: Month,
    search: String,
    window: PageWindow,
    results: SearchResults,
    report: MonthlyReport,
}

/// Display the transaction table, the statistics for the selected month and
/// the charts for that month.
///
/// The table is not filtered by month, only by the search text.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    match load_dashboard_data(&state, &query) {
        Ok(data) => dashboard_view(&data, state.pagination_config.max_pages).into_response(),
        Err(error) => error.into_html_response(),
    }
}

fn load_dashboard_data(
    state: &DashboardState,
    query: &DashboardQuery,
) -> Result<DashboardData, Error> {
    let month = match query.month.as_deref().map(str::trim) {
        Some(month) if !month.is_empty() => parse_month(month)?,
        _ => DEFAULT_MONTH,
    };
    let search = query.search.clone().unwrap_or_default();
    let filter = SearchFilter::new(&search);
    let window = PageWindow::from_query(query.page.as_deref(), None, &state.pagination_config);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let results = search_transactions(&filter, window, &connection)
        .inspect_err(|error| tracing::error!("could not search transactions: {error}"))?;
    let month_transactions = get_transactions_in_month(month, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions for {month}: {error}"))?;

    Ok(DashboardData {
        month,
        search,
        window,
        results,
        report: MonthlyReport::from_transactions(&month_transactions),
    })
}

/// The dashboard URL for `page` that keeps the current month and search.
fn page_url(month: Month, search: &str, page: u64) -> String {
    let query = DashboardQuery {
        month: Some(month.to_string()),
        search: (!search.is_empty()).then(|| search.to_owned()),
        page: Some(page.to_string()),
    };

    match serde_urlencoded::to_string(&query) {
        Ok(query_string) => format!("{}?{query_string}", endpoints::DASHBOARD_VIEW),
        Err(error) => {
            tracing::error!("could not encode dashboard query: {error}");
            endpoints::DASHBOARD_VIEW.to_owned()
        }
    }
}

fn filter_form(month: Month, search: &str) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full flex flex-col sm:flex-row sm:items-end gap-4 mb-6"
        {
            div class="grow"
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search transaction" }
                input
                    type="search"
                    name="search"
                    id="search"
                    placeholder="Title, description or exact price"
                    value=(search)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                select name="month" id="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for option in MONTHS {
                        option value=(option) selected[option == month] { (option) }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    }
}

fn dashboard_view(data: &DashboardData, max_pages: u64) -> Markup {
    let charts = [
        DashboardChart {
            id: "price-range-chart",
            options: price_range_chart(data.month, &data.report.histogram).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(data.month, &data.report.category_breakdown).to_string(),
        },
    ];

    let page_count = data.window.page_count(data.results.total);
    let indicators = create_pagination_indicators(data.window.page, page_count, max_pages);

    let content = html!(
        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h1 class="text-3xl font-bold mb-6" { "Transaction Dashboard" }

            (filter_form(data.month, &data.search))

            section id="transactions-section" class="w-full mb-8"
            {
                p class="text-sm text-gray-600 dark:text-gray-400 mb-2"
                {
                    (data.results.total) " transactions found. Raw data is available from "
                    (link(endpoints::TRANSACTIONS_API, "the JSON API"))
                    "."
                }

                (transactions_table(&data.results.transactions))

                (pagination_nav(&indicators, |page| page_url(data.month, &data.search, page)))
            }

            (statistics_box(data.month, &data.report.statistics))

            (charts_view(&charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
