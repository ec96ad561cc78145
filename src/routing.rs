//! Application router configuration.

use axum::{
    Json, Router,
    response::Redirect,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    seed::initialize_database_endpoint,
    statistics::{
        get_category_breakdown_endpoint, get_combined_endpoint, get_histogram_endpoint,
        get_statistics_endpoint,
    },
    transaction::get_transactions_endpoint,
};

/// Return a router with all the app's routes.
///
/// The JSON API accepts requests from any origin. Reseeding answers both GET
/// and POST so older clients that fetch the initialize route keep working.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::INITIALIZE_API,
            post(initialize_database_endpoint).get(initialize_database_endpoint),
        )
        .route(endpoints::TRANSACTIONS_API, get(get_transactions_endpoint))
        .route(endpoints::STATISTICS_API, get(get_statistics_endpoint))
        .route(endpoints::HISTOGRAM_API, get(get_histogram_endpoint))
        .route(endpoints::BAR_CHART_API, get(get_histogram_endpoint))
        .route(
            endpoints::CATEGORY_BREAKDOWN_API,
            get(get_category_breakdown_endpoint),
        )
        .route(
            endpoints::PIE_CHART_API,
            get(get_category_breakdown_endpoint),
        )
        .route(endpoints::COMBINED_API, get(get_combined_endpoint))
        .route(endpoints::HEALTH_API, get(get_health));

    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page));

    api_routes
        .merge(page_routes)
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

/// Lets load balancers and scripts check that the server is up.
async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}
