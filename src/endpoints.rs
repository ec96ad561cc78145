//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The server-rendered dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The route that replaces the stored transactions with the seed file.
pub const INITIALIZE_API: &str = "/api/initialize";
/// The route for searching transactions a page at a time.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for the sale totals of a month.
pub const STATISTICS_API: &str = "/api/statistics";
/// The route for the price histogram of a month.
pub const HISTOGRAM_API: &str = "/api/histogram";
/// Another name for [HISTOGRAM_API], kept for older clients.
pub const BAR_CHART_API: &str = "/api/bar-chart";
/// The route for the category breakdown of a month.
pub const CATEGORY_BREAKDOWN_API: &str = "/api/category-breakdown";
/// Another name for [CATEGORY_BREAKDOWN_API], kept for older clients.
pub const PIE_CHART_API: &str = "/api/pie-chart";
/// The route for all three monthly summaries at once.
pub const COMBINED_API: &str = "/api/combined";
/// The route for checking that the server is up.
pub const HEALTH_API: &str = "/api/health";

/// The prefix shared by the JSON API routes.
pub const API_PREFIX: &str = "/api";
