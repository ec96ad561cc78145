//! Monthly sale statistics: totals, a price histogram and a category breakdown.

mod aggregation;
mod handlers;

pub use aggregation::{CategoryBreakdown, HistogramBucket, MonthlyReport, Statistics};
pub use handlers::{
    get_category_breakdown_endpoint, get_combined_endpoint, get_histogram_endpoint,
    get_statistics_endpoint,
};
