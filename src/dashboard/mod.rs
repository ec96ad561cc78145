//! Dashboard module
//!
//! Provides the page showing the searchable transaction table alongside the
//! statistics and charts for one month.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
