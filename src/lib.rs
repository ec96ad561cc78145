//! A reporting dashboard for product sale transactions.
//!
//! The library seeds a SQLite store from a remote JSON file and serves a JSON
//! API for searching the stored transactions and for monthly statistics
//! (sale totals, a price histogram and a category breakdown). It also serves a
//! server-rendered dashboard page built on the same queries.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod logging;
mod month;
mod not_found;
mod pagination;
mod routing;
mod seed;
mod statistics;
#[cfg(test)]
mod test_utils;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, create_http_client, reseed};
pub use transaction::{Transaction, TransactionBuilder, replace_all_transactions};

use crate::{html::error_view, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate_signal) => {
                terminate_signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The month in a request is not one of the twelve English month names.
    ///
    /// The string is the month exactly as the client sent it, and is empty
    /// when the month was missing from the request.
    #[error("\"{0}\" is not a valid month name")]
    InvalidMonth(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The remote seed file could not be downloaded.
    ///
    /// The string describes the underlying HTTP or network error.
    #[error("could not fetch the seed data: {0}")]
    SeedFetchError(String),

    /// The remote seed file was downloaded but is not a list of valid records.
    ///
    /// The stored transactions are left untouched when this error occurs.
    #[error("the seed data is invalid: {0}")]
    InvalidSeedPayload(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to API clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    /// The HTTP status code that a client should see for this error.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidMonth(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::SERVICE_UNAVAILABLE,
            Error::SeedFetchError(_) | Error::InvalidSeedPayload(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The message shown to the client.
    ///
    /// SQL errors are only logged on the server, the client gets a generic
    /// message telling them to retry.
    fn client_message(&self) -> String {
        match self {
            Error::SqlError(_) | Error::DatabaseLockError => {
                "The transaction store is unavailable, try again later.".to_owned()
            }
            error => {
                let message = error.to_string();
                let mut chars = message.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => message,
                }
            }
        }
    }

    /// Render the error as a full HTML page for the dashboard.
    fn into_html_response(self) -> Response {
        match self {
            Error::InvalidMonth(month) => (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Invalid Month",
                    "400",
                    &format!("\"{month}\" is not a month"),
                    "Pick a month from January to December.",
                ),
            )
                .into_response(),
            Error::NotFound => get_404_not_found_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                let status = error.status_code();

                (
                    status,
                    error_view(
                        "Something Went Wrong",
                        status.as_str(),
                        &error.client_message(),
                        "Try again in a moment or check the server logs.",
                    ),
                )
                    .into_response()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::InvalidMonth(_) | Error::NotFound => {}
            error => tracing::error!("An unexpected error occurred: {}", error),
        }

        (
            self.status_code(),
            Json(ErrorBody {
                error: self.client_message(),
            }),
        )
            .into_response()
    }
}
