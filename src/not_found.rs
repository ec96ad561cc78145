//! The responses for requests that match no route.

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::{Error, endpoints, html::error_view};

/// The fallback route handler.
///
/// Requests under the API prefix get a JSON error body, everything else gets
/// the HTML 404 page.
pub async fn get_404_not_found(uri: Uri) -> Response {
    if is_api_path(uri.path()) {
        Error::NotFound.into_response()
    } else {
        get_404_not_found_response()
    }
}

fn is_api_path(path: &str) -> bool {
    path == endpoints::API_PREFIX
        || path
            .strip_prefix(endpoints::API_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Something's missing.",
            "Sorry, we can't find that page.",
        ),
    )
        .into_response()
}
