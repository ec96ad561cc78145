//! Helpers for checking the HTML pages in tests.

#![allow(missing_docs)]

use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

/// Check the status and content type of `response`, then parse its body as an
/// HTML document.
pub(crate) async fn parse_html_page(response: Response<Body>, status: u16) -> Html {
    assert_eq!(response.status().as_u16(), status);
    let content_type = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type, "text/html; charset=utf-8");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");
    let html = Html::parse_document(&String::from_utf8_lossy(&body));

    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );

    html
}

/// The trimmed text of every element matching the CSS `selector`.
#[track_caller]
pub(crate) fn select_texts(html: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).expect("Could not parse selector");

    html.select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_owned())
        .collect()
}

/// The value of `attribute` on every element matching the CSS `selector`.
#[track_caller]
pub(crate) fn select_attributes(html: &Html, selector: &str, attribute: &str) -> Vec<String> {
    let selector = Selector::parse(selector).expect("Could not parse selector");

    html.select(&selector)
        .filter_map(|element| element.value().attr(attribute).map(str::to_owned))
        .collect()
}
