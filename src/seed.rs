//! Fetches the remote seed file and replaces the stored transactions with it.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{
    AppState, Error,
    transaction::{Transaction, replace_all_transactions},
};

/// Where the product transaction seed file is downloaded from by default.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

const SEED_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Create the HTTP client used to download the seed file.
///
/// # Errors
/// Returns [Error::SeedFetchError] if the client cannot be built, e.g. when
/// the TLS backend fails to initialize.
pub fn create_http_client() -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(SEED_REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|error| Error::SeedFetchError(error.to_string()))
}

/// One element of the seed file, as it appears on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedRecord {
    id: i64,
    title: String,
    price: f64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    sold: bool,
    date_of_sale: String,
}

/// Parse a sale date written either as an RFC 3339 date-time or as a plain
/// `YYYY-MM-DD` date.
///
/// A date-time keeps the calendar date in its own offset, so
/// "2021-11-27T20:29:54+05:30" is the 27th.
fn parse_date_of_sale(text: &str) -> Option<Date> {
    OffsetDateTime::parse(text, &Rfc3339)
        .map(|date_time| date_time.date())
        .or_else(|_| Date::parse(text, format_description!("[year]-[month]-[day]")))
        .ok()
}

impl SeedRecord {
    fn into_transaction(self, index: usize) -> Result<Transaction, Error> {
        let date_of_sale = parse_date_of_sale(&self.date_of_sale).ok_or_else(|| {
            Error::InvalidSeedPayload(format!(
                "record {index} has an invalid date of sale \"{}\"",
                self.date_of_sale
            ))
        })?;

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidSeedPayload(format!(
                "record {index} has an invalid price {}",
                self.price
            )));
        }

        Ok(Transaction::build(self.id, self.price, date_of_sale)
            .title(&self.title)
            .description(&self.description)
            .category(&self.category)
            .sold(self.sold)
            .image(self.image)
            .finalize())
    }
}

/// Validate a downloaded seed file and convert it to transactions.
///
/// The whole payload is checked before anything is returned, so a single bad
/// record rejects the file.
///
/// # Errors
/// Returns [Error::InvalidSeedPayload] if the payload is not a JSON array, or
/// if any element is missing a required field, has a date that cannot be
/// parsed or has a negative price.
pub fn parse_seed_payload(payload: &[u8]) -> Result<Vec<Transaction>, Error> {
    let value: serde_json::Value = serde_json::from_slice(payload)
        .map_err(|error| Error::InvalidSeedPayload(format!("not valid JSON: {error}")))?;

    let serde_json::Value::Array(elements) = value else {
        return Err(Error::InvalidSeedPayload("expected a list".to_owned()));
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value::<SeedRecord>(element)
                .map_err(|error| Error::InvalidSeedPayload(format!("record {index}: {error}")))?
                .into_transaction(index)
        })
        .collect()
}

/// Download the raw seed file from `url`.
///
/// # Errors
/// Returns [Error::SeedFetchError] if the request fails or the server does not
/// answer with a success status.
async fn fetch_seed_payload(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, Error> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::SeedFetchError(error.to_string()))?;

    let body = response
        .bytes()
        .await
        .map_err(|error| Error::SeedFetchError(error.to_string()))?;

    Ok(body.to_vec())
}

/// Replace the stored transactions with the contents of the seed file at `url`.
///
/// The database lock is only taken once the file has been downloaded and
/// validated. Any failure before then leaves the stored transactions as they
/// were.
///
/// Returns the number of transactions stored.
///
/// # Errors
/// Returns:
/// - [Error::SeedFetchError] if the file cannot be downloaded,
/// - [Error::InvalidSeedPayload] if the file is not a list of valid records,
/// - [Error::DatabaseLockError] or [Error::SqlError] if the store cannot be updated.
pub async fn reseed(
    client: &reqwest::Client,
    url: &str,
    db_connection: &Mutex<Connection>,
) -> Result<usize, Error> {
    tracing::info!("Fetching seed data from {url}");

    let payload = fetch_seed_payload(client, url).await?;
    let transactions = parse_seed_payload(&payload)?;

    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    replace_all_transactions(&transactions, &connection)
}

/// The state needed for reseeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for replacing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client used to download the seed file.
    pub http_client: reqwest::Client,
    /// Where to download the seed file from.
    pub seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

/// The response body for a successful reseed.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedResponse {
    /// A human readable confirmation.
    pub message: String,
    /// The number of transactions now stored.
    pub count: usize,
}

/// A route handler that replaces the stored transactions with a fresh copy of
/// the seed file.
pub async fn initialize_database_endpoint(
    State(state): State<SeedState>,
) -> Result<Json<SeedResponse>, Error> {
    let count = reseed(&state.http_client, &state.seed_url, &state.db_connection)
        .await
        .inspect_err(|error| tracing::error!("could not reseed the database: {error}"))?;

    Ok(Json(SeedResponse {
        message: "Database initialized successfully!".to_owned(),
        count,
    }))
}
