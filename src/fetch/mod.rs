//! HTTP retrieval of the comments payload.

mod client;

pub use client::{BasicClient, HttpClient};

use tracing::debug;

use crate::error::FetchError;

/// Issues a single `GET` and returns the body of a successful response.
///
/// Non-2xx statuses become [`FetchError::HttpStatus`]. No retries.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>, FetchError> {
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| FetchError::ConnectionFailure(format!("invalid URL {url}: {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?;

    debug!(url, bytes = bytes.len(), "Response body received");
    Ok(bytes.to_vec())
}
