// src/fetch/download.rs

use reqwest::Client;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::error::RefreshError;

/// GET `url` and return the whole body.
///
/// A transport failure or timeout is `RefreshError::Fetch`; any non-2xx
/// status, 3xx included, is `RefreshError::Status`.
#[instrument(level = "debug", skip(client))]
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, RefreshError> {
    let start = Instant::now();
    let fetch_err = |source| RefreshError::Fetch {
        url: url.to_string(),
        source,
    };

    let resp = client.get(url).send().await.map_err(fetch_err)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(RefreshError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = resp.bytes().await.map_err(fetch_err)?;

    debug!(%status, bytes = body.len(), elapsed = ?start.elapsed(), "downloaded");
    Ok(body.to_vec())
}
