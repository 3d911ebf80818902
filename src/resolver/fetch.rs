//! Timeout-bounded HTTP fetch.
//!
//! Every upstream call in this crate goes through [`get_json`] - no
//! unbounded waits anywhere. One timer covers the whole exchange (connect,
//! request, body read); when it fires the in-flight call is dropped and the
//! attempt fails with [`ResolveError::Timeout`].

use std::time::Duration;

use serde_json::Value;

use crate::resolver::domain::ResolveError;

/// Default budget for metadata-search calls.
pub const SEARCH_TIMEOUT_MS: u64 = 10_000;

/// Default budget for instance-pool lookups.
pub const INSTANCE_TIMEOUT_MS: u64 = 8_000;

/// Build the shared HTTP client.
///
/// Accepts gzip-compressed responses and identifies the application via
/// User-Agent (some upstreams reject anonymous clients).
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .gzip(true)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .expect("Failed to build HTTP client")
}

/// GET a URL and parse the body as JSON, bounded by `timeout_ms`.
///
/// Error mapping:
/// - deadline expiry -> [`ResolveError::Timeout`]
/// - transport error (DNS, refused connection, abort) -> [`ResolveError::Network`]
/// - non-2xx status -> [`ResolveError::UpstreamStatus`]
/// - 2xx with an unparseable body -> [`ResolveError::MalformedResponse`]
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    timeout_ms: u64,
) -> Result<Value, ResolveError> {
    let exchange = async {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::UpstreamStatus(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ResolveError::MalformedResponse(e.to_string()))
    };

    tokio::time::timeout(Duration::from_millis(timeout_ms), exchange)
        .await
        .map_err(|_| ResolveError::Timeout(timeout_ms))?
}
