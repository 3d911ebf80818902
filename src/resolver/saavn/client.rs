//! Saavn search HTTP client
//!
//! Walks the configured mirror list in order, one attempt per mirror, and
//! short-circuits on the first parseable response. Per-mirror failures are
//! logged and swallowed; only an empty-handed walk surfaces as
//! [`ResolveError::Exhausted`].

use super::adapter;
use super::dto;
use crate::resolver::domain::{Candidate, ResolveError};
use crate::resolver::fetch;

/// Saavn search client
pub struct SaavnClient {
    http_client: reqwest::Client,
    base_urls: Vec<String>,
    timeout_ms: u64,
}

impl SaavnClient {
    /// Create a client over an ordered mirror list (first = most preferred).
    pub fn new(
        http_client: reqwest::Client,
        base_urls: Vec<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            http_client,
            base_urls,
            timeout_ms,
        }
    }

    /// Search for songs, returning candidates in upstream relevance order.
    ///
    /// Each mirror gets exactly one attempt per call, in list order.
    pub async fn search(&self, query: &str) -> Result<Vec<Candidate>, ResolveError> {
        for base in &self.base_urls {
            let url = self.search_url(base, query);
            match self.fetch_results(&url).await {
                Ok(candidates) => return Ok(candidates),
                Err(e) => {
                    tracing::warn!(mirror = %base, error = %e, "saavn search attempt failed");
                }
            }
        }
        Err(ResolveError::Exhausted)
    }

    fn search_url(&self, base: &str, query: &str) -> String {
        format!(
            "{}/api/search/songs?query={}",
            base.trim_end_matches('/'),
            urlencoding::encode(query)
        )
    }

    async fn fetch_results(&self, url: &str) -> Result<Vec<Candidate>, ResolveError> {
        let body = fetch::get_json(&self.http_client, url, self.timeout_ms).await?;
        let response: dto::SearchResponse = serde_json::from_value(body)
            .map_err(|e| ResolveError::MalformedResponse(e.to_string()))?;
        adapter::to_candidates(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let client = SaavnClient::new(
            fetch::http_client(),
            vec!["https://saavn.example.com/".to_string()],
            fetch::SEARCH_TIMEOUT_MS,
        );
        let url = client.search_url(&client.base_urls[0], "Imagine John Lennon");
        assert_eq!(
            url,
            "https://saavn.example.com/api/search/songs?query=Imagine%20John%20Lennon"
        );
    }

    #[tokio::test]
    async fn test_empty_mirror_list_is_exhausted() {
        let client = SaavnClient::new(fetch::http_client(), vec![], fetch::SEARCH_TIMEOUT_MS);
        let result = client.search("anything").await;
        assert!(matches!(result, Err(ResolveError::Exhausted)));
    }
}
