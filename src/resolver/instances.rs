//! Instance-pool lookup client.
//!
//! Both instance-backed sources share this shape: an ordered list of
//! interchangeable mirror deployments plus a `{id}` path template. The pool
//! is walked in fixed priority order, one attempt per instance, and the
//! first 2xx JSON body is passed through unmodified together with the
//! instance that served it.

use serde_json::Value;

use crate::resolver::domain::{ResolveError, ResolvedResult, SourceKind};
use crate::resolver::fetch;

/// A pool of mirror instances for one source kind.
pub struct InstancePool {
    kind: SourceKind,
    http_client: reqwest::Client,
    base_urls: Vec<String>,
    path_template: String,
    timeout_ms: u64,
}

impl InstancePool {
    /// Create a pool. `path_template` must contain the literal `{id}`
    /// placeholder, e.g. `/streams/{id}`.
    pub fn new(
        kind: SourceKind,
        http_client: reqwest::Client,
        base_urls: Vec<String>,
        path_template: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            kind,
            http_client,
            base_urls,
            path_template: path_template.into(),
            timeout_ms,
        }
    }

    /// Look up an identifier, trying each instance once in list order.
    ///
    /// A failed instance (non-2xx, network error, timeout, bad body) is
    /// logged and skipped; only a fully failed walk returns
    /// [`ResolveError::Exhausted`].
    pub async fn lookup(&self, id: &str) -> Result<ResolvedResult, ResolveError> {
        for base in &self.base_urls {
            let url = self.lookup_url(base, id);
            match fetch::get_json(&self.http_client, &url, self.timeout_ms).await {
                Ok(payload) => {
                    tracing::info!(source = %self.kind, instance = %base, "instance lookup succeeded");
                    return Ok(self.to_result(base, payload));
                }
                Err(e) => {
                    tracing::warn!(source = %self.kind, instance = %base, error = %e, "instance lookup failed");
                }
            }
        }
        Err(ResolveError::Exhausted)
    }

    fn lookup_url(&self, base: &str, id: &str) -> String {
        let path = self
            .path_template
            .replace("{id}", urlencoding::encode(id).as_ref());
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    fn to_result(&self, instance: &str, payload: Value) -> ResolvedResult {
        ResolvedResult {
            source: self.kind,
            instance: Some(instance.to_string()),
            payload,
        }
    }
}
