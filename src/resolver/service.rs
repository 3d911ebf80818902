//! Resolution orchestrator - walks the fallback chain.
//!
//! Strategies run strictly sequentially, each tried only after the prior
//! one definitively failed: metadata search (only with a title hint), then
//! instance pool A, then instance pool B. The first success terminates the
//! walk; exhaustion of all three yields a [`ResolutionFailure`] carrying
//! the per-strategy attempts map. No strategy is ever retried within one
//! request.

use crate::config::Config;
use crate::resolver::domain::{
    AttemptStatus, Attempts, ResolutionFailure, ResolutionRequest, ResolveError, ResolvedResult,
    SourceKind,
};
use crate::resolver::instances::InstancePool;
use crate::resolver::saavn::SaavnClient;
use crate::resolver::scoring;
use crate::resolver::traits::{InstanceApi, SaavnApi};
use crate::resolver::fetch;

/// Outcome of one strategy attempt.
enum Outcome {
    /// Strategy produced a result - the walk ends here
    Success(ResolvedResult),
    /// Strategy was not applicable for this request
    Skipped,
    /// Strategy was tried and failed
    Failed(ResolveError),
}

/// The resolver, generic over its three sources so tests can inject mocks.
pub struct Resolver<S, A, B> {
    pub(crate) saavn: S,
    pub(crate) instance_a: A,
    pub(crate) instance_b: B,
}

impl Resolver<SaavnClient, InstancePool, InstancePool> {
    /// Wire the real clients from configuration. All three share one HTTP
    /// client.
    pub fn from_config(config: &Config) -> Self {
        let http_client = fetch::http_client();
        Self {
            saavn: SaavnClient::new(
                http_client.clone(),
                config.saavn.base_urls.clone(),
                config.saavn.timeout_ms,
            ),
            instance_a: InstancePool::new(
                SourceKind::InstanceA,
                http_client.clone(),
                config.instance_a.base_urls.clone(),
                config.instance_a.path_template.clone(),
                config.instance_a.timeout_ms,
            ),
            instance_b: InstancePool::new(
                SourceKind::InstanceB,
                http_client,
                config.instance_b.base_urls.clone(),
                config.instance_b.path_template.clone(),
                config.instance_b.timeout_ms,
            ),
        }
    }
}

impl<S: SaavnApi, A: InstanceApi, B: InstanceApi> Resolver<S, A, B> {
    /// Build a resolver from explicit sources (used by tests).
    pub fn with_sources(saavn: S, instance_a: A, instance_b: B) -> Self {
        Self {
            saavn,
            instance_a,
            instance_b,
        }
    }

    /// Resolve a request, returning the first strategy's success or the
    /// accumulated failure summary once all strategies exhaust.
    pub async fn resolve(
        &self,
        request: &ResolutionRequest,
    ) -> Result<ResolvedResult, ResolutionFailure> {
        let mut attempts = Attempts::default();

        for kind in SourceKind::FALLBACK_ORDER {
            match self.attempt(kind, request).await {
                Outcome::Success(result) => {
                    tracing::info!(id = %request.id, source = %kind, "resolved");
                    return Ok(result);
                }
                Outcome::Skipped => {
                    tracing::debug!(id = %request.id, source = %kind, "strategy skipped");
                    attempts.set(kind, AttemptStatus::Skipped);
                }
                Outcome::Failed(e) => {
                    tracing::warn!(id = %request.id, source = %kind, error = %e, "strategy failed");
                    attempts.set(kind, AttemptStatus::Failed);
                }
            }
        }

        Err(ResolutionFailure { attempts })
    }

    async fn attempt(&self, kind: SourceKind, request: &ResolutionRequest) -> Outcome {
        match kind {
            SourceKind::Saavn => self.attempt_search(request).await,
            SourceKind::InstanceA => to_outcome(self.instance_a.lookup(&request.id).await),
            SourceKind::InstanceB => to_outcome(self.instance_b.lookup(&request.id).await),
        }
    }

    /// Metadata search: applicable only with a title hint. On a non-empty
    /// result set the scorer picks the winner (or rejects everything).
    async fn attempt_search(&self, request: &ResolutionRequest) -> Outcome {
        let Some(title) = request.title_hint() else {
            return Outcome::Skipped;
        };

        let query = match request.author.as_deref().filter(|a| !a.is_empty()) {
            Some(author) => format!("{title} {author}"),
            None => title.to_string(),
        };

        let candidates = match self.saavn.search(&query).await {
            Ok(candidates) if candidates.is_empty() => {
                return Outcome::Failed(ResolveError::NoConfidentMatch);
            }
            Ok(candidates) => candidates,
            Err(e) => return Outcome::Failed(e),
        };

        let hints = request.scoring_hints();
        match scoring::select_best(candidates, title, hints.as_ref()) {
            Ok(candidate) => {
                let track = scoring::to_resolved_track(&candidate);
                match serde_json::to_value(track) {
                    Ok(payload) => Outcome::Success(ResolvedResult {
                        source: SourceKind::Saavn,
                        instance: None,
                        payload,
                    }),
                    Err(e) => Outcome::Failed(ResolveError::MalformedResponse(e.to_string())),
                }
            }
            Err(e) => Outcome::Failed(e),
        }
    }
}

fn to_outcome(result: Result<ResolvedResult, ResolveError>) -> Outcome {
    match result {
        Ok(resolved) => Outcome::Success(resolved),
        Err(e) => Outcome::Failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::traits::mocks::{MockInstance, MockSaavn};

    fn request_with_hints() -> ResolutionRequest {
        ResolutionRequest {
            id: "abc123".to_string(),
            title: Some("Imagine".to_string()),
            author: Some("John Lennon".to_string()),
            duration: Some(183),
        }
    }

    #[tokio::test]
    async fn test_no_title_skips_search_and_tries_instances() {
        // Scenario: id only. Saavn must not even be queried.
        let saavn = MockSaavn::single_match("Imagine", "John Lennon", 183);
        let a = MockInstance::succeeding(SourceKind::InstanceA, serde_json::json!({"ok": 1}));
        let b = MockInstance::exhausted(SourceKind::InstanceB);
        let resolver = Resolver::with_sources(saavn, a, b);

        let result = resolver
            .resolve(&ResolutionRequest::by_id("abc123"))
            .await
            .unwrap();
        assert_eq!(result.source, SourceKind::InstanceA);
        assert_eq!(resolver.saavn.calls(), 0);
        assert_eq!(resolver.instance_a.calls(), 1);
        assert_eq!(resolver.instance_b.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_success_short_circuits() {
        let saavn = MockSaavn::single_match("Imagine", "John Lennon", 181);
        let a = MockInstance::succeeding(SourceKind::InstanceA, serde_json::json!({"ok": 1}));
        let b = MockInstance::succeeding(SourceKind::InstanceB, serde_json::json!({"ok": 2}));
        let resolver = Resolver::with_sources(saavn, a, b);

        let result = resolver.resolve(&request_with_hints()).await.unwrap();
        assert_eq!(result.source, SourceKind::Saavn);
        assert!(result.instance.is_none());
        assert_eq!(result.payload["title"], "Imagine");
        assert_eq!(result.payload["artists"], "John Lennon");
        assert_eq!(resolver.instance_a.calls(), 0);
        assert_eq!(resolver.instance_b.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_confident_match_falls_through_to_instance_a() {
        // Wrong artist and a 45s duration gap: ineligible, search fails.
        let saavn = MockSaavn::single_match("Imagine", "Cover Band", 228);
        let a = MockInstance::succeeding(SourceKind::InstanceA, serde_json::json!({"ok": 1}));
        let b = MockInstance::exhausted(SourceKind::InstanceB);
        let resolver = Resolver::with_sources(saavn, a, b);

        let result = resolver.resolve(&request_with_hints()).await.unwrap();
        assert_eq!(result.source, SourceKind::InstanceA);
        assert_eq!(resolver.saavn.calls(), 1);
        assert_eq!(resolver.instance_a.calls(), 1);
    }

    #[tokio::test]
    async fn test_fallback_is_monotonic() {
        // Search fails, A fails, B answers. Every strategy tried exactly once.
        let saavn = MockSaavn::with_error(ResolveError::Timeout(10_000));
        let a = MockInstance::exhausted(SourceKind::InstanceA);
        let b = MockInstance::succeeding(SourceKind::InstanceB, serde_json::json!({"ok": 2}));
        let resolver = Resolver::with_sources(saavn, a, b);

        let result = resolver.resolve(&request_with_hints()).await.unwrap();
        assert_eq!(result.source, SourceKind::InstanceB);
        assert_eq!(resolver.saavn.calls(), 1);
        assert_eq!(resolver.instance_a.calls(), 1);
        assert_eq!(resolver.instance_b.calls(), 1);
    }

    #[tokio::test]
    async fn test_all_strategies_exhausted() {
        let saavn = MockSaavn::no_results();
        let a = MockInstance::exhausted(SourceKind::InstanceA);
        let b = MockInstance::exhausted(SourceKind::InstanceB);
        let resolver = Resolver::with_sources(saavn, a, b);

        let failure = resolver.resolve(&request_with_hints()).await.unwrap_err();
        assert_eq!(failure.attempts.saavn, AttemptStatus::Failed);
        assert_eq!(failure.attempts.instance_a, AttemptStatus::Failed);
        assert_eq!(failure.attempts.instance_b, AttemptStatus::Failed);
    }

    #[tokio::test]
    async fn test_skipped_search_recorded_in_failure() {
        let saavn = MockSaavn::no_results();
        let a = MockInstance::exhausted(SourceKind::InstanceA);
        let b = MockInstance::exhausted(SourceKind::InstanceB);
        let resolver = Resolver::with_sources(saavn, a, b);

        let failure = resolver
            .resolve(&ResolutionRequest::by_id("abc123"))
            .await
            .unwrap_err();
        assert_eq!(failure.attempts.saavn, AttemptStatus::Skipped);
        assert_eq!(failure.attempts.instance_a, AttemptStatus::Failed);
        assert_eq!(failure.attempts.instance_b, AttemptStatus::Failed);
        assert_eq!(resolver.saavn.calls(), 0);
    }

    #[tokio::test]
    async fn test_title_without_strict_hints_takes_first_result() {
        // No author/duration: the first candidate wins even with an odd
        // duration, because no scoring pass runs.
        let saavn = MockSaavn::single_match("Imagine", "Cover Band", 999);
        let a = MockInstance::exhausted(SourceKind::InstanceA);
        let b = MockInstance::exhausted(SourceKind::InstanceB);
        let resolver = Resolver::with_sources(saavn, a, b);

        let request = ResolutionRequest {
            title: Some("Imagine".to_string()),
            ..ResolutionRequest::by_id("abc123")
        };
        let result = resolver.resolve(&request).await.unwrap();
        assert_eq!(result.source, SourceKind::Saavn);
        assert_eq!(result.payload["artists"], "Cover Band");
    }
}
