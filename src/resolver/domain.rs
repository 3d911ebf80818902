//! Internal domain models for stream resolution.
//!
//! These types are OUR types - they don't change when upstream APIs change.
//! All upstream responses get converted into these types via adapters, with
//! one exception: instance-pool lookups deliberately pass the raw upstream
//! JSON through as an opaque payload.

use serde::Serialize;
use serde_json::Value;

/// One resolution request, as parsed from the inbound query string.
///
/// `id` is always present. The hints are optional: `title` enables the
/// metadata-search strategy, and `author` + `duration` together enable the
/// full scoring pass (either one alone does not).
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    /// External video identifier used by the instance-pool lookups
    pub id: String,
    /// Track title, enables metadata search
    pub title: Option<String>,
    /// Artist name(s), comma/ampersand separated
    pub author: Option<String>,
    /// Expected track duration in seconds
    pub duration: Option<u32>,
}

impl ResolutionRequest {
    /// Create a request with only an identifier (no hints).
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            author: None,
            duration: None,
        }
    }

    /// Non-empty title hint, if one was given.
    pub fn title_hint(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Strict scoring hints - present only when BOTH author and duration
    /// were supplied. With either missing the scorer trusts upstream
    /// relevance ranking instead.
    pub fn scoring_hints(&self) -> Option<ScoringHints> {
        let author = self.author.as_deref().filter(|a| !a.is_empty())?;
        let duration_secs = self.duration?;
        Some(ScoringHints {
            author: author.to_string(),
            duration_secs,
        })
    }
}

/// Hints that activate the full scoring pass.
#[derive(Debug, Clone)]
pub struct ScoringHints {
    /// Artist name(s), split on `,` and `&` during scoring
    pub author: String,
    /// Expected duration in seconds
    pub duration_secs: u32,
}

/// One search hit from the metadata-search service. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Track name
    pub name: String,
    /// Primary credited artists, in upstream order
    pub primary_artists: Vec<String>,
    /// Featured artists, in upstream order
    pub featured_artists: Vec<String>,
    /// Duration in seconds, when upstream reports one
    pub duration_secs: Option<u32>,
    /// Download links ordered worst-to-best quality (upstream convention)
    pub download_variants: Vec<MediaVariant>,
    /// Thumbnail links ordered worst-to-best quality (upstream convention)
    pub thumbnail_variants: Vec<MediaVariant>,
    /// Canonical track page URL
    pub canonical_url: String,
}

/// One quality variant of a downloadable asset (audio or thumbnail).
#[derive(Debug, Clone, PartialEq)]
pub struct MediaVariant {
    /// Quality label, e.g. "320kbps" or "500x500"
    pub quality: String,
    pub url: String,
}

/// Which strategy produced a result. The serialized names are part of the
/// response contract - do not rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    #[serde(rename = "saavn")]
    Saavn,
    #[serde(rename = "instanceA")]
    InstanceA,
    #[serde(rename = "instanceB")]
    InstanceB,
}

impl SourceKind {
    /// Strict fallback order walked by the orchestrator.
    pub const FALLBACK_ORDER: [SourceKind; 3] =
        [SourceKind::Saavn, SourceKind::InstanceA, SourceKind::InstanceB];

    /// Wire name used in responses and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Saavn => "saavn",
            SourceKind::InstanceA => "instanceA",
            SourceKind::InstanceB => "instanceB",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal artifact of a successful resolution. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedResult {
    /// Which strategy answered
    pub source: SourceKind,
    /// Serving instance URL - present only for instance-pool sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Source-specific payload: a normalized track object for saavn,
    /// the raw upstream JSON for instance lookups
    pub payload: Value,
}

/// Outcome of a single strategy once the whole request has finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    /// Strategy was not applicable (saavn without a title hint)
    Skipped,
    /// Strategy was tried and did not produce a result
    Failed,
}

/// Per-strategy status map, built up as the orchestrator walks the fallback
/// chain. Field names are the response contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempts {
    pub saavn: AttemptStatus,
    pub instance_a: AttemptStatus,
    pub instance_b: AttemptStatus,
}

impl Default for Attempts {
    fn default() -> Self {
        Self {
            saavn: AttemptStatus::Failed,
            instance_a: AttemptStatus::Failed,
            instance_b: AttemptStatus::Failed,
        }
    }
}

impl Attempts {
    /// Record the outcome for one strategy.
    pub fn set(&mut self, kind: SourceKind, status: AttemptStatus) {
        match kind {
            SourceKind::Saavn => self.saavn = status,
            SourceKind::InstanceA => self.instance_a = status,
            SourceKind::InstanceB => self.instance_b = status,
        }
    }
}

/// All strategies exhausted without a usable result.
#[derive(Debug, Clone, thiserror::Error)]
#[error("all resolution strategies failed")]
pub struct ResolutionFailure {
    /// What happened to each strategy
    pub attempts: Attempts,
}

/// Errors that can occur while resolving against an upstream.
///
/// Callers treat `Timeout` and `Network` identically - both mean "this
/// instance did not answer in time".
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("failed to parse upstream response: {0}")]
    MalformedResponse(String),

    #[error("no candidate cleared the confidence floor")]
    NoConfidentMatch,

    #[error("every configured instance failed")]
    Exhausted,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
