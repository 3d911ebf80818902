//! Saavn search API Data Transfer Objects
//!
//! These types match EXACTLY what the search API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the saavn module - convert to domain types.
//!
//! The endpoint is `/api/search/songs?query=...` on any configured mirror,
//! responding with `{ success, data: { results: [...] } }`.

use serde::{Deserialize, Serialize};

/// Top-level search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    /// Upstream success flag - false means the API rejected the query
    pub success: bool,
    /// Payload, absent on failure
    pub data: Option<SearchData>,
}

/// Search payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchData {
    /// Search hits in upstream relevance order
    #[serde(default)]
    pub results: Vec<SongResult>,
}

/// One song hit
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongResult {
    /// Track name
    pub name: String,
    /// Duration in seconds (sometimes missing)
    pub duration: Option<u32>,
    /// Canonical track page URL
    pub url: Option<String>,
    /// Credited artists
    #[serde(default)]
    pub artists: ArtistCredits,
    /// Thumbnail variants, worst-to-best
    #[serde(default)]
    pub image: Vec<QualityLink>,
    /// Download variants, worst-to-best
    #[serde(default)]
    pub download_url: Vec<QualityLink>,
}

/// Artist credit groups
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArtistCredits {
    #[serde(default)]
    pub primary: Vec<ArtistRef>,
    #[serde(default)]
    pub featured: Vec<ArtistRef>,
}

/// One credited artist
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistRef {
    pub name: String,
}

/// Quality-tagged link (audio or image)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QualityLink {
    /// Quality label, e.g. "320kbps" or "500x500"
    pub quality: Option<String>,
    pub url: String,
}
