//! Adapter layer: Convert saavn DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! If the search API changes its response format, only this file and
//! dto.rs need to change.

use super::dto;
use crate::resolver::domain::{Candidate, MediaVariant, ResolveError};

/// Convert a search response to domain candidates, preserving upstream
/// relevance order.
pub fn to_candidates(response: dto::SearchResponse) -> Result<Vec<Candidate>, ResolveError> {
    if !response.success {
        return Err(ResolveError::MalformedResponse(
            "upstream reported failure".to_string(),
        ));
    }
    let Some(data) = response.data else {
        return Err(ResolveError::MalformedResponse(
            "missing data field".to_string(),
        ));
    };

    Ok(data.results.into_iter().map(to_candidate).collect())
}

fn to_candidate(result: dto::SongResult) -> Candidate {
    Candidate {
        primary_artists: result.artists.primary.into_iter().map(|a| a.name).collect(),
        featured_artists: result
            .artists
            .featured
            .into_iter()
            .map(|a| a.name)
            .collect(),
        duration_secs: result.duration,
        download_variants: result.download_url.into_iter().map(to_variant).collect(),
        thumbnail_variants: result.image.into_iter().map(to_variant).collect(),
        canonical_url: result.url.unwrap_or_default(),
        name: result.name,
    }
}

fn to_variant(link: dto::QualityLink) -> MediaVariant {
    MediaVariant {
        quality: link.quality.unwrap_or_default(),
        url: link.url,
    }
}
