//! Candidate scoring and best-of selection.
//!
//! Two independent, composable policies:
//! - **First-candidate policy**: without both an author and a duration hint,
//!   the first search hit wins unconditionally - upstream relevance ranking
//!   is trusted as-is.
//! - **Full scoring pass**: with both hints present, every candidate gets a
//!   weighted composite of artist-token match ratio, duration proximity and
//!   title similarity. A candidate must clear a cheap eligibility gate to be
//!   ranked at all, and the winner must clear an absolute confidence floor
//!   to be accepted.
//!
//! The two-tier design avoids accepting a wrong track just because it ranked
//! best among bad options, without being too strict for queries that lack
//! duration precision.
//!
//! All thresholds are empirical tuning constants - keep them named, never
//! inline them.

use serde::Serialize;

use crate::resolver::domain::{Candidate, ResolveError, ScoringHints};

/// Minimum fraction of author-hint tokens a candidate must match to be
/// eligible (unless its duration is close, see [`DURATION_CLOSE_SECS`]).
pub const MIN_ARTIST_RATIO: f32 = 0.5;

/// A duration difference below this many seconds makes a candidate eligible
/// even with a poor artist match.
pub const DURATION_CLOSE_SECS: u32 = 10;

/// Duration credit window: full credit at 0s difference, zero at or beyond
/// this many seconds.
pub const DURATION_WINDOW_SECS: f32 = 60.0;

/// Minimum composite score the winning candidate must reach; below it the
/// whole search is treated as a miss.
pub const CONFIDENCE_FLOOR: f32 = 5.0;

/// Stand-in duration difference for candidates that report no duration, so
/// they score poorly instead of crashing the pass.
pub const MISSING_DURATION_SENTINEL: u32 = 999;

const ARTIST_WEIGHT: f32 = 10.0;
const DURATION_WEIGHT: f32 = 3.0;
const TITLE_WEIGHT: f32 = 1.0;

/// Credit for a title that does not contain (nor is contained by) the hint.
const PARTIAL_TITLE_CREDIT: f32 = 0.5;

/// Score breakdown for one candidate. Ephemeral - computed once during
/// selection and discarded afterwards.
#[derive(Debug, Clone)]
pub struct MatchScore {
    /// Matched author-hint tokens / total tokens, in [0, 1]
    pub artist_ratio: f32,
    /// Absolute duration difference in seconds (sentinel when unknown)
    pub duration_diff: u32,
    /// Duration proximity credit in [0, 1]
    pub duration_score: f32,
    /// 1.0 on bidirectional title containment, else partial credit
    pub title_score: f32,
    /// Weighted sum used for ranking
    pub composite: f32,
}

impl MatchScore {
    /// Cheap gate applied before composite ranking: a candidate competes
    /// only with a decent artist match or a near-exact duration.
    pub fn eligible(&self) -> bool {
        self.artist_ratio >= MIN_ARTIST_RATIO || self.duration_diff < DURATION_CLOSE_SECS
    }
}

/// Select the best candidate for a title hint, or reject them all.
///
/// Without scoring hints this returns the first candidate unconditionally.
/// With hints, only eligible candidates are ranked by composite (ties keep
/// the earliest), and the winner must reach [`CONFIDENCE_FLOOR`] or the
/// result is [`ResolveError::NoConfidentMatch`].
pub fn select_best(
    candidates: Vec<Candidate>,
    title: &str,
    hints: Option<&ScoringHints>,
) -> Result<Candidate, ResolveError> {
    let Some(hints) = hints else {
        return candidates
            .into_iter()
            .next()
            .ok_or(ResolveError::NoConfidentMatch);
    };

    let tokens = split_author_tokens(&hints.author);
    let mut best: Option<(MatchScore, Candidate)> = None;

    for candidate in candidates {
        let score = score_candidate(&candidate, title, &tokens, hints.duration_secs);
        tracing::debug!(
            name = %candidate.name,
            artist_ratio = score.artist_ratio,
            duration_diff = score.duration_diff,
            composite = score.composite,
            eligible = score.eligible(),
            "scored candidate"
        );

        if !score.eligible() {
            continue;
        }
        // Strict comparison keeps the earliest candidate on ties.
        if best
            .as_ref()
            .is_none_or(|(held, _)| score.composite > held.composite)
        {
            best = Some((score, candidate));
        }
    }

    match best {
        Some((score, candidate)) if score.composite >= CONFIDENCE_FLOOR => Ok(candidate),
        _ => Err(ResolveError::NoConfidentMatch),
    }
}

/// Compute the score breakdown for one candidate.
pub fn score_candidate(
    candidate: &Candidate,
    title: &str,
    hint_tokens: &[String],
    duration_hint: u32,
) -> MatchScore {
    let names: Vec<String> = candidate
        .primary_artists
        .iter()
        .chain(candidate.featured_artists.iter())
        .map(|n| n.to_lowercase())
        .collect();

    let matched = hint_tokens
        .iter()
        .filter(|token| names.iter().any(|name| fuzzy_contains(name, token)))
        .count();
    let artist_ratio = if hint_tokens.is_empty() {
        0.0
    } else {
        matched as f32 / hint_tokens.len() as f32
    };

    let duration_diff = candidate
        .duration_secs
        .map_or(MISSING_DURATION_SENTINEL, |d| d.abs_diff(duration_hint));
    let duration_score = (1.0 - duration_diff as f32 / DURATION_WINDOW_SECS).max(0.0);

    let name = candidate.name.to_lowercase();
    let hint = title.to_lowercase();
    let title_score = if name.contains(&hint) || hint.contains(&name) {
        1.0
    } else {
        PARTIAL_TITLE_CREDIT
    };

    let composite =
        ARTIST_WEIGHT * artist_ratio + DURATION_WEIGHT * duration_score + TITLE_WEIGHT * title_score;

    MatchScore {
        artist_ratio,
        duration_diff,
        duration_score,
        title_score,
        composite,
    }
}

/// Split an author hint into individual artist-name tokens: split on `,`
/// and `&`, trim, lower-case, drop empties.
pub fn split_author_tokens(author: &str) -> Vec<String> {
    author
        .split([',', '&'])
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Bidirectional containment after stripping all whitespace from both
/// sides. Handles punctuation/spacing variance like "A R Rahman" vs
/// "AR Rahman". Inputs are expected to be lower-cased already.
fn fuzzy_contains(a: &str, b: &str) -> bool {
    let a: String = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: String = b.chars().filter(|c| !c.is_whitespace()).collect();
    a.contains(&b) || b.contains(&a)
}

/// Normalized track payload derived from a selected candidate. This is the
/// saavn-specific `payload` of a resolved result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    pub title: String,
    /// Comma-joined primary then featured artists, or "Unknown"
    pub artists: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub canonical_url: String,
}

/// Derive the normalized payload from a selected candidate.
///
/// Variant collections are ordered worst-to-best by upstream convention, so
/// the last entry is the best quality.
pub fn to_resolved_track(candidate: &Candidate) -> ResolvedTrack {
    let names: Vec<&str> = candidate
        .primary_artists
        .iter()
        .chain(candidate.featured_artists.iter())
        .map(String::as_str)
        .collect();
    let artists = if names.is_empty() {
        "Unknown".to_string()
    } else {
        names.join(", ")
    };

    ResolvedTrack {
        title: candidate.name.clone(),
        artists,
        duration: candidate.duration_secs,
        thumbnail_url: candidate.thumbnail_variants.last().map(|v| v.url.clone()),
        download_url: candidate.download_variants.last().map(|v| v.url.clone()),
        canonical_url: candidate.canonical_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::domain::MediaVariant;
    use proptest::prelude::*;

    fn make_candidate(name: &str, artists: &[&str], duration: Option<u32>) -> Candidate {
        Candidate {
            name: name.to_string(),
            primary_artists: artists.iter().map(|a| a.to_string()).collect(),
            featured_artists: vec![],
            duration_secs: duration,
            download_variants: vec![],
            thumbnail_variants: vec![],
            canonical_url: format!("https://saavn.example.com/song/{name}"),
        }
    }

    fn hints(author: &str, duration_secs: u32) -> ScoringHints {
        ScoringHints {
            author: author.to_string(),
            duration_secs,
        }
    }

    #[test]
    fn test_no_hints_returns_first_candidate() {
        let candidates = vec![
            make_candidate("First", &["Someone"], Some(100)),
            make_candidate("Second", &["Someone Else"], Some(200)),
        ];
        let best = select_best(candidates, "first", None).unwrap();
        assert_eq!(best.name, "First");
    }

    #[test]
    fn test_no_hints_empty_set_is_no_match() {
        let result = select_best(vec![], "anything", None);
        assert!(matches!(result, Err(ResolveError::NoConfidentMatch)));
    }

    #[test]
    fn test_exact_match_scores_high() {
        // artist_ratio=1.0, duration_diff=2 => duration_score ~0.967,
        // title_score=1.0 => composite ~13.9
        let candidate = make_candidate("Imagine", &["John Lennon"], Some(181));
        let tokens = split_author_tokens("John Lennon");
        let score = score_candidate(&candidate, "Imagine", &tokens, 183);

        assert_eq!(score.artist_ratio, 1.0);
        assert_eq!(score.duration_diff, 2);
        assert!((score.duration_score - 0.9667).abs() < 0.001);
        assert_eq!(score.title_score, 1.0);
        assert!((score.composite - 13.9).abs() < 0.01);
        assert!(score.eligible());

        let best = select_best(vec![candidate], "Imagine", Some(&hints("John Lennon", 183)));
        assert_eq!(best.unwrap().name, "Imagine");
    }

    #[test]
    fn test_wrong_artist_far_duration_is_ineligible() {
        // ratio=0 and diff=45 (>= 10s): fails both eligibility arms.
        let candidate = make_candidate("Imagine", &["Cover Band"], Some(228));
        let result = select_best(
            vec![candidate],
            "Imagine",
            Some(&hints("John Lennon", 183)),
        );
        assert!(matches!(result, Err(ResolveError::NoConfidentMatch)));
    }

    #[test]
    fn test_close_duration_rescues_poor_artist_match() {
        // ratio=0 but diff=2 < DURATION_CLOSE_SECS: eligible. Composite is
        // 0 + 3*0.967 + 1.0 = 3.9 though, below the floor, so still rejected.
        let candidate = make_candidate("Imagine", &["Somebody"], Some(181));
        let tokens = split_author_tokens("John Lennon");
        let score = score_candidate(&candidate, "Imagine", &tokens, 183);
        assert!(score.eligible());
        assert!(score.composite < CONFIDENCE_FLOOR);

        let result = select_best(
            vec![candidate],
            "Imagine",
            Some(&hints("John Lennon", 183)),
        );
        assert!(matches!(result, Err(ResolveError::NoConfidentMatch)));
    }

    #[test]
    fn test_best_composite_wins() {
        let candidates = vec![
            make_candidate("Imagine (Remastered)", &["John Lennon"], Some(195)),
            make_candidate("Imagine", &["John Lennon"], Some(183)),
        ];
        let best = select_best(candidates, "Imagine", Some(&hints("John Lennon", 183))).unwrap();
        assert_eq!(best.name, "Imagine");
    }

    #[test]
    fn test_ties_keep_earliest_candidate() {
        let mut first = make_candidate("Imagine", &["John Lennon"], Some(183));
        first.canonical_url = "https://saavn.example.com/song/imagine-1".to_string();
        let mut second = make_candidate("Imagine", &["John Lennon"], Some(183));
        second.canonical_url = "https://saavn.example.com/song/imagine-2".to_string();

        let best = select_best(
            vec![first, second],
            "Imagine",
            Some(&hints("John Lennon", 183)),
        )
        .unwrap();
        assert_eq!(
            best.canonical_url,
            "https://saavn.example.com/song/imagine-1"
        );
    }

    #[test]
    fn test_missing_duration_scores_poorly_without_crashing() {
        let candidate = make_candidate("Imagine", &["John Lennon"], None);
        let tokens = split_author_tokens("John Lennon");
        let score = score_candidate(&candidate, "Imagine", &tokens, 183);
        assert_eq!(score.duration_diff, MISSING_DURATION_SENTINEL);
        assert_eq!(score.duration_score, 0.0);
        // Still eligible and above the floor on artist + title alone.
        assert!(score.eligible());
        assert!(score.composite >= CONFIDENCE_FLOOR);
    }

    #[test]
    fn test_fuzzy_artist_containment_ignores_spacing() {
        let candidate = make_candidate("Jai Ho", &["AR Rahman"], Some(223));
        let tokens = split_author_tokens("A R Rahman");
        let score = score_candidate(&candidate, "Jai Ho", &tokens, 223);
        assert_eq!(score.artist_ratio, 1.0);
    }

    #[test]
    fn test_author_tokens_split_on_comma_and_ampersand() {
        assert_eq!(
            split_author_tokens("John Lennon, Yoko Ono & Plastic Ono Band"),
            vec!["john lennon", "yoko ono", "plastic ono band"]
        );
        assert_eq!(split_author_tokens(" , & "), Vec::<String>::new());
    }

    #[test]
    fn test_partial_artist_match_ratio() {
        let candidate = make_candidate("Under Pressure", &["Queen"], Some(242));
        let tokens = split_author_tokens("Queen, David Bowie");
        let score = score_candidate(&candidate, "Under Pressure", &tokens, 242);
        assert_eq!(score.artist_ratio, 0.5);
        assert!(score.eligible());
    }

    #[test]
    fn test_title_mismatch_gets_partial_credit() {
        let candidate = make_candidate("Completely Different", &["John Lennon"], Some(183));
        let tokens = split_author_tokens("John Lennon");
        let score = score_candidate(&candidate, "Imagine", &tokens, 183);
        assert_eq!(score.title_score, PARTIAL_TITLE_CREDIT);
    }

    #[test]
    fn test_scorer_is_idempotent() {
        let candidates = vec![
            make_candidate("Imagine", &["John Lennon"], Some(183)),
            make_candidate("Imagine (Live)", &["John Lennon"], Some(201)),
        ];
        let h = hints("John Lennon", 183);
        let first = select_best(candidates.clone(), "Imagine", Some(&h)).unwrap();
        let second = select_best(candidates, "Imagine", Some(&h)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolved_track_takes_best_variants() {
        let mut candidate = make_candidate("Imagine", &["John Lennon"], Some(183));
        candidate.download_variants = vec![
            MediaVariant {
                quality: "96kbps".to_string(),
                url: "https://cdn.example.com/imagine-96".to_string(),
            },
            MediaVariant {
                quality: "320kbps".to_string(),
                url: "https://cdn.example.com/imagine-320".to_string(),
            },
        ];
        candidate.thumbnail_variants = vec![
            MediaVariant {
                quality: "50x50".to_string(),
                url: "https://img.example.com/imagine-50".to_string(),
            },
            MediaVariant {
                quality: "500x500".to_string(),
                url: "https://img.example.com/imagine-500".to_string(),
            },
        ];

        let track = to_resolved_track(&candidate);
        assert_eq!(
            track.download_url.as_deref(),
            Some("https://cdn.example.com/imagine-320")
        );
        assert_eq!(
            track.thumbnail_url.as_deref(),
            Some("https://img.example.com/imagine-500")
        );
        assert_eq!(track.artists, "John Lennon");
    }

    #[test]
    fn test_resolved_track_unknown_artists() {
        let candidate = make_candidate("Mystery", &[], Some(120));
        let track = to_resolved_track(&candidate);
        assert_eq!(track.artists, "Unknown");
    }

    #[test]
    fn test_resolved_track_joins_primary_then_featured() {
        let mut candidate = make_candidate("Jai Ho", &["AR Rahman"], Some(223));
        candidate.featured_artists = vec!["Sukhwinder Singh".to_string()];
        let track = to_resolved_track(&candidate);
        assert_eq!(track.artists, "AR Rahman, Sukhwinder Singh");
    }

    #[test]
    fn test_resolved_track_serializes_camel_case() {
        let candidate = make_candidate("Imagine", &["John Lennon"], Some(183));
        let json = serde_json::to_value(to_resolved_track(&candidate)).unwrap();
        assert_eq!(json["title"], "Imagine");
        assert_eq!(json["canonicalUrl"], candidate.canonical_url);
        // Absent variants are omitted, not null.
        assert!(json.get("downloadUrl").is_none());
    }

    proptest! {
        /// Without hints the first candidate always wins, whatever the set.
        #[test]
        fn prop_first_candidate_without_hints(names in proptest::collection::vec("[a-z]{1,12}", 1..8)) {
            let candidates: Vec<Candidate> = names
                .iter()
                .map(|n| make_candidate(n, &["someone"], Some(100)))
                .collect();
            let best = select_best(candidates, "whatever", None).unwrap();
            prop_assert_eq!(best.name, names[0].clone());
        }

        /// Scoring has no hidden state: identical inputs, identical outcome.
        #[test]
        fn prop_selection_deterministic(
            durations in proptest::collection::vec(60u32..400, 1..6),
            hint in 60u32..400,
        ) {
            let candidates: Vec<Candidate> = durations
                .iter()
                .enumerate()
                .map(|(i, d)| make_candidate(&format!("song-{i}"), &["the artist"], Some(*d)))
                .collect();
            let h = hints("The Artist", hint);
            let a = select_best(candidates.clone(), "song", Some(&h)).ok();
            let b = select_best(candidates, "song", Some(&h)).ok();
            prop_assert_eq!(a, b);
        }

        /// A full artist match with a composite above the floor is never
        /// rejected.
        #[test]
        fn prop_confident_match_accepted(diff in 0u32..30) {
            let candidate = make_candidate("Imagine", &["John Lennon"], Some(183 + diff));
            let h = hints("John Lennon", 183);
            let tokens = split_author_tokens(&h.author);
            let score = score_candidate(&candidate, "Imagine", &tokens, h.duration_secs);
            prop_assume!(score.composite >= CONFIDENCE_FLOOR);
            let best = select_best(vec![candidate], "Imagine", Some(&h));
            prop_assert!(best.is_ok());
        }
    }
}
