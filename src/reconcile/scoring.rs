//! Truth scoring of commercial-provider results against a canonical release.
//!
//! A result is judged on the field the user wants corrected (the primary
//! score). Results that clear [`PRIMARY_SCORE_THRESHOLD`] earn small
//! multiplicative bonuses for matching year, track count and label.

use std::sync::LazyLock;

use regex::Regex;

use super::domain::{CatalogItem, CorrectionSettings, SearchStrategy, StrategyKind};
use super::similarity::similarity_score;
use crate::model::CanonicalRelease;

/// Primary scores below this are returned without bonuses.
pub const PRIMARY_SCORE_THRESHOLD: f64 = 0.65;

const YEAR_WEIGHT: f64 = 0.10;
const TRACK_COUNT_WEIGHT: f64 = 0.15;
const LABEL_WEIGHT: f64 = 0.10;
/// Year difference at which the year bonus reaches zero.
const YEAR_SPAN: f64 = 5.0;

static COPYRIGHT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[℗©\s&]*\d{4}\s+").expect("valid copyright prefix regex"));
static LEGAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),?\s+(?:LLC|Inc|Ltd|Limited|Corp)\.?$").expect("valid legal suffix regex")
});

/// Artist and album similarity of one result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScores {
    pub artist: f64,
    pub album: f64,
}

/// Which score drove the primary decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryFocus {
    Artist,
    Album,
    /// Best of artist and album
    Either,
}

/// Bonus signals, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BonusSignals {
    pub year: f64,
    pub track_count: f64,
    pub label: f64,
}

/// Full breakdown of one truth score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub pair: PairScores,
    pub focus: PrimaryFocus,
    pub primary: f64,
    /// None when the primary score was rejected or no bonuses apply
    pub bonuses: Option<BonusSignals>,
    pub final_score: f64,
}

/// Artist and album similarity.
///
/// The artist score is the best over the display string, every individual
/// standard name and every variation, since providers often credit only one
/// member of a collaboration.
pub fn pair_scores(canonical: &CanonicalRelease, item: &CatalogItem) -> PairScores {
    let provider_artist = item.artist_name.as_str();

    let artist = canonical
        .artists
        .iter()
        .flat_map(|a| std::iter::once(a.name.as_str()).chain(a.variation()))
        .map(|name| similarity_score(name, provider_artist))
        .fold(
            similarity_score(&canonical.display_artist(), provider_artist),
            f64::max,
        );

    PairScores {
        artist,
        album: similarity_score(&canonical.title, &item.collection_name),
    }
}

/// Best-effort label name from a copyright line.
///
/// "℗ 2023 Capitol Records, LLC" becomes "Capitol Records".
pub fn extract_label_from_copyright(copyright: &str) -> String {
    let without_prefix = COPYRIGHT_PREFIX.replace(copyright, "");
    LEGAL_SUFFIX.replace(&without_prefix, "").trim().to_string()
}

/// Similarity between the provider's copyright label and any canonical label.
pub fn label_score(canonical: &CanonicalRelease, item: &CatalogItem) -> f64 {
    let Some(copyright) = item.copyright.as_deref() else {
        return 0.0;
    };
    let provider_label = extract_label_from_copyright(copyright);
    if provider_label.is_empty() {
        return 0.0;
    }
    canonical
        .labels
        .iter()
        .map(|label| similarity_score(&label.name, &provider_label))
        .fold(0.0, f64::max)
}

/// Year closeness: 1.0 for the same year, falling to 0 at five years apart.
fn year_signal(canonical: &CanonicalRelease, item: &CatalogItem) -> f64 {
    match (canonical.known_year(), item.release_year()) {
        (Some(a), Some(b)) => (1.0 - f64::from((a - b).abs()) / YEAR_SPAN).max(0.0),
        _ => 0.0,
    }
}

/// Track count ratio over playable canonical tracks.
fn track_count_signal(canonical: &CanonicalRelease, item: &CatalogItem) -> f64 {
    let canonical_count = canonical.counted_track_count();
    let provider_count = item.track_count as usize;
    if canonical_count == 0 || provider_count == 0 {
        return 0.0;
    }
    canonical_count.min(provider_count) as f64 / canonical_count.max(provider_count) as f64
}

/// Compute the three bonus signals.
pub fn bonus_signals(canonical: &CanonicalRelease, item: &CatalogItem) -> BonusSignals {
    BonusSignals {
        year: year_signal(canonical, item),
        track_count: track_count_signal(canonical, item),
        label: label_score(canonical, item),
    }
}

/// Apply bonuses to a primary score.
///
/// Primary scores below [`PRIMARY_SCORE_THRESHOLD`] are returned unchanged;
/// the threshold itself earns bonuses. The result is clamped to 1.0.
pub fn apply_bonuses(primary: f64, bonuses: &BonusSignals) -> f64 {
    if primary < PRIMARY_SCORE_THRESHOLD {
        return primary;
    }
    let boosted = primary
        * (1.0 + YEAR_WEIGHT * bonuses.year)
        * (1.0 + TRACK_COUNT_WEIGHT * bonuses.track_count)
        * (1.0 + LABEL_WEIGHT * bonuses.label);
    boosted.min(1.0)
}

/// Which score is primary for a strategy under the given settings.
fn primary_focus(strategy: &SearchStrategy, settings: &CorrectionSettings) -> PrimaryFocus {
    match (settings.corrects_artist(), settings.corrects_album()) {
        (true, false) => PrimaryFocus::Artist,
        (false, true) => PrimaryFocus::Album,
        // Correcting both: judge the field the query did not anchor on
        _ => match strategy.kind {
            StrategyKind::AlbumAnchored => PrimaryFocus::Artist,
            StrategyKind::ArtistAnchored => PrimaryFocus::Album,
            _ => PrimaryFocus::Either,
        },
    }
}

/// Score a result with the full breakdown.
pub fn score_breakdown(
    canonical: &CanonicalRelease,
    item: &CatalogItem,
    strategy: &SearchStrategy,
    settings: &CorrectionSettings,
) -> ScoreBreakdown {
    let pair = pair_scores(canonical, item);

    // Artist lookups are a pure identity check
    if strategy.kind == StrategyKind::ArtistOnly {
        return ScoreBreakdown {
            pair,
            focus: PrimaryFocus::Artist,
            primary: pair.artist,
            bonuses: None,
            final_score: pair.artist,
        };
    }

    let focus = primary_focus(strategy, settings);
    let primary = match focus {
        PrimaryFocus::Artist => pair.artist,
        PrimaryFocus::Album => pair.album,
        PrimaryFocus::Either => pair.artist.max(pair.album),
    };

    if primary < PRIMARY_SCORE_THRESHOLD {
        return ScoreBreakdown {
            pair,
            focus,
            primary,
            bonuses: None,
            final_score: primary,
        };
    }

    let bonuses = bonus_signals(canonical, item);
    ScoreBreakdown {
        pair,
        focus,
        primary,
        bonuses: Some(bonuses),
        final_score: apply_bonuses(primary, &bonuses),
    }
}

/// Confidence (0.0 to 1.0) that a result matches the canonical release.
pub fn truth_score(
    canonical: &CanonicalRelease,
    item: &CatalogItem,
    strategy: &SearchStrategy,
    settings: &CorrectionSettings,
) -> f64 {
    score_breakdown(canonical, item, strategy, settings).final_score
}

/// Whether `candidate` beats `current` when both have the same truth score.
///
/// Compares the secondary score (album when only the artist is corrected,
/// artist when only the album is, otherwise the weaker of the two), then
/// the label score.
pub fn is_better_tie_break(
    canonical: &CanonicalRelease,
    candidate: &CatalogItem,
    current: &CatalogItem,
    settings: &CorrectionSettings,
) -> bool {
    let secondary = |pair: PairScores| match (settings.corrects_artist(), settings.corrects_album()) {
        (true, false) => pair.album,
        (false, true) => pair.artist,
        _ => pair.artist.min(pair.album),
    };

    let candidate_secondary = secondary(pair_scores(canonical, candidate));
    let current_secondary = secondary(pair_scores(canonical, current));

    if candidate_secondary != current_secondary {
        return candidate_secondary > current_secondary;
    }
    label_score(canonical, candidate) > label_score(canonical, current)
}
