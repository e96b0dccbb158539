//! Single-pass matching against the encyclopedia provider.
//!
//! Barcode first, then a conjunctive title/artist text query. No strategy
//! fan-out and no pagination.

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::domain::{CorrectedMetadata, EncyclopediaRelease, MetadataSource, ReconcileError};
use super::events::{EventSink, ReconcileEvent};
use super::similarity::{clean_for_search, similarity_score};
use super::traits::EncyclopediaSearchApi;
use crate::model::CanonicalRelease;

/// Minimum weighted score to accept an encyclopedia release.
pub const ENCYCLOPEDIA_ACCEPTANCE_THRESHOLD: f64 = 0.80;

const TITLE_WEIGHT: f64 = 0.6;
const ARTIST_WEIGHT: f64 = 0.4;

/// Lucene query for an exact barcode.
pub fn barcode_query(barcode: &str) -> String {
    format!("barcode:{barcode}")
}

/// Lucene query requiring both title and artist.
pub fn text_query(release: &CanonicalRelease) -> String {
    format!(
        "release:\"{}\" AND artist:\"{}\"",
        escape_phrase(&clean_for_search(&release.title)),
        escape_phrase(&clean_for_search(&release.display_artist()))
    )
}

fn escape_phrase(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Score one encyclopedia release; matching any of our barcodes is exact.
pub fn encyclopedia_score(canonical: &CanonicalRelease, candidate: &EncyclopediaRelease) -> f64 {
    if let Some(theirs) = candidate.barcode.as_deref()
        && canonical.barcodes().any(|ours| ours == theirs)
    {
        return 1.0;
    }
    TITLE_WEIGHT * similarity_score(&canonical.title, &candidate.title)
        + ARTIST_WEIGHT * similarity_score(&canonical.display_artist(), &candidate.credited_artist())
}

/// Run the barcode and text queries and return the best acceptable release.
pub async fn match_encyclopedia(
    api: &dyn EncyclopediaSearchApi,
    sink: &dyn EventSink,
    release: &CanonicalRelease,
    cancel: &CancellationToken,
) -> Result<Option<CorrectedMetadata>, ReconcileError> {
    let mut candidates = Vec::new();

    if let Some(barcode) = release.barcode() {
        let query = barcode_query(&barcode);
        match api.search_releases(&query, cancel).await {
            Ok(found) => candidates = found,
            Err(ReconcileError::Cancelled) => return Err(ReconcileError::Cancelled),
            Err(error) => sink.emit(ReconcileEvent::EncyclopediaQueryFailed { query, error }),
        }
    }

    if candidates.is_empty() {
        let query = text_query(release);
        match api.search_releases(&query, cancel).await {
            Ok(found) => candidates = found,
            Err(ReconcileError::Cancelled) => return Err(ReconcileError::Cancelled),
            Err(error) => {
                sink.emit(ReconcileEvent::EncyclopediaQueryFailed { query, error });
                return Ok(None);
            }
        }
    }

    let best = candidates
        .into_iter()
        .map(|candidate| (encyclopedia_score(release, &candidate), candidate))
        .fold(None, |best: Option<(f64, EncyclopediaRelease)>, (score, candidate)| match best {
            Some((top, _)) if top >= score => best,
            _ => Some((score, candidate)),
        });

    let (score, matched) = match best {
        Some((score, matched)) if score >= ENCYCLOPEDIA_ACCEPTANCE_THRESHOLD => (score, matched),
        other => {
            sink.emit(ReconcileEvent::NoAcceptableMatch {
                release: release.summary(),
                best_score: other.map_or(0.0, |(score, _)| score),
            });
            return Ok(None);
        }
    };

    let artist = matched.credited_artist();
    sink.emit(ReconcileEvent::MatchAccepted {
        canonical: release.summary(),
        matched: format!("{} - {}", artist, matched.title),
        score,
        strategy: "Encyclopedia".to_string(),
    });

    Ok(Some(CorrectedMetadata {
        source: MetadataSource::Encyclopedia,
        artist,
        album: Some(matched.title),
        genre: None,
        copyright: None,
        country: matched.country,
        explicit: false,
        score,
        strategy: None,
        checked_at: Utc::now(),
    }))
}
