//! Collaboration fallback.
//!
//! Providers often credit a collaboration under a different spelling of one
//! member ("Gabe 'Nandez" rather than "Gabe Nandez"), which sinks the combined
//! search. When that happens each artist is looked up on their own, corrected
//! spellings are substituted one at a time, and the full release is searched
//! again.

use std::collections::BTreeMap;

use super::domain::{
    ACCEPTANCE_THRESHOLD, CatalogItem, CorrectionSettings, LookupRequest, MatchOutcome,
    ReconcileError, SearchStrategy,
};
use super::events::ReconcileEvent;
use super::names::format_artist_names;
use super::search::SearchContext;
use crate::model::{Artist, CanonicalRelease};

/// Stop processing further artists once the running best reaches this.
const EARLY_STOP_SCORE: f64 = 0.99;
/// Confidence assigned to a placeholder built from artist corrections alone.
const SYNTHETIC_SCORE: f64 = 0.90;

/// `artist` as a plain credit: the given name, no variation.
fn plain_credit(artist: &Artist, name: &str) -> Artist {
    Artist {
        name: name.to_string(),
        name_variation: None,
        ..artist.clone()
    }
}

/// The release's artist list with corrected names substituted by position.
fn substitute(release: &CanonicalRelease, corrections: &BTreeMap<usize, String>) -> Vec<Artist> {
    release
        .artists
        .iter()
        .enumerate()
        .map(|(i, artist)| match corrections.get(&i) {
            Some(corrected) => plain_credit(artist, corrected),
            None => artist.clone(),
        })
        .collect()
}

/// Correct each artist in turn and re-search, starting from `initial`.
///
/// Cancellation of `ctx` aborts every nested lookup and is returned as
/// [`ReconcileError::Cancelled`].
pub(crate) async fn collaboration_fallback(
    ctx: SearchContext<'_>,
    release: &CanonicalRelease,
    settings: &CorrectionSettings,
    initial: MatchOutcome,
) -> Result<MatchOutcome, ReconcileError> {
    ctx.sink.emit(ReconcileEvent::CollaborationFallbackStarted {
        release: release.summary(),
    });

    let mut best = initial;
    let mut corrections: BTreeMap<usize, String> = BTreeMap::new();

    for (position, artist) in release.artists.iter().enumerate() {
        let Some(corrected) = lookup_artist(ctx, release, artist).await? else {
            continue;
        };

        ctx.sink.emit(ReconcileEvent::CorrectionFound {
            original: artist.name.clone(),
            corrected: corrected.clone(),
        });

        // Queries use the corrected artist alone; scoring keeps the full
        // credit list with only this position substituted
        let search_release = release.with_artists(vec![plain_credit(artist, &corrected)]);
        let scoring_release =
            release.with_artists(substitute(release, &BTreeMap::from([(position, corrected.clone())])));
        corrections.insert(position, corrected);

        let research = ctx
            .find_best_match(&search_release, LookupRequest::FullRelease, settings, &scoring_release)
            .await?;

        if research.best.is_some() && research.score > best.score {
            ctx.sink.emit(ReconcileEvent::ResearchImproved {
                previous: best.score,
                score: research.score,
            });
            best = research;
        }

        if best.score >= EARLY_STOP_SCORE {
            ctx.sink.emit(ReconcileEvent::FallbackStoppedEarly { score: best.score });
            break;
        }
    }

    if corrections.is_empty() {
        return Ok(best);
    }

    let improved = format_artist_names(&substitute(release, &corrections));

    if best.is_accepted() {
        if let Some(item) = best.best.as_mut()
            && item.artist_name != improved
        {
            ctx.sink.emit(ReconcileEvent::CorrectionsEnforced {
                artist: improved.clone(),
            });
            item.artist_name = improved;
        }
        return Ok(best);
    }

    ctx.sink.emit(ReconcileEvent::SyntheticFallback {
        artist: improved.clone(),
        corrections: corrections.len(),
    });
    Ok(MatchOutcome {
        best: Some(CatalogItem::album(improved, release.title.clone(), 0)),
        score: SYNTHETIC_SCORE,
        strategy: Some(SearchStrategy::synthetic_fallback()),
    })
}

/// Look up one artist's identity; returns a differing, confirmed spelling.
async fn lookup_artist(
    ctx: SearchContext<'_>,
    release: &CanonicalRelease,
    artist: &Artist,
) -> Result<Option<String>, ReconcileError> {
    let solo = release.with_artists(vec![plain_credit(artist, &artist.name)]);
    let outcome = ctx
        .find_best_match(&solo, LookupRequest::ArtistOnly, &CorrectionSettings::artist_lookup(), &solo)
        .await?;

    if outcome.score < ACCEPTANCE_THRESHOLD {
        return Ok(None);
    }
    Ok(outcome
        .best
        .map(|found| found.artist_name)
        .filter(|found| found.to_lowercase() != artist.name.to_lowercase()))
}
