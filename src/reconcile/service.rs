//! Reconciliation service - the two entry points callers use
//!
//! Commercial provider:
//! 1. Generate strategies and run the paginated search loop
//! 2. For multi-artist releases that fell short, run the collaboration fallback
//! 3. Assemble the corrected metadata (or nothing)
//!
//! Encyclopedia provider: single barcode/text pass.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::domain::{
    CorrectedMetadata, CorrectionSettings, LookupRequest, MatchOutcome, MetadataSource,
    ReconcileError,
};
use super::encyclopedia::match_encyclopedia;
use super::events::{EventSink, ReconcileEvent, TracingSink};
use super::fallback::collaboration_fallback;
use super::itunes::ITunesClient;
use super::musicbrainz::MusicBrainzClient;
use super::search::SearchContext;
use super::traits::{CatalogSearchApi, EncyclopediaSearchApi};
use crate::config::HttpConfig;
use crate::model::CanonicalRelease;

/// Reconciles canonical releases against external providers.
///
/// Holds no per-release state; releases can be reconciled concurrently.
#[derive(Clone)]
pub struct ReconcileService {
    catalog: Arc<dyn CatalogSearchApi>,
    encyclopedia: Arc<dyn EncyclopediaSearchApi>,
    sink: Arc<dyn EventSink>,
}

impl ReconcileService {
    /// Create a service over the given providers, logging via `tracing`.
    pub fn new(
        catalog: Arc<dyn CatalogSearchApi>,
        encyclopedia: Arc<dyn EncyclopediaSearchApi>,
    ) -> Self {
        Self {
            catalog,
            encyclopedia,
            sink: Arc::new(TracingSink),
        }
    }

    /// Create a service backed by the iTunes and MusicBrainz HTTP clients.
    pub fn from_config(config: &HttpConfig) -> Result<Self, ReconcileError> {
        Ok(Self::new(
            Arc::new(ITunesClient::new(config)?),
            Arc::new(MusicBrainzClient::new(config)?),
        ))
    }

    /// Replace the diagnostic event sink.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Reconcile a release against the commercial provider.
    ///
    /// Returns `Ok(None)` when nothing reached the acceptance threshold.
    /// Cancelling `cancel` aborts in-flight requests and yields
    /// [`ReconcileError::Cancelled`]; every other provider failure degrades
    /// to trying the next strategy.
    pub async fn reconcile_with_commercial_provider(
        &self,
        release: &CanonicalRelease,
        settings: &CorrectionSettings,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<CorrectedMetadata>, ReconcileError> {
        let detached = CancellationToken::new();
        let ctx = SearchContext {
            api: self.catalog.as_ref(),
            sink: self.sink.as_ref(),
            cancel: cancel.unwrap_or(&detached),
        };

        let mut outcome = ctx
            .find_best_match(release, LookupRequest::FullRelease, settings, release)
            .await?;

        if release.artists.len() > 1 && !outcome.is_accepted() {
            outcome = collaboration_fallback(ctx, release, settings, outcome).await?;
        }

        Ok(assemble(release, outcome, self.sink.as_ref()))
    }

    /// Reconcile a release against the encyclopedia provider.
    pub async fn reconcile_with_encyclopedia_provider(
        &self,
        release: &CanonicalRelease,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<CorrectedMetadata>, ReconcileError> {
        let detached = CancellationToken::new();
        match_encyclopedia(
            self.encyclopedia.as_ref(),
            self.sink.as_ref(),
            release,
            cancel.unwrap_or(&detached),
        )
        .await
    }
}

/// Turn the winning candidate into corrected metadata.
fn assemble(
    release: &CanonicalRelease,
    outcome: MatchOutcome,
    sink: &dyn EventSink,
) -> Option<CorrectedMetadata> {
    if !outcome.is_accepted() {
        sink.emit(ReconcileEvent::NoAcceptableMatch {
            release: release.summary(),
            best_score: outcome.score,
        });
        return None;
    }
    let MatchOutcome {
        best: Some(best),
        score,
        strategy,
    } = outcome
    else {
        return None;
    };

    let identifies_album = strategy.as_ref().is_none_or(|s| s.identifies_album());
    sink.emit(ReconcileEvent::MatchAccepted {
        canonical: release.summary(),
        matched: best.summary(),
        score,
        strategy: strategy
            .as_ref()
            .map_or_else(|| "unknown".to_string(), |s| s.describe()),
    });

    Some(CorrectedMetadata {
        source: MetadataSource::Commercial,
        artist: best.artist_name,
        album: identifies_album.then_some(best.collection_name),
        genre: best.genre,
        copyright: best.copyright,
        country: best.country,
        explicit: best.explicit,
        score,
        strategy,
        checked_at: Utc::now(),
    })
}
