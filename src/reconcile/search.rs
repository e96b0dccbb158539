//! Paginated match search against the commercial provider.
//!
//! For each strategy in priority order, pages are fetched until a candidate
//! clears [`ACCEPTANCE_THRESHOLD`], the provider runs out of results, or a
//! page fails. The first strategy to produce an acceptable match wins; later
//! strategies are not tried.

use tokio_util::sync::CancellationToken;

use super::classify::{canonical_release_type, catalog_release_type, is_compatible};
use super::domain::{
    ACCEPTANCE_THRESHOLD, CatalogItem, CatalogPage, CatalogQuery, CorrectionSettings, FieldHint,
    ItemKind, LookupRequest, MatchOutcome, ReconcileError, SearchStrategy, StrategyKind,
};
use super::events::{EventSink, ReconcileEvent};
use super::scoring::{PairScores, is_better_tie_break, pair_scores, score_breakdown};
use super::similarity::similarity_score;
use super::strategy::generate_strategies;
use super::traits::CatalogSearchApi;
use crate::model::CanonicalRelease;

/// Minimum similarity between the query and the anchored result field.
const ANCHOR_VALIDATION_THRESHOLD: f64 = 0.70;
/// Low bar that discards obviously wrong candidates before full scoring.
const PRE_FILTER_THRESHOLD: f64 = 0.30;

/// Everything a search run needs besides its inputs.
#[derive(Clone, Copy)]
pub(crate) struct SearchContext<'a> {
    pub api: &'a dyn CatalogSearchApi,
    pub sink: &'a dyn EventSink,
    pub cancel: &'a CancellationToken,
}

impl SearchContext<'_> {
    fn ensure_active(&self) -> Result<(), ReconcileError> {
        if self.cancel.is_cancelled() {
            return Err(ReconcileError::Cancelled);
        }
        Ok(())
    }

    /// Fetch one page, aborting the in-flight request on cancellation.
    async fn fetch(&self, query: &CatalogQuery) -> Result<CatalogPage, ReconcileError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ReconcileError::Cancelled),
            page = self.api.search(query, self.cancel) => page,
        }
    }

    /// Run every strategy for `search_release`, scoring against `scoring_release`.
    ///
    /// The two releases differ only during the collaboration fallback, where
    /// queries use one corrected artist but scoring uses the full credit list.
    pub async fn find_best_match(
        &self,
        search_release: &CanonicalRelease,
        request: LookupRequest,
        settings: &CorrectionSettings,
        scoring_release: &CanonicalRelease,
    ) -> Result<MatchOutcome, ReconcileError> {
        let strategies = generate_strategies(search_release, request, settings);
        let page_size = self.api.page_size();
        let mut outcome = MatchOutcome::default();

        for strategy in &strategies {
            self.ensure_active()?;

            let mut offset = 0;
            let mut total: Option<usize> = None;
            loop {
                self.ensure_active()?;

                let page = match self.fetch(&strategy.to_query(offset)).await {
                    Ok(page) => page,
                    Err(ReconcileError::Cancelled) => return Err(ReconcileError::Cancelled),
                    Err(error) => {
                        self.sink.emit(ReconcileEvent::PageFailed {
                            query: strategy.query.clone(),
                            error,
                        });
                        break;
                    }
                };

                let total = *total.get_or_insert(page.total_count);
                let fetched = page.results.len();
                if page.total_count > 0 && fetched > 0 {
                    self.consider_page(page.results, strategy, settings, scoring_release, &mut outcome);
                }

                if outcome.score >= ACCEPTANCE_THRESHOLD {
                    break;
                }
                offset += fetched;
                if fetched < page_size || offset >= total {
                    break;
                }
            }

            if outcome.score >= ACCEPTANCE_THRESHOLD {
                break;
            }
        }

        Ok(outcome)
    }

    /// Filter and score one page, updating the running best.
    fn consider_page(
        &self,
        results: Vec<CatalogItem>,
        strategy: &SearchStrategy,
        settings: &CorrectionSettings,
        scoring_release: &CanonicalRelease,
        outcome: &mut MatchOutcome,
    ) {
        let candidates: Vec<CatalogItem> = if strategy.kind == StrategyKind::ArtistOnly {
            results
                .into_iter()
                .filter(|item| item.kind == ItemKind::Artist)
                .map(CatalogItem::into_artist_collection)
                .collect()
        } else {
            results
        };

        let canonical_summary = scoring_release.summary();
        for item in candidates {
            if !passes_category_filter(strategy, scoring_release, &item)
                || !passes_anchor_validation(strategy, &item)
            {
                continue;
            }
            if !passes_pre_filter(strategy, &pair_scores(scoring_release, &item)) {
                continue;
            }

            let breakdown = score_breakdown(scoring_release, &item, strategy, settings);
            self.sink.emit(ReconcileEvent::Scored {
                canonical: canonical_summary.clone(),
                candidate: item.summary(),
                strategy: strategy.describe(),
                breakdown,
            });

            let score = breakdown.final_score;
            let replace = score > outcome.score
                || (score == outcome.score
                    && outcome.score > 0.0
                    && outcome.best.as_ref().is_some_and(|current| {
                        is_better_tie_break(scoring_release, &item, current, settings)
                    }));

            if replace {
                outcome.score = score;
                outcome.best = Some(item);
                outcome.strategy = Some(strategy.clone());
            }
        }
    }
}

/// Reject results of the wrong category or an incompatible release type.
fn passes_category_filter(
    strategy: &SearchStrategy,
    canonical: &CanonicalRelease,
    item: &CatalogItem,
) -> bool {
    if strategy.kind == StrategyKind::ArtistOnly {
        return true;
    }
    if !item.is_album_collection() {
        return false;
    }
    is_compatible(canonical_release_type(canonical), catalog_release_type(item))
}

/// Require the anchored field to actually resemble the query.
fn passes_anchor_validation(strategy: &SearchStrategy, item: &CatalogItem) -> bool {
    match strategy.field {
        Some(FieldHint::AlbumTerm) => {
            similarity_score(&strategy.query, &item.collection_name) >= ANCHOR_VALIDATION_THRESHOLD
        }
        Some(FieldHint::ArtistTerm) => {
            similarity_score(&strategy.query, &item.artist_name) >= ANCHOR_VALIDATION_THRESHOLD
        }
        None => true,
    }
}

/// Cheap check on the score the strategy is trying to find.
fn passes_pre_filter(strategy: &SearchStrategy, pair: &PairScores) -> bool {
    match strategy.kind {
        StrategyKind::AlbumAnchored | StrategyKind::ArtistOnly => pair.artist > PRE_FILTER_THRESHOLD,
        StrategyKind::ArtistAnchored => pair.album > PRE_FILTER_THRESHOLD,
        StrategyKind::SyntheticFallback => pair.artist.max(pair.album) > PRE_FILTER_THRESHOLD,
    }
}
