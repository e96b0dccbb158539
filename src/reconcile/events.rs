//! Diagnostic events emitted by the engine.
//!
//! Scoring and search code never log directly. They emit [`ReconcileEvent`]s
//! into an injected [`EventSink`], which keeps the core a pure function of its
//! inputs plus the sink. [`TracingSink`] forwards events to `tracing`.

use super::domain::ReconcileError;
use super::scoring::ScoreBreakdown;

/// Something noteworthy that happened during a reconciliation.
#[derive(Debug, Clone)]
pub enum ReconcileEvent {
    /// A provider result was scored
    Scored {
        canonical: String,
        candidate: String,
        strategy: String,
        breakdown: ScoreBreakdown,
    },
    /// A page fetch failed; pagination for this strategy ends
    PageFailed { query: String, error: ReconcileError },
    /// Multi-artist search fell short and per-artist correction begins
    CollaborationFallbackStarted { release: String },
    /// An artist-only lookup confirmed a different spelling
    CorrectionFound { original: String, corrected: String },
    /// A re-search with a corrected name beat the previous best
    ResearchImproved { previous: f64, score: f64 },
    /// The fallback reached a near-perfect match and stopped early
    FallbackStoppedEarly { score: f64 },
    /// Corrected artist names were forced onto the best match
    CorrectionsEnforced { artist: String },
    /// No album match was confirmed; a placeholder carries the corrections
    SyntheticFallback { artist: String, corrections: usize },
    /// Nothing reached the acceptance threshold
    NoAcceptableMatch { release: String, best_score: f64 },
    /// A match was accepted
    MatchAccepted {
        canonical: String,
        matched: String,
        score: f64,
        strategy: String,
    },
    /// An encyclopedia query failed
    EncyclopediaQueryFailed { query: String, error: ReconcileError },
}

/// Receiver for engine diagnostics.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ReconcileEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ReconcileEvent) {
        match event {
            ReconcileEvent::Scored {
                canonical,
                candidate,
                strategy,
                breakdown,
            } => match breakdown.bonuses {
                Some(bonuses) => tracing::debug!(
                    canonical = %canonical,
                    candidate = %candidate,
                    strategy = %strategy,
                    focus = ?breakdown.focus,
                    primary = breakdown.primary,
                    artist = breakdown.pair.artist,
                    album = breakdown.pair.album,
                    year = bonuses.year,
                    track_count = bonuses.track_count,
                    label = bonuses.label,
                    score = breakdown.final_score,
                    "Scored candidate"
                ),
                None => tracing::debug!(
                    canonical = %canonical,
                    candidate = %candidate,
                    strategy = %strategy,
                    focus = ?breakdown.focus,
                    score = breakdown.final_score,
                    "Scored candidate without bonuses"
                ),
            },
            ReconcileEvent::PageFailed { query, error } => {
                if error.is_timeout() {
                    tracing::warn!("Request timed out for query {:?}: {}", query, error);
                } else {
                    tracing::warn!("Strategy page failed for query {:?}: {}", query, error);
                }
            }
            ReconcileEvent::CollaborationFallbackStarted { release } => {
                tracing::info!(
                    "Initial search failed for collaboration {:?}, attempting per-artist correction",
                    release
                );
            }
            ReconcileEvent::CorrectionFound {
                original,
                corrected,
            } => tracing::info!("Correction found: {:?} -> {:?}", original, corrected),
            ReconcileEvent::ResearchImproved { previous, score } => {
                tracing::info!("Re-search improved score: {:.3} > {:.3}", score, previous);
            }
            ReconcileEvent::FallbackStoppedEarly { score } => {
                tracing::info!("High-confidence match ({:.3}), stopping fallback", score);
            }
            ReconcileEvent::CorrectionsEnforced { artist } => {
                tracing::info!("Enforcing artist corrections on final result: {:?}", artist);
            }
            ReconcileEvent::SyntheticFallback {
                artist,
                corrections,
            } => tracing::info!(
                "Album not found, applying {} artist correction(s): {:?}",
                corrections,
                artist
            ),
            ReconcileEvent::NoAcceptableMatch {
                release,
                best_score,
            } => tracing::info!(
                "No acceptable match for {:?} (best score {:.1}%)",
                release,
                best_score * 100.0
            ),
            ReconcileEvent::MatchAccepted {
                canonical,
                matched,
                score,
                strategy,
            } => tracing::info!(
                "Accepted {:.0}% match via {}: {:?} -> {:?}",
                score * 100.0,
                strategy,
                canonical,
                matched
            ),
            ReconcileEvent::EncyclopediaQueryFailed { query, error } => {
                tracing::warn!("Encyclopedia query {:?} failed: {}", query, error);
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ReconcileEvent) {}
}

/// Sink that keeps every event, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<ReconcileEvent>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn events(&self) -> Vec<ReconcileEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn emit(&self, event: ReconcileEvent) {
        self.events.lock().unwrap().push(event);
    }
}
