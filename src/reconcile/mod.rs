//! Release reconciliation - validates canonical catalog naming against
//! external music providers.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - our types, independent of any provider
//! - **API DTOs** (`itunes/dto.rs`, `musicbrainz/dto.rs`) - exact response shapes
//! - **Adapters** - convert DTOs to domain models
//! - **Clients** - HTTP clients, behind the traits in `traits.rs`
//! - **Scoring** - similarity, name resolution, release types, truth score
//! - **Search** - strategy generation, the paginated match loop and the
//!   collaboration fallback
//! - **Service** - the two public entry points
//!
//! Diagnostics go through an [`EventSink`] rather than straight to the log.
//!
//! # Usage
//!
//! ```ignore
//! use release_reconciler::reconcile::{CorrectionSettings, ReconcileService};
//!
//! let service = ReconcileService::from_config(&config.http)?;
//! let corrected = service
//!     .reconcile_with_commercial_provider(&release, &CorrectionSettings::default(), None)
//!     .await?;
//! ```

pub mod classify;
pub mod domain;
pub mod encyclopedia;
pub mod events;
mod fallback;
pub mod itunes;
pub mod musicbrainz;
pub mod names;
pub mod scoring;
mod search;
pub mod service;
pub mod similarity;
pub mod strategy;
pub mod traits;

pub use classify::ReleaseType;
pub use domain::{
    ACCEPTANCE_THRESHOLD, CatalogItem, CorrectedMetadata, CorrectionSettings, EncyclopediaRelease,
    LookupRequest, MatchOutcome, MetadataSource, ReconcileError, SearchStrategy, StrategyKind,
};
pub use events::{EventSink, NullSink, ReconcileEvent, TracingSink};
pub use scoring::truth_score;
pub use service::ReconcileService;
pub use similarity::similarity_score;
pub use strategy::generate_strategies;
pub use traits::{CatalogSearchApi, EncyclopediaSearchApi};
