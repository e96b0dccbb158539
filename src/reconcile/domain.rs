//! Internal domain models for release reconciliation.
//!
//! These types are OUR types - they don't change when provider APIs change.
//! Provider responses get converted into these types via adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum confidence to treat a provider result as authoritative.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.85;

/// Where a metadata field should be sourced from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    /// Keep the catalog's own value
    #[default]
    Canonical,
    /// Commercial music-search API (iTunes)
    Commercial,
    /// Open music encyclopedia (MusicBrainz)
    Encyclopedia,
}

impl std::fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataSource::Canonical => write!(f, "canonical"),
            MetadataSource::Commercial => write!(f, "commercial"),
            MetadataSource::Encyclopedia => write!(f, "encyclopedia"),
        }
    }
}

impl std::str::FromStr for MetadataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "canonical" | "discogs" => Ok(MetadataSource::Canonical),
            "commercial" | "itunes" | "apple" => Ok(MetadataSource::Commercial),
            "encyclopedia" | "musicbrainz" => Ok(MetadataSource::Encyclopedia),
            other => Err(format!("unknown metadata source: {other}")),
        }
    }
}

/// Which field is sourced from which provider.
///
/// Passed by value into every engine call; the collaboration fallback derives
/// its own settings with [`CorrectionSettings::artist_lookup`] instead of
/// mutating a shared copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionSettings {
    pub artist_source: MetadataSource,
    pub album_source: MetadataSource,
}

impl Default for CorrectionSettings {
    fn default() -> Self {
        Self {
            artist_source: MetadataSource::Canonical,
            album_source: MetadataSource::Commercial,
        }
    }
}

impl CorrectionSettings {
    pub fn new(artist_source: MetadataSource, album_source: MetadataSource) -> Self {
        Self {
            artist_source,
            album_source,
        }
    }

    /// Settings used while isolating a single artist's identity.
    pub fn artist_lookup() -> Self {
        Self::new(MetadataSource::Commercial, MetadataSource::Canonical)
    }

    /// Artist naming should be validated against the commercial provider.
    pub fn corrects_artist(&self) -> bool {
        self.artist_source == MetadataSource::Commercial
    }

    /// Album naming should be validated against the commercial provider.
    pub fn corrects_album(&self) -> bool {
        self.album_source == MetadataSource::Commercial
    }
}

/// What a search run is trying to identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupRequest {
    /// Validate the release as a whole (artist and/or album naming)
    FullRelease,
    /// Resolve the identity of the release's (single) artist only
    ArtistOnly,
}

/// Query shape of a search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Query anchored on the artist name, validating the album
    ArtistAnchored,
    /// Query anchored on the album title, validating the artist
    AlbumAnchored,
    /// Artist identity lookup
    ArtistOnly,
    /// Placeholder produced by the collaboration fallback
    SyntheticFallback,
}

/// Which provider field the query term should match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldHint {
    ArtistTerm,
    AlbumTerm,
}

impl FieldHint {
    /// Provider query parameter value.
    pub fn as_param(&self) -> &'static str {
        match self {
            FieldHint::ArtistTerm => "artistTerm",
            FieldHint::AlbumTerm => "albumTerm",
        }
    }
}

/// Category of provider record to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryHint {
    Album,
    MusicArtist,
}

impl CategoryHint {
    /// Provider query parameter value.
    pub fn as_param(&self) -> &'static str {
        match self {
            CategoryHint::Album => "album",
            CategoryHint::MusicArtist => "musicArtist",
        }
    }
}

/// One query shape tried against the commercial provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStrategy {
    pub query: String,
    pub kind: StrategyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldHint>,
    /// Search every category instead of restricting to albums
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub omit_category: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryHint>,
}

impl SearchStrategy {
    /// Artist identity lookup.
    pub fn artist_only(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: StrategyKind::ArtistOnly,
            field: None,
            omit_category: false,
            category: Some(CategoryHint::MusicArtist),
        }
    }

    /// Album-title query scoped to the album field.
    pub fn album_anchored(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: StrategyKind::AlbumAnchored,
            field: Some(FieldHint::AlbumTerm),
            omit_category: false,
            category: Some(CategoryHint::Album),
        }
    }

    /// Artist-name query scoped to the artist field.
    pub fn artist_anchored(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: StrategyKind::ArtistAnchored,
            field: Some(FieldHint::ArtistTerm),
            omit_category: false,
            category: Some(CategoryHint::Album),
        }
    }

    /// Artist-name query with no field or category restriction.
    pub fn broad_artist_anchored(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: StrategyKind::ArtistAnchored,
            field: None,
            omit_category: true,
            category: None,
        }
    }

    /// Marker for a result synthesized by the collaboration fallback.
    pub fn synthetic_fallback() -> Self {
        Self {
            query: "Collaboration Fallback".to_string(),
            kind: StrategyKind::SyntheticFallback,
            field: None,
            omit_category: false,
            category: None,
        }
    }

    /// Whether a result found by this strategy says anything about the album.
    pub fn identifies_album(&self) -> bool {
        !matches!(
            self.kind,
            StrategyKind::ArtistOnly | StrategyKind::SyntheticFallback
        )
    }

    /// Build the provider query for the page starting at `offset`.
    pub fn to_query(&self, offset: usize) -> CatalogQuery {
        CatalogQuery {
            term: self.query.clone(),
            category: self.category,
            omit_category: self.omit_category,
            field: self.field,
            offset,
        }
    }

    /// Short description for logs, e.g. `ArtistAnchored (artistTerm)`.
    pub fn describe(&self) -> String {
        let scope = self
            .field
            .map(|f| f.as_param())
            .or(self.category.map(|c| c.as_param()))
            .unwrap_or("broad");
        format!("{:?} ({})", self.kind, scope)
    }
}

/// A paginated commercial-provider search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub term: String,
    pub category: Option<CategoryHint>,
    pub omit_category: bool,
    pub field: Option<FieldHint>,
    pub offset: usize,
}

/// One page of commercial-provider results.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    /// Result count reported by the provider
    pub total_count: usize,
    pub results: Vec<CatalogItem>,
}

/// Kind of record returned by the commercial provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Collection,
    Artist,
    Track,
    #[default]
    Other,
}

/// A commercial-provider search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub kind: ItemKind,
    /// Collection category, e.g. "Album"
    pub collection_type: Option<String>,
    pub artist_name: String,
    pub collection_name: String,
    pub genre: Option<String>,
    pub track_count: u32,
    pub release_date: Option<String>,
    pub country: Option<String>,
    pub copyright: Option<String>,
    pub explicit: bool,
}

impl CatalogItem {
    /// An album collection record.
    pub fn album(
        artist_name: impl Into<String>,
        collection_name: impl Into<String>,
        track_count: u32,
    ) -> Self {
        Self {
            kind: ItemKind::Collection,
            collection_type: Some("Album".to_string()),
            artist_name: artist_name.into(),
            collection_name: collection_name.into(),
            track_count,
            ..Default::default()
        }
    }

    /// An artist record.
    pub fn artist(artist_name: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Artist,
            artist_name: artist_name.into(),
            ..Default::default()
        }
    }

    /// Whether this is an album-category collection.
    pub fn is_album_collection(&self) -> bool {
        self.kind == ItemKind::Collection && self.collection_type.as_deref() == Some("Album")
    }

    /// Reinterpret an artist record as a collection so artist lookups share
    /// the collection filtering pipeline.
    pub fn into_artist_collection(self) -> Self {
        Self {
            kind: ItemKind::Collection,
            collection_type: Some("Album".to_string()),
            collection_name: self.artist_name.clone(),
            track_count: 0,
            release_date: None,
            ..self
        }
    }

    /// Release year parsed from the release date (YYYY, YYYY-MM-DD or RFC 3339).
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.trim().parse().ok())
            .filter(|y: &i32| *y > 0)
    }

    /// Human-readable "Artist - Collection" summary for logs.
    pub fn summary(&self) -> String {
        format!("{} - {}", self.artist_name, self.collection_name)
    }
}

/// A credited artist on an encyclopedia release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCredit {
    pub name: String,
    pub join_phrase: Option<String>,
}

/// An encyclopedia-provider release search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncyclopediaRelease {
    pub id: String,
    pub title: String,
    pub artist_credit: Vec<ArtistCredit>,
    pub barcode: Option<String>,
    pub country: Option<String>,
}

impl EncyclopediaRelease {
    /// Credits joined by their literal join phrases.
    pub fn credited_artist(&self) -> String {
        self.artist_credit
            .iter()
            .map(|c| format!("{}{}", c.name, c.join_phrase.as_deref().unwrap_or("")))
            .collect()
    }
}

/// Best candidate found by a search run.
///
/// Created per reconciliation attempt and never merged back into the
/// canonical release by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub best: Option<CatalogItem>,
    /// Confidence of `best` (0.0 to 1.0)
    pub score: f64,
    /// Strategy that found `best`
    pub strategy: Option<SearchStrategy>,
}

impl MatchOutcome {
    /// Whether the best candidate clears the acceptance threshold.
    pub fn is_accepted(&self) -> bool {
        self.best.is_some() && self.score >= ACCEPTANCE_THRESHOLD
    }
}

/// Provider-sourced naming and extras for a canonical release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedMetadata {
    pub source: MetadataSource,
    pub artist: String,
    /// Omitted when the winning search said nothing about the album
    pub album: Option<String>,
    pub genre: Option<String>,
    pub copyright: Option<String>,
    pub country: Option<String>,
    pub explicit: bool,
    /// Confidence (0.0 to 1.0)
    pub score: f64,
    pub strategy: Option<SearchStrategy>,
    pub checked_at: DateTime<Utc>,
}

/// Errors surfaced by provider calls and the reconciliation engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReconcileError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    /// Parent-initiated cancellation; the only error that aborts a reconciliation
    #[error("Reconciliation cancelled")]
    Cancelled,
}

impl ReconcileError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ReconcileError::Cancelled)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ReconcileError::Timeout(_))
    }

    /// Map a transport-level HTTP failure.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ReconcileError::Timeout(error.to_string())
        } else {
            ReconcileError::Network(error.to_string())
        }
    }
}
