//! Canonical catalog records.
//!
//! Defines the source-of-truth entities: [`CanonicalRelease`], [`Artist`],
//! [`Track`], [`Label`], [`Format`] and [`Identifier`]. The JSON shape follows
//! the Discogs collection API so exported collection entries load directly.
//!
//! All of these are plain values. The reconciliation engine never mutates a
//! release it is given; corrected names always produce new releases via
//! [`CanonicalRelease::with_artists`].

use serde::{Deserialize, Serialize};

use crate::reconcile::names::format_artist_names;

/// A credited artist on a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artist {
    /// Catalog ID
    pub id: u64,
    /// Standard artist name (may carry a " (2)" disambiguator)
    pub name: String,
    /// Name variation credited on this specific release
    #[serde(rename = "anv", skip_serializing_if = "Option::is_none")]
    pub name_variation: Option<String>,
    /// Separator placed after this artist when joining credits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
}

impl Artist {
    /// Create an artist with only a standard name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the release-specific name variation.
    pub fn with_variation(mut self, variation: impl Into<String>) -> Self {
        self.name_variation = Some(variation.into());
        self
    }

    /// Set the trailing join separator.
    pub fn with_join(mut self, join: impl Into<String>) -> Self {
        self.join = Some(join.into());
        self
    }

    /// The name variation, ignoring empty strings.
    pub fn variation(&self) -> Option<&str> {
        self.name_variation.as_deref().filter(|v| !v.is_empty())
    }

    /// The credited name: the variation if present, else the standard name.
    pub fn credited_name(&self) -> &str {
        self.variation().unwrap_or(&self.name)
    }
}

/// A track (or heading/index entry) on a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    pub position: String,
    pub title: String,
    pub duration: String,
    /// "track", "heading" or "index"
    #[serde(rename = "type_", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_tracks: Vec<Track>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<Artist>,
}

impl Track {
    /// Create a plain track.
    pub fn new(position: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Headings separate sides/sections and are not playable tracks.
    pub fn is_heading(&self) -> bool {
        self.kind.as_deref() == Some("heading")
    }
}

/// Record label credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub name: String,
    pub catno: String,
}

/// Physical format entry (e.g. "Vinyl" with descriptions ["LP", "Album"]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    pub name: String,
    pub qty: String,
    pub descriptions: Vec<String>,
}

/// Release identifier such as a barcode or matrix number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// The canonical catalog record being validated against external providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalRelease {
    pub id: u64,
    pub title: String,
    pub artists: Vec<Artist>,
    /// Release year; zero or missing means unknown
    pub year: Option<i32>,
    pub formats: Vec<Format>,
    pub labels: Vec<Label>,
    pub identifiers: Vec<Identifier>,
    pub tracklist: Vec<Track>,
}

impl CanonicalRelease {
    /// Create a release with the given artists and title.
    pub fn new(artists: Vec<Artist>, title: impl Into<String>) -> Self {
        Self {
            artists,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Display artist string, derived from the artist list.
    ///
    /// Always recomputed, so it can never drift from `artists`.
    pub fn display_artist(&self) -> String {
        format_artist_names(&self.artists)
    }

    /// A copy of this release with a different artist list.
    pub fn with_artists(&self, artists: Vec<Artist>) -> Self {
        Self {
            artists,
            ..self.clone()
        }
    }

    /// Known release year (positive), if any.
    pub fn known_year(&self) -> Option<i32> {
        self.year.filter(|y| *y > 0)
    }

    /// Every barcode identifier with whitespace removed, in listed order.
    pub fn barcodes(&self) -> impl Iterator<Item = String> + '_ {
        self.identifiers
            .iter()
            .filter(|id| id.kind.eq_ignore_ascii_case("barcode"))
            .map(|id| id.value.split_whitespace().collect::<String>())
            .filter(|b| !b.is_empty())
    }

    /// First barcode identifier with whitespace removed.
    pub fn barcode(&self) -> Option<String> {
        self.barcodes().next()
    }

    /// Number of playable top-level tracks (headings excluded).
    pub fn counted_track_count(&self) -> usize {
        self.tracklist.iter().filter(|t| !t.is_heading()).count()
    }

    /// All format description tags, lowercased.
    pub fn format_descriptions(&self) -> Vec<String> {
        self.formats
            .iter()
            .flat_map(|f| f.descriptions.iter())
            .map(|d| d.to_lowercase())
            .collect()
    }

    /// Human-readable "Artist - Title" summary for logs.
    pub fn summary(&self) -> String {
        format!("{} - {}", self.display_artist(), self.title)
    }
}
