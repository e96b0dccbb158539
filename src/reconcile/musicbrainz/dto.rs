//! MusicBrainz API Data Transfer Objects
//!
//! These types match what the `/release` search endpoint returns with
//! `fmt=json`. DO NOT use these types outside the musicbrainz module -
//! convert to domain types.

use serde::{Deserialize, Serialize};

/// Release search response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchResponse {
    /// Total matches on the server
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Release search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Release {
    /// MusicBrainz release ID
    pub id: String,
    pub title: String,
    /// Search relevance (0-100)
    pub score: Option<u32>,
    /// Release date (YYYY, YYYY-MM, or YYYY-MM-DD)
    pub date: Option<String>,
    pub country: Option<String>,
    /// UPC/EAN, often empty
    pub barcode: Option<String>,
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
}

/// Artist credit (can be multiple for collaborations)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistCredit {
    /// How this artist is credited (may differ from official name)
    pub name: Option<String>,
    /// Join phrase (e.g., " & ", " feat. ")
    pub joinphrase: Option<String>,
    pub artist: Artist,
}

/// Artist info
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: String,
    /// Official artist name
    pub name: String,
}

/// Error response body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: String,
}
