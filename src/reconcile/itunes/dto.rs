//! iTunes Search API Data Transfer Objects
//!
//! These types match what the `/search` endpoint returns. Only the fields the
//! engine reads are declared; serde ignores the rest.
//! DO NOT use these types outside the itunes module - convert to domain types.

use serde::{Deserialize, Serialize};

/// Search response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Number of results reported by the API
    #[serde(default)]
    pub result_count: usize,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One search result (collection, artist or track)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    /// "collection", "artist" or "track"
    pub wrapper_type: Option<String>,
    /// e.g. "Album", "Compilation"
    pub collection_type: Option<String>,
    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    pub primary_genre_name: Option<String>,
    pub track_count: Option<u32>,
    /// RFC 3339, e.g. "1998-03-03T08:00:00Z"
    pub release_date: Option<String>,
    pub country: Option<String>,
    pub copyright: Option<String>,
    /// "explicit", "cleaned" or "notExplicit"
    pub collection_explicitness: Option<String>,
}
