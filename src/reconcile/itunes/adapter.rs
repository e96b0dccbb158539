//! Adapter layer: Convert iTunes DTOs to domain models

use super::dto;
use crate::reconcile::domain::{CatalogItem, CatalogPage, ItemKind};

/// Convert a search response into a catalog page.
pub fn to_catalog_page(response: dto::SearchResponse) -> CatalogPage {
    CatalogPage {
        total_count: response.result_count,
        results: response.results.into_iter().map(to_catalog_item).collect(),
    }
}

fn to_catalog_item(result: dto::SearchResult) -> CatalogItem {
    CatalogItem {
        kind: item_kind(result.wrapper_type.as_deref()),
        collection_type: result.collection_type,
        artist_name: result.artist_name.unwrap_or_default(),
        collection_name: result.collection_name.unwrap_or_default(),
        genre: result.primary_genre_name,
        track_count: result.track_count.unwrap_or(0),
        release_date: result.release_date,
        country: result.country,
        copyright: result.copyright,
        explicit: result.collection_explicitness.as_deref() == Some("explicit"),
    }
}

fn item_kind(wrapper_type: Option<&str>) -> ItemKind {
    match wrapper_type {
        Some("collection") => ItemKind::Collection,
        Some("artist") => ItemKind::Artist,
        Some("track") => ItemKind::Track,
        _ => ItemKind::Other,
    }
}
