//! Adapter layer: Convert MusicBrainz DTOs to domain models

use super::dto;
use crate::reconcile::domain::{ArtistCredit, EncyclopediaRelease};

/// Convert a release search response into domain releases.
pub fn to_releases(response: dto::SearchResponse) -> Vec<EncyclopediaRelease> {
    response.releases.into_iter().map(to_release).collect()
}

fn to_release(release: dto::Release) -> EncyclopediaRelease {
    EncyclopediaRelease {
        id: release.id,
        title: release.title,
        artist_credit: release.artist_credit.into_iter().map(to_credit).collect(),
        barcode: release.barcode.filter(|b| !b.trim().is_empty()),
        country: release.country,
    }
}

/// The credited name wins over the official artist name.
fn to_credit(credit: dto::ArtistCredit) -> ArtistCredit {
    ArtistCredit {
        name: credit
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or(credit.artist.name),
        join_phrase: credit.joinphrase.filter(|j| !j.is_empty()),
    }
}
