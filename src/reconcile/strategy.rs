//! Search strategy generation.
//!
//! Turns a canonical release plus correction settings into the ordered list
//! of queries tried against the commercial provider. Order is priority: the
//! search loop stops at the first strategy that yields an acceptable match.

use super::domain::{CorrectionSettings, LookupRequest, SearchStrategy};
use super::similarity::{clean_for_search, normalize_search_term};
use crate::model::CanonicalRelease;

/// Generate the ordered search strategies for a lookup.
pub fn generate_strategies(
    release: &CanonicalRelease,
    request: LookupRequest,
    settings: &CorrectionSettings,
) -> Vec<SearchStrategy> {
    let display_artist = release.display_artist();
    if display_artist.is_empty() {
        return Vec::new();
    }

    if request == LookupRequest::ArtistOnly {
        return artist_only_strategies(&display_artist);
    }

    if release.title.is_empty() || (!settings.corrects_artist() && !settings.corrects_album()) {
        return Vec::new();
    }

    let mut strategies = Vec::new();

    // Artist validation only needs the provider when a variation is credited
    if settings.corrects_artist() {
        let variations: Vec<&str> = release.artists.iter().filter_map(|a| a.variation()).collect();
        if !variations.is_empty() {
            strategies.push(SearchStrategy::album_anchored(clean_for_search(&release.title)));
            for variation in variations {
                let cleaned = clean_for_search(variation);
                strategies.push(SearchStrategy::artist_anchored(cleaned.clone()));
                strategies.push(SearchStrategy::broad_artist_anchored(cleaned));
            }
        }
    }

    if settings.corrects_album() {
        let cleaned = clean_for_search(&display_artist);
        strategies.push(SearchStrategy::artist_anchored(cleaned.clone()));
        strategies.push(SearchStrategy::broad_artist_anchored(cleaned));
    }

    strategies
}

/// One query for the cleaned name, plus a diacritic-free variant if it differs.
fn artist_only_strategies(display_artist: &str) -> Vec<SearchStrategy> {
    let cleaned = clean_for_search(display_artist);
    let normalized = normalize_search_term(display_artist);

    let mut strategies = vec![SearchStrategy::artist_only(cleaned.clone())];
    if normalized != cleaned {
        strategies.push(SearchStrategy::artist_only(normalized));
    }
    strategies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Artist;
    use crate::reconcile::domain::{FieldHint, MetadataSource, StrategyKind};

    fn settings(artist: MetadataSource, album: MetadataSource) -> CorrectionSettings {
        CorrectionSettings::new(artist, album)
    }

    #[test]
    fn test_nothing_requested_yields_nothing() {
        let release = CanonicalRelease::new(vec![Artist::new("Madonna")], "Ray of Light");
        let strategies = generate_strategies(
            &release,
            LookupRequest::FullRelease,
            &settings(MetadataSource::Canonical, MetadataSource::Canonical),
        );
        assert!(strategies.is_empty());
    }

    #[test]
    fn test_artist_correction_without_variation_is_skipped() {
        let release = CanonicalRelease::new(vec![Artist::new("Madonna")], "Ray of Light");
        let strategies = generate_strategies(
            &release,
            LookupRequest::FullRelease,
            &settings(MetadataSource::Commercial, MetadataSource::Canonical),
        );
        assert!(strategies.is_empty());
    }

    #[test]
    fn test_artist_correction_with_variation() {
        let release = CanonicalRelease::new(
            vec![Artist::new("Aphex Twin").with_variation("AFX")],
            "Analord 10 (2)",
        );
        let strategies = generate_strategies(
            &release,
            LookupRequest::FullRelease,
            &settings(MetadataSource::Commercial, MetadataSource::Canonical),
        );
        assert_eq!(strategies.len(), 3);
        assert_eq!(strategies[0].kind, StrategyKind::AlbumAnchored);
        assert_eq!(strategies[0].query, "analord 10");
        assert_eq!(strategies[0].field, Some(FieldHint::AlbumTerm));
        assert_eq!(strategies[1].query, "afx");
        assert_eq!(strategies[1].field, Some(FieldHint::ArtistTerm));
        assert!(strategies[2].omit_category);
        assert_eq!(strategies[2].field, None);
    }

    #[test]
    fn test_album_correction_order() {
        let release = CanonicalRelease::new(vec![Artist::new("Madonna")], "Ray of Light");
        let strategies = generate_strategies(
            &release,
            LookupRequest::FullRelease,
            &CorrectionSettings::default(),
        );
        assert_eq!(
            strategies,
            vec![
                SearchStrategy::artist_anchored("madonna"),
                SearchStrategy::broad_artist_anchored("madonna"),
            ]
        );
    }

    #[test]
    fn test_both_corrections_artist_strategies_first() {
        let release = CanonicalRelease::new(
            vec![Artist::new("Aphex Twin").with_variation("AFX")],
            "Analord",
        );
        let strategies = generate_strategies(
            &release,
            LookupRequest::FullRelease,
            &settings(MetadataSource::Commercial, MetadataSource::Commercial),
        );
        assert_eq!(strategies.len(), 5);
        assert_eq!(strategies[0].kind, StrategyKind::AlbumAnchored);
        // Album correction anchors on the display artist (the variation)
        assert_eq!(strategies[3].query, "afx");
    }

    #[test]
    fn test_artist_only_lookup() {
        let release = CanonicalRelease::new(vec![Artist::new("Sólstafir")], "");
        let strategies =
            generate_strategies(&release, LookupRequest::ArtistOnly, &CorrectionSettings::artist_lookup());
        assert_eq!(
            strategies,
            vec![
                SearchStrategy::artist_only("sólstafir"),
                SearchStrategy::artist_only("solstafir"),
            ]
        );

        let plain = CanonicalRelease::new(vec![Artist::new("Madonna")], "");
        let strategies =
            generate_strategies(&plain, LookupRequest::ArtistOnly, &CorrectionSettings::artist_lookup());
        assert_eq!(strategies, vec![SearchStrategy::artist_only("madonna")]);
    }

    #[test]
    fn test_missing_artist_or_title_yields_nothing() {
        let untitled = CanonicalRelease::new(vec![Artist::new("Madonna")], "");
        assert!(
            generate_strategies(&untitled, LookupRequest::FullRelease, &CorrectionSettings::default())
                .is_empty()
        );
        let anonymous = CanonicalRelease::new(vec![], "Ray of Light");
        assert!(
            generate_strategies(&anonymous, LookupRequest::FullRelease, &CorrectionSettings::default())
                .is_empty()
        );
    }
}
