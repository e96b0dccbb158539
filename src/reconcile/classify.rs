//! Release-type classification for canonical releases and provider results.

use serde::{Deserialize, Serialize};

use super::domain::CatalogItem;
use crate::model::CanonicalRelease;

/// Kind of release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseType {
    Album,
    Single,
    Ep,
    Compilation,
    Unknown,
}

/// Classify a canonical release from its format description tags.
pub fn canonical_release_type(release: &CanonicalRelease) -> ReleaseType {
    let descriptions = release.format_descriptions();
    let has = |tag: &str| descriptions.iter().any(|d| d == tag);

    if has("single") {
        ReleaseType::Single
    } else if has("ep") {
        ReleaseType::Ep
    } else if has("compilation") {
        ReleaseType::Compilation
    } else if has("album") || has("lp") {
        ReleaseType::Album
    } else {
        ReleaseType::Unknown
    }
}

/// Classify a provider result from its naming and shape.
pub fn catalog_release_type(item: &CatalogItem) -> ReleaseType {
    let collection = item.collection_name.to_lowercase();

    if collection.ends_with(" - single") {
        return ReleaseType::Single;
    }
    if collection.ends_with(" - ep") {
        return ReleaseType::Ep;
    }
    // One track is a strong single signal even without the suffix
    if item.track_count == 1 {
        return ReleaseType::Single;
    }
    if item.artist_name.to_lowercase() == "various artists" {
        return ReleaseType::Compilation;
    }
    ReleaseType::Album
}

/// Whether a provider result's type is acceptable for the canonical type.
///
/// Unknown canonical releases accept anything. Provider singles and EPs only
/// match canonical singles and EPs respectively, and a canonical single never
/// matches a provider album.
pub fn is_compatible(canonical: ReleaseType, provider: ReleaseType) -> bool {
    if canonical == ReleaseType::Unknown {
        return true;
    }
    if canonical != ReleaseType::Single && provider == ReleaseType::Single {
        return false;
    }
    if canonical != ReleaseType::Ep && provider == ReleaseType::Ep {
        return false;
    }
    !(canonical == ReleaseType::Single && provider == ReleaseType::Album)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Format;

    fn release_with_tags(tags: &[&str]) -> CanonicalRelease {
        CanonicalRelease {
            formats: vec![Format {
                name: "Vinyl".to_string(),
                qty: "1".to_string(),
                descriptions: tags.iter().map(|t| t.to_string()).collect(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_canonical_types() {
        assert_eq!(canonical_release_type(&release_with_tags(&["7\"", "Single"])), ReleaseType::Single);
        assert_eq!(canonical_release_type(&release_with_tags(&["EP"])), ReleaseType::Ep);
        assert_eq!(
            canonical_release_type(&release_with_tags(&["LP", "Compilation"])),
            ReleaseType::Compilation
        );
        assert_eq!(canonical_release_type(&release_with_tags(&["LP"])), ReleaseType::Album);
        assert_eq!(canonical_release_type(&release_with_tags(&["Reissue"])), ReleaseType::Unknown);
        assert_eq!(canonical_release_type(&CanonicalRelease::default()), ReleaseType::Unknown);
    }

    #[test]
    fn test_provider_types() {
        assert_eq!(
            catalog_release_type(&CatalogItem::album("Madonna", "Frozen - Single", 3)),
            ReleaseType::Single
        );
        assert_eq!(
            catalog_release_type(&CatalogItem::album("Madonna", "Remixed - EP", 5)),
            ReleaseType::Ep
        );
        assert_eq!(
            catalog_release_type(&CatalogItem::album("Various Artists", "Now 40", 40)),
            ReleaseType::Compilation
        );
        assert_eq!(
            catalog_release_type(&CatalogItem::album("Madonna", "Ray of Light", 13)),
            ReleaseType::Album
        );
    }

    #[test]
    fn test_single_track_is_single_regardless_of_suffix() {
        assert_eq!(
            catalog_release_type(&CatalogItem::album("Madonna", "Frozen", 1)),
            ReleaseType::Single
        );
        assert_eq!(
            catalog_release_type(&CatalogItem::album("Madonna", "Frozen - EP", 1)),
            ReleaseType::Ep
        );
        assert_eq!(
            catalog_release_type(&CatalogItem::album("Various Artists", "Hit", 1)),
            ReleaseType::Single
        );
    }

    #[test]
    fn test_compatibility_is_asymmetric() {
        use ReleaseType::*;
        assert!(is_compatible(Unknown, Single));
        assert!(is_compatible(Single, Single));
        assert!(!is_compatible(Single, Album));
        assert!(!is_compatible(Album, Single));
        assert!(!is_compatible(Album, Ep));
        assert!(is_compatible(Ep, Ep));
        assert!(is_compatible(Compilation, Album));
        assert!(is_compatible(Single, Compilation));
    }
}
