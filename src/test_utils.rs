//! Test fixtures shared across the crate's unit tests.
//!
//! Customize with struct update syntax:
//!
//! ```ignore
//! let release = CanonicalRelease {
//!     year: None,
//!     ..madonna_ray_of_light()
//! };
//! ```

use std::path::{Path, PathBuf};

use crate::model::{Artist, CanonicalRelease, Format, Label, Track};
use crate::reconcile::CatalogItem;

/// Madonna - Ray of Light (1998, Maverick, 13 tracks, CD album).
pub fn madonna_ray_of_light() -> CanonicalRelease {
    CanonicalRelease {
        id: 1_234_567,
        year: Some(1998),
        formats: vec![Format {
            name: "CD".to_string(),
            qty: "1".to_string(),
            descriptions: vec!["Album".to_string()],
        }],
        labels: vec![Label {
            name: "Maverick".to_string(),
            catno: "9 46847-2".to_string(),
        }],
        tracklist: (1..=13)
            .map(|n| Track::new(n.to_string(), format!("Track {n}")))
            .collect(),
        ..CanonicalRelease::new(vec![Artist::new("Madonna")], "Ray of Light")
    }
}

/// Two-artist release whose first credit is spelled differently by providers.
pub fn collaboration() -> CanonicalRelease {
    CanonicalRelease::new(
        vec![Artist::new("Gabe Nandez"), Artist::new("Some Collaborator")],
        "Lost Tapes",
    )
}

/// A commercial album record with a release date.
pub fn album_item(artist: &str, title: &str, track_count: u32, release_date: &str) -> CatalogItem {
    CatalogItem {
        release_date: Some(release_date.to_string()),
        ..CatalogItem::album(artist, title, track_count)
    }
}

/// Write `release` as JSON into `dir` and return the file path.
pub fn write_release_json(dir: &Path, release: &CanonicalRelease) -> PathBuf {
    let path = dir.join(format!("release-{}.json", release.id));
    let json = serde_json::to_string_pretty(release).expect("Failed to serialize release");
    std::fs::write(&path, json).expect("Failed to write release fixture");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_madonna_fixture() {
        let release = madonna_ray_of_light();
        assert_eq!(release.display_artist(), "Madonna");
        assert_eq!(release.counted_track_count(), 13);
        assert_eq!(release.barcode(), None);
    }

    #[test]
    fn test_collaboration_display() {
        assert_eq!(collaboration().display_artist(), "Gabe Nandez, Some Collaborator");
    }

    #[test]
    fn test_write_release_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_release_json(dir.path(), &madonna_ray_of_light());
        let parsed: CanonicalRelease =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, madonna_ray_of_light());
    }
}
