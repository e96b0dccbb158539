//! Artist name resolution.
//!
//! Decides how canonical artist credits are displayed and which spelling
//! (standard name or release-specific variation) an external source confirms.

use std::sync::LazyLock;

use regex::Regex;

use super::domain::MetadataSource;
use super::similarity::{similarity_score, strip_disambiguator};
use crate::model::Artist;

/// Minimum score for an external source to confirm a spelling.
pub const NAME_VALIDATION_THRESHOLD: f64 = 0.85;

/// Separators between credited names in an external artist string.
static CREDIT_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:,|&|\bfeat\.|\bvs\.|\band\b)\s*").expect("valid credit separator regex")
});

/// Display form of a raw catalog name.
///
/// Drops the " (2)" disambiguator and rewrites "Alchemist, The" as
/// "The Alchemist".
pub fn display_name(raw: &str) -> String {
    let cleaned = strip_disambiguator(raw).trim();
    let lowered = cleaned.to_lowercase();
    if lowered.ends_with(", the") {
        // ", the" is ASCII so the byte offset is shared with `cleaned`
        let base = cleaned[..cleaned.len() - 5].trim();
        return format!("The {base}");
    }
    cleaned.to_string()
}

/// String placed between two credited artists for a stored join separator.
pub fn joiner_for(separator: Option<&str>) -> String {
    let Some(join) = separator else {
        return ", ".to_string();
    };
    if join.is_empty() {
        return " ".to_string();
    }
    let trimmed = join.trim();
    if trimmed.is_empty() {
        return join.to_string();
    }
    if trimmed == "," {
        return ", ".to_string();
    }
    format!(" {trimmed} ")
}

/// Join artist credits into one display string.
///
/// Each artist contributes its variation if present, else its standard name.
/// Separators trail the artist they are stored on, so artist `i` is joined
/// with artist `i - 1`'s separator.
pub fn format_artist_names(artists: &[Artist]) -> String {
    let mut display = String::new();
    for (i, artist) in artists.iter().enumerate() {
        if i > 0 {
            display.push_str(&joiner_for(artists[i - 1].join.as_deref()));
        }
        display.push_str(&display_name(artist.credited_name()));
    }
    display
}

/// Best score of `target` against the whole source string or any chunk of it.
fn best_source_score(target: &str, source: &str, chunks: &[&str]) -> f64 {
    chunks
        .iter()
        .map(|chunk| similarity_score(target, chunk))
        .fold(similarity_score(target, source).max(0.0), f64::max)
}

/// Which spelling of an artist an external source string confirms.
///
/// Without a source, the variation (if any) wins. With a variation, the
/// variation is kept when confirmed, replaced by the standard name when only
/// that is confirmed, and kept anyway when neither is.
pub fn validate_artist_name(artist: &Artist, source: Option<&str>) -> String {
    let standard = display_name(&artist.name);
    let variation = artist.variation().map(display_name);

    let Some(source) = source.filter(|s| !s.is_empty()) else {
        return variation.unwrap_or(standard);
    };

    let Some(variation) = variation else {
        return standard;
    };

    let chunks: Vec<&str> = CREDIT_SEPARATORS
        .split(source)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    if best_source_score(&variation, source, &chunks) >= NAME_VALIDATION_THRESHOLD {
        return variation;
    }
    if best_source_score(&standard, source, &chunks) >= NAME_VALIDATION_THRESHOLD {
        return standard;
    }
    variation
}

/// Display string for a release's artists, validated against the provider
/// artist string when the artist field is sourced externally.
pub fn smart_artist_display(
    artists: &[Artist],
    external_artist: Option<&str>,
    artist_source: MetadataSource,
) -> String {
    let external = external_artist.filter(|s| !s.is_empty());
    let Some(external) = external.filter(|_| artist_source != MetadataSource::Canonical) else {
        return format_artist_names(artists);
    };

    let validated: Vec<Artist> = artists
        .iter()
        .map(|artist| Artist {
            name: validate_artist_name(artist, Some(external)),
            name_variation: None,
            ..artist.clone()
        })
        .collect();
    format_artist_names(&validated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Nirvana (2)"), "Nirvana");
        assert_eq!(display_name("Alchemist, The"), "The Alchemist");
        assert_eq!(display_name("Beatles, THE (3)"), "The Beatles");
        assert_eq!(display_name("Madonna"), "Madonna");
    }

    #[test]
    fn test_joiner_rules() {
        assert_eq!(joiner_for(None), ", ");
        assert_eq!(joiner_for(Some("")), " ");
        assert_eq!(joiner_for(Some("  ")), "  ");
        assert_eq!(joiner_for(Some(",")), ", ");
        assert_eq!(joiner_for(Some("&")), " & ");
        assert_eq!(joiner_for(Some(" feat. ")), " feat. ");
    }

    #[test]
    fn test_format_uses_previous_artists_join() {
        let artists = vec![Artist::new("Run").with_join(""), Artist::new("D.M.C.")];
        assert_eq!(format_artist_names(&artists), "Run D.M.C.");

        let artists = vec![
            Artist::new("Queen").with_join("&"),
            Artist::new("David Bowie").with_join(","),
            Artist::new("Nobody (4)"),
        ];
        assert_eq!(format_artist_names(&artists), "Queen & David Bowie, Nobody");
    }

    #[test]
    fn test_format_prefers_variation() {
        let artists = vec![Artist::new("Richard D. James").with_variation("AFX")];
        assert_eq!(format_artist_names(&artists), "AFX");
        assert_eq!(format_artist_names(&[]), "");
    }

    #[test]
    fn test_validate_without_source_prefers_variation() {
        let artist = Artist::new("Richard James").with_variation("AFX");
        assert_eq!(validate_artist_name(&artist, None), "AFX");
        assert_eq!(validate_artist_name(&Artist::new("Madonna"), None), "Madonna");
    }

    #[test]
    fn test_validate_neither_confirmed_falls_back_to_variation() {
        let artist = Artist::new("Richard James").with_variation("AFX");
        assert!(similarity_score("AFX", "Aphex Twin") < NAME_VALIDATION_THRESHOLD);
        assert!(similarity_score("Richard James", "Aphex Twin") < NAME_VALIDATION_THRESHOLD);
        assert_eq!(validate_artist_name(&artist, Some("Aphex Twin")), "AFX");
    }

    #[test]
    fn test_validate_standard_name_corrects_variation() {
        let artist = Artist::new("Aphex Twin").with_variation("AFX");
        assert_eq!(validate_artist_name(&artist, Some("Aphex Twin")), "Aphex Twin");
    }

    #[test]
    fn test_validate_matches_chunks_of_collaborations() {
        let artist = Artist::new("Jay-Z (2)").with_variation("Jay Z");
        let source = "Kanye West & Jay Z feat. Frank Ocean";
        assert_eq!(validate_artist_name(&artist, Some(source)), "Jay Z");
    }

    #[test]
    fn test_validate_threshold_boundary() {
        // 20-character token with 3 substitutions scores exactly 0.85
        let variation = "abcdefghijklmnopqrst";
        let at_threshold = "abcdefghijklmnopqxyz";
        assert_eq!(similarity_score(variation, at_threshold), 0.85);
        let artist = Artist::new("Standard Name").with_variation(variation);
        assert_eq!(validate_artist_name(&artist, Some(at_threshold)), variation);

        // 4 substitutions drops to 0.80, so the confirmed standard name wins
        let below = "abcdefghijklmnopwxyz";
        let artist = Artist::new(below).with_variation(variation);
        assert_eq!(validate_artist_name(&artist, Some(below)), below);
    }

    #[test]
    fn test_smart_display_validates_each_artist() {
        let artists = vec![
            Artist::new("Aphex Twin").with_variation("AFX").with_join("&"),
            Artist::new("Squarepusher"),
        ];
        let display = smart_artist_display(
            &artists,
            Some("Aphex Twin & Squarepusher"),
            MetadataSource::Commercial,
        );
        assert_eq!(display, "Aphex Twin & Squarepusher");

        let canonical = smart_artist_display(
            &artists,
            Some("Aphex Twin & Squarepusher"),
            MetadataSource::Canonical,
        );
        assert_eq!(canonical, "AFX & Squarepusher");
    }
}
