//! Token-level fuzzy string comparison.
//!
//! Every score in the engine is built on [`similarity_score`]: both strings
//! are tokenized, each token of the first is matched to its closest token of
//! the second by normalized edit distance, and the sum is divided by the
//! larger token count so surplus tokens on either side lower the score.

use unicode_normalization::UnicodeNormalization;

/// Tokens ignored when scoring.
const STOP_WORDS: [&str; 9] = ["the", "a", "an", "and", "&", "of", "in", "on", "at"];

/// Strip a trailing " (<digits>)" catalog disambiguator, e.g. "Nirvana (2)".
pub(crate) fn strip_disambiguator(text: &str) -> &str {
    let Some(inner) = text.strip_suffix(')') else {
        return text;
    };
    let Some(open) = inner.rfind('(') else {
        return text;
    };
    let digits = &inner[open + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return text;
    }
    let head = &inner[..open];
    match head.chars().next_back() {
        Some(c) if c.is_whitespace() => &head[..head.len() - c.len_utf8()],
        _ => text,
    }
}

/// Split text into scoring tokens.
///
/// Lowercases, drops the disambiguator, strips every non-alphanumeric
/// character from each word and removes stop words. "Guns N' Roses" and
/// "Guns N Roses" tokenize identically.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    strip_disambiguator(&lowered)
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Levenshtein distance over characters.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity of two tokens: `1 - distance / max_len`.
fn token_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / max_len as f64
}

/// Fuzzy similarity of two strings in `[0, 1]`.
pub fn similarity_score(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    match (tokens_a.is_empty(), tokens_b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let total: f64 = tokens_a
        .iter()
        .map(|ta| {
            tokens_b
                .iter()
                .map(|tb| token_similarity(ta, tb))
                .fold(0.0, f64::max)
        })
        .sum();

    total / tokens_a.len().max(tokens_b.len()) as f64
}

/// Normalize text for use as a provider query.
///
/// Unlike [`tokenize`] this keeps punctuation ("'Til Tuesday").
pub fn clean_for_search(text: &str) -> String {
    let lowered = text.to_lowercase();
    strip_disambiguator(&lowered)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Diacritic-free fallback query, e.g. "Sólstafir" -> "solstafir".
///
/// Keeps ASCII word characters, whitespace and hyphens only.
pub fn normalize_search_term(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_punctuation_and_stop_words() {
        assert_eq!(tokenize("Guns N' Roses"), vec!["guns", "n", "roses"]);
        assert_eq!(tokenize("The Alchemist (2)"), vec!["alchemist"]);
        assert_eq!(tokenize("Simon & Garfunkel"), vec!["simon", "garfunkel"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_disambiguator_only_at_end() {
        assert_eq!(strip_disambiguator("Nirvana (2)"), "Nirvana");
        assert_eq!(strip_disambiguator("(2) Nirvana"), "(2) Nirvana");
        assert_eq!(strip_disambiguator("Live (Remastered)"), "Live (Remastered)");
        assert_eq!(strip_disambiguator("Track(2)"), "Track(2)");
        assert_eq!(strip_disambiguator("()"), "()");
    }

    #[test]
    fn test_edit_distance_basics() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn test_similarity_edge_cases() {
        assert_eq!(similarity_score("Ray of Light", "Ray of Light"), 1.0);
        assert_eq!(similarity_score("", ""), 1.0);
        assert_eq!(similarity_score("", "abc"), 0.0);
        assert_eq!(similarity_score("abc", ""), 0.0);
        // Stop words only tokenize to nothing
        assert_eq!(similarity_score("The", "An"), 1.0);
    }

    #[test]
    fn test_similarity_penalizes_surplus_tokens() {
        let short = similarity_score("Smith", "John Smith Band");
        assert!((short - 1.0 / 3.0).abs() < 1e-9);
        // Denominator is the larger token count in both directions
        let reverse = similarity_score("John Smith Band", "Smith");
        assert!(reverse < 0.7);
        assert_eq!(
            similarity_score("The Beatles", "Beatles"),
            similarity_score("Beatles", "The Beatles")
        );
    }

    #[test]
    fn test_similarity_ignores_case_and_order() {
        assert_eq!(similarity_score("Ray of Light", "Ray Of Light"), 1.0);
        assert_eq!(similarity_score("Light Ray", "Ray Light"), 1.0);
    }

    #[test]
    fn test_clean_for_search_keeps_punctuation() {
        assert_eq!(clean_for_search("  'Til   Tuesday (3) "), "'til tuesday (3)");
        assert_eq!(clean_for_search("'Til Tuesday (3)"), "'til tuesday");
        assert_eq!(clean_for_search("Guns N' Roses"), "guns n' roses");
    }

    #[test]
    fn test_normalize_search_term() {
        assert_eq!(normalize_search_term("Sólstafir"), "solstafir");
        assert_eq!(normalize_search_term("Björk  &  Friends!"), "bjork friends");
        assert_eq!(normalize_search_term("Jay-Z"), "jay-z");
    }
}
