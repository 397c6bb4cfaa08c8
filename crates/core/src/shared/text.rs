use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static LEXICAL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("lexical token pattern is valid"));

/// Whitespace-delimited words. Every scorer that needs a word count uses this.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

pub fn word_count(text: &str) -> usize {
    words(text).count()
}

/// Word-character tokens, lower-cased.
///
/// Finer-grained than [`words`]: punctuation splits tokens, so "i'm" yields
/// two tokens. Used for lexical diversity, never for word counts.
pub fn lexical_tokens(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    LEXICAL_TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Non-overlapping substring occurrences of `needle` in `haystack`.
///
/// Matches inside longer words count ("like" in "likely").
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Distinct keywords from `keywords` that occur as substrings of `haystack`,
/// in list order. A keyword listed twice is reported once.
pub fn matching_keywords<'a>(haystack: &str, keywords: &'a [String]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .map(String::as_str)
        .filter(|kw| !kw.is_empty() && haystack.contains(kw))
        .filter(|kw| seen.insert(*kw))
        .collect()
}

/// Formats a ratio in [0, 1] as a percentage with `decimals` places.
pub fn percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", 0)]
    #[case::whitespace_only("   \n\t ", 0)]
    #[case::single("hello", 1)]
    #[case::punctuation_attached("Hello, world!", 2)]
    #[case::mixed_whitespace("one  two\nthree\tfour", 4)]
    fn test_word_count(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(word_count(text), expected);
    }

    #[test]
    fn test_lexical_tokens_split_on_punctuation() {
        assert_eq!(
            lexical_tokens("I'm Sam, I'm 13."),
            vec!["i", "m", "sam", "i", "m", "13"]
        );
    }

    #[test]
    fn test_lexical_tokens_empty() {
        assert!(lexical_tokens("  ... ").is_empty());
    }

    #[test]
    fn test_count_occurrences_inside_words() {
        assert_eq!(count_occurrences("i like it, likely", "like"), 2);
    }

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
    }

    #[test]
    fn test_count_occurrences_empty_needle() {
        assert_eq!(count_occurrences("anything", ""), 0);
    }

    #[test]
    fn test_matching_keywords_preserves_list_order() {
        let keywords = vec!["hello".to_string(), "hi".to_string(), "good day".to_string()];
        assert_eq!(matching_keywords("hi and hello", &keywords), vec!["hello", "hi"]);
    }

    #[test]
    fn test_matching_keywords_reports_duplicates_once() {
        let keywords: Vec<String> = ["hello", "hi", "hello", "hello"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(matching_keywords("hello hi", &keywords), vec!["hello", "hi"]);
    }

    #[rstest]
    #[case(0.0, 2, "0.00%")]
    #[case(0.7234, 2, "72.34%")]
    #[case(0.05, 1, "5.0%")]
    fn test_percent(#[case] ratio: f64, #[case] decimals: usize, #[case] expected: &str) {
        assert_eq!(percent(ratio, decimals), expected);
    }
}
