use crate::shared::text;

/// A trimmed transcript with the derived views every scorer shares.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    text: String,
    lowercase: String,
    word_count: usize,
    duration_minutes: f64,
}

impl Transcript {
    pub fn new(raw: &str, duration_minutes: f64) -> Self {
        let text = raw.trim().to_string();
        let lowercase = text.to_lowercase();
        let word_count = text::word_count(&text);
        Self {
            text,
            lowercase,
            word_count,
            duration_minutes,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Case-folded text for keyword matching.
    pub fn lowercase(&self) -> &str {
        &self.lowercase
    }

    /// Whitespace-delimited word count.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    /// The first `n` whitespace-delimited words, re-joined with single spaces and case-folded.
    pub fn leading_words_lowercase(&self, n: usize) -> String {
        text::words(&self.text)
            .take(n)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_before_counting() {
        let t = Transcript::new("  Hello  World \n", 1.0);
        assert_eq!(t.text(), "Hello  World");
        assert_eq!(t.lowercase(), "hello  world");
        assert_eq!(t.word_count(), 2);
    }

    #[test]
    fn test_empty_transcript() {
        let t = Transcript::new("   ", 1.5);
        assert!(t.is_empty());
        assert_eq!(t.leading_words_lowercase(50), "");
    }

    #[test]
    fn test_leading_words_window() {
        let t = Transcript::new("One TWO three\nfour", 1.0);
        assert_eq!(t.leading_words_lowercase(3), "one two three");
    }
}
