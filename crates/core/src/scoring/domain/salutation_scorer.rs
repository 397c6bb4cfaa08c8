use crate::rubric::domain::rubric::{Criterion, SalutationCriterion};
use crate::shared::text;

use super::criterion_result::CriterionResult;
use super::criterion_scorer::CriterionScorer;
use super::transcript::Transcript;

/// Rewards greetings near the start of the introduction.
pub struct SalutationScorer {
    config: SalutationCriterion,
}

impl SalutationScorer {
    pub fn new(config: SalutationCriterion) -> Self {
        Self { config }
    }
}

impl CriterionScorer for SalutationScorer {
    fn criterion(&self) -> Criterion {
        Criterion::Salutation
    }

    fn score(&self, transcript: &Transcript) -> CriterionResult {
        let weight = self.config.weight;
        let opening = transcript.leading_words_lowercase(self.config.search_window);
        let found = text::matching_keywords(&opening, &self.config.keywords);

        let (ratio, feedback) = match found.len() {
            0 => (
                0.0,
                "No clear greeting found. Consider starting with 'Hello' or 'Good morning'.",
            ),
            1 => (0.6, "Basic greeting present."),
            2 => (0.8, "Good greeting present."),
            _ => (1.0, "Excellent greeting with multiple salutations."),
        };

        CriterionResult::new(Criterion::Salutation, weight * ratio, weight, feedback)
            .with_keywords(&found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn score(text: &str) -> CriterionResult {
        SalutationScorer::new(SalutationCriterion::default()).score(&Transcript::new(text, 1.0))
    }

    #[test]
    fn test_three_greetings_full_score() {
        let r = score("Hello, hi there, good morning everyone");
        assert_relative_eq!(r.score, 5.0);
        assert_eq!(
            r.keywords_found.unwrap(),
            vec!["hi".to_string(), "hello".to_string(), "good morning".to_string()]
        );
    }

    #[test]
    fn test_no_greeting_scores_zero() {
        let r = score("My name is Sam and I come from Pune.");
        assert_relative_eq!(r.score, 0.0);
        assert!(r.keywords_found.unwrap().is_empty());
        assert!(r.feedback.starts_with("No clear greeting"));
    }

    #[rstest]
    #[case::one("Hello, my name is Sam.", 3.0)]
    #[case::two("Good evening and hello to all.", 4.0)]
    fn test_partial_greetings(#[case] text: &str, #[case] expected: f64) {
        assert_relative_eq!(score(text).score, expected);
    }

    #[test]
    fn test_greeting_after_window_ignored() {
        let filler = "word ".repeat(50);
        let r = score(&format!("{filler} hello good morning"));
        assert_relative_eq!(r.score, 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        let r = score("GOOD MORNING");
        assert_relative_eq!(r.score, 3.0);
    }

    #[test]
    fn test_duplicate_keywords_count_once() {
        let config = SalutationCriterion {
            keywords: vec!["hello".to_string(); 3],
            ..SalutationCriterion::default()
        };
        let r = SalutationScorer::new(config).score(&Transcript::new("hello I am happy", 1.0));
        assert_relative_eq!(r.score, 3.0);
        assert_eq!(r.keywords_found.unwrap(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_empty_transcript() {
        let r = score("");
        assert_relative_eq!(r.score, 0.0);
        assert_relative_eq!(r.max_score, 5.0);
    }
}
