use crate::rubric::domain::rubric::{Criterion, EngagementCriterion};
use crate::shared::text;

use super::criterion_result::{CriterionResult, Details};
use super::criterion_scorer::CriterionScorer;
use super::transcript::Transcript;

/// Distinct positive words needed for the full positive-tone share.
const POSITIVE_TARGET: f64 = 3.0;
const POSITIVE_SHARE: f64 = 0.7;
const EMOTION_PRESENT: f64 = 0.3;
const EMOTION_ABSENT: f64 = 0.1;

/// Positive and emotional tone.
pub struct EngagementScorer {
    config: EngagementCriterion,
}

impl EngagementScorer {
    pub fn new(config: EngagementCriterion) -> Self {
        Self { config }
    }
}

impl CriterionScorer for EngagementScorer {
    fn criterion(&self) -> Criterion {
        Criterion::Engagement
    }

    fn score(&self, transcript: &Transcript) -> CriterionResult {
        let weight = self.config.weight;
        let lower = transcript.lowercase();

        let positive = text::matching_keywords(lower, &self.config.positive_words);
        let positive_count = positive.len();
        let has_emotion = !text::matching_keywords(lower, &self.config.emotion_words).is_empty();

        let positive_term = (positive_count as f64 / POSITIVE_TARGET).min(1.0) * POSITIVE_SHARE;
        let emotion_term = if has_emotion {
            EMOTION_PRESENT
        } else {
            EMOTION_ABSENT
        };

        let feedback = if positive_count >= 3 && has_emotion {
            "Highly engaging with positive and enthusiastic tone!"
        } else if positive_count >= 2 {
            "Good engagement. Shows positive tone."
        } else if positive_count >= 1 {
            "Some engagement present. Consider expressing more enthusiasm."
        } else {
            "Low engagement. Try to show more enthusiasm and positivity."
        };

        let details = Details::new()
            .with("Positive words", positive_count)
            .with("Shows emotion", has_emotion);

        CriterionResult::new(
            Criterion::Engagement,
            (positive_term + emotion_term) * weight,
            weight,
            feedback,
        )
        .with_keywords(&positive)
        .with_details(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::criterion_result::DetailValue;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn score(text: &str) -> CriterionResult {
        EngagementScorer::new(EngagementCriterion::default()).score(&Transcript::new(text, 1.0))
    }

    #[test]
    fn test_highly_engaging() {
        let r = score("I am so happy and excited, it is a great day and I feel proud.");
        assert_relative_eq!(r.score, 15.0);
        assert_eq!(r.feedback, "Highly engaging with positive and enthusiastic tone!");
        assert_eq!(
            r.keywords_found.unwrap(),
            vec!["happy".to_string(), "excited".to_string(), "great".to_string()]
        );
    }

    #[test]
    fn test_repetition_counts_once() {
        let r = score("happy happy happy happy");
        let details = r.details.unwrap();
        assert_eq!(details.get("Positive words"), Some(&DetailValue::Count(1)));
        assert_eq!(details.get("Shows emotion"), Some(&DetailValue::from("No")));
    }

    #[test]
    fn test_duplicate_positive_words_count_once() {
        let config = EngagementCriterion {
            positive_words: vec!["happy".to_string(); 3],
            ..EngagementCriterion::default()
        };
        let r = EngagementScorer::new(config).score(&Transcript::new("hello I am happy", 1.0));
        let details = r.details.unwrap();
        assert_eq!(details.get("Positive words"), Some(&DetailValue::Count(1)));
        assert_eq!(r.keywords_found.unwrap(), vec!["happy".to_string()]);
    }

    #[rstest]
    #[case::none("I go to school.", 0.1)]
    #[case::one_no_emotion("I enjoy cricket.", 0.7 / 3.0 + 0.1)]
    #[case::two_no_emotion("I enjoy cricket, it is great.", 0.7 * 2.0 / 3.0 + 0.1)]
    #[case::emotion_only("I feel ready.", 0.3)]
    fn test_score_ratio(#[case] text: &str, #[case] ratio: f64) {
        assert_relative_eq!(score(text).score, ratio * 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_positive_term_caps_at_three() {
        let r = score("happy great wonderful amazing excellent");
        assert_relative_eq!(r.score, (0.7 + 0.1) * 15.0, epsilon = 1e-9);
        assert_eq!(r.feedback, "Good engagement. Shows positive tone.");
    }

    #[test]
    fn test_low_engagement_feedback() {
        let r = score("");
        assert_eq!(r.feedback, "Low engagement. Try to show more enthusiasm and positivity.");
        assert_relative_eq!(r.score, 1.5, epsilon = 1e-9);
    }
}
