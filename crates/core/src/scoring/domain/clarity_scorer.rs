use crate::rubric::domain::rubric::{ClarityCriterion, Criterion};
use crate::shared::text;

use super::criterion_result::{CriterionResult, Details};
use super::criterion_scorer::CriterionScorer;
use super::transcript::Transcript;

/// Penalizes filler phrases relative to transcript length.
///
/// Fillers are counted as substrings, so "like" also matches inside "likely".
pub struct ClarityScorer {
    config: ClarityCriterion,
}

impl ClarityScorer {
    pub fn new(config: ClarityCriterion) -> Self {
        Self { config }
    }
}

impl CriterionScorer for ClarityScorer {
    fn criterion(&self) -> Criterion {
        Criterion::Clarity
    }

    fn score(&self, transcript: &Transcript) -> CriterionResult {
        let weight = self.config.weight;
        let lower = transcript.lowercase();

        let mut filler_count = 0;
        let mut found = Vec::new();
        for filler in &self.config.filler_words {
            let count = text::count_occurrences(lower, filler);
            if count > 0 {
                filler_count += count;
                found.push(filler.as_str());
            }
        }

        let word_count = transcript.word_count();
        let filler_pct = if word_count > 0 {
            filler_count as f64 * 100.0 / word_count as f64
        } else {
            0.0
        };

        let (ratio, feedback) = if filler_pct < 2.0 {
            (1.0, "Excellent clarity with minimal filler words.".to_string())
        } else if filler_pct < 5.0 {
            (0.8, "Good clarity. Some filler words present.".to_string())
        } else if filler_pct < 10.0 {
            (
                0.6,
                format!("Moderate use of filler words ({filler_count} found). Try to reduce them."),
            )
        } else {
            (
                0.4,
                format!(
                    "High use of filler words ({filler_count} found). Practice reducing them for better clarity."
                ),
            )
        };

        let fillers_found = if found.is_empty() {
            "None".to_string()
        } else {
            found.join(", ")
        };
        let details = Details::new()
            .with("Filler words count", filler_count)
            .with("Filler word ratio", format!("{filler_pct:.1}%"))
            .with("Fillers found", fillers_found);

        CriterionResult::new(Criterion::Clarity, weight * ratio, weight, feedback)
            .with_details(details)
    }
}
