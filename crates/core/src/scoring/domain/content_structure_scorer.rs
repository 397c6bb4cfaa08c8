use crate::rubric::domain::content_element::ContentElement;
use crate::rubric::domain::rubric::{ContentStructureCriterion, Criterion};
use crate::shared::text;

use super::criterion_result::{CriterionResult, Details};
use super::criterion_scorer::CriterionScorer;
use super::measurement::Measurement;
use super::semantic_similarity::SemanticSimilarity;
use super::transcript::Transcript;

const MAX_DISPLAYED_KEYWORDS: usize = 10;
const ELEMENT_SHARE: f64 = 0.7;
const STRUCTURE_PRESENT: f64 = 0.3;
const STRUCTURE_ABSENT: f64 = 0.1;
const SEMANTIC_SHARE: f64 = 0.2;
/// Sum of the best-case terms, so a perfect transcript scores the full weight.
const NORMALIZER: f64 = ELEMENT_SHARE + STRUCTURE_PRESENT + SEMANTIC_SHARE;

/// Keyword and semantic coverage of the expected introduction content.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentCoverage {
    pub found: Vec<ContentElement>,
    pub missing: Vec<ContentElement>,
    pub keywords: Vec<String>,
    pub has_structure: bool,
    pub semantic: Measurement<f64>,
}

impl ContentCoverage {
    pub fn elements_count(&self) -> usize {
        self.found.len()
    }

    /// Fraction of the criterion weight earned, in [0, 1].
    pub fn ratio(&self) -> f64 {
        let element_ratio = self.found.len() as f64 / ContentElement::ALL.len() as f64;
        let structure = if self.has_structure {
            STRUCTURE_PRESENT
        } else {
            STRUCTURE_ABSENT
        };
        (ELEMENT_SHARE * element_ratio + structure + SEMANTIC_SHARE * self.semantic.value())
            / NORMALIZER
    }
}

/// Checks coverage of name, school, family, location and hobbies, the use of
/// ordering words, and closeness to an ideal introduction.
pub struct ContentStructureScorer {
    config: ContentStructureCriterion,
    similarity: SemanticSimilarity,
}

impl ContentStructureScorer {
    pub fn new(config: ContentStructureCriterion, similarity: SemanticSimilarity) -> Self {
        Self { config, similarity }
    }

    pub fn coverage(&self, transcript: &Transcript) -> ContentCoverage {
        let lower = transcript.lowercase();
        let mut found = Vec::new();
        let mut missing = Vec::new();
        let mut keywords = Vec::new();

        for (element, group) in self.config.elements.iter() {
            let matched = text::matching_keywords(lower, group);
            if matched.is_empty() {
                missing.push(element);
            } else {
                found.push(element);
                keywords.extend(matched.into_iter().map(str::to_string));
            }
        }
        keywords.truncate(MAX_DISPLAYED_KEYWORDS);

        let has_structure = !text::matching_keywords(lower, &self.config.order_keywords).is_empty();

        let semantic = self
            .similarity
            .measure(transcript.text(), &self.config.ideal_introduction);
        if let Some(reason) = semantic.degraded_reason() {
            log::warn!("Semantic similarity unavailable, using fallback: {reason}");
        }

        ContentCoverage {
            found,
            missing,
            keywords,
            has_structure,
            semantic,
        }
    }
}

impl CriterionScorer for ContentStructureScorer {
    fn criterion(&self) -> Criterion {
        Criterion::ContentStructure
    }

    fn score(&self, transcript: &Transcript) -> CriterionResult {
        let weight = self.config.weight;
        let coverage = self.coverage(transcript);
        let count = coverage.elements_count();
        let total = ContentElement::ALL.len();

        let missing = coverage
            .missing
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join(", ");
        let feedback = if count >= 4 {
            format!("Excellent content coverage! Includes {count}/{total} key elements.")
        } else if count == 3 {
            format!("Good content. Consider adding: {missing}.")
        } else {
            format!("Content needs improvement. Missing: {missing}.")
        };

        let details = Details::new()
            .with("Elements found", format!("{count}/{total}"))
            .with("Has structure", coverage.has_structure)
            .with("Semantic similarity", text::percent(*coverage.semantic.value(), 2));

        CriterionResult::new(
            Criterion::ContentStructure,
            coverage.ratio() * weight,
            weight,
            feedback,
        )
        .with_keywords(&coverage.keywords)
        .with_details(details)
    }
}
