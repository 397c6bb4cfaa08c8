use std::collections::HashSet;
use std::sync::Arc;

use crate::rubric::domain::rubric::{Criterion, LanguageGrammarCriterion, GRAMMAR_SHARE};
use crate::shared::text;

use super::criterion_result::{CriterionResult, Details};
use super::criterion_scorer::CriterionScorer;
use super::grammar_checker::{GrammarChecker, GrammarIssue};
use super::measurement::Measurement;
use super::transcript::Transcript;

/// Grammar half of the language criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarAssessment {
    pub score: f64,
    pub errors: usize,
    /// One summary line per reported issue.
    pub issues: Vec<String>,
}

/// Lexical diversity half of the language criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VocabularyAssessment {
    pub score: f64,
    /// Type-token ratio, 0 for an empty transcript.
    pub ttr: f64,
    pub unique_words: usize,
}

/// Grammar error rate from an external checker plus type-token ratio.
pub struct LanguageGrammarScorer {
    config: LanguageGrammarCriterion,
    checker: Option<Arc<dyn GrammarChecker>>,
    fallback_ratio: f64,
}

impl LanguageGrammarScorer {
    pub fn new(
        config: LanguageGrammarCriterion,
        checker: Option<Arc<dyn GrammarChecker>>,
        fallback_ratio: f64,
    ) -> Self {
        Self {
            config,
            checker,
            fallback_ratio,
        }
    }

    pub fn grammar(&self, transcript: &Transcript) -> Measurement<GrammarAssessment> {
        let weight = self.config.weight;
        let fallback = GrammarAssessment {
            score: weight * self.fallback_ratio,
            errors: 0,
            issues: Vec::new(),
        };

        let Some(checker) = &self.checker else {
            return Measurement::degraded(fallback, "no grammar checker available");
        };
        let issues = match checker.check(transcript.text()) {
            Ok(issues) => issues,
            Err(e) => return Measurement::degraded(fallback, format!("grammar check failed: {e}")),
        };

        let errors = issues.len();
        let word_count = transcript.word_count();
        let error_rate = if word_count > 0 {
            errors as f64 * 100.0 / word_count as f64
        } else {
            0.0
        };
        let ratio = if error_rate < 3.0 {
            GRAMMAR_SHARE
        } else if error_rate < 5.0 {
            0.5
        } else if error_rate < 10.0 {
            0.4
        } else {
            0.3
        };

        Measurement::Measured(GrammarAssessment {
            score: weight * ratio,
            errors,
            issues: issues.iter().map(GrammarIssue::summary).collect(),
        })
    }

    pub fn vocabulary(&self, transcript: &Transcript) -> VocabularyAssessment {
        let tokens = text::lexical_tokens(transcript.text());
        let unique_words = tokens.iter().collect::<HashSet<_>>().len();
        let ttr = if tokens.is_empty() {
            0.0
        } else {
            unique_words as f64 / tokens.len() as f64
        };

        let ratio = if ttr > 0.7 {
            0.4
        } else if ttr > 0.5 {
            0.35
        } else if ttr > 0.3 {
            0.3
        } else {
            0.2
        };

        VocabularyAssessment {
            score: self.config.weight * ratio,
            ttr,
            unique_words,
        }
    }
}

impl CriterionScorer for LanguageGrammarScorer {
    fn criterion(&self) -> Criterion {
        Criterion::LanguageGrammar
    }

    fn score(&self, transcript: &Transcript) -> CriterionResult {
        let grammar = self.grammar(transcript);
        if let Some(reason) = grammar.degraded_reason() {
            log::warn!("Grammar check unavailable, using default score: {reason}");
        }
        let grammar = grammar.into_value();
        let vocabulary = self.vocabulary(transcript);

        let grammar_feedback = match grammar.errors {
            0 => "No grammar errors detected.".to_string(),
            n @ 1..=2 => format!("{n} minor grammar issues found."),
            n => format!("{n} grammar errors detected. Review and correct."),
        };
        let ttr = text::percent(vocabulary.ttr, 2);
        let feedback = format!("{grammar_feedback} Vocabulary richness: {ttr}");

        let mut details = Details::new()
            .with("Grammar errors", grammar.errors)
            .with("Vocabulary richness (TTR)", ttr)
            .with("Unique words", vocabulary.unique_words);
        if !grammar.issues.is_empty() {
            details = details.with("Grammar issues", grammar.issues.join("; "));
        }

        let weight = self.config.weight;
        CriterionResult::new(
            Criterion::LanguageGrammar,
            grammar.score + vocabulary.score,
            weight,
            feedback,
        )
        .with_details(details)
    }
}
