use std::sync::Arc;

use thiserror::Error;

use crate::pipeline::scoring_executor::ScoringExecutor;
use crate::pipeline::scoring_logger::ScoringLogger;
use crate::rubric::domain::rubric::{Rubric, RubricError};
use crate::scoring::domain::clarity_scorer::ClarityScorer;
use crate::scoring::domain::content_structure_scorer::ContentStructureScorer;
use crate::scoring::domain::criterion_scorer::CriterionScorer;
use crate::scoring::domain::engagement_scorer::EngagementScorer;
use crate::scoring::domain::grammar_checker::GrammarChecker;
use crate::scoring::domain::language_grammar_scorer::LanguageGrammarScorer;
use crate::scoring::domain::salutation_scorer::SalutationScorer;
use crate::scoring::domain::score_report::ScoreReport;
use crate::scoring::domain::semantic_similarity::SemanticSimilarity;
use crate::scoring::domain::speech_rate_scorer::SpeechRateScorer;
use crate::scoring::domain::text_embedder::TextEmbedder;
use crate::scoring::domain::transcript::Transcript;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("duration must be a positive number of minutes, got {0}")]
    InvalidDuration(f64),
    #[error(transparent)]
    Rubric(#[from] RubricError),
    #[error("scoring failed: {0}")]
    Executor(String),
}

/// Scores transcripts against a rubric.
///
/// Owns one scorer per criterion, built once from the rubric and the
/// injected collaborators. `None` for a collaborator means it was not
/// available at startup; the affected criteria then use their fallback
/// values from [`Rubric::fallbacks`].
pub struct ScoringEngine {
    rubric: Rubric,
    scorers: Vec<Box<dyn CriterionScorer>>,
    executor: Box<dyn ScoringExecutor>,
    logger: Box<dyn ScoringLogger>,
}

impl ScoringEngine {
    pub fn new(
        rubric: Rubric,
        embedder: Option<Arc<dyn TextEmbedder>>,
        grammar_checker: Option<Arc<dyn GrammarChecker>>,
        executor: Box<dyn ScoringExecutor>,
        logger: Box<dyn ScoringLogger>,
    ) -> Result<Self, RubricError> {
        rubric.validate()?;

        if embedder.is_none() {
            log::warn!(
                "No text embedder available; semantic similarity defaults to {}",
                rubric.fallbacks.semantic_similarity
            );
        }
        if grammar_checker.is_none() {
            log::warn!("No grammar checker available; grammar component uses its default score");
        }

        let similarity = SemanticSimilarity::new(embedder, rubric.fallbacks.semantic_similarity);
        let scorers: Vec<Box<dyn CriterionScorer>> = vec![
            Box::new(SalutationScorer::new(rubric.salutation.clone())),
            Box::new(ContentStructureScorer::new(
                rubric.content_structure.clone(),
                similarity,
            )),
            Box::new(SpeechRateScorer::new(rubric.speech_rate.clone())),
            Box::new(LanguageGrammarScorer::new(
                rubric.language_grammar.clone(),
                grammar_checker,
                rubric.fallbacks.grammar_ratio,
            )),
            Box::new(ClarityScorer::new(rubric.clarity.clone())),
            Box::new(EngagementScorer::new(rubric.engagement.clone())),
        ];

        Ok(Self {
            rubric,
            scorers,
            executor,
            logger,
        })
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Scores one transcript spoken over `duration_minutes`.
    ///
    /// Leading and trailing whitespace is ignored. An empty transcript is
    /// scored rather than rejected; every criterion handles zero words. A
    /// duration so short that the speech rate overflows is rejected like a
    /// non-positive one.
    pub fn score_transcript(
        &mut self,
        transcript: &str,
        duration_minutes: f64,
    ) -> Result<ScoreReport, ScoringError> {
        if !duration_minutes.is_finite() || duration_minutes <= 0.0 {
            return Err(ScoringError::InvalidDuration(duration_minutes));
        }

        let transcript = Transcript::new(transcript, duration_minutes);
        if !(transcript.word_count() as f64 / duration_minutes).is_finite() {
            return Err(ScoringError::InvalidDuration(duration_minutes));
        }
        let total_weight = self.rubric.total_weight();
        if transcript.is_empty() {
            log::warn!("Scoring an empty transcript");
        }

        let scored = self
            .executor
            .execute(&self.scorers, &transcript)
            .map_err(|e| ScoringError::Executor(e.to_string()))?;
        if scored.len() != self.scorers.len() {
            return Err(ScoringError::Executor(format!(
                "expected {} criterion results, got {}",
                self.scorers.len(),
                scored.len()
            )));
        }

        let total = scored.len();
        let mut criteria = Vec::with_capacity(total);
        for (i, entry) in scored.into_iter().enumerate() {
            self.logger
                .timing(entry.result.criterion.display_name(), entry.elapsed_ms);
            self.logger.progress(i + 1, total);
            criteria.push(entry.result);
        }

        let report = ScoreReport::assemble(criteria, transcript.word_count(), total_weight);
        self.logger.metric("word_count", report.word_count as f64);
        self.logger.metric("overall_score", report.overall_score);
        self.logger.info(&format!(
            "Scored {} words: {:.1}/100",
            report.word_count, report.overall_score
        ));
        Ok(report)
    }

    /// Emits the logger's summary over every call so far.
    pub fn summary(&self) {
        self.logger.summary();
    }
}
