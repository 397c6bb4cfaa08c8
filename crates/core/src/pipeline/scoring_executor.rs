use std::time::Instant;

use crate::scoring::domain::criterion_result::CriterionResult;
use crate::scoring::domain::criterion_scorer::CriterionScorer;
use crate::scoring::domain::transcript::Transcript;

/// One criterion's result plus how long its scorer ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCriterion {
    pub result: CriterionResult,
    pub elapsed_ms: f64,
}

/// Abstracts how the criterion scorers are run over a transcript.
///
/// This is a port (application-layer interface). Implementations must return
/// one entry per scorer, in the order the scorers were given.
pub trait ScoringExecutor: Send + Sync {
    fn execute(
        &self,
        scorers: &[Box<dyn CriterionScorer>],
        transcript: &Transcript,
    ) -> Result<Vec<ScoredCriterion>, Box<dyn std::error::Error>>;
}

/// Runs scorers one after another on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialScoringExecutor;

impl ScoringExecutor for SequentialScoringExecutor {
    fn execute(
        &self,
        scorers: &[Box<dyn CriterionScorer>],
        transcript: &Transcript,
    ) -> Result<Vec<ScoredCriterion>, Box<dyn std::error::Error>> {
        Ok(scorers
            .iter()
            .map(|scorer| run_timed(scorer.as_ref(), transcript))
            .collect())
    }
}

pub(crate) fn run_timed(scorer: &dyn CriterionScorer, transcript: &Transcript) -> ScoredCriterion {
    let start = Instant::now();
    let result = scorer.score(transcript);
    ScoredCriterion {
        result,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}
