use crate::rubric::domain::rubric::Criterion;

use super::criterion_result::CriterionResult;
use super::transcript::Transcript;

/// Scores a transcript against one rubric criterion.
///
/// Implementations only read the transcript and their own configuration,
/// so any number of them can run concurrently.
pub trait CriterionScorer: Send + Sync {
    fn criterion(&self) -> Criterion;

    fn score(&self, transcript: &Transcript) -> CriterionResult;
}
