use serde::Serialize;

use super::criterion_result::CriterionResult;

/// Weighted result of scoring one transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    /// `100 * sum(criteria.score) / total rubric weight`, in [0, 100].
    pub overall_score: f64,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpm: Option<f64>,
    pub criteria: Vec<CriterionResult>,
}

impl ScoreReport {
    pub fn assemble(criteria: Vec<CriterionResult>, word_count: usize, total_weight: f64) -> Self {
        let earned: f64 = criteria.iter().map(|c| c.score).sum();
        let overall_score = (earned / total_weight * 100.0).clamp(0.0, 100.0);
        let wpm = criteria.iter().find_map(|c| c.wpm);
        Self {
            overall_score,
            word_count,
            wpm,
            criteria,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
