use crate::rubric::domain::rubric::{Criterion, SpeechRateCriterion};

use super::criterion_result::{CriterionResult, Details};
use super::criterion_scorer::CriterionScorer;
use super::transcript::Transcript;

/// Share of the weight available once the rate leaves the acceptable range.
const OUT_OF_RANGE_SHARE: f64 = 0.7;
/// Penalty per unit of relative deviation from the ideal, inside the range.
const DEVIATION_PENALTY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Slow,
    Good,
    Fast,
}

/// Words per minute against an ideal rate and an acceptable range.
///
/// Expects a positive duration; the engine rejects anything else before scoring.
pub struct SpeechRateScorer {
    config: SpeechRateCriterion,
}

impl SpeechRateScorer {
    pub fn new(config: SpeechRateCriterion) -> Self {
        Self { config }
    }

    pub fn pace(&self, wpm: f64) -> Pace {
        if wpm < self.config.min_wpm {
            Pace::Slow
        } else if wpm > self.config.max_wpm {
            Pace::Fast
        } else {
            Pace::Good
        }
    }

    /// Fraction of the weight earned at `wpm`.
    pub fn ratio(&self, wpm: f64) -> f64 {
        let c = &self.config;
        match self.pace(wpm) {
            Pace::Good => {
                let deviation = (wpm - c.ideal_wpm).abs() / c.ideal_wpm;
                1.0 - deviation * DEVIATION_PENALTY
            }
            Pace::Slow => wpm / c.min_wpm * OUT_OF_RANGE_SHARE,
            Pace::Fast => c.max_wpm / wpm * OUT_OF_RANGE_SHARE,
        }
    }
}

impl CriterionScorer for SpeechRateScorer {
    fn criterion(&self) -> Criterion {
        Criterion::SpeechRate
    }

    fn score(&self, transcript: &Transcript) -> CriterionResult {
        let weight = self.config.weight;
        let wpm = transcript.word_count() as f64 / transcript.duration_minutes();

        let feedback = match self.pace(wpm) {
            Pace::Good => format!("Good speech rate at {wpm:.0} WPM."),
            Pace::Slow => {
                format!("Speech rate is slow ({wpm:.0} WPM). Try to speak a bit faster.")
            }
            Pace::Fast => {
                format!("Speech rate is fast ({wpm:.0} WPM). Try to slow down slightly.")
            }
        };

        let details = Details::new()
            .with("Words per minute", format!("{wpm:.0}"))
            .with(
                "Ideal range",
                format!("{}-{} WPM", self.config.min_wpm, self.config.max_wpm),
            );

        CriterionResult::new(Criterion::SpeechRate, self.ratio(wpm) * weight, weight, feedback)
            .with_wpm(wpm)
            .with_details(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn scorer() -> SpeechRateScorer {
        SpeechRateScorer::new(SpeechRateCriterion::default())
    }

    fn transcript_of(words: usize, minutes: f64) -> Transcript {
        Transcript::new(&"word ".repeat(words), minutes)
    }

    #[test]
    fn test_ideal_rate_scores_exactly_max() {
        let r = scorer().score(&transcript_of(130, 1.0));
        assert_eq!(r.score, 10.0);
        assert_eq!(r.wpm, Some(130.0));
        assert_eq!(r.feedback, "Good speech rate at 130 WPM.");
    }

    #[test]
    fn test_slow_rate() {
        let r = scorer().score(&transcript_of(50, 1.0));
        assert_relative_eq!(r.score, 10.0 * (50.0 / 111.0) * 0.7, epsilon = 1e-9);
        assert_relative_eq!(r.score, 3.153, epsilon = 1e-3);
        assert!(r.feedback.contains("slow (50 WPM)"));
    }

    #[test]
    fn test_fast_rate() {
        let r = scorer().score(&transcript_of(200, 1.0));
        assert_relative_eq!(r.score, 10.0 * (160.0 / 200.0) * 0.7, epsilon = 1e-9);
        assert!(r.feedback.contains("fast (200 WPM)"));
    }

    #[rstest]
    #[case::lower_bound(111.0, Pace::Good)]
    #[case::upper_bound(160.0, Pace::Good)]
    #[case::just_below(110.9, Pace::Slow)]
    #[case::just_above(160.1, Pace::Fast)]
    #[case::zero(0.0, Pace::Slow)]
    fn test_pace_boundaries(#[case] wpm: f64, #[case] expected: Pace) {
        assert_eq!(scorer().pace(wpm), expected);
    }

    #[test]
    fn test_in_range_deviation_penalty() {
        let expected = 1.0 - (160.0 - 130.0) / 130.0 * 0.5;
        assert_relative_eq!(scorer().ratio(160.0), expected);
    }

    #[test]
    fn test_duration_scales_wpm() {
        let r = scorer().score(&transcript_of(195, 1.5));
        assert_relative_eq!(r.wpm.unwrap(), 130.0);
        assert_relative_eq!(r.score, 10.0);
    }

    #[test]
    fn test_empty_transcript_scores_zero() {
        let r = scorer().score(&transcript_of(0, 1.5));
        assert_eq!(r.wpm, Some(0.0));
        assert_relative_eq!(r.score, 0.0);
    }

    #[test]
    fn test_details() {
        let r = scorer().score(&transcript_of(130, 1.0));
        let details = r.details.unwrap();
        assert_eq!(details.get("Words per minute").unwrap().to_string(), "130");
        assert_eq!(details.get("Ideal range").unwrap().to_string(), "111-160 WPM");
    }
}
