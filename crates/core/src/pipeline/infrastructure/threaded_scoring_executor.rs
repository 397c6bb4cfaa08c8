use crate::pipeline::scoring_executor::{run_timed, ScoredCriterion, ScoringExecutor};
use crate::scoring::domain::criterion_scorer::CriterionScorer;
use crate::scoring::domain::transcript::Transcript;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Executes criterion scorers on a small pool of scoped worker threads.
///
/// Layout: `main [queue jobs] → workers [score] → main [reorder]`
///
/// Scorers only read the shared transcript, so no locking is needed. Useful
/// when the embedding model and the grammar service dominate latency, since
/// both calls then overlap.
pub struct ThreadedScoringExecutor {
    max_workers: usize,
    channel_capacity: usize,
}

impl ThreadedScoringExecutor {
    pub fn new() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_max_workers(workers)
    }

    pub fn with_max_workers(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }
}

impl Default for ThreadedScoringExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringExecutor for ThreadedScoringExecutor {
    fn execute(
        &self,
        scorers: &[Box<dyn CriterionScorer>],
        transcript: &Transcript,
    ) -> Result<Vec<ScoredCriterion>, Box<dyn std::error::Error>> {
        if scorers.is_empty() {
            return Ok(Vec::new());
        }
        let workers = self.max_workers.min(scorers.len());

        let (job_tx, job_rx) =
            crossbeam_channel::bounded::<(usize, &dyn CriterionScorer)>(self.channel_capacity);
        let (result_tx, result_rx) =
            crossbeam_channel::bounded::<(usize, ScoredCriterion)>(scorers.len());

        let panicked = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let job_rx = job_rx.clone();
                    let result_tx = result_tx.clone();
                    scope.spawn(move || {
                        for (index, scorer) in job_rx {
                            if result_tx.send((index, run_timed(scorer, transcript))).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();
            drop(job_rx);
            drop(result_tx);

            for (index, scorer) in scorers.iter().enumerate() {
                if job_tx.send((index, scorer.as_ref())).is_err() {
                    break;
                }
            }
            drop(job_tx);

            handles
                .into_iter()
                .map(|handle| handle.join())
                .filter(Result::is_err)
                .count()
        });

        if panicked > 0 {
            return Err(format!("{panicked} scoring worker(s) panicked").into());
        }

        let mut slots: Vec<Option<ScoredCriterion>> = vec![None; scorers.len()];
        for (index, scored) in result_rx.try_iter() {
            slots[index] = Some(scored);
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| -> Box<dyn std::error::Error> {
                    format!("No result for {}", scorers[index].criterion()).into()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::scoring_executor::SequentialScoringExecutor;
    use crate::rubric::domain::rubric::Criterion;
    use crate::scoring::domain::criterion_result::CriterionResult;
    use std::time::Duration;

    struct SlowScorer {
        criterion: Criterion,
        delay_ms: u64,
    }

    impl CriterionScorer for SlowScorer {
        fn criterion(&self) -> Criterion {
            self.criterion
        }

        fn score(&self, transcript: &Transcript) -> CriterionResult {
            std::thread::sleep(Duration::from_millis(self.delay_ms));
            CriterionResult::new(
                self.criterion,
                transcript.word_count() as f64,
                100.0,
                "slow",
            )
        }
    }

    struct PanickingScorer;

    impl CriterionScorer for PanickingScorer {
        fn criterion(&self) -> Criterion {
            Criterion::Clarity
        }

        fn score(&self, _: &Transcript) -> CriterionResult {
            panic!("scorer failure");
        }
    }

    fn scorers_slowest_first() -> Vec<Box<dyn CriterionScorer>> {
        Criterion::ALL
            .iter()
            .enumerate()
            .map(|(i, &criterion)| -> Box<dyn CriterionScorer> {
                Box::new(SlowScorer {
                    criterion,
                    delay_ms: (6 - i as u64) * 5,
                })
            })
            .collect()
    }

    #[test]
    fn test_results_in_scorer_order() {
        let scorers = scorers_slowest_first();
        let results = ThreadedScoringExecutor::with_max_workers(6)
            .execute(&scorers, &Transcript::new("one two three", 1.0))
            .unwrap();
        let order: Vec<_> = results.iter().map(|r| r.result.criterion).collect();
        assert_eq!(order, Criterion::ALL.to_vec());
    }

    #[test]
    fn test_matches_sequential_results() {
        let scorers = scorers_slowest_first();
        let transcript = Transcript::new("a b c d e", 1.0);
        let threaded = ThreadedScoringExecutor::with_max_workers(3)
            .execute(&scorers, &transcript)
            .unwrap();
        let sequential = SequentialScoringExecutor.execute(&scorers, &transcript).unwrap();
        let threaded: Vec<_> = threaded.into_iter().map(|r| r.result).collect();
        let sequential: Vec<_> = sequential.into_iter().map(|r| r.result).collect();
        assert_eq!(threaded, sequential);
    }

    #[test]
    fn test_single_worker() {
        let scorers = scorers_slowest_first();
        let results = ThreadedScoringExecutor::with_max_workers(1)
            .execute(&scorers, &Transcript::new("x", 1.0))
            .unwrap();
        assert_eq!(results.len(), 6);
    }

    #[test]
    fn test_zero_workers_clamped_to_one() {
        assert_eq!(ThreadedScoringExecutor::with_max_workers(0).max_workers(), 1);
    }

    #[test]
    fn test_empty_scorers() {
        let results = ThreadedScoringExecutor::new()
            .execute(&[], &Transcript::new("x", 1.0))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_panicking_scorer_reports_error() {
        let scorers: Vec<Box<dyn CriterionScorer>> = vec![
            Box::new(SlowScorer {
                criterion: Criterion::Salutation,
                delay_ms: 0,
            }),
            Box::new(PanickingScorer),
        ];
        let result = ThreadedScoringExecutor::with_max_workers(2)
            .execute(&scorers, &Transcript::new("x", 1.0));
        assert!(result.is_err());
    }
}
