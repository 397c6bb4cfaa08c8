use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for scoring events.
///
/// Decouples the engine from specific output mechanisms (stdout, log crate,
/// a host application's own telemetry) so each caller can observe scoring
/// without changing the orchestration code.
pub trait ScoringLogger: Send {
    /// Report criterion-level progress within one scoring call.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one transcript.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. word count, overall score).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit a summary over every transcript scored so far. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
///
/// Used by library callers that don't care about timings and by tests.
pub struct NullScoringLogger;

impl ScoringLogger for NullScoringLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger that tracks per-criterion timing and metrics, and
/// provides a summary report through the `log` facade.
pub struct StdoutScoringLogger {
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    transcripts: usize,
}

impl StdoutScoringLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            transcripts: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let transcripts = self.transcripts;
        let mut lines = Vec::new();

        lines.push(format!(
            "Scoring summary ({transcripts} transcripts, {:.1}s total):",
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:20}: avg {avg_ms:8.2}ms  total {total_ms:8.1}ms"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let avg = if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            lines.push(format!("  {name}: avg {avg:.1}"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for StdoutScoringLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringLogger for StdoutScoringLogger {
    fn progress(&mut self, current: usize, total: usize) {
        if total > 0 && current == total {
            self.transcripts += 1;
        }
        log::debug!("Scored {current}/{total} criteria");
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
