use std::collections::BTreeMap;
use std::time::Instant;

/// Cross-cutting logger for detection run events.
///
/// Decouples the use case from where progress and timings end up, so the
/// CLI, tests and any embedding application can observe a run without
/// touching the orchestration code.
pub trait PipelineLogger: Send {
    /// Report frame-level progress. `total` is 0 when unknown.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one frame or batch.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-frame value (e.g. detection count).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count, sum and extremes of one series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    fn new(value: f64) -> Self {
        Self {
            count: 1,
            total: value,
            min: value,
            max: value,
        }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// `log`-backed logger that aggregates stage timings and metrics and
/// prints a summary when the run ends.
///
/// Progress lines are throttled to every `throttle_frames` frames.
pub struct LogPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, SeriesStats>,
    metrics: BTreeMap<String, SeriesStats>,
    start_time: Instant,
    frames_seen: usize,
}

impl LogPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    pub fn timing_stats(&self, stage: &str) -> Option<&SeriesStats> {
        self.timings.get(stage)
    }

    pub fn metric_stats(&self, name: &str) -> Option<&SeriesStats> {
        self.metrics.get(name)
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let frames = self.frames_seen;
        let mut lines = vec![format!(
            "Detection summary ({frames} frames, {elapsed_s:.2}s total):"
        )];

        for (stage, s) in &self.timings {
            lines.push(format!(
                "  {stage:10}: avg {:6.2}ms  min {:6.2}ms  max {:6.2}ms",
                s.mean(),
                s.min,
                s.max
            ));
        }
        for (name, s) in &self.metrics {
            lines.push(format!(
                "  {name}: avg {:.1}  min {}  max {}  total {}",
                s.mean(),
                s.min,
                s.max,
                s.total
            ));
        }
        if frames > 0 && elapsed_s > 0.0 {
            lines.push(format!("  Throughput: {:.1} fps", frames as f64 / elapsed_s));
        }

        Some(lines.join("\n"))
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(25)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = self.frames_seen.max(current);
        if current % self.throttle_frames != 0 && current != total {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processed {current}/{total} frames ({pct:.1}%)");
        } else {
            log::info!("Processed {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        record(&mut self.timings, stage, duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        record(&mut self.metrics, name, value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}

fn record(series: &mut BTreeMap<String, SeriesStats>, key: &str, value: f64) {
    match series.get_mut(key) {
        Some(s) => s.push(value),
        None => {
            series.insert(key.to_string(), SeriesStats::new(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("detect", 5.0);
        logger.metric("detections", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_aggregates() {
        let mut logger = LogPipelineLogger::new(10);
        logger.timing("detect", 10.0);
        logger.timing("detect", 30.0);
        logger.timing("sink", 5.0);

        let detect = logger.timing_stats("detect").unwrap();
        assert_eq!(detect.count, 2);
        assert_relative_eq!(detect.mean(), 20.0);
        assert_relative_eq!(detect.min, 10.0);
        assert_relative_eq!(detect.max, 30.0);
        assert_eq!(logger.timing_stats("sink").unwrap().count, 1);
        assert!(logger.timing_stats("missing").is_none());
    }

    #[test]
    fn test_metric_aggregates() {
        let mut logger = LogPipelineLogger::new(10);
        logger.metric("detections", 3.0);
        logger.metric("detections", 0.0);
        logger.metric("detections", 6.0);

        let s = logger.metric_stats("detections").unwrap();
        assert_relative_eq!(s.total, 9.0);
        assert_relative_eq!(s.mean(), 3.0);
        assert_relative_eq!(s.min, 0.0);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = LogPipelineLogger::new(10);
        logger.progress(4, 4);
        logger.timing("detect", 2.0);
        logger.metric("detections", 1.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Detection summary (4 frames"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("detections"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_frames_with_unknown_total() {
        let mut logger = LogPipelineLogger::new(3);
        for i in 1..=7 {
            logger.progress(i, 0);
        }
        assert_eq!(logger.frames_seen, 7);
    }

    #[test]
    fn test_default_throttle() {
        assert_eq!(LogPipelineLogger::default().throttle_frames, 25);
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        assert_eq!(LogPipelineLogger::new(0).throttle_frames, 1);
    }
}
