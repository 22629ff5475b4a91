use std::time::Duration;

use hdrhistogram::{CreationError, Histogram};
use log::info;

/// Distribution of tick durations, in microseconds.
pub struct TickStats {
    histogram: Histogram<u64>,
}

/// Percentiles of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub count: u64,
    pub p50: Duration,
    pub p99: Duration,
    pub max: Duration,
}

impl TickStats {
    pub fn new() -> Result<Self, CreationError> {
        // Three significant figures, auto-resizing so long stalls still fit.
        Ok(Self { histogram: Histogram::new(3)? })
    }

    pub fn record(&mut self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(micros);
    }

    pub fn summary(&self) -> TickSummary {
        TickSummary {
            count: self.histogram.len(),
            p50: Duration::from_micros(self.histogram.value_at_quantile(0.5)),
            p99: Duration::from_micros(self.histogram.value_at_quantile(0.99)),
            max: Duration::from_micros(self.histogram.max()),
        }
    }

    pub fn log_summary(&self) {
        let s = self.summary();
        if s.count == 0 {
            info!("No ticks recorded");
            return;
        }
        info!(
            "{} ticks: p50 {:?}, p99 {:?}, max {:?}",
            s.count, s.p50, s.p99, s.max
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats() {
        let stats = TickStats::new().unwrap();
        let s = stats.summary();
        assert_eq!(s.count, 0);
        assert_eq!(s.max, Duration::ZERO);
        stats.log_summary();
    }

    #[test]
    fn percentiles_track_recorded_ticks() {
        let mut stats = TickStats::new().unwrap();
        for _ in 0..995 {
            stats.record(Duration::from_micros(100));
        }
        for _ in 0..5 {
            stats.record(Duration::from_millis(50));
        }

        let s = stats.summary();
        assert_eq!(s.count, 1000);
        assert_eq!(s.p50, Duration::from_micros(100));
        assert_eq!(s.p99, Duration::from_micros(100));
        // Three significant figures.
        let max = s.max.as_micros() as i64;
        assert!((max - 50_000).abs() <= 50, "max was {}", max);
    }
}
