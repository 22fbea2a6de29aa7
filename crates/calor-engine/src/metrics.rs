//! Per-worker timing for one run.

use calor_comm::ExchangeStats;
use calor_core::Rank;

/// Timing collected by one worker.
///
/// All durations are in microseconds and cover the timed region only:
/// from the barrier after the priming exchange to the end of the last
/// step. Scatter and gather are excluded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkerMetrics {
    /// The worker.
    pub rank: Rank,
    /// Steps completed.
    pub steps: u64,
    /// Wall-clock time of the timed region.
    pub elapsed_us: u64,
    /// Time inside interior passes.
    pub interior_us: u64,
    /// Time inside exterior passes.
    pub exterior_us: u64,
    /// Time blocked waiting for halo transfers.
    pub exchange_wait_us: u64,
    /// Halo traffic counters.
    pub exchange: ExchangeStats,
}

impl WorkerMetrics {
    /// Elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_us as f64 / 1e6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = WorkerMetrics::default();
        assert_eq!(m.rank, Rank(0));
        assert_eq!(m.steps, 0);
        assert_eq!(m.elapsed_secs(), 0.0);
        assert_eq!(m.exchange, ExchangeStats::default());
    }

    #[test]
    fn elapsed_converts_to_seconds() {
        let m = WorkerMetrics {
            elapsed_us: 2_500_000,
            ..WorkerMetrics::default()
        };
        assert_eq!(m.elapsed_secs(), 2.5);
    }
}
