//! Per-benchmark tuning knobs.

use std::time::Duration;

/// Complete configuration for one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    /// How long the warmup phase runs before any sample is recorded.
    pub warm_up_time: Duration,
    /// Target wall time for the measurement phase. The engine may exceed it
    /// to collect the minimum number of samples.
    pub measurement_time: Duration,
    /// Target number of samples.
    pub sample_count: usize,
    /// Floor for the inner iteration count.
    pub min_iters: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> BenchmarkConfig {
        BenchmarkConfig {
            warm_up_time: Duration::from_secs(1),
            measurement_time: Duration::from_secs(3),
            sample_count: 100,
            min_iters: 1,
        }
    }
}

/// Group-level overrides that fall back to the engine defaults.
#[derive(Debug, Clone, Default)]
pub(crate) struct PartialBenchmarkConfig {
    pub warm_up_time: Option<Duration>,
    pub measurement_time: Option<Duration>,
    pub sample_count: Option<usize>,
    pub min_iters: Option<u64>,
}

impl PartialBenchmarkConfig {
    pub fn to_complete(&self, defaults: &BenchmarkConfig) -> BenchmarkConfig {
        BenchmarkConfig {
            warm_up_time: self.warm_up_time.unwrap_or(defaults.warm_up_time),
            measurement_time: self.measurement_time.unwrap_or(defaults.measurement_time),
            sample_count: self.sample_count.unwrap_or(defaults.sample_count),
            min_iters: self.min_iters.unwrap_or(defaults.min_iters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.warm_up_time, Duration::from_secs(1));
        assert_eq!(config.measurement_time, Duration::from_secs(3));
        assert_eq!(config.sample_count, 100);
        assert_eq!(config.min_iters, 1);
    }

    #[test]
    fn partial_overrides_win() {
        let partial = PartialBenchmarkConfig {
            sample_count: Some(42),
            ..PartialBenchmarkConfig::default()
        };
        let complete = partial.to_complete(&BenchmarkConfig::default());
        assert_eq!(complete.sample_count, 42);
        assert_eq!(complete.measurement_time, Duration::from_secs(3));
    }
}
