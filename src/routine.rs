//! The adaptive batch controller that drives one benchmark run.
//!
//! A run is a sequence of batches. Before each batch the user loop calls
//! [`BenchState::start_batch`], which answers whether another batch should
//! run; after executing `iterations` inner iterations the loop calls
//! [`BenchState::end_batch`], which records timing and rescales the
//! iteration count. The controller moves through two phases:
//!
//! * **Warmup** lets caches and branch predictors settle while growing the
//!   iteration count until one batch costs on the order of [`TARGET_BATCH_NS`].
//!   Nothing is recorded.
//! * **Measurement** emits one sample per batch (mean nanoseconds per
//!   iteration) until the sample buffer fills or the time budget runs out.
//!
//! Batches are sized toward one millisecond: much shorter and the clock's
//! resolution dominates the reading, much longer and too few samples fit in
//! the measurement budget.

use crate::benchmark::BenchmarkConfig;
use crate::measurement::{Timer, WallTime};
use crate::sample::SampleBuffer;
use crate::Throughput;

/// Preferred duration of a single batch during warmup calibration.
const TARGET_BATCH_NS: u64 = 1_000_000;

/// Batches longer than this get their iteration count halved.
const MAX_BATCH_NS: u64 = 10_000_000;

/// Measurement batches shorter than this double the iteration count so
/// later samples stay large relative to the clock resolution.
const MIN_SAMPLE_BATCH_NS: u64 = 500_000;

/// Upper bound on inner iterations per batch.
const MAX_ITERATIONS: u64 = 1_000_000_000;

/// The time budget may only terminate a run once this many samples exist,
/// so every summary has enough data for a meaningful confidence interval.
const MIN_SAMPLES: usize = 10;

/// Live state for one benchmark run.
pub(crate) struct BenchState<T: Timer = WallTime> {
    timer: T,
    iterations: u64,
    samples: SampleBuffer,
    /// Phase anchor; cleared once when warmup hands over to measurement.
    start_time: Option<u64>,
    /// During warmup: when the previous batch began. During measurement:
    /// the timestamp taken immediately before the batch body runs.
    last_batch_start: Option<u64>,
    warmup_complete: bool,
    measuring: bool,
    warm_up_time_ns: u64,
    measurement_time_ns: u64,
    throughput: Option<Throughput>,
}

impl BenchState<WallTime> {
    pub fn new(config: &BenchmarkConfig, throughput: Option<Throughput>) -> BenchState<WallTime> {
        BenchState::with_timer(WallTime, config, throughput)
    }
}

impl<T: Timer> BenchState<T> {
    pub fn with_timer(
        timer: T,
        config: &BenchmarkConfig,
        throughput: Option<Throughput>,
    ) -> BenchState<T> {
        BenchState {
            timer,
            iterations: config.min_iters.max(1),
            samples: SampleBuffer::new(config.sample_count),
            start_time: None,
            last_batch_start: None,
            warmup_complete: false,
            measuring: false,
            warm_up_time_ns: config.warm_up_time.as_nanos() as u64,
            measurement_time_ns: config.measurement_time.as_nanos() as u64,
            throughput,
        }
    }

    /// Inner iterations the user loop must execute for the current batch.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn throughput(&self) -> Option<Throughput> {
        self.throughput
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[f64] {
        self.samples.as_slice()
    }

    /// Asks for another batch. Returns false exactly once per run; after
    /// that the sample buffer is frozen for analysis.
    pub fn start_batch(&mut self) -> bool {
        if !self.warmup_complete {
            return self.start_warmup_batch();
        }

        if self.samples.is_full() {
            return false;
        }

        let now = self.timer.now_ns();
        match self.start_time {
            None => self.start_time = Some(now),
            Some(start) => {
                if now - start >= self.measurement_time_ns && self.samples.len() >= MIN_SAMPLES {
                    return false;
                }
            }
        }

        self.measuring = true;
        self.last_batch_start = Some(self.timer.now_ns());
        true
    }

    fn start_warmup_batch(&mut self) -> bool {
        let now = self.timer.now_ns();

        let start = match self.start_time {
            None => {
                self.start_time = Some(now);
                self.last_batch_start = Some(now);
                return true;
            }
            Some(start) => start,
        };

        let batch_elapsed = now - self.last_batch_start.unwrap_or(now);
        let total_elapsed = now - start;

        if batch_elapsed > 0 && batch_elapsed < TARGET_BATCH_NS {
            let factor = TARGET_BATCH_NS / batch_elapsed;
            if factor > 1 {
                self.iterations = self.iterations.saturating_mul(factor);
            } else {
                self.iterations = self.iterations.saturating_mul(2);
            }
            self.iterations = self.iterations.min(MAX_ITERATIONS);
        } else if batch_elapsed > MAX_BATCH_NS {
            self.iterations = (self.iterations / 2).max(1);
        }

        if total_elapsed >= self.warm_up_time_ns {
            self.warmup_complete = true;
            self.start_time = None;
            self.measuring = false;
        }

        self.last_batch_start = Some(now);
        true
    }

    /// Records the batch that just ran. A no-op outside the measurement
    /// phase, so warmup batches leave no trace in the buffer.
    pub fn end_batch(&mut self) {
        if !self.measuring || !self.warmup_complete {
            return;
        }
        let entry = match self.last_batch_start {
            Some(entry) => entry,
            None => return,
        };

        let elapsed = self.timer.now_ns().saturating_sub(entry);
        self.samples.push(elapsed as f64 / self.iterations as f64);

        if elapsed < MIN_SAMPLE_BATCH_NS {
            self.iterations = self.iterations.saturating_mul(2).min(MAX_ITERATIONS);
        }

        self.measuring = false;
    }
}
