//! A statistics-driven micro-benchmarking engine.
//!
//! zap measures a user routine in adaptively sized batches, derives robust
//! statistics from the per-iteration timings (median, percentiles, MAD, a
//! Student's-t confidence interval, outlier counts), and compares each run
//! against a persisted baseline, classifying changes as improved, regressed
//! or noise based on confidence-interval overlap.
//!
//! Benchmarks are registered through [`BenchmarkGroup`]s and driven by the
//! [`zap_group!`] and [`zap_main!`] macros:
//!
//! ```no_run
//! use zap::{black_box, zap_group, zap_main, Zap};
//!
//! fn fibonacci(n: u64) -> u64 {
//!     match n {
//!         0 | 1 => 1,
//!         n => fibonacci(n - 1) + fibonacci(n - 2),
//!     }
//! }
//!
//! fn bench_fib(zap: &mut Zap) {
//!     let mut group = zap.benchmark_group("fib");
//!     group.bench_function("fib/20", |b| b.iter(|| fibonacci(black_box(20))));
//!     group.finish();
//! }
//!
//! zap_group!(benches, bench_fib);
//! zap_main!(benches);
//! ```
//!
//! Runs are sequential and single-threaded: the engine owns the calling
//! thread for the duration of a run and never blocks except on the
//! monotonic clock read.

#[macro_use]
extern crate serde_derive;

mod analysis;
mod baseline;
mod benchmark;
mod benchmark_group;
mod bencher;
mod cli;
mod compare;
mod error;
mod filter;
mod format;
mod macros;
mod measurement;
mod report;
mod routine;
mod sample;
mod stats;

pub use crate::baseline::{BaselineEntry, BaselineStore};
pub use crate::benchmark::BenchmarkConfig;
pub use crate::benchmark_group::{BenchmarkGroup, BenchmarkId, IntoBenchmarkId};
pub use crate::bencher::Bencher;
pub use crate::compare::{compare, ChangeDirection, Comparison};
pub use crate::error::{Error, Result};
pub use crate::measurement::{Timer, WallTime};
pub use crate::stats::{compute_stats, Stats};

use crate::error::log_error;
use crate::report::{Report, Reports};
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

/// Default location for the persisted baseline.
const DEFAULT_BASELINE_PATH: &str = ".zap/baseline";

/// Optimization barrier.
///
/// A function that is opaque to the optimizer, used to prevent the compiler
/// from folding away or hoisting the benchmarked computation. The value
/// passes through unchanged; the barrier performs no I/O, allocates
/// nothing, and mutates nothing.
pub fn black_box<T>(dummy: T) -> T {
    unsafe {
        let ret = ::std::ptr::read_volatile(&dummy);
        ::std::mem::forget(dummy);
        ret
    }
}

/// Argument to [`BenchmarkGroup::throughput`]: how much input one iteration
/// of the routine processes. Used to convert mean time per iteration into a
/// human-readable rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Throughput {
    /// Bytes processed per iteration.
    Bytes(u64),
    /// Elements processed per iteration.
    Elements(u64),
}

/// Initializes the `env_logger` backend for the crate's internal
/// diagnostics. Called by [`zap_main!`]; safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

/// The benchmark engine.
///
/// Owns the run-wide state: default configuration, name and tag filters,
/// the baseline store, the reporter stack, and the regression flag that
/// [`Zap::final_summary`] turns into the process exit code. One engine is
/// threaded through all benchmark groups of a run; routines never see it,
/// which rules out re-entrant benchmark execution at compile time.
pub struct Zap {
    pub(crate) config: BenchmarkConfig,
    pub(crate) filter: Option<String>,
    pub(crate) required_tags: Vec<String>,
    pub(crate) baseline: BaselineStore,
    pub(crate) baseline_path: PathBuf,
    pub(crate) explicit_path: bool,
    pub(crate) baseline_loaded: bool,
    pub(crate) save_baseline: bool,
    pub(crate) compare: bool,
    pub(crate) fail_threshold: f64,
    pub(crate) has_regression: bool,
    pub(crate) list_mode: bool,
    pub(crate) report: Reports,
}

impl Default for Zap {
    fn default() -> Zap {
        Zap {
            config: BenchmarkConfig::default(),
            filter: None,
            required_tags: Vec::new(),
            baseline: BaselineStore::new(),
            baseline_path: PathBuf::from(DEFAULT_BASELINE_PATH),
            explicit_path: false,
            baseline_loaded: false,
            save_baseline: true,
            compare: true,
            fail_threshold: 0.0,
            has_regression: false,
            list_mode: false,
            report: Reports::default(),
        }
    }
}

impl Zap {
    /// Creates a group of benchmarks sharing configuration and tags. The
    /// group runs its benchmarks as they are registered, in order.
    pub fn benchmark_group<S: Into<String>>(&mut self, group_name: S) -> BenchmarkGroup<'_> {
        BenchmarkGroup::new(self, group_name.into())
    }

    /// Benchmarks a single function under its own name, without a
    /// surrounding group.
    pub fn bench_function<F>(&mut self, name: &str, f: F) -> &mut Zap
    where
        F: FnMut(&mut Bencher<'_>),
    {
        let mut group = self.benchmark_group(name);
        group.bench_function(name, f);
        group.finish();
        self
    }

    /// Only run benchmarks whose canonical name matches `pattern`
    /// (substring, or glob when it contains `*`/`?`).
    pub fn with_filter<S: Into<String>>(mut self, pattern: S) -> Zap {
        self.filter = Some(pattern.into());
        self
    }

    /// Only run groups carrying at least one of the previously added
    /// required tags. Adding no tags runs everything.
    pub fn with_required_tag<S: Into<String>>(mut self, tag: S) -> Zap {
        self.required_tags.push(tag.into());
        self
    }

    /// Changes the default target sample count.
    ///
    /// # Panics
    ///
    /// Panics if `n` is below 10.
    pub fn sample_count(mut self, n: usize) -> Zap {
        assert!(n >= 10);
        self.config.sample_count = n;
        self
    }

    /// Changes the default warm up time.
    ///
    /// # Panics
    ///
    /// Panics if the input duration is zero.
    pub fn warm_up_time(mut self, dur: Duration) -> Zap {
        assert!(dur.as_nanos() > 0);
        self.config.warm_up_time = dur;
        self
    }

    /// Changes the default target measurement time.
    ///
    /// # Panics
    ///
    /// Panics if the input duration is zero.
    pub fn measurement_time(mut self, dur: Duration) -> Zap {
        assert!(dur.as_nanos() > 0);
        self.config.measurement_time = dur;
        self
    }

    /// Overrides the baseline file location.
    pub fn baseline_path<P: Into<PathBuf>>(mut self, path: P) -> Zap {
        self.baseline_path = path.into();
        self.explicit_path = true;
        self
    }

    /// Enables or disables writing results back to the baseline.
    pub fn save_baseline(mut self, enabled: bool) -> Zap {
        self.save_baseline = enabled;
        self
    }

    /// Enables or disables comparing results against the baseline.
    pub fn compare_baseline(mut self, enabled: bool) -> Zap {
        self.compare = enabled;
        self
    }

    /// Fail the run (exit code 1) when any benchmark regresses by more than
    /// `pct` percent. Zero disables the check.
    pub fn fail_threshold(mut self, pct: f64) -> Zap {
        assert!(pct >= 0.0);
        self.fail_threshold = pct;
        self
    }

    /// Applies command-line arguments over the current configuration.
    pub fn configure_from_args(mut self) -> Zap {
        cli::configure_from_args(&mut self);
        self
    }

    /// True when some benchmark exceeded the failure threshold.
    pub fn has_regression(&self) -> bool {
        self.has_regression
    }

    /// Loads the baseline on first use. A missing file silently disables
    /// comparison for this run; an unreadable or malformed file does the
    /// same, with a logged error.
    pub(crate) fn ensure_baseline_loaded(&mut self) {
        if self.baseline_loaded {
            return;
        }
        self.baseline_loaded = true;
        if !self.compare {
            return;
        }

        match BaselineStore::load(&self.baseline_path) {
            Ok(Some(store)) => {
                self.report.baseline_loaded(&self.baseline_path, store.len());
                self.baseline = store;
            }
            Ok(None) => {
                if self.explicit_path {
                    let message = format!(
                        "no baseline found at '{}', running without comparison",
                        self.baseline_path.display()
                    );
                    warn!("{}", message);
                    self.report.warning(&message);
                }
                self.compare = false;
            }
            Err(e) => {
                log_error(&e);
                self.compare = false;
            }
        }
    }

    /// Saves the baseline and reports the final verdict. Returns the
    /// process exit code: 1 when a regression exceeded the failure
    /// threshold, 0 otherwise.
    pub fn final_summary(&mut self) -> i32 {
        if self.list_mode {
            return 0;
        }

        if self.save_baseline && !self.baseline.is_empty() {
            if let Err(e) = self.baseline.save(&self.baseline_path) {
                // Failing to persist the baseline is not fatal; the run's
                // results were already reported.
                log_error(&e);
            }
        }

        self.report
            .final_summary(self.has_regression, self.fail_threshold);
        if self.has_regression {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_box_is_identity() {
        assert_eq!(black_box(42), 42);
        assert_eq!(black_box("value"), "value");
        let v = vec![1, 2, 3];
        assert_eq!(black_box(v.clone()), v);
    }

    #[test]
    fn default_engine_configuration() {
        let zap = Zap::default();
        assert_eq!(zap.config.sample_count, 100);
        assert_eq!(zap.config.warm_up_time, Duration::from_secs(1));
        assert_eq!(zap.config.measurement_time, Duration::from_secs(3));
        assert_eq!(zap.baseline_path, PathBuf::from(".zap/baseline"));
        assert!(zap.save_baseline);
        assert!(zap.compare);
        assert!(!zap.has_regression());
    }

    #[test]
    fn missing_baseline_disables_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let mut zap = Zap::default()
            .baseline_path(dir.path().join("absent"))
            .save_baseline(false);
        zap.ensure_baseline_loaded();
        assert!(!zap.compare);
    }
}
