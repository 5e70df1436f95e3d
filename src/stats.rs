//! Pure statistical computations over timing samples.
//!
//! All functions operate on plain `f64` slices of per-iteration nanosecond
//! values. [`compute_stats`] composes them on a local sorted copy, so the
//! caller's sample buffer is never reordered.

use crate::Throughput;

/// Two-sided 97.5% quantiles of the Student's t distribution for
/// `n - 1` degrees of freedom, indexed by `n - 2` (sample sizes 2 through 29).
/// Sample sizes of 30 and above use the normal approximation.
static T_TABLE: [f64; 28] = [
    12.71, 4.30, 3.18, 2.78, 2.57, // n = 2-6
    2.45, 2.36, 2.31, 2.26, 2.23, // n = 7-11
    2.20, 2.18, 2.16, 2.14, 2.13, // n = 12-16
    2.12, 2.11, 2.10, 2.09, 2.09, // n = 17-21
    2.08, 2.07, 2.07, 2.06, 2.06, // n = 22-26
    2.05, 2.05, 2.05, // n = 27-29
];

/// Modified z-score threshold for outlier classification.
const OUTLIER_THRESHOLD: f64 = 3.5;

/// Summary statistics for one benchmark run.
///
/// Derived once from the sample buffer after the measurement loop terminates
/// and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub mean: f64,
    /// Same as the 50th percentile.
    pub median: f64,
    pub std_dev: f64,
    /// Median absolute deviation.
    pub mad: f64,
    pub min: f64,
    pub max: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub outliers_low: usize,
    pub outliers_high: usize,
    pub sample_count: usize,
    /// Inner iterations per sample at the end of the run.
    pub iterations: u64,
    pub throughput: Option<Throughput>,
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Median of the slice. Sorts the input in place; even-length inputs
/// average the two middle values.
pub fn median(samples: &mut [f64]) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 0.0;
    }
    samples.sort_unstable_by(|a, b| a.total_cmp(b));
    if n % 2 == 0 {
        (samples[n / 2 - 1] + samples[n / 2]) / 2.0
    } else {
        samples[n / 2]
    }
}

/// Percentile `p` (0-100) of an already-sorted slice, using linear
/// interpolation between neighboring ranks. `percentile(sorted, 50)` equals
/// the median for any length.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = rank as usize;
    let upper = (lower + 1).min(n - 1);
    let frac = rank - lower as f64;
    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

/// Bessel-corrected sample standard deviation; 0 for fewer than two samples.
pub fn std_dev(samples: &[f64], mean: f64) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&x| (x - mean) * (x - mean)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Median absolute deviation around `median`.
pub fn mad(samples: &[f64], median_value: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut deviations: Vec<f64> = samples.iter().map(|&x| (x - median_value).abs()).collect();
    median(&mut deviations)
}

/// 95% confidence interval around the mean using Student's t. Collapses to
/// `(mean, mean)` for fewer than two samples.
pub fn confidence_interval(mean: f64, std_dev: f64, n: usize) -> (f64, f64) {
    if n < 2 {
        return (mean, mean);
    }
    let t = if n < 30 { T_TABLE[n - 2] } else { 1.96 };
    let margin = t * std_dev / (n as f64).sqrt();
    (mean - margin, mean + margin)
}

/// Counts samples whose modified z-score `0.6745 * (x - median) / mad`
/// exceeds the 3.5 threshold, as `(low, high)`. Both counts are zero when
/// `mad` is zero.
pub fn outliers(samples: &[f64], median_value: f64, mad_value: f64) -> (usize, usize) {
    if samples.is_empty() || mad_value == 0.0 {
        return (0, 0);
    }

    let mut low = 0;
    let mut high = 0;
    for &x in samples {
        // 0.6745 is the consistency constant relating MAD to sigma for a
        // normal distribution.
        let modified_z = 0.6745 * (x - median_value) / mad_value;
        if modified_z < -OUTLIER_THRESHOLD {
            low += 1;
        } else if modified_z > OUTLIER_THRESHOLD {
            high += 1;
        }
    }
    (low, high)
}

/// Computes the full summary for a sample set. The input buffer is left
/// untouched; ordering-sensitive statistics work on one scratch copy.
pub fn compute_stats(
    samples: &[f64],
    iterations: u64,
    throughput: Option<Throughput>,
) -> Stats {
    let n = samples.len();
    let mut stats = Stats {
        iterations,
        throughput,
        ..Stats::default()
    };
    if n == 0 {
        return stats;
    }

    let mut sorted = samples.to_vec();
    stats.sample_count = n;
    stats.mean = mean(samples);
    stats.median = median(&mut sorted);
    stats.std_dev = std_dev(samples, stats.mean);
    stats.mad = mad(samples, stats.median);

    stats.min = sorted[0];
    stats.max = sorted[n - 1];
    stats.p75 = percentile(&sorted, 75.0);
    stats.p90 = percentile(&sorted, 90.0);
    stats.p95 = percentile(&sorted, 95.0);
    stats.p99 = percentile(&sorted, 99.0);

    let (ci_lower, ci_upper) = confidence_interval(stats.mean, stats.std_dev, n);
    stats.ci_lower = ci_lower;
    stats.ci_upper = ci_upper;

    let (low, high) = outliers(samples, stats.median, stats.mad);
    stats.outliers_low = low;
    stats.outliers_high = high;

    stats
}
