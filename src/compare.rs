//! Classifies the difference between a fresh measurement and its baseline.

use crate::baseline::BaselineEntry;
use crate::stats::Stats;

/// Direction of a performance change relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeDirection {
    #[serde(rename = "unchanged")]
    NoChange,
    #[serde(rename = "improved")]
    Improved,
    #[serde(rename = "regressed")]
    Regressed,
}

/// The outcome of diffing current stats against a baseline entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub old_mean: f64,
    pub new_mean: f64,
    /// Percent change of the mean; negative means faster.
    pub change_pct: f64,
    pub change: ChangeDirection,
    /// True when the confidence intervals do not overlap.
    pub significant: bool,
}

/// Noise floor: mean shifts below one percent are never flagged.
const NOISE_THRESHOLD_PCT: f64 = 1.0;

/// Compares `current` against `baseline`.
///
/// The change is significant only when the two 95% confidence intervals do
/// not overlap; this is deliberately conservative, so small wall-clock
/// shifts inside the noise cannot flip the classification. A significant
/// change still classifies as [`ChangeDirection::NoChange`] when its
/// magnitude sits under the one percent noise floor.
pub fn compare(baseline: &BaselineEntry, current: &Stats) -> Comparison {
    let change_pct = if baseline.mean > 0.0 {
        (current.mean - baseline.mean) / baseline.mean * 100.0
    } else {
        0.0
    };

    let ci_overlap =
        !(current.ci_upper < baseline.ci_lower || current.ci_lower > baseline.ci_upper);
    let significant = !ci_overlap;

    let change = if !significant || change_pct.abs() < NOISE_THRESHOLD_PCT {
        ChangeDirection::NoChange
    } else if change_pct < 0.0 {
        ChangeDirection::Improved
    } else {
        ChangeDirection::Regressed
    };

    Comparison {
        old_mean: baseline.mean,
        new_mean: current.mean,
        change_pct,
        change,
        significant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn entry(mean: f64, ci_lower: f64, ci_upper: f64) -> BaselineEntry {
        BaselineEntry {
            name: "bench_x".to_string(),
            mean,
            std_dev: 1.0,
            ci_lower,
            ci_upper,
        }
    }

    fn stats(mean: f64, ci_lower: f64, ci_upper: f64) -> Stats {
        Stats {
            mean,
            ci_lower,
            ci_upper,
            sample_count: 100,
            ..Stats::default()
        }
    }

    #[test]
    fn regression_with_disjoint_intervals() {
        let baseline = entry(100.0, 98.0, 102.0);
        let current = stats(120.0, 118.0, 122.0);
        let cmp = compare(&baseline, &current);

        assert_eq!(cmp.change, ChangeDirection::Regressed);
        assert!(cmp.significant);
        assert_relative_eq!(cmp.change_pct, 20.0);
        assert_eq!(cmp.old_mean, 100.0);
        assert_eq!(cmp.new_mean, 120.0);
    }

    #[test]
    fn improvement_with_disjoint_intervals() {
        let baseline = entry(100.0, 98.0, 102.0);
        let current = stats(80.0, 79.0, 81.0);
        let cmp = compare(&baseline, &current);

        assert_eq!(cmp.change, ChangeDirection::Improved);
        assert!(cmp.significant);
        assert_relative_eq!(cmp.change_pct, -20.0);
    }

    #[test]
    fn overlapping_intervals_are_never_significant() {
        let baseline = entry(100.0, 95.0, 105.0);
        let current = stats(103.0, 99.0, 107.0);
        let cmp = compare(&baseline, &current);

        assert!(!cmp.significant);
        assert_eq!(cmp.change, ChangeDirection::NoChange);
        assert_relative_eq!(cmp.change_pct, 3.0);
    }

    #[test]
    fn sub_percent_changes_are_noise() {
        // Disjoint intervals, but the mean moved less than 1%.
        let baseline = entry(1000.0, 999.0, 1001.0);
        let current = stats(1005.0, 1004.0, 1006.0);
        let cmp = compare(&baseline, &current);

        assert!(cmp.significant);
        assert_eq!(cmp.change, ChangeDirection::NoChange);
    }

    #[test]
    fn zero_baseline_mean_yields_zero_change() {
        let baseline = entry(0.0, 0.0, 0.0);
        let current = stats(100.0, 99.0, 101.0);
        let cmp = compare(&baseline, &current);

        assert_eq!(cmp.change_pct, 0.0);
        assert_eq!(cmp.change, ChangeDirection::NoChange);
    }

    #[test]
    fn touching_intervals_overlap() {
        let baseline = entry(100.0, 98.0, 102.0);
        let current = stats(104.0, 102.0, 106.0);
        let cmp = compare(&baseline, &current);

        // ci_lower == baseline.ci_upper counts as overlap.
        assert!(!cmp.significant);
        assert_eq!(cmp.change, ChangeDirection::NoChange);
    }
}
