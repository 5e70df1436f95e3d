//! Runs a single benchmark end to end: measurement loop, statistics,
//! baseline comparison, reporting, and the baseline upsert.

use crate::bencher::Bencher;
use crate::benchmark::BenchmarkConfig;
use crate::compare::{self, ChangeDirection};
use crate::report::Report;
use crate::routine::BenchState;
use crate::stats;
use crate::{Throughput, Zap};
use log::warn;

// Common benchmark procedure.
pub(crate) fn common<I: ?Sized, F>(
    id: &str,
    f: &mut F,
    input: &I,
    config: &BenchmarkConfig,
    throughput: Option<Throughput>,
    zap: &mut Zap,
) where
    F: FnMut(&mut Bencher<'_>, &I),
{
    zap.report.benchmark_start(id);
    zap.report.warmup(id, config.warm_up_time.as_nanos() as f64);

    let mut state = BenchState::new(config, throughput);
    {
        let mut bencher = Bencher { state: &mut state };
        f(&mut bencher, input);
    }

    // The routine may emit fewer samples than requested when the time
    // budget runs out first; that is reported, never retried.
    if state.sample_count() < config.sample_count {
        let message = format!(
            "time limit reached for {}, collected {}/{} samples",
            id,
            state.sample_count(),
            config.sample_count
        );
        warn!("{}", message);
        zap.report.warning(&message);
    }

    let stats = stats::compute_stats(state.samples(), state.iterations(), state.throughput());

    let comparison = if zap.compare {
        zap.baseline.find(id).map(|entry| compare::compare(entry, &stats))
    } else {
        None
    };

    if let Some(cmp) = &comparison {
        if zap.fail_threshold > 0.0
            && cmp.change == ChangeDirection::Regressed
            && cmp.change_pct > zap.fail_threshold
        {
            zap.has_regression = true;
        }
    }

    zap.report
        .measurement_complete(id, &stats, comparison.as_ref(), zap.compare);

    if zap.save_baseline {
        zap.baseline.add(id, &stats);
    }
}
