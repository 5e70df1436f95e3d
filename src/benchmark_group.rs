//! Benchmark groups: an ordered collection of benchmarks sharing a
//! configuration, tags, and an optional throughput annotation.

use crate::analysis;
use crate::bencher::Bencher;
use crate::benchmark::PartialBenchmarkConfig;
use crate::filter;
use crate::report::Report;
use crate::{Throughput, Zap};
use std::time::Duration;

/// A scope for registering related benchmarks against shared settings.
///
/// Groups exist to scope configuration and reporting; they do not namespace
/// benchmark names. Two groups registering the same canonical name will
/// overwrite each other's baseline entries, so callers who need
/// disambiguation should prefix names themselves (`"group/label"` works
/// well).
///
/// ```
/// use zap::{Throughput, Zap};
///
/// fn bench(zap: &mut Zap) {
///     let data = vec![1u8; 4096];
///     let mut group = zap.benchmark_group("hashing");
///     group.throughput(Throughput::Bytes(data.len() as u64));
///     group.bench_function("hash/4096", |b| {
///         b.iter(|| data.iter().map(|&b| b as u64).sum::<u64>())
///     });
///     group.finish();
/// }
/// ```
pub struct BenchmarkGroup<'a> {
    zap: &'a mut Zap,
    group_name: String,
    partial_config: PartialBenchmarkConfig,
    throughput: Option<Throughput>,
    tags: Vec<String>,
    any_matched: bool,
}

impl<'a> BenchmarkGroup<'a> {
    pub(crate) fn new(zap: &mut Zap, group_name: String) -> BenchmarkGroup<'_> {
        BenchmarkGroup {
            zap,
            group_name,
            partial_config: PartialBenchmarkConfig::default(),
            throughput: None,
            tags: Vec::new(),
            any_matched: false,
        }
    }

    /// Changes the target sample count for this group.
    ///
    /// # Panics
    ///
    /// Panics if `n` is below 10; smaller samples leave the confidence
    /// interval meaningless.
    pub fn sample_count(&mut self, n: usize) -> &mut Self {
        assert!(n >= 10);

        self.partial_config.sample_count = Some(n);
        self
    }

    /// Changes the warm up time for this group.
    ///
    /// # Panics
    ///
    /// Panics if the input duration is zero.
    pub fn warm_up_time(&mut self, dur: Duration) -> &mut Self {
        assert!(dur.as_nanos() > 0);

        self.partial_config.warm_up_time = Some(dur);
        self
    }

    /// Changes the target measurement time for this group. The engine
    /// spends approximately this long measuring each benchmark on a
    /// best-effort basis, running longer when necessary to collect the
    /// minimum number of samples.
    ///
    /// # Panics
    ///
    /// Panics if the input duration is zero.
    pub fn measurement_time(&mut self, dur: Duration) -> &mut Self {
        assert!(dur.as_nanos() > 0);

        self.partial_config.measurement_time = Some(dur);
        self
    }

    /// Sets a floor for the inner iteration count.
    pub fn min_iters(&mut self, n: u64) -> &mut Self {
        assert!(n > 0);

        self.partial_config.min_iters = Some(n);
        self
    }

    /// Sets the input size for this group, used to report throughput.
    pub fn throughput(&mut self, throughput: Throughput) -> &mut Self {
        self.throughput = Some(throughput);
        self
    }

    /// Adds a tag; benchmarks inherit their group's tags for `--tag`
    /// filtering.
    pub fn tag<S: Into<String>>(&mut self, tag: S) -> &mut Self {
        self.tags.push(tag.into());
        self
    }

    /// Benchmarks a function under the given ID.
    pub fn bench_function<ID: IntoBenchmarkId, F>(&mut self, id: ID, mut f: F) -> &mut Self
    where
        F: FnMut(&mut Bencher<'_>),
    {
        self.run_bench(id.into_benchmark_id(), &(), |b, _| f(b));
        self
    }

    /// Benchmarks a function over a borrowed input under the given ID.
    pub fn bench_with_input<ID: IntoBenchmarkId, F, I>(
        &mut self,
        id: ID,
        input: &I,
        f: F,
    ) -> &mut Self
    where
        F: FnMut(&mut Bencher<'_>, &I),
    {
        self.run_bench(id.into_benchmark_id(), input, f);
        self
    }

    fn run_bench<F, I: ?Sized>(&mut self, id: BenchmarkId, input: &I, mut f: F)
    where
        F: FnMut(&mut Bencher<'_>, &I),
    {
        let canonical = id.canonical_name();

        if !filter::matches(&canonical, self.zap.filter.as_deref()) {
            return;
        }
        if !filter::matches_tags(&self.tags, &self.zap.required_tags) {
            return;
        }

        if self.zap.list_mode {
            self.zap.report.list_entry(&self.group_name, &canonical);
            return;
        }

        self.zap.ensure_baseline_loaded();

        // The header is deferred until a benchmark actually runs, so a
        // group with no matches emits nothing at all.
        if !self.any_matched {
            self.zap.report.group_start(&self.group_name);
            self.any_matched = true;
        }

        let config = self.partial_config.to_complete(&self.zap.config);
        analysis::common(&canonical, &mut f, input, &config, self.throughput, self.zap);
    }

    /// Consumes the group. Equivalent to dropping it, but makes the end of
    /// the group explicit at the call site.
    pub fn finish(self) {
        ::std::mem::drop(self);
    }
}

impl<'a> Drop for BenchmarkGroup<'a> {
    fn drop(&mut self) {
        if self.any_matched {
            self.zap.report.group_end(&self.group_name);
        }
    }
}

/// Identifies a benchmark within a group, optionally parameterized.
///
/// The canonical name is `"<label>/<param>"` for parameterized benchmarks
/// and the bare label otherwise; it keys both filtering and the baseline
/// store.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct BenchmarkId {
    pub(crate) function_name: Option<String>,
    pub(crate) parameter: Option<String>,
}

impl BenchmarkId {
    /// Constructs an ID from a label and a parameter value.
    ///
    /// The parameter value need not be the input itself; for a large input,
    /// a descriptive string such as `"1MB"` keeps names readable.
    pub fn new<S: Into<String>, P: ::std::fmt::Display>(
        function_name: S,
        parameter: P,
    ) -> BenchmarkId {
        BenchmarkId {
            function_name: Some(function_name.into()),
            parameter: Some(format!("{}", parameter)),
        }
    }

    /// Constructs an ID from just a parameter value, for a group
    /// benchmarking one function over several inputs.
    pub fn from_parameter<P: ::std::fmt::Display>(parameter: P) -> BenchmarkId {
        BenchmarkId {
            function_name: None,
            parameter: Some(format!("{}", parameter)),
        }
    }

    pub(crate) fn canonical_name(&self) -> String {
        match (&self.function_name, &self.parameter) {
            (Some(function_name), Some(parameter)) => {
                format!("{}/{}", function_name, parameter)
            }
            (Some(function_name), None) => function_name.clone(),
            (None, Some(parameter)) => parameter.clone(),
            (None, None) => String::new(),
        }
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::BenchmarkId {}
    impl<S: Into<String>> Sealed for S {}
}

/// Sealed trait which allows strings to be used directly as benchmark IDs.
pub trait IntoBenchmarkId: private::Sealed {
    fn into_benchmark_id(self) -> BenchmarkId;
}

impl IntoBenchmarkId for BenchmarkId {
    fn into_benchmark_id(self) -> BenchmarkId {
        self
    }
}

impl<S: Into<String>> IntoBenchmarkId for S {
    fn into_benchmark_id(self) -> BenchmarkId {
        BenchmarkId {
            function_name: Some(self.into()),
            parameter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names() {
        assert_eq!(BenchmarkId::new("fib", 20).canonical_name(), "fib/20");
        assert_eq!(
            BenchmarkId::new("parse", "large input").canonical_name(),
            "parse/large input"
        );
        assert_eq!(BenchmarkId::from_parameter(64).canonical_name(), "64");
        assert_eq!("bare".into_benchmark_id().canonical_name(), "bare");
    }
}
