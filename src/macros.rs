//! Macros which together define a benchmark harness that can be used in
//! place of the standard one, so benchmarks run with `cargo bench`.

/// Defines a benchmark group: a named function that runs a collection of
/// benchmark targets against a shared engine.
///
/// ```
/// use zap::{zap_group, Zap};
///
/// fn bench_method1(zap: &mut Zap) {
///     let mut group = zap.benchmark_group("method1");
///     group.bench_function("noop", |b| b.iter(|| ()));
///     group.finish();
/// }
///
/// fn bench_method2(_zap: &mut Zap) {}
///
/// zap_group!(benches, bench_method1, bench_method2);
/// # fn main() { }
/// ```
#[macro_export]
macro_rules! zap_group {
    ($name:ident, $( $target:path ),+ $(,)*) => {
        pub fn $name(zap: &mut $crate::Zap) {
            $(
                $target(zap);
            )+
        }
    };
}

/// Expands to a `main` function which runs the given benchmark groups.
///
/// The default test harness must be disabled for the bench target:
///
/// ```toml
/// [[bench]]
/// name    = "my_bench"
/// harness = false
/// ```
///
/// A single engine is threaded through every group so the baseline store
/// and the regression flag cover the whole run; the process exit code is 1
/// when any benchmark regressed past `--fail-threshold`.
#[macro_export]
macro_rules! zap_main {
    ( $( $group:path ),+ $(,)* ) => {
        fn main() {
            $crate::init_logging();
            let mut zap = $crate::Zap::default().configure_from_args();
            $(
                $group(&mut zap);
            )+
            ::std::process::exit(zap.final_summary());
        }
    };
}
