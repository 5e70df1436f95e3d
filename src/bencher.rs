//! The handle passed to user benchmark routines.

use crate::black_box;
use crate::measurement::{Timer, WallTime};
use crate::routine::BenchState;

/// Drives the measurement loop for one benchmark routine.
///
/// A `Bencher` is handed to the user's closure, which calls [`Bencher::iter`]
/// with the code under test. The closure runs to completion in one call; the
/// engine decides how many batches and inner iterations to execute.
pub struct Bencher<'a, T: Timer = WallTime> {
    pub(crate) state: &'a mut BenchState<T>,
}

impl<'a, T: Timer> Bencher<'a, T> {
    /// Runs `routine` in the measurement loop. The return value is passed
    /// through [`black_box`] so the compiler cannot discard the computation.
    ///
    /// # Examples
    ///
    /// ```
    /// use zap::Zap;
    ///
    /// # fn checksum(data: &[u8]) -> u32 { data.iter().map(|&b| b as u32).sum() }
    /// fn bench(zap: &mut Zap) {
    ///     let data = vec![0u8; 1024];
    ///     let mut group = zap.benchmark_group("checksum");
    ///     group.bench_function("1kb", |b| b.iter(|| checksum(&data)));
    ///     group.finish();
    /// }
    /// ```
    pub fn iter<O, R>(&mut self, mut routine: R)
    where
        R: FnMut() -> O,
    {
        while self.state.start_batch() {
            for _ in 0..self.state.iterations() {
                black_box(routine());
            }
            self.state.end_batch();
        }
    }
}
