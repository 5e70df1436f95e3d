//! The timing seam. Everything the engine knows about time passes through the
//! [`Timer`] trait, which makes the batch controller testable against a
//! deterministic clock.

use lazy_static::lazy_static;
use std::time::Instant;

lazy_static! {
    /// Process-wide epoch for the monotonic clock. Anchored on first use so
    /// every reading shares a single origin.
    static ref EPOCH: Instant = Instant::now();
}

/// A monotonic nanosecond clock.
///
/// Implementations must be non-decreasing and use a single epoch for the
/// lifetime of the process. No other contract is assumed.
pub trait Timer {
    /// Nanoseconds elapsed since the process epoch.
    fn now_ns(&self) -> u64;
}

/// The default wall-clock timer, backed by [`std::time::Instant`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WallTime;

impl Timer for WallTime {
    fn now_ns(&self) -> u64 {
        EPOCH.elapsed().as_nanos() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_time_is_monotonic() {
        let timer = WallTime;
        let mut last = timer.now_ns();
        for _ in 0..1000 {
            let now = timer.now_ns();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn wall_time_advances() {
        let timer = WallTime;
        let start = timer.now_ns();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.now_ns() - start >= 5_000_000);
    }
}
