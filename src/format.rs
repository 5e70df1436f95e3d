//! Human-readable formatting of times, changes, and throughput rates.

use crate::Throughput;

pub fn change(pct: f64) -> String {
    format!("{:>+6}%", signed_short(pct))
}

fn short(n: f64) -> String {
    if n < 10.0 {
        format!("{:.4}", n)
    } else if n < 100.0 {
        format!("{:.3}", n)
    } else if n < 1000.0 {
        format!("{:.2}", n)
    } else {
        format!("{}", n)
    }
}

fn signed_short(n: f64) -> String {
    let n_abs = n.abs();

    if n_abs < 10.0 {
        format!("{:+.4}", n)
    } else if n_abs < 100.0 {
        format!("{:+.3}", n)
    } else if n_abs < 1000.0 {
        format!("{:+.2}", n)
    } else {
        format!("{:+}", n)
    }
}

pub fn time(ns: f64) -> String {
    if ns < 1.0 {
        format!("{:>6} ps", short(ns * 1e3))
    } else if ns < 10f64.powi(3) {
        format!("{:>6} ns", short(ns))
    } else if ns < 10f64.powi(6) {
        format!("{:>6} us", short(ns / 1e3))
    } else if ns < 10f64.powi(9) {
        format!("{:>6} ms", short(ns / 1e6))
    } else {
        format!("{:>6} s", short(ns / 1e9))
    }
}

pub fn iter_count(iterations: u64) -> String {
    if iterations < 10_000 {
        format!("{} iterations", iterations)
    } else if iterations < 1_000_000 {
        format!("{:.0}k iterations", (iterations as f64) / 1000.0)
    } else if iterations < 10_000_000 {
        format!("{:.1}M iterations", (iterations as f64) / (1000.0 * 1000.0))
    } else if iterations < 1_000_000_000 {
        format!("{:.0}M iterations", (iterations as f64) / (1000.0 * 1000.0))
    } else {
        format!(
            "{:.1}B iterations",
            (iterations as f64) / (1000.0 * 1000.0 * 1000.0)
        )
    }
}

/// Converts a mean nanoseconds-per-iteration into a per-second rate with an
/// appropriate unit.
pub fn throughput(throughput: &Throughput, mean_ns: f64) -> String {
    match *throughput {
        Throughput::Bytes(bytes) => bytes_per_second(bytes as f64 * (1e9 / mean_ns)),
        Throughput::Elements(elems) => elements_per_second(elems as f64 * (1e9 / mean_ns)),
    }
}

fn bytes_per_second(per_second: f64) -> String {
    if per_second < 1024.0 {
        format!("{:>6}   B/s", short(per_second))
    } else if per_second < 1024.0 * 1024.0 {
        format!("{:>6} KiB/s", short(per_second / 1024.0))
    } else if per_second < 1024.0 * 1024.0 * 1024.0 {
        format!("{:>6} MiB/s", short(per_second / (1024.0 * 1024.0)))
    } else {
        format!("{:>6} GiB/s", short(per_second / (1024.0 * 1024.0 * 1024.0)))
    }
}

fn elements_per_second(per_second: f64) -> String {
    if per_second < 1000.0 {
        format!("{:>6}  elem/s", short(per_second))
    } else if per_second < 1000.0 * 1000.0 {
        format!("{:>6} Kelem/s", short(per_second / 1000.0))
    } else if per_second < 1000.0 * 1000.0 * 1000.0 {
        format!("{:>6} Melem/s", short(per_second / (1000.0 * 1000.0)))
    } else {
        format!(
            "{:>6} Gelem/s",
            short(per_second / (1000.0 * 1000.0 * 1000.0))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_picks_a_unit_by_magnitude() {
        assert!(time(0.5).ends_with("ps"));
        assert!(time(5.0).ends_with("ns"));
        assert!(time(5_000.0).ends_with("us"));
        assert!(time(5_000_000.0).ends_with("ms"));
        assert!(time(5_000_000_000.0).ends_with(" s"));
    }

    #[test]
    fn change_is_signed() {
        assert!(change(12.5).contains("+12.50"));
        assert!(change(-3.2).contains("-3.2000"));
    }

    #[test]
    fn throughput_scales_bytes() {
        // 1 KiB per iteration at 1 us per iteration = 1 MiB/s... times 1024.
        let rate = throughput(&Throughput::Bytes(1024), 1_000.0);
        assert!(rate.ends_with("MiB/s"), "got {}", rate);

        let slow = throughput(&Throughput::Bytes(16), 1_000_000_000.0);
        assert!(slow.ends_with("  B/s"), "got {}", slow);
    }

    #[test]
    fn throughput_scales_elements() {
        let rate = throughput(&Throughput::Elements(1000), 1_000.0);
        assert!(rate.ends_with("Gelem/s"), "got {}", rate);
    }

    #[test]
    fn iter_count_buckets() {
        assert_eq!(iter_count(500), "500 iterations");
        assert_eq!(iter_count(20_000), "20k iterations");
        assert_eq!(iter_count(2_500_000), "2.5M iterations");
        assert_eq!(iter_count(2_000_000_000), "2.0B iterations");
    }
}
