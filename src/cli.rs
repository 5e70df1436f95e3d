//! Command-line argument handling for the benchmark harness.

use crate::report::{CliReport, JsonReport};
use crate::Zap;
use clap::{App, AppSettings, Arg, ArgMatches};
use std::str::FromStr;
use std::time::Duration;

pub(crate) fn configure_from_args(zap: &mut Zap) {
    let matches = app().get_matches();
    apply_matches(zap, &matches);
}

fn app() -> App<'static, 'static> {
    App::new("zap bench")
        .setting(AppSettings::DeriveDisplayOrder)
        .about("Statistics-driven micro-benchmarking harness")
        .arg(
            Arg::with_name("filter")
                .short("f")
                .long("filter")
                .takes_value(true)
                .help(
                    "Only run benchmarks matching PATTERN. Supports * (any run of \
                     characters) and ? (a single character); without wildcards, \
                     matches by substring",
                ),
        )
        .arg(
            Arg::with_name("tag")
                .short("t")
                .long("tag")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("Only run groups carrying TAG; repeatable, OR semantics"),
        )
        .arg(
            Arg::with_name("baseline")
                .long("baseline")
                .takes_value(true)
                .min_values(0)
                .max_values(1)
                .help("Compare against (and save to) this baseline file"),
        )
        .arg(
            Arg::with_name("compare")
                .long("compare")
                .takes_value(true)
                .min_values(0)
                .max_values(1)
                .help("Alias for --baseline"),
        )
        .arg(
            Arg::with_name("save-baseline")
                .long("save-baseline")
                .takes_value(true)
                .min_values(0)
                .max_values(1)
                .help("Save results to this baseline file"),
        )
        .arg(
            Arg::with_name("no-save")
                .long("no-save")
                .help("Do not save results to the baseline"),
        )
        .arg(
            Arg::with_name("no-compare")
                .long("no-compare")
                .help("Do not compare against the baseline"),
        )
        .arg(
            Arg::with_name("fail-threshold")
                .long("fail-threshold")
                .takes_value(true)
                .value_name("PCT")
                .help("Exit with code 1 if any regression exceeds PCT percent"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Emit results as JSON, one object per line"),
        )
        .arg(
            Arg::with_name("samples")
                .long("samples")
                .takes_value(true)
                .value_name("N")
                .help("Number of samples to collect per benchmark (default: 100)"),
        )
        .arg(
            Arg::with_name("warmup")
                .long("warmup")
                .takes_value(true)
                .value_name("TIME")
                .help("Warmup duration, e.g. 500ms or 2s (default: 1s)"),
        )
        .arg(
            Arg::with_name("time")
                .long("time")
                .takes_value(true)
                .value_name("TIME")
                .help("Measurement duration, e.g. 5s or 1m (default: 3s)"),
        )
        .arg(
            Arg::with_name("min-iters")
                .long("min-iters")
                .takes_value(true)
                .value_name("N")
                .help("Minimum inner iterations per sample"),
        )
        .arg(
            Arg::with_name("list")
                .long("list")
                .alias("dry-run")
                .help("List matching benchmarks without running them"),
        )
        .arg(
            Arg::with_name("color")
                .long("color")
                .alias("colour")
                .takes_value(true)
                .possible_values(&["auto", "always", "never"])
                .default_value("auto")
                .help("Configure coloring of output"),
        )
}

fn apply_matches(zap: &mut Zap, matches: &ArgMatches<'_>) {
    if let Some(filter) = matches.value_of("filter") {
        zap.filter = Some(filter.to_string());
    }
    if let Some(tags) = matches.values_of("tag") {
        zap.required_tags = tags.map(String::from).collect();
    }

    for flag in &["baseline", "compare", "save-baseline"] {
        if matches.is_present(flag) {
            if let Some(path) = matches.value_of(flag) {
                zap.baseline_path = path.into();
                zap.explicit_path = true;
            }
        }
    }
    if matches.is_present("baseline") || matches.is_present("compare") {
        zap.compare = true;
    }
    if matches.is_present("save-baseline") {
        zap.save_baseline = true;
    }
    if matches.is_present("no-save") {
        zap.save_baseline = false;
    }
    if matches.is_present("no-compare") {
        zap.compare = false;
    }

    if let Some(threshold) = matches.value_of("fail-threshold") {
        zap.fail_threshold = parse_or_exit(threshold, "--fail-threshold expects a percentage");
    }
    if let Some(samples) = matches.value_of("samples") {
        let samples: usize = parse_or_exit(samples, "--samples expects a number");
        if samples < 10 {
            config_error("--samples must be at least 10");
        }
        zap.config.sample_count = samples;
    }
    if let Some(warmup) = matches.value_of("warmup") {
        zap.config.warm_up_time = duration_or_exit(warmup, "--warmup");
    }
    if let Some(time) = matches.value_of("time") {
        zap.config.measurement_time = duration_or_exit(time, "--time");
    }
    if let Some(min_iters) = matches.value_of("min-iters") {
        zap.config.min_iters = parse_or_exit(min_iters, "--min-iters expects a number");
    }
    if matches.is_present("list") {
        zap.list_mode = true;
    }

    let stdout_isatty = atty::is(atty::Stream::Stdout);
    let enable_text_coloring = match matches.value_of("color") {
        Some("always") => true,
        Some("never") => false,
        _ => stdout_isatty,
    };
    zap.report.cli = CliReport::new(stdout_isatty, enable_text_coloring);

    if matches.is_present("json") {
        zap.report.cli_enabled = false;
        zap.report.json_enabled = true;
        zap.report.json = JsonReport;
    }
}

fn config_error(message: &str) -> ! {
    eprintln!("error: {}", message);
    ::std::process::exit(1);
}

fn parse_or_exit<T: FromStr>(value: &str, message: &str) -> T {
    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => config_error(&format!("{}, got {:?}", message, value)),
    }
}

fn duration_or_exit(value: &str, flag: &str) -> Duration {
    match parse_duration(value) {
        Some(duration) if duration.as_nanos() > 0 => duration,
        _ => config_error(&format!(
            "{} expects a positive duration such as 500ms, 2s or 1m, got {:?}",
            flag, value
        )),
    }
}

/// Parses a human duration: `ns`, `us`, `ms`, `s` and `m` suffixes are
/// accepted; a bare number means seconds.
pub(crate) fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let split = s
        .find(|c: char| c != '.' && !c.is_ascii_digit())
        .unwrap_or_else(|| s.len());
    let (number, unit) = s.split_at(split);
    let value: f64 = number.parse().ok()?;
    if value < 0.0 {
        return None;
    }

    let nanos = match unit.trim() {
        "ns" => value,
        "us" | "µs" => value * 1e3,
        "ms" => value * 1e6,
        "" | "s" | "sec" => value * 1e9,
        "m" | "min" => value * 60e9,
        _ => return None,
    };
    Some(Duration::from_nanos(nanos as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_for(args: &[&str]) -> ArgMatches<'static> {
        let mut argv = vec!["zap-bench"];
        argv.extend_from_slice(args);
        app().get_matches_from(argv)
    }

    #[test]
    fn duration_units() {
        assert_eq!(parse_duration("100ns"), Some(Duration::from_nanos(100)));
        assert_eq!(parse_duration("5us"), Some(Duration::from_micros(5)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("2s"), Some(Duration::from_secs(2)));
        assert_eq!(parse_duration("1m"), Some(Duration::from_secs(60)));
        assert_eq!(parse_duration("3"), Some(Duration::from_secs(3)));
        assert_eq!(parse_duration("1.5s"), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("fast"), None);
        assert_eq!(parse_duration("10 parsecs"), None);
    }

    #[test]
    fn filter_and_tags() {
        let mut zap = Zap::default();
        let matches = matches_for(&["-f", "sort*", "-t", "unit", "-t", "fast"]);
        apply_matches(&mut zap, &matches);

        assert_eq!(zap.filter.as_deref(), Some("sort*"));
        assert_eq!(zap.required_tags, vec!["unit", "fast"]);
    }

    #[test]
    fn baseline_flags() {
        let mut zap = Zap::default();
        let matches = matches_for(&["--baseline", "custom/path"]);
        apply_matches(&mut zap, &matches);
        assert!(zap.compare);
        assert!(zap.explicit_path);
        assert_eq!(zap.baseline_path.to_str(), Some("custom/path"));

        let mut zap = Zap::default();
        let matches = matches_for(&["--no-save", "--no-compare"]);
        apply_matches(&mut zap, &matches);
        assert!(!zap.save_baseline);
        assert!(!zap.compare);
    }

    #[test]
    fn baseline_flag_without_value_keeps_default_path() {
        let mut zap = Zap::default();
        let matches = matches_for(&["--baseline"]);
        apply_matches(&mut zap, &matches);
        assert!(zap.compare);
        assert!(!zap.explicit_path);
        assert_eq!(zap.baseline_path.to_str(), Some(".zap/baseline"));
    }

    #[test]
    fn measurement_overrides() {
        let mut zap = Zap::default();
        let matches = matches_for(&[
            "--samples",
            "50",
            "--warmup",
            "250ms",
            "--time",
            "2s",
            "--min-iters",
            "16",
        ]);
        apply_matches(&mut zap, &matches);

        assert_eq!(zap.config.sample_count, 50);
        assert_eq!(zap.config.warm_up_time, Duration::from_millis(250));
        assert_eq!(zap.config.measurement_time, Duration::from_secs(2));
        assert_eq!(zap.config.min_iters, 16);
    }

    #[test]
    fn list_and_json_modes() {
        let mut zap = Zap::default();
        let matches = matches_for(&["--list", "--json"]);
        apply_matches(&mut zap, &matches);
        assert!(zap.list_mode);
        assert!(zap.report.json_enabled);
        assert!(!zap.report.cli_enabled);
    }
}
