//! Result reporting. The engine forwards everything it learns through the
//! [`Report`] trait; the CLI reporter renders human-readable blocks and the
//! JSON reporter emits one machine-readable object per line.

use crate::compare::{ChangeDirection, Comparison};
use crate::format;
use crate::stats::Stats;
use crate::Throughput;
use anes::{Attribute, ClearLine, Color, ResetAttributes, SetAttribute, SetForegroundColor};
use std::io::stderr;
use std::io::Write;
use std::path::Path;

pub(crate) trait Report {
    fn group_start(&self, _group_name: &str) {}
    fn group_end(&self, _group_name: &str) {}
    fn benchmark_start(&self, _id: &str) {}
    fn warmup(&self, _id: &str, _warmup_ns: f64) {}
    fn list_entry(&self, _group_name: &str, _id: &str) {}
    fn baseline_loaded(&self, _path: &Path, _entry_count: usize) {}
    fn warning(&self, _message: &str) {}
    fn measurement_complete(
        &self,
        _id: &str,
        _stats: &Stats,
        _comparison: Option<&Comparison>,
        _comparing: bool,
    ) {
    }
    fn final_summary(&self, _has_regression: bool, _fail_threshold: f64) {}
}

pub(crate) struct Reports {
    pub(crate) cli_enabled: bool,
    pub(crate) cli: CliReport,
    pub(crate) json_enabled: bool,
    pub(crate) json: JsonReport,
}

macro_rules! reports_impl {
    (fn $name:ident(&self, $($argn:ident: $argt:ty),*)) => {
        fn $name(&self, $($argn: $argt),* ) {
            if self.cli_enabled {
                self.cli.$name($($argn),*);
            }
            if self.json_enabled {
                self.json.$name($($argn),*);
            }
        }
    };
}

impl Report for Reports {
    reports_impl!(fn group_start(&self, group_name: &str));
    reports_impl!(fn group_end(&self, group_name: &str));
    reports_impl!(fn benchmark_start(&self, id: &str));
    reports_impl!(fn warmup(&self, id: &str, warmup_ns: f64));
    reports_impl!(fn list_entry(&self, group_name: &str, id: &str));
    reports_impl!(fn baseline_loaded(&self, path: &Path, entry_count: usize));
    reports_impl!(fn warning(&self, message: &str));
    reports_impl!(fn measurement_complete(
        &self,
        id: &str,
        stats: &Stats,
        comparison: Option<&Comparison>,
        comparing: bool
    ));
    reports_impl!(fn final_summary(&self, has_regression: bool, fail_threshold: f64));
}

impl Default for Reports {
    fn default() -> Reports {
        let is_tty = atty::is(atty::Stream::Stdout);
        Reports {
            cli_enabled: true,
            cli: CliReport::new(is_tty, is_tty),
            json_enabled: false,
            json: JsonReport,
        }
    }
}

pub(crate) struct CliReport {
    pub enable_text_overwrite: bool,
    pub enable_text_coloring: bool,
}

impl CliReport {
    pub fn new(enable_text_overwrite: bool, enable_text_coloring: bool) -> CliReport {
        CliReport {
            enable_text_overwrite,
            enable_text_coloring,
        }
    }

    fn text_overwrite(&self) {
        if self.enable_text_overwrite {
            eprint!("\r{}", ClearLine::All);
        }
    }

    // Passing a String is the common case here.
    #[allow(clippy::needless_pass_by_value)]
    fn print_overwritable(&self, s: String) {
        if self.enable_text_overwrite {
            eprint!("{}", s);
            stderr().flush().unwrap();
        } else {
            eprintln!("{}", s);
        }
    }

    fn with_color(&self, color: Color, s: &str) -> String {
        if self.enable_text_coloring {
            format!("{}{}{}", SetForegroundColor(color), s, ResetAttributes)
        } else {
            String::from(s)
        }
    }

    fn green(&self, s: &str) -> String {
        self.with_color(Color::DarkGreen, s)
    }

    fn yellow(&self, s: &str) -> String {
        self.with_color(Color::DarkYellow, s)
    }

    fn red(&self, s: &str) -> String {
        self.with_color(Color::DarkRed, s)
    }

    fn cyan(&self, s: &str) -> String {
        self.with_color(Color::DarkCyan, s)
    }

    fn bold(&self, s: String) -> String {
        if self.enable_text_coloring {
            format!("{}{}{}", SetAttribute(Attribute::Bold), s, ResetAttributes)
        } else {
            s
        }
    }

    fn faint(&self, s: String) -> String {
        if self.enable_text_coloring {
            format!("{}{}{}", SetAttribute(Attribute::Faint), s, ResetAttributes)
        } else {
            s
        }
    }

    fn comparison_line(&self, cmp: &Comparison) -> String {
        let change_str = format::change(cmp.change_pct);
        let (change_str, verdict) = match cmp.change {
            ChangeDirection::Improved => (
                self.green(&self.bold(change_str)),
                self.green("improved"),
            ),
            ChangeDirection::Regressed => (
                self.red(&self.bold(change_str)),
                self.red("regressed"),
            ),
            ChangeDirection::NoChange => (self.faint(change_str), "no change".to_string()),
        };
        format!(
            "  baseline:           {} {} (was {})",
            change_str,
            verdict,
            format::time(cmp.old_mean).trim_start()
        )
    }

    fn outliers(&self, stats: &Stats) {
        let noutliers = stats.outliers_low + stats.outliers_high;
        if noutliers == 0 {
            return;
        }
        let percent = 100.0 * noutliers as f64 / stats.sample_count as f64;
        println!(
            "{}",
            self.yellow(&format!(
                "  found {} outliers among {} measurements ({:.2}%): {} low, {} high",
                noutliers, stats.sample_count, percent, stats.outliers_low, stats.outliers_high
            ))
        );
    }
}

impl Report for CliReport {
    fn group_start(&self, group_name: &str) {
        println!(
            "{}",
            self.bold(format!("running benchmark group: {}", group_name))
        );
        println!();
    }

    fn group_end(&self, _group_name: &str) {
        println!();
    }

    fn benchmark_start(&self, id: &str) {
        self.print_overwritable(format!("Benchmarking {}", id));
    }

    fn warmup(&self, id: &str, warmup_ns: f64) {
        self.text_overwrite();
        self.print_overwritable(format!(
            "Benchmarking {}: Warming up for {}",
            id,
            format::time(warmup_ns).trim_start()
        ));
    }

    fn list_entry(&self, group_name: &str, id: &str) {
        println!("  {}/{}", group_name, self.green(id));
    }

    fn baseline_loaded(&self, path: &Path, entry_count: usize) {
        println!(
            "Loaded baseline: {} ({} entries)",
            self.cyan(&path.display().to_string()),
            entry_count
        );
        println!();
    }

    fn warning(&self, message: &str) {
        self.text_overwrite();
        println!("{}", self.yellow(&format!("Warning: {}", message)));
    }

    fn measurement_complete(
        &self,
        id: &str,
        stats: &Stats,
        comparison: Option<&Comparison>,
        comparing: bool,
    ) {
        self.text_overwrite();

        println!("{}", self.green(&self.bold(id.to_string())));
        println!(
            "  {} samples x {}, median: {}",
            stats.sample_count,
            format::iter_count(stats.iterations),
            self.cyan(format::time(stats.median).trim_start())
        );
        println!(
            "  time  (mean ± σ):   {} ± {}",
            self.bold(format::time(stats.mean).trim_start().to_string()),
            format::time(stats.std_dev).trim_start()
        );
        println!(
            "  range (min … max):  {} … {}",
            format::time(stats.min).trim_start(),
            format::time(stats.max).trim_start()
        );

        if let Some(throughput) = &stats.throughput {
            println!(
                "  throughput:         {}",
                self.cyan(format::throughput(throughput, stats.mean).trim_start())
            );
        }

        match comparison {
            Some(cmp) => println!("{}", self.comparison_line(cmp)),
            None if comparing => {
                println!("  {}", self.yellow("(new) no baseline entry"));
            }
            None => {}
        }

        self.outliers(stats);
        println!();
    }

    fn final_summary(&self, has_regression: bool, fail_threshold: f64) {
        if has_regression {
            eprintln!(
                "{}",
                self.red(&format!(
                    "error: benchmark regression exceeded threshold ({:.1}%)",
                    fail_threshold
                ))
            );
        }
    }
}

pub(crate) struct JsonReport;

#[derive(Serialize)]
struct JsonThroughput {
    kind: &'static str,
    per_iteration: u64,
    per_second: f64,
}

#[derive(Serialize)]
struct JsonComparison {
    old_mean_ns: f64,
    change_pct: f64,
    significant: bool,
    status: ChangeDirection,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    name: &'a str,
    samples: usize,
    iterations: u64,
    mean_ns: f64,
    median_ns: f64,
    std_dev_ns: f64,
    mad_ns: f64,
    min_ns: f64,
    max_ns: f64,
    p75_ns: f64,
    p90_ns: f64,
    p95_ns: f64,
    p99_ns: f64,
    ci_lower_ns: f64,
    ci_upper_ns: f64,
    outliers_low: usize,
    outliers_high: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    throughput: Option<JsonThroughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    baseline: Option<JsonComparison>,
}

#[derive(Serialize)]
struct JsonListEntry<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    group: &'a str,
    name: &'a str,
}

impl Report for JsonReport {
    fn list_entry(&self, group_name: &str, id: &str) {
        let entry = JsonListEntry {
            kind: "benchmark",
            group: group_name,
            name: id,
        };
        println!("{}", serde_json::to_string(&entry).unwrap());
    }

    fn measurement_complete(
        &self,
        id: &str,
        stats: &Stats,
        comparison: Option<&Comparison>,
        _comparing: bool,
    ) {
        let throughput = stats.throughput.as_ref().map(|t| {
            let (kind, per_iteration) = match *t {
                Throughput::Bytes(n) => ("bytes", n),
                Throughput::Elements(n) => ("elements", n),
            };
            JsonThroughput {
                kind,
                per_iteration,
                per_second: if stats.mean > 0.0 {
                    per_iteration as f64 * 1e9 / stats.mean
                } else {
                    0.0
                },
            }
        });

        let record = JsonRecord {
            name: id,
            samples: stats.sample_count,
            iterations: stats.iterations,
            mean_ns: stats.mean,
            median_ns: stats.median,
            std_dev_ns: stats.std_dev,
            mad_ns: stats.mad,
            min_ns: stats.min,
            max_ns: stats.max,
            p75_ns: stats.p75,
            p90_ns: stats.p90,
            p95_ns: stats.p95,
            p99_ns: stats.p99,
            ci_lower_ns: stats.ci_lower,
            ci_upper_ns: stats.ci_upper,
            outliers_low: stats.outliers_low,
            outliers_high: stats.outliers_high,
            throughput,
            baseline: comparison.map(|cmp| JsonComparison {
                old_mean_ns: cmp.old_mean,
                change_pct: cmp.change_pct,
                significant: cmp.significant,
                status: cmp.change,
            }),
        };
        println!("{}", serde_json::to_string(&record).unwrap());
    }
}
