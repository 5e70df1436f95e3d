//! Persistent record of prior benchmark results.
//!
//! The store is an ordered sequence of entries keyed by canonical benchmark
//! name, serialized to a line-oriented text file:
//!
//! ```text
//! zap-baseline v1
//! <name>|<mean>|<std_dev>|<ci_lower>|<ci_upper>
//! ```
//!
//! Lines that fail to parse are skipped, so newer writers can extend the
//! format without breaking older readers.

use crate::error::{Error, Result};
use crate::stats::Stats;
use log::debug;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const FILE_HEADER: &str = "zap-baseline v1";

/// One saved benchmark result, keyed by canonical name.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineEntry {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Ordered collection of baseline entries with unique names.
///
/// Insertion order is preserved so repeated saves produce stable files.
/// Lookups are linear scans; stores hold at most a few hundred entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineStore {
    entries: Vec<BaselineEntry>,
}

impl BaselineStore {
    pub fn new() -> BaselineStore {
        BaselineStore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BaselineEntry] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<&BaselineEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Records `stats` under `name`, updating an existing entry in place or
    /// appending a new one.
    pub fn add(&mut self, name: &str, stats: &Stats) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.mean = stats.mean;
            entry.std_dev = stats.std_dev;
            entry.ci_lower = stats.ci_lower;
            entry.ci_upper = stats.ci_upper;
            return;
        }
        self.entries.push(BaselineEntry {
            name: name.to_string(),
            mean: stats.mean,
            std_dev: stats.std_dev,
            ci_lower: stats.ci_lower,
            ci_upper: stats.ci_upper,
        });
    }

    /// Writes the store to `path`, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let access = |inner: io::Error| Error::AccessError {
            path: path.to_path_buf(),
            inner,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(access)?;
            }
        }

        let file = fs::File::create(path).map_err(access)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", FILE_HEADER).map_err(access)?;
        for entry in &self.entries {
            writeln!(
                writer,
                "{}|{}|{}|{}|{}",
                entry.name, entry.mean, entry.std_dev, entry.ci_lower, entry.ci_upper
            )
            .map_err(access)?;
        }
        writer.flush().map_err(access)?;
        Ok(())
    }

    /// Reads a store from `path`. A missing file is not an error; it loads
    /// as `Ok(None)` so a first run can proceed without a baseline.
    pub fn load(path: &Path) -> Result<Option<BaselineStore>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(inner) => {
                return Err(Error::AccessError {
                    path: path.to_path_buf(),
                    inner,
                })
            }
        };

        let mut lines = contents.lines();
        match lines.next() {
            Some(header) if header.trim_end() == FILE_HEADER => {}
            _ => {
                return Err(Error::InvalidBaseline {
                    path: path.to_path_buf(),
                })
            }
        }

        let mut store = BaselineStore::new();
        for line in lines {
            match parse_entry(line) {
                Some(entry) => store.entries.push(entry),
                None => {
                    if !line.is_empty() {
                        debug!("skipping malformed baseline line: {:?}", line);
                    }
                }
            }
        }
        Ok(Some(store))
    }
}

fn parse_entry(line: &str) -> Option<BaselineEntry> {
    let mut fields = line.split('|');
    let name = fields.next()?;
    if name.is_empty() {
        return None;
    }
    let mean = fields.next()?.parse().ok()?;
    let std_dev = fields.next()?.parse().ok()?;
    let ci_lower = fields.next()?.parse().ok()?;
    let ci_upper = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(BaselineEntry {
        name: name.to_string(),
        mean,
        std_dev,
        ci_lower,
        ci_upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stats(mean: f64, std_dev: f64, ci_lower: f64, ci_upper: f64) -> Stats {
        Stats {
            mean,
            std_dev,
            ci_lower,
            ci_upper,
            ..Stats::default()
        }
    }

    #[test]
    fn add_then_find() {
        let mut store = BaselineStore::new();
        store.add("alpha", &stats(1.0, 0.1, 0.9, 1.1));
        store.add("beta", &stats(2.0, 0.2, 1.8, 2.2));

        assert_eq!(store.len(), 2);
        assert_eq!(store.find("alpha").unwrap().mean, 1.0);
        assert_eq!(store.find("beta").unwrap().mean, 2.0);
        assert!(store.find("gamma").is_none());
    }

    #[test]
    fn add_updates_existing_entry_in_place() {
        let mut store = BaselineStore::new();
        store.add("alpha", &stats(1.0, 0.1, 0.9, 1.1));
        store.add("beta", &stats(2.0, 0.2, 1.8, 2.2));
        store.add("alpha", &stats(5.0, 0.5, 4.5, 5.5));

        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].name, "alpha");
        assert_eq!(store.entries()[0].mean, 5.0);
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline");

        let mut store = BaselineStore::new();
        store.add("fib/20", &stats(123.456789012345, 1.5, 120.1, 126.9));
        store.add("sort_vec", &stats(0.000123456, 1e-6, 0.0001, 0.00015));
        store.save(&path).unwrap();

        let loaded = BaselineStore::load(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        for (a, b) in store.entries().iter().zip(loaded.entries()) {
            assert_eq!(a.name, b.name);
            assert_relative_eq!(a.mean, b.mean, max_relative = 1e-15);
            assert_relative_eq!(a.std_dev, b.std_dev, max_relative = 1e-15);
            assert_relative_eq!(a.ci_lower, b.ci_lower, max_relative = 1e-15);
            assert_relative_eq!(a.ci_upper, b.ci_upper, max_relative = 1e-15);
        }
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("baseline");

        let mut store = BaselineStore::new();
        store.add("alpha", &stats(1.0, 0.1, 0.9, 1.1));
        store.save(&path).unwrap();

        assert!(path.is_file());
        assert!(BaselineStore::load(&path).unwrap().is_some());
    }

    #[test]
    fn load_of_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = BaselineStore::load(&dir.path().join("nope")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn load_rejects_bad_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline");
        fs::write(&path, "something else\nalpha|1|1|1|1\n").unwrap();

        match BaselineStore::load(&path) {
            Err(Error::InvalidBaseline { .. }) => {}
            other => panic!("expected InvalidBaseline, got {:?}", other),
        }
    }

    #[test]
    fn load_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline");
        fs::write(
            &path,
            "zap-baseline v1\n\
             good|1.0|0.1|0.9|1.1\n\
             missing|fields\n\
             notnum|a|b|c|d\n\
             trailing|1|1|1|1|extra\n\
             also_good|2.0|0.2|1.8|2.2\n",
        )
        .unwrap();

        let store = BaselineStore::load(&path).unwrap().unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].name, "good");
        assert_eq!(store.entries()[1].name, "also_good");
    }

    #[test]
    fn load_of_empty_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline");
        BaselineStore::new().save(&path).unwrap();
        let loaded = BaselineStore::load(&path).unwrap().unwrap();
        assert!(loaded.is_empty());
    }
}
