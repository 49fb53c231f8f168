//! Append-only destinations for reports and dumps, one stream per day.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

/// Directory used by [`DailyFileSink::default`].
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Receives text to append to the log of a calendar day.
pub trait LogSink {
    /// Append `text` to the log for `day`.
    fn append(&self, day: NaiveDate, text: &str) -> io::Result<()>;
}

/// Writes to `<dir>/timer-<YYYY-MM-DD>.log`, creating both as needed.
#[derive(Debug, Clone)]
pub struct DailyFileSink {
    dir: PathBuf,
}

impl DailyFileSink {
    /// Sink rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the daily files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that receives appends for `day`.
    pub fn path_for(&self, day: NaiveDate) -> PathBuf {
        self.dir.join(format!("timer-{}.log", day.format("%Y-%m-%d")))
    }
}

impl Default for DailyFileSink {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIR)
    }
}

impl LogSink for DailyFileSink {
    fn append(&self, day: NaiveDate, text: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(day))?;

        file.write_all(text.as_bytes())
    }
}

/// Keeps appended text in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<(NaiveDate, String)>>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every append so far, oldest first.
    pub fn records(&self) -> Vec<(NaiveDate, String)> {
        self.lock().clone()
    }

    /// Concatenated text appended for `day`.
    pub fn contents(&self, day: NaiveDate) -> String {
        self.lock()
            .iter()
            .filter(|(d, _)| *d == day)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(NaiveDate, String)>> {
        // a panic while holding the lock leaves the buffer usable
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn append(&self, day: NaiveDate, text: &str) -> io::Result<()> {
        self.lock().push((day, text.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn daily_file_path_uses_iso_date() {
        let sink = DailyFileSink::new("/var/log/app");
        assert_eq!(
            sink.path_for(day(2024, 3, 7)),
            PathBuf::from("/var/log/app/timer-2024-03-07.log")
        );
    }

    #[test]
    fn daily_file_sink_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = DailyFileSink::new(dir.path().join("nested"));
        let today = day(2024, 1, 31);

        sink.append(today, "first\n").unwrap();
        sink.append(today, "second\n").unwrap();
        sink.append(day(2024, 2, 1), "other day\n").unwrap();

        let text = fs::read_to_string(sink.path_for(today)).unwrap();
        assert_eq!(text, "first\nsecond\n");
        assert!(sink.path_for(day(2024, 2, 1)).exists());
    }

    #[test]
    fn daily_file_sink_reports_io_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let sink = DailyFileSink::new(&blocker);
        assert!(sink.append(day(2024, 1, 1), "x").is_err());
    }

    #[test]
    fn memory_sink_clones_share_records() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        sink.append(day(2024, 5, 5), "a").unwrap();
        sink.append(day(2024, 5, 5), "b").unwrap();
        sink.append(day(2024, 5, 6), "c").unwrap();

        assert_eq!(handle.records().len(), 3);
        assert_eq!(handle.contents(day(2024, 5, 5)), "ab");
    }
}
