//! Diary entries on disk: one Markdown file per calendar day.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Creates the diary directory if it is missing. An already-existing
/// directory is fine, so this can run on every session.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Path of the entry for `date`: `<dir>/<YYYY-MM-DD>_summary.md`.
pub fn summary_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}_summary.md", date.format("%Y-%m-%d")))
}

/// Writes the Markdown entry, replacing any earlier entry for the same date.
pub fn write_summary(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text)
}
