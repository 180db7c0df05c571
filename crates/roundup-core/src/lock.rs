//! Per-day fire-once markers.
//!
//! A lock is a file named after a namespace and an ISO date. Creation uses
//! `create_new`, so the existence check and the write are a single atomic
//! step: of two overlapping invocations on the same day exactly one wins.
//! Markers are never removed; a new day simply keys a new file.

use crate::error::Result;
use crate::paths;
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A lock written by this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyLock {
    path: PathBuf,
}

impl DailyLock {
    /// Create the marker for `namespace` on `date` if nobody has yet.
    ///
    /// Returns `Ok(None)` when the marker already exists.
    pub fn try_acquire(
        dir: &Path,
        namespace: &str,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Option<Self>> {
        std::fs::create_dir_all(dir)?;
        let path = paths::lock_path(dir, namespace, date);
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        writeln!(
            file,
            "acquired_at: {}\npid: {}",
            now.format("%Y-%m-%dT%H:%M:%S"),
            std::process::id()
        )?;
        Ok(Some(Self { path }))
    }

    pub fn exists(dir: &Path, namespace: &str, date: NaiveDate) -> bool {
        paths::lock_path(dir, namespace, date).exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn noon(d: u32) -> NaiveDateTime {
        day(d).and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn first_acquire_wins_second_sees_marker() {
        let dir = TempDir::new().unwrap();
        let lock = DailyLock::try_acquire(dir.path(), "dispatch", day(1), noon(1))
            .unwrap()
            .expect("first acquire");
        assert!(lock.path().exists());
        assert!(lock.path().ends_with("dispatch-2025-03-01.lock"));

        let again = DailyLock::try_acquire(dir.path(), "dispatch", day(1), noon(1)).unwrap();
        assert!(again.is_none());
    }

    #[test]
    fn distinct_days_get_distinct_markers() {
        let dir = TempDir::new().unwrap();
        assert!(DailyLock::try_acquire(dir.path(), "dispatch", day(1), noon(1))
            .unwrap()
            .is_some());
        assert!(DailyLock::try_acquire(dir.path(), "dispatch", day(2), noon(2))
            .unwrap()
            .is_some());
    }

    #[test]
    fn namespaces_are_independent() {
        let dir = TempDir::new().unwrap();
        assert!(DailyLock::try_acquire(dir.path(), "dispatch", day(3), noon(3))
            .unwrap()
            .is_some());
        assert!(!DailyLock::exists(dir.path(), "remind", day(3)));
        assert!(DailyLock::try_acquire(dir.path(), "remind", day(3), noon(3))
            .unwrap()
            .is_some());
    }

    #[test]
    fn creates_lock_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/locks");
        DailyLock::try_acquire(&nested, "dispatch", day(1), noon(1)).unwrap();
        assert!(DailyLock::exists(&nested, "dispatch", day(1)));
    }
}
