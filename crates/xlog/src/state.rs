//! The logger's mutable record
//!
//! Scalar settings are atomics and never take the lock. Everything that
//! concerns the file on disk (handle, naming, rotation deadline) sits behind
//! one mutex, shared by writers and the rotation thread.

use chrono::{DateTime, FixedOffset};
use parking_lot::Mutex;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize};

use crate::errors::{Result, XlogError};
use crate::paths::{create_log_dir, next_hour_boundary, open_append, FileIdentity, HourlyPath};
use crate::severity::AtomicSeverity;

pub(crate) struct LoggerState {
    pub(crate) threshold: AtomicSeverity,
    pub(crate) mirror_stdout: AtomicBool,
    pub(crate) caller_skip: AtomicUsize,
    pub(crate) base_dir: PathBuf,
    pub(crate) file: Mutex<FileState>,
}

/// File-side state; only touched with the lock held
pub(crate) struct FileState {
    pub(crate) path: HourlyPath,
    /// Epoch seconds of the next rotation
    pub(crate) rotate_deadline: i64,
    pub(crate) active: Option<ActiveFile>,
}

pub(crate) struct ActiveFile {
    pub(crate) file: File,
    pub(crate) identity: FileIdentity,
}

impl ActiveFile {
    pub(crate) fn open(path: &Path) -> std::io::Result<Self> {
        let file = open_append(path)?;
        let identity = FileIdentity::of(&file.metadata()?);
        Ok(Self { file, identity })
    }
}

impl LoggerState {
    /// Create the dated directory and open the hourly file for `now`
    pub(crate) fn open(base_dir: &Path, now: &DateTime<FixedOffset>) -> Result<Self> {
        let path = HourlyPath::at(base_dir, now);
        create_log_dir(&path.dir).map_err(|source| XlogError::CreateDir {
            path: path.dir.clone(),
            source,
        })?;
        let active = ActiveFile::open(&path.full).map_err(|source| XlogError::OpenFile {
            path: path.full.clone(),
            source,
        })?;

        Ok(Self {
            threshold: AtomicSeverity::default(),
            mirror_stdout: AtomicBool::new(false),
            caller_skip: AtomicUsize::new(0),
            base_dir: base_dir.to_path_buf(),
            file: Mutex::new(FileState {
                path,
                rotate_deadline: next_hour_boundary(now),
                active: Some(active),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn noon() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 6, 12, 34, 56)
            .unwrap()
    }

    #[test]
    fn test_open_creates_dated_file() {
        let tmp = TempDir::new().unwrap();
        let state = LoggerState::open(tmp.path(), &noon()).unwrap();

        let file = state.file.lock();
        assert_eq!(file.path.full, tmp.path().join("20240506").join("12.log"));
        assert!(file.path.full.is_file());
        assert!(file.active.is_some());
        assert_eq!(
            file.rotate_deadline,
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2024, 5, 6, 13, 0, 0)
                .unwrap()
                .timestamp()
        );
    }

    #[test]
    fn test_open_fails_when_base_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = LoggerState::open(&blocker, &noon()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::CreateDir);
    }

    #[test]
    fn test_open_fails_when_hour_file_is_a_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("20240506").join("12.log")).unwrap();

        let err = LoggerState::open(tmp.path(), &noon()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::OpenFile);
    }
}
