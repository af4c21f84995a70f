//! On-disk naming: `<base>/<YYYYMMDD>/<HH>.log`

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Seconds between rotations
pub const ROTATE_INTERVAL_SECS: i64 = 3600;

/// `YYYYMMDD` directory name for `now`
pub fn date_dir(now: &DateTime<FixedOffset>) -> String {
    format!("{:04}{:02}{:02}", now.year(), now.month(), now.day())
}

/// `HH.log` file name for `now`
pub fn hour_file(now: &DateTime<FixedOffset>) -> String {
    format!("{:02}.log", now.hour())
}

/// First hour boundary strictly after `now`, in epoch seconds
pub fn next_hour_boundary(now: &DateTime<FixedOffset>) -> i64 {
    let into_hour = i64::from(now.minute() * 60 + now.second());
    now.timestamp() - into_hour + ROTATE_INTERVAL_SECS
}

/// Create `dir` (and parents) unless it already exists
pub fn create_log_dir(dir: &Path) -> io::Result<()> {
    match fs::metadata(dir) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => fs::create_dir_all(dir),
        Err(e) => Err(e),
    }
}

pub fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Naming derived from a single instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyPath {
    pub date_dir: String,
    pub file_name: String,
    pub dir: PathBuf,
    pub full: PathBuf,
}

impl HourlyPath {
    pub fn at(base: &Path, now: &DateTime<FixedOffset>) -> Self {
        let date_dir = date_dir(now);
        let file_name = hour_file(now);
        let dir = base.join(&date_dir);
        let full = dir.join(&file_name);
        Self {
            date_dir,
            file_name,
            dir,
            full,
        }
    }
}

/// Identity of an on-disk file, used to notice external deletion or replacement
///
/// Device and inode on Unix. Elsewhere only existence can be checked, so all
/// identities compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIdentity {
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    pub fn of(meta: &fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            dev: meta.dev(),
            ino: meta.ino(),
        }
    }

    #[cfg(not(unix))]
    pub fn of(_meta: &fs::Metadata) -> Self {
        Self {}
    }

    pub fn of_path(path: &Path) -> io::Result<Self> {
        fs::metadata(path).map(|m| Self::of(&m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 2, 29, h, m, s)
            .unwrap()
    }

    #[test]
    fn test_names() {
        let now = at(7, 30, 0);
        assert_eq!(date_dir(&now), "20240229");
        assert_eq!(hour_file(&now), "07.log");

        let p = HourlyPath::at(Path::new("/var/log/app"), &now);
        assert_eq!(p.full, PathBuf::from("/var/log/app/20240229/07.log"));
        assert_eq!(p.dir, PathBuf::from("/var/log/app/20240229"));
    }

    #[test]
    fn test_next_hour_boundary() {
        let now = at(7, 59, 59);
        assert_eq!(next_hour_boundary(&now), at(8, 0, 0).timestamp());

        // Exactly on the boundary the next one is an hour away.
        let now = at(8, 0, 0);
        assert_eq!(next_hour_boundary(&now), at(9, 0, 0).timestamp());
    }

    #[test]
    fn test_boundary_with_half_hour_offset() {
        let tz = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let now = tz.with_ymd_and_hms(2024, 1, 1, 10, 15, 0).unwrap();
        let expected = tz.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();
        assert_eq!(next_hour_boundary(&now), expected.timestamp());
    }

    #[test]
    fn test_create_log_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        create_log_dir(&dir).unwrap();
        create_log_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_identity_changes_when_replaced() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("00.log");
        let first = open_append(&path).unwrap();
        let id = FileIdentity::of(&first.metadata().unwrap());
        assert_eq!(FileIdentity::of_path(&path).unwrap(), id);

        fs::remove_file(&path).unwrap();
        assert!(FileIdentity::of_path(&path).is_err());

        let _second = open_append(&path).unwrap();
        assert_ne!(FileIdentity::of_path(&path).unwrap(), id);
    }
}
