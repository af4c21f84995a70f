//! The single serialization point for log lines

use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::Ordering;

use crate::logger::Shared;
use crate::paths::create_log_dir;
use crate::state::{ActiveFile, FileState};

enum OutputError {
    Reopen(io::Error),
    Write(io::Error),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Reopen(e) => write!(f, "logging rotate file failed, {}", e),
            OutputError::Write(e) => write!(f, "logging write failed, {}", e),
        }
    }
}

impl FileState {
    /// Reopen the target if the handle was dropped, recreating its directory
    fn ensure_open(&mut self) -> io::Result<&mut ActiveFile> {
        let active = match self.active.take() {
            Some(active) => active,
            None => {
                create_log_dir(&self.path.dir)?;
                ActiveFile::open(&self.path.full)?
            }
        };
        Ok(self.active.insert(active))
    }

    fn write_line(&mut self, data: &[u8]) -> Result<(), OutputError> {
        let active = self.ensure_open().map_err(OutputError::Reopen)?;
        if let Err(e) = active.file.write_all(data) {
            self.active = None;
            return Err(OutputError::Write(e));
        }
        Ok(())
    }
}

impl Shared {
    /// Write one finished line, rotating or reopening first if needed
    ///
    /// Failures never reach the caller; they are reported on the console
    /// together with the line.
    pub(crate) fn output(&self, now: &DateTime<FixedOffset>, data: &[u8]) {
        let mut file = self.state.file.lock();
        file.rotate_if_due(&self.state.base_dir, now);

        if let Err(e) = file.write_line(data) {
            self.console.report(format_args!("{}", e), data);
            return;
        }

        if self.state.mirror_stdout.load(Ordering::Relaxed) {
            self.console.mirror(data);
        }
    }
}
