//! Hourly rotation and stale-handle recovery
//!
//! A background thread calls [`Shared::tick`] once a second. Rotation only
//! drops the handle and renames the target; the next write reopens it.

use chrono::{DateTime, FixedOffset};
use std::io;
use std::path::Path;
use std::sync::Weak;
use std::thread;
use std::time::Duration;

use crate::logger::Shared;
use crate::paths::{FileIdentity, HourlyPath, ROTATE_INTERVAL_SECS};
use crate::state::FileState;

pub(crate) const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What one rotation check did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do
    Unchanged,
    /// The hour deadline passed; the handle was closed and the target moved on
    Rotated,
    /// The file on disk vanished or was replaced; the handle was closed
    Stale,
}

impl FileState {
    /// Close the handle and retarget at `now` once the deadline has passed
    ///
    /// The deadline moves by a fixed hour rather than being recomputed, so
    /// after a long stall it catches up one hour per call.
    pub(crate) fn rotate_if_due(&mut self, base_dir: &Path, now: &DateTime<FixedOffset>) -> bool {
        if now.timestamp() < self.rotate_deadline {
            return false;
        }
        self.active = None;
        self.path = HourlyPath::at(base_dir, now);
        self.rotate_deadline += ROTATE_INTERVAL_SECS;
        true
    }

    /// Drop the handle if the path no longer names the file it points at
    pub(crate) fn release_if_stale(&mut self) -> io::Result<bool> {
        let Some(expected) = self.active.as_ref().map(|a| a.identity) else {
            return Ok(false);
        };
        match FileIdentity::of_path(&self.path.full) {
            Ok(identity) if identity == expected => Ok(false),
            Ok(_) => {
                self.active = None;
                Ok(true)
            }
            Err(e) => {
                self.active = None;
                if e.kind() == io::ErrorKind::NotFound {
                    Ok(true)
                } else {
                    Err(e)
                }
            }
        }
    }
}

impl Shared {
    pub(crate) fn tick(&self) -> TickOutcome {
        let now = self.clock.now();
        let mut file = self.state.file.lock();
        if file.rotate_if_due(&self.state.base_dir, &now) {
            return TickOutcome::Rotated;
        }
        match file.release_if_stale() {
            Ok(true) => TickOutcome::Stale,
            Ok(false) => TickOutcome::Unchanged,
            Err(e) => {
                self.console.report(
                    format_args!("logging stat {} failed, {}", file.path.full.display(), e),
                    &[],
                );
                TickOutcome::Stale
            }
        }
    }
}

/// Start the once-a-second rotation thread
///
/// The thread exits after the last logger handle is dropped.
pub(crate) fn spawn(shared: Weak<Shared>) -> io::Result<()> {
    thread::Builder::new()
        .name("xlog-rotation".to_string())
        .spawn(move || loop {
            thread::sleep(TICK_INTERVAL);
            match shared.upgrade() {
                Some(shared) => {
                    shared.tick();
                }
                None => break,
            }
        })?;
    Ok(())
}
