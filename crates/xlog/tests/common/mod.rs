use chrono::{DateTime, FixedOffset, TimeZone};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use xlog::{Console, LogOption, Logger, ManualClock};

/// Fixed zone used by all test clocks
#[allow(dead_code)]
pub fn zone() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

#[allow(dead_code)]
pub fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
    zone().with_ymd_and_hms(2024, 6, 15, h, m, s).unwrap()
}

/// Logger in a fresh temp dir, driven by a manual clock starting at `start`
#[allow(dead_code)]
pub fn manual_logger(level: &str, start: DateTime<FixedOffset>) -> (Logger, Arc<ManualClock>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp log directory");
    let clock = Arc::new(ManualClock::new(start));
    let logger = Logger::init(dir.path(), level, [LogOption::Clock(clock.clone())])
        .expect("Failed to init logger");
    (logger, clock, dir)
}

#[allow(dead_code)]
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

/// Message column of every line in `content`
#[allow(dead_code)]
pub fn messages(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| l.rsplit('\t').next().unwrap_or_default().to_string())
        .collect()
}

/// Console writer that keeps everything in memory
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl Capture {
    pub fn console(&self) -> Console {
        Console::new(self.clone())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
