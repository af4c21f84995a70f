//! Logger handle and the emit API

use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::buffer::{Buffer, BufferPool};
use crate::caller::{CallSite, CallerResolver, FRAME_OFFSET};
use crate::clock::Clock;
use crate::console::Console;
use crate::config::{LogConfig, LogOption, Settings};
use crate::errors::{Result, XlogError};
use crate::header::format_header;
use crate::rotation::{self, TickOutcome};
use crate::severity::Severity;
use crate::state::LoggerState;

pub(crate) struct Shared {
    pub(crate) state: LoggerState,
    pub(crate) pool: BufferPool,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) resolver: Arc<dyn CallerResolver>,
    pub(crate) console: Console,
    pub(crate) pid: u32,
}

/// Handle to an hourly-rotating file logger
///
/// Cloning is cheap; all clones write through the same file state. The
/// rotation thread lives as long as at least one handle does.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("base_dir", &self.shared.state.base_dir)
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Open `<dir>/<YYYYMMDD>/<HH>.log` and start the rotation thread
    ///
    /// `level` is matched case-insensitively; an unknown name leaves the
    /// threshold at DEBUG.
    ///
    /// # Errors
    ///
    /// Fails if the dated directory cannot be created, the file cannot be
    /// opened, or the rotation thread cannot be spawned.
    pub fn init(
        dir: impl AsRef<Path>,
        level: &str,
        opts: impl IntoIterator<Item = LogOption>,
    ) -> Result<Self> {
        let settings = Settings::from_options(opts);
        let now = settings.clock.now();
        let state = LoggerState::open(dir.as_ref(), &now)?;
        state.threshold.store_name(level);

        let shared = Arc::new(Shared::new(state, settings));
        rotation::spawn(Arc::downgrade(&shared)).map_err(XlogError::Spawn)?;
        Ok(Self { shared })
    }

    /// # Errors
    ///
    /// Same as [`Logger::init`].
    pub fn from_config(config: &LogConfig) -> Result<Self> {
        Self::init(&config.dir, &config.level, config.options())
    }

    pub fn level(&self) -> Severity {
        self.shared.state.threshold.load()
    }

    pub fn level_name(&self) -> &'static str {
        self.level().as_str()
    }

    /// Change the threshold by name; unknown names are ignored
    pub fn set_level(&self, name: &str) {
        self.shared.state.threshold.store_name(name);
    }

    pub fn set_stdout(&self, mirror: bool) {
        self.shared
            .state
            .mirror_stdout
            .store(mirror, Ordering::Relaxed);
    }

    pub fn stdout(&self) -> bool {
        self.shared.state.mirror_stdout.load(Ordering::Relaxed)
    }

    pub fn set_caller_skip(&self, skip: usize) {
        self.shared.state.caller_skip.store(skip, Ordering::Relaxed);
    }

    pub fn caller_skip(&self) -> usize {
        self.shared.state.caller_skip.load(Ordering::Relaxed)
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level()
    }

    pub fn base_dir(&self) -> &Path {
        &self.shared.state.base_dir
    }

    /// Path lines are currently routed to
    pub fn current_path(&self) -> PathBuf {
        self.shared.state.file.lock().path.full.clone()
    }

    /// Epoch seconds of the next scheduled rotation
    pub fn rotate_deadline(&self) -> i64 {
        self.shared.state.file.lock().rotate_deadline
    }

    pub fn is_file_open(&self) -> bool {
        self.shared.state.file.lock().active.is_some()
    }

    /// Run one rotation check, as the background thread does every second
    pub fn tick(&self) -> TickOutcome {
        self.shared.tick()
    }

    #[track_caller]
    pub fn emit(&self, severity: Severity, message: &str) {
        if !self.enabled(severity) {
            return;
        }
        let site = self.resolve(Location::caller());
        self.shared.write(severity, &site, |buf| {
            buf.bytes.extend_from_slice(message.as_bytes());
        });
    }

    #[track_caller]
    pub fn emit_fmt(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if !self.enabled(severity) {
            return;
        }
        let site = self.resolve(Location::caller());
        self.shared.write(severity, &site, |buf| {
            buf.write_args(args);
        });
    }

    /// Emit with an already known call site
    pub fn emit_at(&self, severity: Severity, site: CallSite, args: fmt::Arguments<'_>) {
        if !self.enabled(severity) {
            return;
        }
        self.shared.write(severity, &site, |buf| {
            buf.write_args(args);
        });
    }

    fn resolve(&self, tracked: &'static Location<'static>) -> CallSite {
        let skip = self.caller_skip() + FRAME_OFFSET;
        self.shared
            .resolver
            .resolve(skip, tracked)
            .unwrap_or_else(CallSite::unknown)
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.emit(Severity::Debug, message);
    }

    #[track_caller]
    pub fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(Severity::Debug, args);
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    #[track_caller]
    pub fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(Severity::Info, args);
    }

    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.emit(Severity::Warn, message);
    }

    #[track_caller]
    pub fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(Severity::Warn, args);
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }

    #[track_caller]
    pub fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(Severity::Error, args);
    }

    /// Logs at FATAL; does not terminate the process
    #[track_caller]
    pub fn fatal(&self, message: &str) {
        self.emit(Severity::Fatal, message);
    }

    #[track_caller]
    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(Severity::Fatal, args);
    }
}

impl Shared {
    pub(crate) fn new(state: LoggerState, settings: Settings) -> Self {
        state.mirror_stdout.store(settings.stdout, Ordering::Relaxed);
        state.caller_skip.store(settings.caller_skip, Ordering::Relaxed);
        Self {
            state,
            pool: BufferPool::new(),
            clock: settings.clock,
            resolver: settings.resolver,
            console: settings.console,
            pid: std::process::id(),
        }
    }

    /// Format header + body into a pooled buffer and hand it to output
    fn write(&self, severity: Severity, site: &CallSite, body: impl FnOnce(&mut Buffer)) {
        let mut buf = self.pool.acquire();
        let now = self.clock.now();
        format_header(&mut buf, &now, severity, self.pid, site);
        body(&mut *buf);
        buf.terminate_line();
        self.output(&now, buf.as_bytes());
    }
}
