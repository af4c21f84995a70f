//! Process-wide logger
//!
//! Code that cannot thread a [`Logger`] through uses these free functions.
//! Lines emitted before [`init`] are written to the console behind a
//! warning, filtered by a threshold that [`set_level`] already controls.

use parking_lot::{const_mutex, Mutex};
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::OnceLock;

use crate::buffer::{Buffer, BufferPool};
use crate::caller::{BacktraceCaller, CallSite, CallerResolver, FRAME_OFFSET};
use crate::clock::{Clock, SystemClock};
use crate::config::{LogConfig, LogOption};
use crate::console::Console;
use crate::errors::Result;
use crate::header::format_header;
use crate::logger::Logger;
use crate::severity::{AtomicSeverity, Severity};

static GLOBAL: OnceLock<Logger> = OnceLock::new();
static INIT_LOCK: Mutex<()> = const_mutex(());
static EARLY_POOL: OnceLock<BufferPool> = OnceLock::new();
static EARLY_LEVEL: AtomicSeverity = AtomicSeverity::new(Severity::Debug);
static EARLY_CONSOLE: Mutex<Option<Console>> = const_mutex(None);

/// Initialize the process-wide logger
///
/// Only the first successful call opens a file and starts a rotation
/// thread; later calls return the existing logger unchanged.
///
/// # Errors
///
/// Same as [`Logger::init`].
pub fn init(
    dir: impl AsRef<Path>,
    level: &str,
    opts: impl IntoIterator<Item = LogOption>,
) -> Result<&'static Logger> {
    if let Some(logger) = GLOBAL.get() {
        return Ok(logger);
    }
    let _guard = INIT_LOCK.lock();
    if let Some(logger) = GLOBAL.get() {
        return Ok(logger);
    }
    let logger = Logger::init(dir, level, opts)?;
    Ok(GLOBAL.get_or_init(|| logger))
}

/// # Errors
///
/// Same as [`Logger::init`].
pub fn init_from_config(config: &LogConfig) -> Result<&'static Logger> {
    init(&config.dir, &config.level, config.options())
}

pub fn global() -> Option<&'static Logger> {
    GLOBAL.get()
}

/// Change the threshold; before init this filters the early fallback
pub fn set_level(name: &str) {
    match GLOBAL.get() {
        Some(logger) => logger.set_level(name),
        None => {
            EARLY_LEVEL.store_name(name);
        }
    }
}

/// Current threshold name; DEBUG until set
pub fn level_name() -> &'static str {
    GLOBAL
        .get()
        .map_or_else(|| EARLY_LEVEL.load().as_str(), Logger::level_name)
}

/// Replace the console used for lines emitted before init
pub fn set_early_console(console: Console) {
    *EARLY_CONSOLE.lock() = Some(console);
}

pub fn set_caller_skip(skip: usize) {
    if let Some(logger) = GLOBAL.get() {
        logger.set_caller_skip(skip);
    }
}

pub fn set_stdout(mirror: bool) {
    if let Some(logger) = GLOBAL.get() {
        logger.set_stdout(mirror);
    }
}

#[track_caller]
pub fn emit(severity: Severity, message: &str) {
    match GLOBAL.get() {
        Some(logger) => logger.emit(severity, message),
        None => early(severity, Location::caller(), |buf| {
            buf.bytes.extend_from_slice(message.as_bytes());
        }),
    }
}

#[track_caller]
pub fn emit_fmt(severity: Severity, args: fmt::Arguments<'_>) {
    match GLOBAL.get() {
        Some(logger) => logger.emit_fmt(severity, args),
        None => early(severity, Location::caller(), |buf| {
            buf.write_args(args);
        }),
    }
}

fn early(severity: Severity, location: &'static Location<'static>, body: impl FnOnce(&mut Buffer)) {
    if severity < EARLY_LEVEL.load() {
        return;
    }
    let site = BacktraceCaller
        .resolve(FRAME_OFFSET, location)
        .unwrap_or_else(|| CallSite::from_location(location));
    let pool = EARLY_POOL.get_or_init(BufferPool::new);
    let mut buf = pool.acquire();
    let now = SystemClock.now();
    format_header(&mut buf, &now, severity, std::process::id(), &site);
    body(&mut *buf);
    buf.terminate_line();

    let console = EARLY_CONSOLE.lock().clone().unwrap_or_default();
    console.report(format_args!("logging before xlog::init"), buf.as_bytes());
}

#[track_caller]
pub fn debug(message: &str) {
    emit(Severity::Debug, message);
}

#[track_caller]
pub fn debug_fmt(args: fmt::Arguments<'_>) {
    emit_fmt(Severity::Debug, args);
}

#[track_caller]
pub fn info(message: &str) {
    emit(Severity::Info, message);
}

#[track_caller]
pub fn info_fmt(args: fmt::Arguments<'_>) {
    emit_fmt(Severity::Info, args);
}

#[track_caller]
pub fn warn(message: &str) {
    emit(Severity::Warn, message);
}

#[track_caller]
pub fn warn_fmt(args: fmt::Arguments<'_>) {
    emit_fmt(Severity::Warn, args);
}

#[track_caller]
pub fn error(message: &str) {
    emit(Severity::Error, message);
}

#[track_caller]
pub fn error_fmt(args: fmt::Arguments<'_>) {
    emit_fmt(Severity::Error, args);
}

#[track_caller]
pub fn fatal(message: &str) {
    emit(Severity::Fatal, message);
}

#[track_caller]
pub fn fatal_fmt(args: fmt::Arguments<'_>) {
    emit_fmt(Severity::Fatal, args);
}
