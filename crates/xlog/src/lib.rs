//! xlog - leveled file logging with hourly rotation
//!
//! Lines go to `<dir>/<YYYYMMDD>/<HH>.log`, one file per local hour. The
//! crate provides:
//! - Threshold filtering before any formatting work
//! - An allocation-free header (`timestamp  LEVEL  pid  file:line  func`)
//!   rendered into pooled buffers
//! - A once-a-second rotation thread that moves to the next hourly file and
//!   drops handles whose file was deleted or replaced underneath it
//! - Lazy reopen on the next write, recreating the directory if needed
//! - Call sites resolved from the live stack, honoring a caller skip for
//!   wrapper functions
//!
//! # Usage
//!
//! ```no_run
//! use xlog::{log_error, Logger};
//!
//! let logger = Logger::init("./logs", "warn", []).unwrap();
//! logger.info("filtered out");
//! log_error!(logger, "request {} failed", 42);
//! ```
//!
//! A process-wide instance is available through [`init`] and the free
//! functions ([`info`], [`error`], ...).

pub mod buffer;
pub mod caller;
pub mod clock;
pub mod config;
pub mod console;
pub mod errors;
mod global;
pub mod header;
mod logger;
mod macros;
mod output;
pub mod paths;
mod rotation;
pub mod severity;
mod state;

pub use buffer::{Buffer, BufferPool, PooledBuffer};
pub use caller::{BacktraceCaller, CallSite, CallerResolver, TrackedCaller, FRAME_OFFSET};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LogConfig, LogOption};
pub use console::Console;
pub use errors::{ErrorKind, Result, XlogError};
pub use global::{
    debug, debug_fmt, emit, emit_fmt, error, error_fmt, fatal, fatal_fmt, global, info, info_fmt,
    init, init_from_config, level_name, set_caller_skip, set_early_console, set_level, set_stdout,
    warn, warn_fmt,
};
pub use logger::Logger;
pub use rotation::TickOutcome;
pub use severity::Severity;
