//! Logging macros
//!
//! Each macro takes a logger expression followed by `format!`-style
//! arguments. The call site is captured where the macro expands, and the
//! arguments are only formatted when the severity passes the threshold.

/// Log at an explicit severity
///
/// # Example
///
/// ```no_run
/// # use xlog::{log_at, Logger, Severity};
/// # let logger = Logger::init("./logs", "info", []).unwrap();
/// log_at!(logger, Severity::Warn, "disk {}% full", 91);
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let severity: $crate::Severity = $severity;
        if logger.enabled(severity) {
            logger.emit_at(severity, $crate::call_site!(), ::std::format_args!($($arg)+));
        }
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log at FATAL; does not terminate the process
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Fatal, $($arg)+)
    };
}
