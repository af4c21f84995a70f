//! Log severities and the atomic threshold that filters them

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Ordered log severity
///
/// A line is emitted iff its severity is greater than or equal to the
/// logger's current threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Debug = 0,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// All severities, most verbose first
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Tag written into the line header
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Case-insensitive lookup by level name
    ///
    /// Accepts the five tags plus `warning` as an alias for WARN. Anything
    /// else yields `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("warning") {
            return Some(Severity::Warn);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Severity::Debug,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lock-free severity cell
#[derive(Debug)]
pub struct AtomicSeverity(AtomicU8);

impl AtomicSeverity {
    pub const fn new(severity: Severity) -> Self {
        Self(AtomicU8::new(severity as u8))
    }

    pub fn load(&self) -> Severity {
        Severity::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, severity: Severity) {
        self.0.store(severity as u8, Ordering::Relaxed);
    }

    /// Store the severity named by `name`; unknown names leave the value untouched
    ///
    /// Returns whether the name was recognized.
    pub fn store_name(&self, name: &str) -> bool {
        match Severity::from_name(name) {
            Some(severity) => {
                self.store(severity);
                true
            }
            None => false,
        }
    }
}

impl Default for AtomicSeverity {
    fn default() -> Self {
        Self::new(Severity::Debug)
    }
}
