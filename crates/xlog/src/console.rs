//! Console sink for mirrored lines and diagnostics
//!
//! Defaults to standard output. Tests and embedders can hand in any writer.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Shared destination for everything that does not go to the log file
#[derive(Clone)]
pub struct Console {
    sink: Arc<Mutex<dyn Write + Send>>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(writer)),
        }
    }

    /// `ERROR: <msg>` followed by the line that could not be written
    pub(crate) fn report(&self, msg: fmt::Arguments<'_>, payload: &[u8]) {
        let mut out = self.sink.lock();
        let _ = writeln!(out, "ERROR: {}", msg);
        let _ = out.write_all(payload);
        let _ = out.flush();
    }

    pub(crate) fn mirror(&self, data: &[u8]) {
        let mut out = self.sink.lock();
        let _ = out.write_all(data);
        let _ = out.flush();
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// In-memory console for unit tests
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl Capture {
    pub(crate) fn console(&self) -> Console {
        Console::new(self.clone())
    }

    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

#[cfg(test)]
impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
