//! Pooled line buffers
//!
//! Every emitted line is assembled in a [`Buffer`] borrowed from a
//! [`BufferPool`]. The pool is an unbounded lock-free queue: it grows on
//! demand and never frees, so steady-state logging does not allocate.

use crossbeam_queue::SegQueue;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Size of the digit scratch area used by the header formatter
pub const SCRATCH_LEN: usize = 64;

/// Appended when formatting a message fails part way
pub const FMT_ERROR_MARKER: &[u8] = b"<fmt error>";

/// A line under construction plus fixed scratch space for digit rendering
#[derive(Debug)]
pub struct Buffer {
    pub(crate) bytes: Vec<u8>,
    pub(crate) tmp: [u8; SCRATCH_LEN],
}

impl Buffer {
    fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(256),
            tmp: [0; SCRATCH_LEN],
        }
    }

    // Placeholder left behind in a dropped guard; does not allocate.
    fn detached() -> Self {
        Self {
            bytes: Vec::new(),
            tmp: [0; SCRATCH_LEN],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Append formatted arguments; a failing `Display` impl leaves what was
    /// written so far followed by [`FMT_ERROR_MARKER`]
    pub fn write_args(&mut self, args: fmt::Arguments<'_>) {
        if fmt::write(self, args).is_err() {
            self.bytes.extend_from_slice(FMT_ERROR_MARKER);
        }
    }

    /// Append `\n` unless the content already ends with one
    pub fn terminate_line(&mut self) {
        if self.bytes.last() != Some(&b'\n') {
            self.bytes.push(b'\n');
        }
    }

    fn reset(&mut self) {
        self.bytes.clear();
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.bytes.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl std::io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Lock-free pool of reusable buffers
#[derive(Debug, Default)]
pub struct BufferPool {
    free: SegQueue<Buffer>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow an empty buffer; it returns to the pool when the guard drops
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let mut buf = self.free.pop().unwrap_or_else(Buffer::new);
        buf.reset();
        PooledBuffer { pool: self, buf }
    }

    fn release(&self, buf: Buffer) {
        self.free.push(buf);
    }

    /// Number of idle buffers currently parked in the pool
    pub fn idle(&self) -> usize {
        self.free.len()
    }
}

/// Exclusive borrow of a pooled [`Buffer`]
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Buffer,
}

impl Deref for PooledBuffer<'_> {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Buffer {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        let buf = std::mem::replace(&mut self.buf, Buffer::detached());
        self.pool.release(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use std::thread;

    struct Faulty;

    impl fmt::Display for Faulty {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_write_args_marks_failed_format() {
        let pool = BufferPool::new();
        let mut buf = pool.acquire();
        buf.write_args(format_args!("id={} then {}", 7, Faulty));
        assert_eq!(buf.as_bytes(), b"id=7 then <fmt error>");

        buf.terminate_line();
        buf.write_args(format_args!("fine {}", 1));
        assert!(buf.as_bytes().ends_with(b"\nfine 1"));
    }

    #[test]
    fn test_acquire_after_release_is_clean() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.acquire();
            buf.write_all(b"left over from last time").unwrap();
        }
        assert_eq!(pool.idle(), 1);

        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_buffer_is_reused() {
        let pool = BufferPool::new();
        let cap = {
            let mut buf = pool.acquire();
            buf.write_all(&[b'x'; 1024]).unwrap();
            buf.bytes.capacity()
        };
        let buf = pool.acquire();
        assert!(buf.bytes.capacity() >= cap);
    }

    #[test]
    fn test_pool_grows_under_concurrent_borrow() {
        let pool = BufferPool::new();
        let a = pool.acquire();
        let b = pool.acquire();
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_terminate_line() {
        let pool = BufferPool::new();
        let mut buf = pool.acquire();
        buf.write_all(b"abc").unwrap();
        buf.terminate_line();
        buf.terminate_line();
        assert_eq!(buf.as_bytes(), b"abc\n");
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let pool = Arc::new(BufferPool::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for i in 0..200 {
                        let mut buf = pool.acquire();
                        assert!(buf.is_empty());
                        write!(buf, "{}-{}", t, i).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(pool.idle() >= 1);
        assert!(pool.idle() <= 8);
    }
}
