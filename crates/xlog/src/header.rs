//! Line header rendering
//!
//! Layout: `YYYY-MM-DD hh:mm:ss.uuuuuu +hhmm\tLEVEL\tPID\tfile:line\tfunc\t`.
//! Digits are written straight into the buffer's scratch array; nothing
//! here allocates beyond growing the line buffer itself.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use crate::buffer::{Buffer, SCRATCH_LEN};
use crate::caller::{short_file, short_function, CallSite};
use crate::severity::Severity;

const DIGITS: &[u8; 10] = b"0123456789";

impl Buffer {
    fn two_digits(&mut self, i: usize, d: u32) {
        self.tmp[i + 1] = DIGITS[(d % 10) as usize];
        self.tmp[i] = DIGITS[(d / 10 % 10) as usize];
    }

    /// Right-aligned `n`-digit field at `i`, left-padded with `pad`
    fn n_digits(&mut self, n: usize, i: usize, mut d: u32, pad: u8) {
        let mut j = n;
        while j > 0 && d > 0 {
            j -= 1;
            self.tmp[i + j] = DIGITS[(d % 10) as usize];
            d /= 10;
        }
        while j > 0 {
            j -= 1;
            self.tmp[i + j] = pad;
        }
    }

    /// Variable-width field at `i`, built at the scratch tail then copied
    /// forward. Returns the digit count.
    fn some_digits(&mut self, i: usize, mut d: u64) -> usize {
        let mut j = SCRATCH_LEN;
        loop {
            j -= 1;
            self.tmp[j] = DIGITS[(d % 10) as usize];
            d /= 10;
            if d == 0 {
                break;
            }
        }
        self.tmp.copy_within(j.., i);
        SCRATCH_LEN - j
    }

    fn put_scratch(&mut self, len: usize) {
        self.bytes.extend_from_slice(&self.tmp[..len]);
    }
}

/// Render the header for one line into `buf`
pub fn format_header(
    buf: &mut Buffer,
    now: &DateTime<FixedOffset>,
    severity: Severity,
    pid: u32,
    site: &CallSite,
) {
    buf.n_digits(4, 0, now.year().max(0) as u32, b'0');
    buf.tmp[4] = b'-';
    buf.two_digits(5, now.month());
    buf.tmp[7] = b'-';
    buf.two_digits(8, now.day());
    buf.tmp[10] = b' ';
    buf.two_digits(11, now.hour());
    buf.tmp[13] = b':';
    buf.two_digits(14, now.minute());
    buf.tmp[16] = b':';
    buf.two_digits(17, now.second());
    buf.tmp[19] = b'.';
    // Leap seconds report nanoseconds past 1e9.
    buf.n_digits(6, 20, now.nanosecond() / 1000 % 1_000_000, b'0');
    buf.tmp[26] = b' ';

    let zone = now.offset().local_minus_utc() / 60;
    buf.tmp[27] = if zone < 0 { b'-' } else { b'+' };
    let zone = zone.unsigned_abs();
    buf.two_digits(28, zone / 60);
    buf.two_digits(30, zone % 60);
    buf.tmp[32] = b'\t';

    let level = severity.as_str().as_bytes();
    let mut n = 33;
    buf.tmp[n..n + level.len()].copy_from_slice(level);
    n += level.len();
    buf.tmp[n] = b'\t';
    n += 1;
    n += buf.some_digits(n, u64::from(pid));
    buf.tmp[n] = b'\t';
    buf.put_scratch(n + 1);

    buf.bytes.extend_from_slice(short_file(&site.file).as_bytes());
    buf.tmp[0] = b':';
    let n = 1 + buf.some_digits(1, u64::from(site.line));
    buf.tmp[n] = b'\t';
    buf.put_scratch(n + 1);

    buf.bytes.extend_from_slice(short_function(&site.function).as_bytes());
    buf.bytes.push(b'\t');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferPool;
    use chrono::{NaiveDate, TimeZone};
    use proptest::prelude::*;

    fn at(offset_secs: i32, micros: u32) -> DateTime<FixedOffset> {
        let tz = FixedOffset::east_opt(offset_secs).unwrap();
        let naive = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_micro_opt(3, 4, 5, micros)
            .unwrap();
        tz.from_local_datetime(&naive).unwrap()
    }

    fn render(now: &DateTime<FixedOffset>, severity: Severity, pid: u32, site: CallSite) -> String {
        let pool = BufferPool::new();
        let mut buf = pool.acquire();
        format_header(&mut buf, now, severity, pid, &site);
        String::from_utf8(buf.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let site = CallSite::new("src/net/conn.rs", 42, "app::net::conn::read::__xlog_here");
        let out = render(&at(8 * 3600, 678), Severity::Info, 4321, site);
        assert_eq!(
            out,
            "2024-01-02 03:04:05.000678 +0800\tINFO\t4321\tconn.rs:42\tconn::read\t"
        );
    }

    #[test]
    fn test_negative_offset() {
        let out = render(
            &at(-(5 * 3600 + 30 * 60), 0),
            Severity::Error,
            7,
            CallSite::unknown(),
        );
        assert_eq!(
            out,
            "2024-01-02 03:04:05.000000 -0530\tERROR\t7\t???:1\tmain\t"
        );
    }

    #[test]
    fn test_zero_values_render_as_zero() {
        let site = CallSite::new("a.rs", 0, "f");
        let out = render(&at(0, 999_999), Severity::Warn, 0, site);
        assert_eq!(out, "2024-01-02 03:04:05.999999 +0000\tWARN\t0\ta.rs:0\tf\t");
    }

    #[test]
    fn test_max_width_fields() {
        let site = CallSite::new("a.rs", u32::MAX, "f");
        let out = render(&at(0, 1), Severity::Fatal, u32::MAX, site);
        assert_eq!(
            out,
            "2024-01-02 03:04:05.000001 +0000\tFATAL\t4294967295\ta.rs:4294967295\tf\t"
        );
    }

    #[test]
    fn test_no_reallocation_for_header() {
        let pool = BufferPool::new();
        let mut buf = pool.acquire();
        let cap = buf.bytes.capacity();
        format_header(&mut buf, &at(0, 1), Severity::Debug, 1, &CallSite::unknown());
        assert_eq!(buf.bytes.capacity(), cap);
    }

    proptest! {
        #[test]
        fn prop_timestamp_matches_chrono(
            year in 1000i32..=9999,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
            micros in 0u32..1_000_000,
            offset_min in -720i32..=840,
        ) {
            let tz = FixedOffset::east_opt(offset_min * 60).unwrap();
            let naive = NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_micro_opt(hour, minute, second, micros)
                .unwrap();
            let now = tz.from_local_datetime(&naive).unwrap();

            let out = render(&now, Severity::Debug, 1, CallSite::unknown());
            let expected = now.format("%Y-%m-%d %H:%M:%S%.6f %z").to_string();
            prop_assert!(out.starts_with(&expected), "{} vs {}", out, expected);
            prop_assert_eq!(out.as_bytes()[32], b'\t');
        }

        #[test]
        fn prop_pid_and_line_digits(pid in any::<u32>(), line in any::<u32>()) {
            let site = CallSite::new("x.rs", line, "f");
            let out = render(&at(0, 0), Severity::Info, pid, site);
            let fields: Vec<&str> = out.split('\t').collect();
            prop_assert_eq!(fields[2], pid.to_string());
            prop_assert_eq!(fields[3], format!("x.rs:{}", line));
        }
    }
}
