//! Non-blocking logging for the streaming loop.
//!
//! ```text
//! tone loop             LogStream             drain
//! ─────────             ─────────             ─────
//! tone_info!() ───────▶ [L0][L1][L2] ───────▶ console
//! no alloc              fixed ring            after write returns
//! ```
//!
//! Messages are formatted into a fixed buffer at the call site and queued.
//! The loop drains the ring between sink writes. When the ring is full new
//! messages are dropped and counted; the sink is never delayed by logging.

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Default ring size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 32;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: i64,
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Fixed-size log ring owned by the loop.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: [LogEntry; N],
    head: usize,
    len: usize,
    dropped: u32,
    max_level: LogLevel,
}

impl<const N: usize> LogStream<N> {
    /// Create a new empty log stream passing everything up to `Info`.
    pub const fn new() -> Self {
        Self::with_level(LogLevel::Info)
    }

    /// Create a new empty log stream passing levels up to `max_level`.
    pub const fn with_level(max_level: LogLevel) -> Self {
        assert!(N > 0, "Log buffer size must be non-zero");

        Self {
            entries: [LogEntry::EMPTY; N],
            head: 0,
            len: 0,
            dropped: 0,
            max_level,
        }
    }

    /// Whether `level` passes the filter.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.max_level
    }

    /// Queue a message. Never blocks.
    ///
    /// Returns `true` if queued, `false` if filtered or dropped (ring full).
    pub fn push(&mut self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        if !self.enabled(level) {
            return false;
        }
        if self.len == N {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }

        let entry = &mut self.entries[(self.head + self.len) % N];
        let len = msg.len().min(MAX_MSG_LEN);
        entry.timestamp_us = timestamp_us;
        entry.level = level;
        entry.len = len as u8;
        entry.msg[..len].copy_from_slice(&msg[..len]);

        self.len += 1;
        true
    }

    /// Take the oldest entry.
    pub fn drain(&mut self) -> Option<LogEntry> {
        if self.len == 0 {
            return None;
        }

        let entry = self.entries[self.head];
        self.head = (self.head + 1) % N;
        self.len -= 1;
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&mut self) {
        self.dropped = 0;
    }

    /// Get number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> usize {
        self.len
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Format a message into a buffer, truncating at its end.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Format an entry for console output.
///
/// Format: `[timestamp_us] LEVEL: message` (no newline)
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!(
            "[{:10}] {}: {}",
            entry.timestamp_us,
            entry.level.as_str(),
            entry.text()
        ),
    )
}

/// Queue a formatted message.
///
/// # Example
///
/// ```ignore
/// tone_log!(LogLevel::Info, log, now_us, "Volume: {}", amplitude);
/// ```
#[macro_export]
macro_rules! tone_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let level = $level;
        if $stream.enabled(level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $stream.push($timestamp, level, &buf[..len]);
        }
    }};
}

/// Queue an info message.
#[macro_export]
macro_rules! tone_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::tone_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Queue a warning.
#[macro_export]
macro_rules! tone_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::tone_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Queue an error.
#[macro_export]
macro_rules! tone_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::tone_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Queue a debug message.
#[macro_export]
macro_rules! tone_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::tone_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}
