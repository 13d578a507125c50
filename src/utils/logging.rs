use crate::utils::dual_logging::DualLogger;
use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A log entry with timestamp and message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for display in the log panel and the log file
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.lock();
        entries.iter().rev().take(count).rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a compact fmt line ("LEVEL target: message") into its parts
fn parse_compact_line(message: &str) -> (Level, &str, &str) {
    let (level, rest) = if let Some(rest) = message.strip_prefix("TRACE ") {
        (Level::TRACE, rest)
    } else if let Some(rest) = message.strip_prefix("DEBUG ") {
        (Level::DEBUG, rest)
    } else if let Some(rest) = message.strip_prefix("INFO ") {
        (Level::INFO, rest)
    } else if let Some(rest) = message.strip_prefix("WARN ") {
        (Level::WARN, rest)
    } else if let Some(rest) = message.strip_prefix("ERROR ") {
        (Level::ERROR, rest)
    } else {
        return (Level::INFO, "general", message);
    };

    let rest = rest.trim_start();
    match rest.find(':') {
        // A target never contains spaces
        Some(colon) if !rest[..colon].contains(' ') => {
            (level, &rest[..colon], rest[colon + 1..].trim())
        }
        _ => (level, "general", rest),
    }
}

/// Writer that tees every formatted line into the ring buffer and, when
/// available, the log file
#[derive(Clone)]
pub struct DualWriter {
    buffer: LogRingBuffer,
    dual_logger: Option<&'static DualLogger>,
}

impl DualWriter {
    pub fn new(buffer: LogRingBuffer, dual_logger: Option<&'static DualLogger>) -> Self {
        Self {
            buffer,
            dual_logger,
        }
    }
}

impl std::io::Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(message) = std::str::from_utf8(buf) {
            let message = message.trim();
            if !message.is_empty() {
                let (level, target, msg) = parse_compact_line(message);
                let entry = LogEntry::new(level, target, msg.to_string());
                if let Some(logger) = self.dual_logger {
                    logger.write_entry(&entry);
                }
                self.buffer.push(entry);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(logger) = self.dual_logger {
            logger.flush();
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for DualWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Global log buffer shown by the log panel
static LOG_BUFFER: OnceLock<LogRingBuffer> = OnceLock::new();

/// Initialize tracing with dual logging (ring buffer + file)
pub fn init_tracing_with_dual_logging() -> LogRingBuffer {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let dual_logger = crate::utils::dual_logging::init_dual_logger();
    let buffer = LOG_BUFFER.get_or_init(LogRingBuffer::new).clone();

    let fmt_layer = fmt::layer()
        .with_writer(DualWriter::new(buffer.clone(), dual_logger))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // LogEntry carries its own timestamp
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // A second init (tests, re-entry) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();

    tracing::info!(target: "system", "Logging system initialized");
    buffer
}

#[macro_export]
macro_rules! trace_key {
    ($key:expr) => {
        tracing::trace!(target: "input", "Key: {:?}", $key);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_ring_buffer_caps_entries() {
        let buffer = LogRingBuffer::with_capacity(3);
        for i in 0..5 {
            buffer.push(LogEntry::new(Level::INFO, "test", format!("m{i}")));
        }
        let recent: Vec<_> = buffer.get_recent(10).into_iter().map(|e| e.message).collect();
        assert_eq!(recent, vec!["m2", "m3", "m4"]);
        assert_eq!(buffer.get_recent(1)[0].message, "m4");
    }

    #[test]
    fn test_parse_compact_line() {
        assert_eq!(
            parse_compact_line("DEBUG search: Dispatching search #3"),
            (Level::DEBUG, "search", "Dispatching search #3")
        );
        assert_eq!(
            parse_compact_line("WARN something odd: here"),
            (Level::WARN, "general", "something odd: here")
        );
        assert_eq!(
            parse_compact_line("plain text"),
            (Level::INFO, "general", "plain text")
        );
    }

    #[test]
    fn test_writer_fills_buffer() {
        let buffer = LogRingBuffer::new();
        let mut writer = DualWriter::new(buffer.clone(), None);
        writer.write_all(b"ERROR api: POST failed\n").unwrap();
        writer.write_all(b"   \n").unwrap();

        let entries = buffer.get_recent(10);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, "ERROR");
        assert_eq!(entries[0].target, "api");
        assert_eq!(entries[0].message, "POST failed");
    }
}
