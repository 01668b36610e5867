use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log entries kept in memory.
const MAX_LOG_ENTRIES: usize = 1000;

/// A captured log event, ready for the `logs` command.
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

    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Bounded, thread-safe ring of recent log entries. Tracing output cannot
/// go to stdout without tearing the prompt, so it lands here and the
/// `logs` command reads it back.
#[derive(Clone)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap();
        entries.iter().rev().take(count).rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap();
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.clear();
    }
}

impl Default for LogRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Writer handed to the fmt layer; every formatted line becomes a ring
/// buffer entry.
#[derive(Clone)]
pub struct RingBufferWriter {
    buffer: LogRingBuffer,
}

impl RingBufferWriter {
    pub fn new(buffer: LogRingBuffer) -> Self {
        Self { buffer }
    }
}

impl std::io::Write for RingBufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = std::str::from_utf8(buf) {
            let text = text.trim();
            if !text.is_empty() {
                self.buffer.push(parse_compact_line(text));
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RingBufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// The compact fmt layer emits "LEVEL target: message"; anything that does
// not look like that is stored whole.
fn parse_compact_line(line: &str) -> LogEntry {
    let levels = [
        (Level::TRACE, "TRACE "),
        (Level::DEBUG, "DEBUG "),
        (Level::INFO, "INFO "),
        (Level::WARN, "WARN "),
        (Level::ERROR, "ERROR "),
    ];
    for (level, prefix) in levels {
        if let Some(rest) = line.strip_prefix(prefix) {
            let (target, message) = match rest.split_once(':') {
                Some((target, message)) if !target.contains(' ') => (target, message.trim()),
                _ => ("general", rest),
            };
            return LogEntry::new(level, target, message.to_string());
        }
    }
    LogEntry::new(Level::INFO, "general", line.to_string())
}

/// Installs the tracing subscriber writing into a fresh ring buffer and
/// returns the buffer handle. Call once at startup.
pub fn init_tracing() -> LogRingBuffer {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = LogRingBuffer::new();
    let writer = RingBufferWriter::new(buffer.clone());

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // entries carry their own timestamps
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!(target: "system", "logging initialized");
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_drops_the_oldest_entries_past_capacity() {
        let buffer = LogRingBuffer::new();
        for i in 0..MAX_LOG_ENTRIES + 5 {
            buffer.push(LogEntry::new(Level::INFO, "test", format!("entry {i}")));
        }
        assert_eq!(buffer.len(), MAX_LOG_ENTRIES);

        let recent = buffer.get_recent(MAX_LOG_ENTRIES);
        assert_eq!(recent.first().unwrap().message, "entry 5");
        assert_eq!(
            recent.last().unwrap().message,
            format!("entry {}", MAX_LOG_ENTRIES + 4)
        );
    }

    #[test]
    fn compact_lines_split_into_level_target_and_message() {
        let entry = parse_compact_line("INFO lifecycle: submitting search");
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.target, "lifecycle");
        assert_eq!(entry.message, "submitting search");

        let entry = parse_compact_line("WARN render: edge cap 10000 reached");
        assert_eq!(entry.level, "WARN");
        assert_eq!(entry.target, "render");
    }

    #[test]
    fn unrecognized_lines_are_kept_whole() {
        let entry = parse_compact_line("something unformatted");
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.target, "general");
        assert_eq!(entry.message, "something unformatted");
    }
}
