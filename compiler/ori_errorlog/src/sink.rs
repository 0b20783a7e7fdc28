//! Line-oriented output for echoed diagnostics and violation dumps.
//!
//! The sink is the only resource shared between execution contexts. Each
//! `write_line` call must be atomic with respect to other lines; no ordering
//! between contexts is promised.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Append-only text output.
pub trait DiagnosticSink: Send + Sync {
    /// Write one line. Implementations add the line terminator.
    fn write_line(&self, line: &str);
}

/// Writes to standard error, one locked write per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn write_line(&self, line: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{line}");
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Remove and return every line written so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl DiagnosticSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_owned());
    }
}

/// Cheaply clonable handle to a sink shared by many contexts.
#[derive(Clone)]
pub struct SharedSink(Arc<dyn DiagnosticSink>);

impl SharedSink {
    pub fn new<S: DiagnosticSink + 'static>(sink: S) -> Self {
        SharedSink(Arc::new(sink))
    }

    /// Share an existing sink, keeping the caller's handle usable.
    pub fn from_arc<S: DiagnosticSink + 'static>(sink: Arc<S>) -> Self {
        SharedSink(sink)
    }

    pub fn stderr() -> Self {
        Self::new(StderrSink)
    }

    pub fn write_line(&self, line: &str) {
        self.0.write_line(line);
    }
}

impl Default for SharedSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for SharedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSink(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_sink_records_lines_in_order() {
        let sink = MemorySink::new();
        sink.write_line("first");
        sink.write_line("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn shared_handle_writes_through() {
        let memory = Arc::new(MemorySink::new());
        let shared = SharedSink::from_arc(Arc::clone(&memory));
        let clone = shared.clone();
        shared.write_line("a");
        clone.write_line("b");
        assert_eq!(memory.lines(), vec!["a", "b"]);
    }

    #[test]
    fn concurrent_writers_keep_lines_whole() {
        let memory = Arc::new(MemorySink::new());
        let shared = SharedSink::from_arc(Arc::clone(&memory));
        std::thread::scope(|scope| {
            for worker in 0..4 {
                let sink = shared.clone();
                scope.spawn(move || {
                    for i in 0..50 {
                        sink.write_line(&format!("worker {worker} line {i}"));
                    }
                });
            }
        });
        let lines = memory.lines();
        assert_eq!(lines.len(), 200);
        assert!(lines.iter().all(|l| l.starts_with("worker ")));
    }
}
