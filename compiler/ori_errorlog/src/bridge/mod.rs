//! Host bridge: flat rows and emitters for drained diagnostics.
//!
//! An embedding host receives drained messages as [`MessageRow`]s whose
//! field order is fixed: id, kind tag, severity tag, short text, file,
//! read-only flag, start line, start column, end line, end column.

mod json;

pub use json::JsonEmitter;

use std::fmt::{self, Write};

use crate::sink::SharedSink;
use crate::{DiagnosticMessage, Kind, Severity};

/// Kind tag in the host's vocabulary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KindTag {
    Syntax,
    Grammar,
    Translation,
    Symbolic,
    /// Host name for [`Kind::Runtime`].
    Simulation,
    Scripting,
}

impl KindTag {
    pub fn as_str(self) -> &'static str {
        match self {
            KindTag::Syntax => "SYNTAX",
            KindTag::Grammar => "GRAMMAR",
            KindTag::Translation => "TRANSLATION",
            KindTag::Symbolic => "SYMBOLIC",
            KindTag::Simulation => "SIMULATION",
            KindTag::Scripting => "SCRIPTING",
        }
    }
}

impl From<Kind> for KindTag {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Syntax => KindTag::Syntax,
            Kind::Grammar => KindTag::Grammar,
            Kind::Translation => KindTag::Translation,
            Kind::Symbolic => KindTag::Symbolic,
            Kind::Runtime => KindTag::Simulation,
            Kind::Scripting => KindTag::Scripting,
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tag in the host's vocabulary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeverityTag {
    Error,
    Warning,
    Notification,
}

impl SeverityTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityTag::Error => "ERROR",
            SeverityTag::Warning => "WARNING",
            SeverityTag::Notification => "NOTIFICATION",
        }
    }
}

impl From<Severity> for SeverityTag {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => SeverityTag::Error,
            Severity::Warning => SeverityTag::Warning,
            Severity::Notification => SeverityTag::Notification,
        }
    }
}

impl fmt::Display for SeverityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One drained diagnostic in host field order.
///
/// Messages without a location get an empty file, `read_only = false`,
/// and zero coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageRow {
    pub id: u32,
    pub kind: KindTag,
    pub severity: SeverityTag,
    pub message: String,
    pub file: String,
    pub read_only: bool,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl From<&DiagnosticMessage> for MessageRow {
    fn from(msg: &DiagnosticMessage) -> Self {
        let mut row = MessageRow {
            id: msg.id(),
            kind: msg.kind().into(),
            severity: msg.severity().into(),
            message: msg.short_text().to_owned(),
            file: String::new(),
            read_only: false,
            start_line: 0,
            start_col: 0,
            end_line: 0,
            end_col: 0,
        };
        if let Some(span) = msg.span() {
            row.file = span.file.display().to_string();
            row.read_only = span.is_read_only;
            row.start_line = span.start_line;
            row.start_col = span.start_col;
            row.end_line = span.end_line;
            row.end_col = span.end_col;
        }
        row
    }
}

/// Convert a drained, chronological list into rows, keeping its order.
pub fn into_rows(messages: &[DiagnosticMessage]) -> Vec<MessageRow> {
    messages.iter().map(MessageRow::from).collect()
}

/// Trait for presenting drained diagnostics.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, msg: &DiagnosticMessage);

    /// Emit multiple diagnostics in order.
    fn emit_all(&mut self, messages: &[DiagnosticMessage]) {
        for msg in messages {
            self.emit(msg);
        }
    }

    /// Flush any buffered output.
    fn flush(&mut self);
}

/// Writes each diagnostic's full text to a sink, with an optional
/// severity prefix.
pub struct SinkEmitter {
    sink: SharedSink,
    with_severity: bool,
}

impl SinkEmitter {
    pub fn new(sink: SharedSink) -> Self {
        SinkEmitter {
            sink,
            with_severity: false,
        }
    }

    /// Prefix each line with `Error: `, `Warning: ` or `Notification: `.
    #[must_use]
    pub fn with_severity(mut self) -> Self {
        self.with_severity = true;
        self
    }
}

impl DiagnosticEmitter for SinkEmitter {
    fn emit(&mut self, msg: &DiagnosticMessage) {
        if self.with_severity {
            self.sink
                .write_line(&format!("{}: {}", msg.severity(), msg.full_text()));
        } else {
            self.sink.write_line(msg.full_text());
        }
    }

    fn flush(&mut self) {}
}

/// Escape a string for JSON output.
pub(crate) fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(result, "\\u{:04x}", c as u32);
            }
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests;
