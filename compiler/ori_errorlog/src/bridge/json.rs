//! JSON Emitter
//!
//! Writes drained diagnostics as a JSON array of host rows.

use std::io::Write;

use crate::DiagnosticMessage;

use super::{escape_json, DiagnosticEmitter, MessageRow};

/// JSON emitter for machine-readable output.
pub struct JsonEmitter<W: Write> {
    writer: W,
    first: bool,
}

impl<W: Write> JsonEmitter<W> {
    /// Create a new JSON emitter.
    pub fn new(writer: W) -> Self {
        JsonEmitter {
            writer,
            first: true,
        }
    }

    /// Begin the JSON array output.
    pub fn begin(&mut self) {
        let _ = writeln!(self.writer, "[");
    }

    /// End the JSON array output.
    pub fn end(&mut self) {
        let _ = writeln!(self.writer, "\n]");
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, msg: &DiagnosticMessage) {
        if !self.first {
            let _ = writeln!(self.writer, ",");
        }
        self.first = false;

        let row = MessageRow::from(msg);
        let _ = writeln!(self.writer, "  {{");
        let _ = writeln!(self.writer, "    \"id\": {},", row.id);
        let _ = writeln!(self.writer, "    \"kind\": \"{}\",", row.kind);
        let _ = writeln!(self.writer, "    \"severity\": \"{}\",", row.severity);
        let _ = writeln!(
            self.writer,
            "    \"message\": \"{}\",",
            escape_json(&row.message)
        );
        let _ = writeln!(self.writer, "    \"file\": \"{}\",", escape_json(&row.file));
        let _ = writeln!(self.writer, "    \"read_only\": {},", row.read_only);
        let _ = writeln!(self.writer, "    \"start_line\": {},", row.start_line);
        let _ = writeln!(self.writer, "    \"start_col\": {},", row.start_col);
        let _ = writeln!(self.writer, "    \"end_line\": {},", row.end_line);
        let _ = writeln!(self.writer, "    \"end_col\": {}", row.end_col);
        let _ = write!(self.writer, "  }}");
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}
