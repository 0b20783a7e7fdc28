use std::sync::Arc;

use super::*;
use crate::sink::MemorySink;
use crate::{DiagnosticState, SourceSpan};
use pretty_assertions::assert_eq;

fn drained_sample() -> Vec<DiagnosticMessage> {
    let mut state = DiagnosticState::new();
    state.add_source_message(
        10,
        Kind::Runtime,
        Severity::Error,
        "division by \"zero\"",
        vec![],
        SourceSpan::new("lib/Div.mo", 2, 4, 2, 9).read_only(true),
    );
    state.add_message(11, Kind::Scripting, Severity::Notification, "done", vec![]);
    state.drain_all()
}

#[test]
fn rows_follow_host_field_order() {
    let rows = into_rows(&drained_sample());
    assert_eq!(
        rows,
        vec![
            MessageRow {
                id: 10,
                kind: KindTag::Simulation,
                severity: SeverityTag::Error,
                message: "division by \"zero\"".into(),
                file: "lib/Div.mo".into(),
                read_only: true,
                start_line: 2,
                start_col: 4,
                end_line: 2,
                end_col: 9,
            },
            MessageRow {
                id: 11,
                kind: KindTag::Scripting,
                severity: SeverityTag::Notification,
                message: "done".into(),
                file: String::new(),
                read_only: false,
                start_line: 0,
                start_col: 0,
                end_line: 0,
                end_col: 0,
            },
        ]
    );
}

#[test]
fn runtime_kind_maps_to_simulation_tag() {
    for kind in Kind::ALL {
        let tag = KindTag::from(kind);
        if kind == Kind::Runtime {
            assert_eq!(tag.as_str(), "SIMULATION");
        } else {
            assert_eq!(tag.as_str(), kind.as_str());
        }
    }
}

#[test]
fn json_emitter_writes_valid_array() {
    let messages = drained_sample();
    let mut output = Vec::new();
    let mut emitter = JsonEmitter::new(&mut output);
    emitter.begin();
    emitter.emit_all(&messages);
    emitter.end();
    emitter.flush();

    let parsed: serde_json::Value = match serde_json::from_slice(&output) {
        Ok(value) => value,
        Err(err) => panic!("emitter produced invalid JSON: {err}"),
    };
    let rows = parsed.as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["kind"], "SIMULATION");
    assert_eq!(rows[0]["message"], "division by \"zero\"");
    assert_eq!(rows[0]["read_only"], true);
    assert_eq!(rows[1]["severity"], "NOTIFICATION");
    assert_eq!(rows[1]["file"], "");
}

#[test]
fn json_emitter_empty_array() {
    let mut output = Vec::new();
    let mut emitter = JsonEmitter::new(&mut output);
    emitter.begin();
    emitter.end();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap_or_default();
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn sink_emitter_writes_full_text() {
    let memory = Arc::new(MemorySink::new());
    let mut plain = SinkEmitter::new(SharedSink::from_arc(Arc::clone(&memory)));
    let mut tagged = SinkEmitter::new(SharedSink::from_arc(Arc::clone(&memory))).with_severity();
    let messages = drained_sample();

    plain.emit(&messages[1]);
    tagged.emit_all(&messages);
    assert_eq!(
        memory.lines(),
        vec![
            "done",
            "Error: [lib/Div.mo:2:4-2:9:readonly] division by \"zero\"",
            "Notification: done",
        ]
    );
}

#[test]
fn test_escape_json() {
    assert_eq!(escape_json("hello"), "hello");
    assert_eq!(escape_json("\"quoted\""), "\\\"quoted\\\"");
    assert_eq!(escape_json("line1\nline2"), "line1\\nline2");
    assert_eq!(escape_json("path\\file"), "path\\\\file");
    assert_eq!(escape_json("bell\u{7}"), "bell\\u0007");
}
