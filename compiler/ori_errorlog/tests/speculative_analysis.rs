//! End-to-end use of the store the way a compiler pass drives it.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;

use ori_errorlog::bridge::into_rows;
use ori_errorlog::{
    init_tracing, DiagnosticConfig, DiagnosticState, ExecutionContext, Kind, MemorySink, Severity,
    SharedSink, SourceSpan,
};
use pretty_assertions::assert_eq;

/// Candidate signatures for a call, tried in order.
struct Candidate {
    name: &'static str,
    arity: usize,
}

/// Try each candidate under its own checkpoint; keep the first that fits.
fn resolve_call(state: &mut DiagnosticState, args: usize, candidates: &[Candidate]) -> Option<&'static str> {
    for candidate in candidates {
        let found = state.speculate(candidate.name, |state| {
            if candidate.arity == args {
                state.add_message(
                    20,
                    Kind::Translation,
                    Severity::Notification,
                    "selected overload %s",
                    vec![candidate.name.to_string()],
                );
                Some(candidate.name)
            } else {
                state.add_message(
                    21,
                    Kind::Translation,
                    Severity::Error,
                    "%1 expects %2 arguments",
                    vec![candidate.name.to_string(), candidate.arity.to_string()],
                );
                None
            }
        });
        if found.is_some() {
            return found;
        }
    }
    state.add_message(22, Kind::Translation, Severity::Error, "no matching overload", vec![]);
    None
}

#[test]
fn failed_overloads_leave_no_trace() {
    init_tracing();
    init_tracing();

    let mut ctx = ExecutionContext::with_config(
        "resolver",
        DiagnosticConfig::default(),
        SharedSink::new(MemorySink::new()),
    );
    let state = ctx.diagnostics();
    state.update_current_component("y", SourceSpan::new("Model.mo", 12, 3, 12, 20));

    let candidates = [
        Candidate { name: "f1", arity: 1 },
        Candidate { name: "f3", arity: 3 },
        Candidate { name: "f2", arity: 2 },
    ];
    assert_eq!(resolve_call(state, 2, &candidates), Some("f2"));
    assert_eq!(state.num_error_messages(), 0);
    assert_eq!(state.last_deleted_checkpoint(), "f2");

    let rows = into_rows(&state.get_messages());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].message, "Variable y: selected overload f2");
    assert_eq!(rows[0].file, "Model.mo");
    assert_eq!((rows[0].start_line, rows[0].end_col), (12, 20));
}

#[test]
fn unresolved_call_reports_once() {
    let mut state = DiagnosticState::with_config(
        DiagnosticConfig::default(),
        SharedSink::new(MemorySink::new()),
    );
    let candidates = [Candidate { name: "g", arity: 0 }];

    assert_eq!(resolve_call(&mut state, 1, &candidates), None);
    assert_eq!(state.num_error_messages(), 1);
    assert_eq!(state.drain_errors_only(), "no matching overload");
}

#[test]
fn outer_rollback_discards_committed_inner_attempts() {
    let mut state = DiagnosticState::with_config(
        DiagnosticConfig::default(),
        SharedSink::new(MemorySink::new()),
    );
    state.add_message(1, Kind::Syntax, Severity::Warning, "deprecated syntax", vec![]);

    state.set_checkpoint("grammar-alternative");
    let candidates = [Candidate { name: "h", arity: 1 }];
    assert_eq!(resolve_call(&mut state, 1, &candidates), Some("h"));
    state.add_message(2, Kind::Grammar, Severity::Error, "alternative does not parse", vec![]);
    let discarded = state.rollback_and_print("grammar-alternative");

    assert_eq!(discarded, "selected overload h\nalternative does not parse");
    assert_eq!(state.drain_all_as_text(), "deprecated syntax");
}

#[test]
fn echo_goes_to_the_shared_sink() {
    let memory = Arc::new(MemorySink::new());
    let sink = SharedSink::from_arc(Arc::clone(&memory));
    let mut a = ExecutionContext::with_config("a", DiagnosticConfig::default().with_echo(true), sink.clone());
    let mut b = ExecutionContext::with_config("b", DiagnosticConfig::default().with_echo(true), sink);

    a.diagnostics().add_message(1, Kind::Runtime, Severity::Warning, "from a", vec![]);
    b.diagnostics().add_message(2, Kind::Runtime, Severity::Warning, "from b", vec![]);
    b.diagnostics().set_checkpoint("b-only");
    b.diagnostics().add_message(3, Kind::Runtime, Severity::Error, "echoed then discarded", vec![]);
    b.diagnostics().rollback("b-only");

    assert_eq!(memory.lines(), vec!["from a", "from b", "echoed then discarded"]);
    assert_eq!(a.diagnostics().drain_all_as_text(), "from a");
    assert_eq!(b.diagnostics().drain_all_as_text(), "from b");
}
