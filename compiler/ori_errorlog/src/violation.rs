//! Fatal protocol violations.
//!
//! A violation means the caller broke checkpoint nesting or popped an empty
//! log. There is no continuation: the state is dumped to the sink and the
//! process aborts. `abort` does not unwind, so `catch_unwind` cannot
//! intercept it. Callers that need graceful degradation must check
//! [`is_top_checkpoint`](crate::DiagnosticState::is_top_checkpoint) first.

use std::fmt;

use crate::checkpoint::{CheckpointOp, CheckpointStack};
use crate::sink::SharedSink;
use crate::stack::DiagnosticStack;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// The requested checkpoint is not the innermost one.
    CheckpointMismatch {
        op: CheckpointOp,
        requested: String,
        top: String,
    },
    /// No checkpoint is open.
    NoCheckpoint { op: CheckpointOp, requested: String },
    /// Pop on an empty message stack.
    EmptyMessageStack,
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolViolation::CheckpointMismatch { op, requested, top } => write!(
                f,
                "{op} called with id '{requested}' but top of checkpoint stack has id '{top}'"
            ),
            ProtocolViolation::NoCheckpoint { op, requested } => {
                write!(f, "{op} called with id '{requested}' on empty checkpoint stack")
            }
            ProtocolViolation::EmptyMessageStack => {
                f.write_str("pop called on empty diagnostic stack")
            }
        }
    }
}

impl std::error::Error for ProtocolViolation {}

/// Render the violation and the checkpoint stack, innermost first.
///
/// Each checkpoint line lists its index, id and depth, followed by the
/// short text of the messages recorded above that depth.
pub(crate) fn render_dump(
    violation: &ProtocolViolation,
    checkpoints: &CheckpointStack,
    messages: &DiagnosticStack,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(checkpoints.len() + 2);
    lines.push(format!("protocol violation: {violation}"));
    lines.push("Current Stack:".to_string());
    let mut covered = messages.len();
    for (index, cp) in checkpoints.innermost_first() {
        let depth = cp.depth.min(covered);
        let texts: Vec<&str> = messages
            .above(depth)
            .iter()
            .take(covered - depth)
            .map(crate::DiagnosticMessage::short_text)
            .collect();
        lines.push(format!(
            "{index:5} {} (depth {})   message: {}",
            cp.id,
            cp.depth,
            texts.join(" ")
        ));
        covered = depth;
    }
    lines
}

/// Dump the violation to `sink` and abort the process.
#[cold]
#[inline(never)]
pub(crate) fn abort_on_violation(
    violation: &ProtocolViolation,
    checkpoints: &CheckpointStack,
    messages: &DiagnosticStack,
    sink: &SharedSink,
) -> ! {
    tracing::error!(%violation, checkpoints = checkpoints.len(), "diagnostic protocol violation");
    for line in render_dump(violation, checkpoints, messages) {
        sink.write_line(&line);
    }
    std::process::abort()
}
