//! Diagnostic state owned by a single execution context.
//!
//! [`DiagnosticState`] ties together the message log, the checkpoint stack,
//! the ambient component, and the sink. Every operation is a synchronous
//! mutation of this one value; isolation between workers comes from each
//! worker owning its own state (see [`crate::context`]).
//!
//! # Speculative analysis
//!
//! ```text
//! state.set_checkpoint("overload1");
//! if !try_overload(&mut state, candidate) {
//!     state.rollback("overload1");      // discard what the attempt reported
//! } else {
//!     state.del_checkpoint("overload1"); // keep it
//! }
//! ```
//!
//! Checkpoint misuse is fatal; see [`crate::violation`].

use crate::checkpoint::{CheckpointOp, CheckpointStack, TopMismatch};
use crate::component::ComponentContext;
use crate::config::DiagnosticConfig;
use crate::sink::SharedSink;
use crate::stack::DiagnosticStack;
use crate::violation::{abort_on_violation, ProtocolViolation};
use crate::{DiagnosticMessage, Kind, Severity, SourceSpan};

/// Per-context diagnostic store.
#[derive(Debug)]
pub struct DiagnosticState {
    messages: DiagnosticStack,
    checkpoints: CheckpointStack,
    component: ComponentContext,
    config: DiagnosticConfig,
    sink: SharedSink,
}

impl Default for DiagnosticState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticState {
    /// Empty state writing to stderr, echo disabled.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default(), SharedSink::stderr())
    }

    pub fn with_config(config: DiagnosticConfig, sink: SharedSink) -> Self {
        DiagnosticState {
            messages: DiagnosticStack::new(),
            checkpoints: CheckpointStack::new(),
            component: ComponentContext::default(),
            config,
            sink,
        }
    }

    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    pub fn set_echo(&mut self, echo_to_sink: bool) {
        self.config.echo_to_sink = echo_to_sink;
    }

    // -- Component context --

    /// Set the component later messages are attributed to.
    ///
    /// An all-zero `span` means the component has no location.
    pub fn update_current_component(&mut self, name: impl Into<String>, span: SourceSpan) {
        self.component.update(name, span);
    }

    pub fn component(&self) -> &ComponentContext {
        &self.component
    }

    // -- Adding messages --

    /// Record a message attributed to the current component.
    pub fn add_message(
        &mut self,
        id: u32,
        kind: Kind,
        severity: Severity,
        text: &str,
        tokens: Vec<String>,
    ) {
        let text = self.component.annotate(text);
        let span = self.component.span().cloned();
        self.push(DiagnosticMessage::new(id, kind, severity, &text, tokens, span));
    }

    /// Record a message at an explicit location, ignoring the current
    /// component.
    pub fn add_source_message(
        &mut self,
        id: u32,
        kind: Kind,
        severity: Severity,
        text: &str,
        tokens: Vec<String>,
        span: SourceSpan,
    ) {
        self.push(DiagnosticMessage::new(id, kind, severity, text, tokens, Some(span)));
    }

    /// Push a prebuilt message, echoing it first if configured.
    pub fn push(&mut self, msg: DiagnosticMessage) {
        if self.config.echo_to_sink {
            self.sink.write_line(msg.full_text());
        }
        tracing::trace!(id = msg.id(), severity = %msg.severity(), depth = self.messages.len(), "push diagnostic");
        self.messages.push(msg);
    }

    /// Pop one logical entry; newest first.
    fn pop(&mut self, floor: Option<usize>) -> Vec<DiagnosticMessage> {
        match self.messages.pop(floor) {
            Some(removed) => removed,
            None => self.violation(&ProtocolViolation::EmptyMessageStack),
        }
    }

    // -- Checkpoints --

    /// Open a checkpoint at the current depth.
    pub fn set_checkpoint(&mut self, id: impl Into<String>) {
        let id = id.into();
        tracing::debug!(%id, depth = self.messages.len(), "set checkpoint");
        self.checkpoints.push(id, self.messages.len());
    }

    /// Whether `id` names the innermost open checkpoint.
    pub fn is_top_checkpoint(&self, id: &str) -> bool {
        self.checkpoints.is_top(id)
    }

    /// Commit the innermost checkpoint, keeping its messages.
    ///
    /// Aborts the process if `id` is not the innermost checkpoint.
    pub fn del_checkpoint(&mut self, id: &str) {
        self.require_top(CheckpointOp::Delete, id);
        self.checkpoints.commit_top();
        tracing::debug!(%id, kept = self.messages.len(), "commit checkpoint");
    }

    /// Discard every message recorded since checkpoint `id` and close it.
    ///
    /// Aborts the process if `id` is not the innermost checkpoint.
    pub fn rollback(&mut self, id: &str) {
        let depth = self.require_top(CheckpointOp::Rollback, id);
        let removed = self.unwind_to(depth);
        self.checkpoints.pop();
        tracing::debug!(%id, discarded = removed.len(), "rollback checkpoint");
    }

    /// Like [`rollback`](Self::rollback), returning the discarded messages'
    /// full text, oldest first, one per line.
    pub fn rollback_and_print(&mut self, id: &str) -> String {
        let depth = self.require_top(CheckpointOp::RollbackAndPrint, id);
        let removed = self.unwind_to(depth);
        self.checkpoints.pop();
        tracing::debug!(%id, discarded = removed.len(), "rollback checkpoint");
        join_full_text(removed.iter())
    }

    /// Run `attempt` under checkpoint `id`.
    ///
    /// `Some` commits what the attempt reported, `None` discards it.
    pub fn speculate<T>(
        &mut self,
        id: &str,
        attempt: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        self.set_checkpoint(id);
        let result = attempt(self);
        if result.is_some() {
            self.del_checkpoint(id);
        } else {
            self.rollback(id);
        }
        result
    }

    /// Id of the most recently committed checkpoint; empty if none.
    pub fn last_deleted_checkpoint(&self) -> &str {
        self.checkpoints.last_deleted()
    }

    /// Number of open checkpoints.
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    fn require_top(&self, op: CheckpointOp, id: &str) -> usize {
        match self.checkpoints.expect_top(id) {
            Ok(cp) => cp.depth,
            Err(TopMismatch::Empty) => self.violation(&ProtocolViolation::NoCheckpoint {
                op,
                requested: id.to_owned(),
            }),
            Err(TopMismatch::Other(top)) => {
                self.violation(&ProtocolViolation::CheckpointMismatch {
                    op,
                    requested: id.to_owned(),
                    top,
                })
            }
        }
    }

    /// Pop down to `depth` without collapsing across it; oldest first.
    fn unwind_to(&mut self, depth: usize) -> Vec<DiagnosticMessage> {
        let mut removed = Vec::new();
        while self.messages.len() > depth {
            removed.extend(self.pop(Some(depth)));
        }
        removed.reverse();
        removed
    }

    fn violation(&self, violation: &ProtocolViolation) -> ! {
        abort_on_violation(violation, &self.checkpoints, &self.messages, &self.sink)
    }

    // -- Queries --

    pub fn num_error_messages(&self) -> usize {
        self.messages.error_count()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.error_count() > 0
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Stored messages oldest first, without draining.
    pub fn peek(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    /// Discard every stored message.
    pub fn clear_messages(&mut self) {
        self.warn_if_checkpoints_open("clear");
        while !self.messages.is_empty() {
            self.pop(None);
        }
    }

    /// Remove and return every stored message, oldest first.
    pub fn drain_all(&mut self) -> Vec<DiagnosticMessage> {
        self.warn_if_checkpoints_open("drain");
        let mut drained = Vec::with_capacity(self.messages.len());
        while !self.messages.is_empty() {
            drained.extend(self.pop(None));
        }
        drained.reverse();
        drained
    }

    /// Alias of [`drain_all`](Self::drain_all) for host bridges.
    pub fn get_messages(&mut self) -> Vec<DiagnosticMessage> {
        self.drain_all()
    }

    /// Drain the store, returning only the errors' full text, one per line.
    pub fn drain_errors_only(&mut self) -> String {
        let drained = self.drain_all();
        join_full_text(drained.iter().filter(|msg| msg.is_error()))
    }

    /// Drain the store, returning every message's full text, one per line.
    pub fn drain_all_as_text(&mut self) -> String {
        let drained = self.drain_all();
        join_full_text(drained.iter())
    }

    fn warn_if_checkpoints_open(&self, action: &str) {
        if !self.checkpoints.is_empty() && !self.messages.is_empty() {
            tracing::warn!(
                action,
                open = self.checkpoints.len(),
                innermost = self.checkpoints.top().map(|cp| cp.id.as_str()),
                "emptying diagnostics while checkpoints are open"
            );
        }
    }
}

fn join_full_text<'a>(messages: impl Iterator<Item = &'a DiagnosticMessage>) -> String {
    messages
        .map(DiagnosticMessage::full_text)
        .collect::<Vec<_>>()
        .join("\n")
}
