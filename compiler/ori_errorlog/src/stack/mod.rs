//! Ordered diagnostic log with duplicate-collapsing pop.
//!
//! The log is stored oldest-first, so the top of the stack is the last
//! element and chronological iteration needs no reversal.

use crate::DiagnosticMessage;

/// LIFO log of diagnostics plus a running error count.
///
/// Invariant: `error_count` equals the number of stored messages whose
/// severity is `Error`.
///
/// Popping an empty stack yields `None`; [`DiagnosticState`](crate::DiagnosticState)
/// turns that into a protocol violation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct DiagnosticStack {
    messages: Vec<DiagnosticMessage>,
    error_count: usize,
}

impl DiagnosticStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a message on top of the stack.
    pub fn push(&mut self, msg: DiagnosticMessage) {
        if msg.is_error() {
            self.error_count += 1;
        }
        self.messages.push(msg);
    }

    /// Pop the top message together with any identical messages below it.
    ///
    /// After removing the top, removal continues while the new top has the
    /// same `full_text` and, when `floor` is given, the stack is still
    /// strictly deeper than `floor`.
    ///
    /// Returns the removed messages newest first, or `None` if the stack
    /// was empty.
    pub fn pop(&mut self, floor: Option<usize>) -> Option<Vec<DiagnosticMessage>> {
        let first = self.pop_one()?;
        let mut removed = vec![first];

        loop {
            let above_floor = floor.map_or(true, |floor| self.messages.len() > floor);
            let duplicate = self
                .messages
                .last()
                .zip(removed.last())
                .is_some_and(|(top, prev)| top.full_text() == prev.full_text());
            if !(above_floor && duplicate) {
                break;
            }
            match self.pop_one() {
                Some(msg) => removed.push(msg),
                None => break,
            }
        }

        tracing::trace!(count = removed.len(), remaining = self.messages.len(), "popped diagnostics");
        Some(removed)
    }

    fn pop_one(&mut self) -> Option<DiagnosticMessage> {
        let msg = self.messages.pop()?;
        if msg.is_error() {
            self.error_count -= 1;
        }
        Some(msg)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Messages oldest first, without removing them.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DiagnosticMessage> + ExactSizeIterator {
        self.messages.iter()
    }

    /// Messages stored strictly above `depth`, oldest first.
    pub fn above(&self, depth: usize) -> &[DiagnosticMessage] {
        self.messages.get(depth..).unwrap_or(&[])
    }
}
