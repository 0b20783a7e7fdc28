//! Named checkpoints over the diagnostic stack.
//!
//! A checkpoint remembers the stack depth at the moment it was set.
//! Checkpoints nest strictly: only the innermost one may be committed or
//! rolled back.

use std::fmt;

/// A savepoint in the diagnostic stack.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Checkpoint {
    /// Number of messages on the stack when the checkpoint was set.
    pub depth: usize,
    /// Caller-chosen id; unique only within the current nesting chain.
    pub id: String,
}

/// Operation that required a matching top checkpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CheckpointOp {
    Delete,
    Rollback,
    RollbackAndPrint,
}

impl fmt::Display for CheckpointOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointOp::Delete => f.write_str("delete checkpoint"),
            CheckpointOp::Rollback => f.write_str("rollback"),
            CheckpointOp::RollbackAndPrint => f.write_str("rollback and print"),
        }
    }
}

/// Why the top checkpoint could not be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopMismatch {
    Empty,
    Other(String),
}

/// LIFO stack of checkpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckpointStack {
    checkpoints: Vec<Checkpoint>,
    last_deleted: String,
}

impl CheckpointStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>, depth: usize) {
        self.checkpoints.push(Checkpoint {
            depth,
            id: id.into(),
        });
    }

    pub fn top(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    pub fn is_top(&self, id: &str) -> bool {
        self.top().is_some_and(|cp| cp.id == id)
    }

    /// The top checkpoint, provided its id is `id`.
    pub fn expect_top(&self, id: &str) -> Result<&Checkpoint, TopMismatch> {
        match self.top() {
            Some(cp) if cp.id == id => Ok(cp),
            Some(cp) => Err(TopMismatch::Other(cp.id.clone())),
            None => Err(TopMismatch::Empty),
        }
    }

    /// Remove the top checkpoint. Callers check it with [`Self::expect_top`].
    pub(crate) fn pop(&mut self) -> Option<Checkpoint> {
        self.checkpoints.pop()
    }

    /// Remove the top checkpoint and remember it as the last committed one.
    pub(crate) fn commit_top(&mut self) -> Option<Checkpoint> {
        let cp = self.checkpoints.pop()?;
        self.last_deleted.clone_from(&cp.id);
        Some(cp)
    }

    /// Id of the most recently committed checkpoint; empty if none.
    pub fn last_deleted(&self) -> &str {
        &self.last_deleted
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Checkpoints innermost first, with their stack index.
    pub fn innermost_first(&self) -> impl Iterator<Item = (usize, &Checkpoint)> {
        self.checkpoints.iter().enumerate().rev()
    }
}
