//! Execution contexts: one isolated [`DiagnosticState`] per worker.
//!
//! The primary API is [`ExecutionContext`], a value owned by whatever runs
//! the compilation (a pool worker, a task struct). Its state is created on
//! first use and released when the context is dropped, so its lifetime is
//! exactly the owner's.
//!
//! For code that cannot thread a context through its call chain,
//! [`with_thread_diagnostics`] keeps one context per OS thread in
//! thread-local storage. The thread-local destructor releases it when the
//! thread exits.

use std::cell::RefCell;

use crate::config::DiagnosticConfig;
use crate::sink::SharedSink;
use crate::state::DiagnosticState;

/// Owner of one lazily created diagnostic state.
#[derive(Debug)]
pub struct ExecutionContext {
    name: String,
    config: DiagnosticConfig,
    sink: SharedSink,
    state: Option<DiagnosticState>,
}

impl ExecutionContext {
    /// Context configured from the environment, writing to stderr.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, DiagnosticConfig::from_env(), SharedSink::stderr())
    }

    pub fn with_config(name: impl Into<String>, config: DiagnosticConfig, sink: SharedSink) -> Self {
        ExecutionContext {
            name: name.into(),
            config,
            sink,
            state: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The context's diagnostic state, created on first call.
    pub fn diagnostics(&mut self) -> &mut DiagnosticState {
        let Self {
            name,
            config,
            sink,
            state,
        } = self;
        state.get_or_insert_with(|| {
            tracing::debug!(context = %name, echo = config.echo_to_sink, "creating diagnostic state");
            DiagnosticState::with_config(config.clone(), sink.clone())
        })
    }

    /// Whether [`diagnostics`](Self::diagnostics) has been called yet.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::debug!(
                context = %self.name,
                remaining = state.len(),
                errors = state.num_error_messages(),
                open_checkpoints = state.checkpoint_count(),
                "releasing diagnostic state"
            );
        }
    }
}

thread_local! {
    static THREAD_CONTEXT: RefCell<Option<ExecutionContext>> = const { RefCell::new(None) };
}

/// Run `f` against the calling thread's diagnostic state.
///
/// The state is created on the thread's first call. Calls must not nest:
/// `f` may not call `with_thread_diagnostics` again.
pub fn with_thread_diagnostics<R>(f: impl FnOnce(&mut DiagnosticState) -> R) -> R {
    THREAD_CONTEXT.with(|slot| {
        let mut slot = slot.borrow_mut();
        let context = slot.get_or_insert_with(|| {
            let name = std::thread::current()
                .name()
                .map_or_else(|| format!("{:?}", std::thread::current().id()), str::to_owned);
            ExecutionContext::new(name)
        });
        f(context.diagnostics())
    })
}
