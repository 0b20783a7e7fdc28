//! Transactional diagnostic store for the compiler front end.
//!
//! Passes report errors, warnings and notifications into a per-context
//! [`DiagnosticState`]. Speculative work (trying an overload, a grammar
//! alternative) wraps its reports in a named checkpoint and either commits
//! them or rolls them back:
//!
//! ```text
//! state.set_checkpoint("overload1");
//! state.add_message(id, Kind::Translation, Severity::Error, "no matching overload", vec![]);
//! let discarded = state.rollback_and_print("overload1");
//! ```
//!
//! - Removal collapses runs of adjacent messages with identical rendered
//!   text, so retries do not multiply diagnostics.
//! - Checkpoints nest strictly. Misuse is a caller bug and aborts the
//!   process after dumping the checkpoint stack (see [`violation`]).
//! - Each execution context owns its own state ([`ExecutionContext`],
//!   [`with_thread_diagnostics`]); nothing is shared except the sink.

pub mod bridge;
mod checkpoint;
mod component;
mod config;
pub mod context;
mod message;
pub mod sink;
mod stack;
mod state;
pub mod violation;

use std::sync::Once;

pub use checkpoint::{Checkpoint, CheckpointOp};
pub use component::ComponentContext;
pub use config::{DiagnosticConfig, SHOW_DIAGNOSTICS_ENV};
pub use context::{with_thread_diagnostics, ExecutionContext};
pub use message::{DiagnosticMessage, Kind, Severity, SourceSpan, UNKNOWN_KIND, UNKNOWN_SEVERITY};
pub use sink::{DiagnosticSink, MemorySink, SharedSink, StderrSink};
pub use state::DiagnosticState;
pub use violation::ProtocolViolation;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=ori_errorlog=debug` or `RUST_LOG=ori_errorlog=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
