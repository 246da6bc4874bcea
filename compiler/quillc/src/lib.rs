//! Quill compiler driver.
//!
//! [`CompilationSession`] runs the checker and the emitter over an annotated
//! tree and persists the result according to its [`SessionConfig`]. The
//! `quill` binary built from this crate runs, disassembles and explains.

pub mod commands;
mod config;
mod session;

pub use config::{OutputFormat, SessionConfig};
pub use session::CompilationSession;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=quill_emit=debug` or
/// `RUST_LOG=quill_vm=trace`; without `RUST_LOG` nothing is installed.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
