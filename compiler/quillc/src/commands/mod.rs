//! Command handlers for the `quill` CLI.
//!
//! Handlers report to stderr and exit with status 1 on failure, so the
//! binary's `main` only dispatches. The pieces worth testing
//! ([`parse_run_options`], [`execute`]) return `Result`s instead.

mod dis;
mod explain;
mod run;

pub use dis::disassemble_file;
pub use explain::explain_error;
pub use run::{execute, parse_run_options, run_file, RunOptions};

use quill_emit::{load_bytecode, TargetProgram};
use std::path::Path;

/// Load a bytecode file or exit with its error.
fn load_or_exit(path: &str) -> TargetProgram {
    match load_bytecode(Path::new(path)) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("error: cannot load '{path}': {err}");
            std::process::exit(1);
        }
    }
}
