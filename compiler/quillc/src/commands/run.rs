//! The `run` command: execute a bytecode file on the reference interpreter.

use quill_emit::TargetProgram;
use quill_vm::{
    Console, HostRegistry, LabelCounter, NoopObserver, Observer, StdConsole, Value, Vm, VmConfig,
    VmError,
};

use super::load_or_exit;

/// Options accepted after `quill run <file.qbc>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub path: Option<String>,
    pub vm: VmConfig,
    /// Print label hit counts to stderr after the run.
    pub profile_labels: bool,
}

/// Parse the arguments following `run`.
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if arg == "--step-limit" {
            let Some(value) = args.get(i + 1) else {
                return Err("--step-limit needs a value".to_owned());
            };
            options.vm.step_limit = Some(parse_limit(value)?);
            i += 2;
            continue;
        }
        if let Some(value) = arg.strip_prefix("--step-limit=") {
            options.vm.step_limit = Some(parse_limit(value)?);
        } else if arg == "--profile-labels" {
            options.profile_labels = true;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option '{arg}'"));
        } else if options.path.is_none() {
            options.path = Some(arg.clone());
        } else {
            return Err(format!("unexpected argument '{arg}'"));
        }
        i += 1;
    }
    Ok(options)
}

fn parse_limit(value: &str) -> Result<u64, String> {
    value
        .parse()
        .map_err(|_| format!("invalid step limit '{value}'"))
}

/// Run `program` from its entry point with the standard host routines.
pub fn execute(
    program: &TargetProgram,
    config: VmConfig,
    console: &mut dyn Console,
    observer: &mut dyn Observer,
) -> Result<Option<Value>, VmError> {
    Vm::new(program, config)
        .with_hosts(HostRegistry::standard())
        .run(console, observer)
}

/// Load and run a bytecode file, exiting with status 1 on a runtime error.
pub fn run_file(options: &RunOptions) {
    let Some(path) = options.path.as_deref() else {
        eprintln!("error: missing file path");
        eprintln!("Usage: quill run <file.qbc> [--step-limit N] [--profile-labels]");
        std::process::exit(1);
    };
    let program = load_or_exit(path);

    let mut console = StdConsole;
    let result = if options.profile_labels {
        let mut counter = LabelCounter::new();
        let result = execute(&program, options.vm, &mut console, &mut counter);
        report_label_hits(&counter);
        result
    } else {
        execute(&program, options.vm, &mut console, &mut NoopObserver)
    };

    if let Err(err) = result {
        eprintln!("error: runtime error in '{path}': {err}");
        std::process::exit(1);
    }
}

fn report_label_hits(counter: &LabelCounter) {
    eprintln!("{} instruction(s) executed", counter.steps());
    for (method, label, hits) in counter.all_hits() {
        eprintln!("  {method} L{}: {hits}", label.raw());
    }
}
