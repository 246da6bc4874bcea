//! Quill CLI: run, disassemble and explain.

use quill_diagnostic::ErrorCode;
use quillc::commands::{disassemble_file, explain_error, parse_run_options, run_file};

fn main() {
    quillc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let options = match parse_run_options(&args[2..]) {
                Ok(options) => options,
                Err(message) => {
                    eprintln!("error: {message}");
                    eprintln!("Usage: quill run <file.qbc> [--step-limit N] [--profile-labels]");
                    std::process::exit(1);
                }
            };
            run_file(&options);
        }
        "dis" => {
            if args.len() < 3 {
                eprintln!("Usage: quill dis <file.qbc>");
                std::process::exit(1);
            }
            disassemble_file(&args[2]);
        }
        "explain" | "--explain" => {
            if args.len() < 3 {
                eprintln!("Usage: quill explain <ERROR_CODE>");
                eprintln!("Example: quill explain {}", ErrorCode::E2008);
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("Quill {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("qbc"))
            {
                match parse_run_options(&args[1..]) {
                    Ok(options) => run_file(&options),
                    Err(message) => {
                        eprintln!("error: {message}");
                        std::process::exit(1);
                    }
                }
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Quill bytecode tools");
    println!();
    println!("Usage: quill <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.qbc>       Run a compiled program");
    println!("  dis <file.qbc>       Print the assembly listing of a compiled program");
    println!("  explain <code>       Explain a diagnostic code (e.g., E2008)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run options:");
    println!("  --step-limit <n>     Abort after n executed instructions");
    println!("  --profile-labels     Print label hit counts to stderr");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=quill_vm=trace) for debug output.");
}
