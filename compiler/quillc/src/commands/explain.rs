//! The `explain` command: display documentation for diagnostic codes.

use quill_diagnostic::ErrorCode;

/// Print the long description of `code_str`.
pub fn explain_error(code_str: &str) {
    let Some(code) = ErrorCode::parse(code_str) else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E1001, E2001, E5001");
        std::process::exit(1);
    };

    println!("{code}: {}", code.description());
}
