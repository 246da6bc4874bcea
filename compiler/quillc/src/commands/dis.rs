//! The `dis` command: print the listing of a bytecode file.

use quill_emit::listing;

use super::load_or_exit;

pub fn disassemble_file(path: &str) {
    let program = load_or_exit(path);
    print!("{}", listing(&program));
}
