use pretty_assertions::assert_eq;

use super::*;

#[test]
fn buffer_console_captures_output() {
    let mut console = BufferConsole::new();
    console.print("a").unwrap();
    console.println("b").unwrap();
    assert_eq!(console.output(), "ab\n");
    console.clear();
    assert_eq!(console.output(), "");
}

#[test]
fn buffer_console_replays_input_then_ends() {
    let mut console = BufferConsole::with_input(["12", "x"]);
    assert_eq!(console.read_line().unwrap(), Some("12".to_owned()));
    assert_eq!(console.read_line().unwrap(), Some("x".to_owned()));
    assert_eq!(console.read_line().unwrap(), None);
}

#[test]
fn line_terminators_are_trimmed() {
    let mut line = "text\r\n".to_owned();
    trim_newline(&mut line);
    assert_eq!(line, "text");

    let mut bare = "no newline".to_owned();
    trim_newline(&mut bare);
    assert_eq!(bare, "no newline");
}
