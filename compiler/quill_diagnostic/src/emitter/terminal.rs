//! Terminal Emitter
//!
//! Human-readable diagnostic output with an optional source excerpt and ANSI
//! color support.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use quill_ir::Span;
use rustc_hash::FxHashMap;

use crate::diagnostic::plural_s;
use crate::Diagnostic;

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Parse a `--color` option value.
    pub fn from_flag(value: &str) -> Option<ColorMode> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// Terminal emitter with optional color support.
///
/// Source files are read lazily the first time a diagnostic points into
/// them and cached for the emitter's lifetime. A file that cannot be read is
/// remembered as missing and its diagnostics fall back to the bare header.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    sources: FxHashMap<PathBuf, Option<String>>,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter with explicit color mode.
    ///
    /// # Arguments
    ///
    /// * `writer` - The output writer
    /// * `mode` - Color mode selection
    /// * `is_tty` - Whether output is a TTY (used for `ColorMode::Auto`)
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            sources: FxHashMap::default(),
        }
    }

    /// Create a terminal emitter for stderr with explicit color mode.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> TerminalEmitter<io::Stderr> {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }

    /// Register source text for `path` instead of reading it from disk.
    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.sources.insert(path.into(), Some(text.into()));
        self
    }

    fn source_line(&mut self, path: &Path, line: u32) -> Option<String> {
        let text = self
            .sources
            .entry(path.to_path_buf())
            .or_insert_with(|| fs::read_to_string(path).ok());
        let index = usize::try_from(line.checked_sub(1)?).ok()?;
        text.as_deref()?
            .lines()
            .nth(index)
            .map(|l| l.trim_end_matches('\r').to_string())
    }

    /// Write text with optional ANSI color codes.
    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_header(&mut self, diagnostic: &Diagnostic) {
        self.write_colored("error", colors::ERROR);
        if self.colors {
            let _ = write!(
                self.writer,
                "{}[{}]: {}{}",
                colors::BOLD,
                diagnostic.code,
                diagnostic.message,
                colors::RESET
            );
            let _ = writeln!(self.writer);
        } else {
            let _ = writeln!(self.writer, "[{}]: {}", diagnostic.code, diagnostic.message);
        }
    }

    fn write_excerpt(&mut self, path: &Path, span: Span, source: &str, label: Option<&str>) {
        let line_no = span.start.line.to_string();
        let pad = " ".repeat(line_no.len());

        let _ = write!(self.writer, "{pad}");
        self.write_colored("-->", colors::GUTTER);
        let _ = writeln!(
            self.writer,
            " {}:{}:{}",
            path.display(),
            span.start.line,
            span.start.column
        );

        self.write_colored(&format!("{pad} |"), colors::GUTTER);
        let _ = writeln!(self.writer);
        self.write_colored(&format!("{line_no} |"), colors::GUTTER);
        let _ = writeln!(self.writer, " {source}");

        let (indent, width) = underline_extent(source, span);
        self.write_colored(&format!("{pad} |"), colors::GUTTER);
        let _ = write!(self.writer, " {indent}");
        let mut marks = "^".repeat(width);
        if let Some(label) = label {
            marks.push(' ');
            marks.push_str(label);
        }
        self.write_colored(&marks, colors::ERROR);
        let _ = writeln!(self.writer);
    }
}

/// Leading whitespace (tabs preserved) and caret count for `span` on `line`.
fn underline_extent(line: &str, span: Span) -> (String, usize) {
    let start = usize::try_from(span.start.column.saturating_sub(1)).unwrap_or(0);
    let line_len = line.chars().count();
    let start = start.min(line_len);
    let indent: String = line
        .chars()
        .take(start)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();

    let width = if span.end.line == span.start.line && span.end.column > span.start.column {
        usize::try_from(span.end.column - span.start.column).unwrap_or(1)
    } else {
        line_len.saturating_sub(start)
    };
    (indent, width.max(1))
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.write_header(diagnostic);

        if let (Some(path), Some(span)) = (&diagnostic.file, diagnostic.span) {
            if let Some(source) = self.source_line(path, span.start.line) {
                self.write_excerpt(path, span, &source, diagnostic.label.as_deref());
            }
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::NOTE);
            let _ = writeln!(self.writer, ": {note}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize) {
        if error_count == 0 {
            return;
        }
        self.write_colored("error", colors::ERROR);
        if error_count == 1 {
            let _ = writeln!(self.writer, ": aborting due to previous error");
        } else {
            let _ = writeln!(
                self.writer,
                ": aborting due to {error_count} previous error{}",
                plural_s(error_count)
            );
        }
    }
}
