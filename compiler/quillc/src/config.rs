//! Session configuration.

use std::path::PathBuf;

/// On-disk form of a lowered program.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `bincode` image loadable by `quill run`.
    #[default]
    Bytecode,
    /// Human-readable listing.
    Assembly,
}

/// What a [`CompilationSession`](crate::CompilationSession) does with its
/// result.
///
/// Without an `output` path the program is only kept in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    /// Attached to the program before checking so diagnostics name a file.
    pub source_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Write `format` output to `path`.
    pub fn writing_to(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        SessionConfig {
            output: Some(path.into()),
            format,
            source_path: None,
        }
    }

    #[must_use]
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}
