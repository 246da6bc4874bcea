//! Errors produced while resolving type names.

/// A type name that does not denote any Quill type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown type `{name}`")]
pub struct UnknownType {
    /// The name exactly as it was written.
    pub name: String,
}

impl UnknownType {
    pub fn new(name: impl Into<String>) -> Self {
        UnknownType { name: name.into() }
    }
}
