//! Type lattice for Quill.
//!
//! Quill has a closed set of primitive types:
//! - `Integer` and `Float` are numeric and ordered by cast priority
//! - `String`, `Boolean` are plain value types
//! - `Void` only appears as a function return type
//! - `Undefined` marks an unresolved expression (and "any value" for
//!   built-in parameters)
//!
//! Arrays of any rank over the four value types are carried by
//! [`Type::Array`].
//!
//! Everything here is pure: no interning, no shared state. Types are `Copy`
//! and compare structurally.

mod error;
mod ty;

pub use error::UnknownType;
pub use ty::{can_promote, ArrayType, ElementType, Numeric, Type};
