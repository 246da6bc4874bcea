//! The `Type` enum and the numeric promotion rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::UnknownType;

/// A Quill type.
///
/// Equality is by variant (and, for arrays, element + rank).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Type {
    Integer,
    Float,
    String,
    Boolean,
    Void,
    /// Unresolved expression, or "any value" in a built-in signature.
    Undefined,
    Array(ArrayType),
}

/// The numeric subset of [`Type`], ordered by cast priority.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Numeric {
    Integer,
    Float,
}

impl Numeric {
    /// Position in the implicit widening order. Higher accepts lower.
    #[inline]
    pub const fn cast_priority(self) -> u8 {
        match self {
            Numeric::Integer => 1,
            Numeric::Float => 2,
        }
    }

    /// The type both operands promote to in a mixed arithmetic expression.
    pub fn widest(a: Numeric, b: Numeric) -> Numeric {
        if a.cast_priority() >= b.cast_priority() {
            a
        } else {
            b
        }
    }

    pub fn to_type(self) -> Type {
        match self {
            Numeric::Integer => Type::Integer,
            Numeric::Float => Type::Float,
        }
    }
}

/// Whether a value of numeric type `from` may be implicitly used as `to`.
#[inline]
pub fn can_promote(from: Numeric, to: Numeric) -> bool {
    from.cast_priority() <= to.cast_priority()
}

/// Element type of an array. Arrays never nest; rank carries dimensionality.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum ElementType {
    Integer,
    Float,
    String,
    Boolean,
}

impl ElementType {
    pub fn to_type(self) -> Type {
        match self {
            ElementType::Integer => Type::Integer,
            ElementType::Float => Type::Float,
            ElementType::String => Type::String,
            ElementType::Boolean => Type::Boolean,
        }
    }

    pub fn from_type(ty: Type) -> Option<ElementType> {
        match ty {
            Type::Integer => Some(ElementType::Integer),
            Type::Float => Some(ElementType::Float),
            Type::String => Some(ElementType::String),
            Type::Boolean => Some(ElementType::Boolean),
            Type::Void | Type::Undefined | Type::Array(_) => None,
        }
    }
}

/// An array type: element type plus rank (number of index expressions).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct ArrayType {
    pub element: ElementType,
    pub rank: u8,
}

impl ArrayType {
    pub fn new(element: ElementType, rank: u8) -> Self {
        debug_assert!(rank >= 1, "array rank must be at least 1");
        ArrayType { element, rank }
    }
}

impl Type {
    /// Resolve a written type name.
    ///
    /// Accepts the canonical names (`Integer`, `Float`, `String`, `Boolean`,
    /// `Void`), their lowercase aliases, and an array suffix where the number
    /// of commas gives the rank: `Integer[]` is rank 1, `Float[,]` rank 2.
    pub fn from_name(name: &str) -> Result<Type, UnknownType> {
        let trimmed = name.trim();
        let Some(open) = trimmed.find('[') else {
            return Self::primitive_from_name(trimmed).ok_or_else(|| UnknownType::new(name));
        };

        let (base, suffix) = trimmed.split_at(open);
        let inner = suffix
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| UnknownType::new(name))?;
        if !inner.chars().all(|c| c == ',' || c.is_whitespace()) {
            return Err(UnknownType::new(name));
        }
        let commas = inner.chars().filter(|&c| c == ',').count();
        let rank = u8::try_from(commas + 1).map_err(|_| UnknownType::new(name))?;

        let element = Self::primitive_from_name(base.trim())
            .and_then(ElementType::from_type)
            .ok_or_else(|| UnknownType::new(name))?;
        Ok(Type::Array(ArrayType::new(element, rank)))
    }

    fn primitive_from_name(name: &str) -> Option<Type> {
        match name {
            "Integer" | "int" => Some(Type::Integer),
            "Float" | "float" => Some(Type::Float),
            "String" | "string" => Some(Type::String),
            "Boolean" | "bool" => Some(Type::Boolean),
            "Void" | "void" => Some(Type::Void),
            _ => None,
        }
    }

    /// The numeric view of this type, if it has one.
    #[inline]
    pub fn numeric(self) -> Option<Numeric> {
        match self {
            Type::Integer => Some(Numeric::Integer),
            Type::Float => Some(Numeric::Float),
            _ => None,
        }
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        self.numeric().is_some()
    }

    /// Variables may hold anything except `Void` (and the unresolved marker).
    #[inline]
    pub fn is_valid_variable_type(self) -> bool {
        !matches!(self, Type::Void | Type::Undefined)
    }

    /// `true` for types that produce a runtime value.
    #[inline]
    pub fn is_value(self) -> bool {
        !matches!(self, Type::Void | Type::Undefined)
    }

    pub fn as_array(self) -> Option<ArrayType> {
        match self {
            Type::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Whether a value of type `self` can be stored where `target` is
    /// expected.
    ///
    /// `Undefined` on either side is accepted: as a source it is an
    /// already-reported error, as a target it is a built-in "any value"
    /// parameter (which still rejects `Void`).
    pub fn assignable_to(self, target: Type) -> bool {
        if self == Type::Undefined {
            return true;
        }
        if target == Type::Undefined {
            return self.is_value();
        }
        if self == target {
            return true;
        }
        match (self.numeric(), target.numeric()) {
            (Some(from), Some(to)) => can_promote(from, to),
            _ => false,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_type(), f)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "Integer"),
            Type::Float => write!(f, "Float"),
            Type::String => write!(f, "String"),
            Type::Boolean => write!(f, "Boolean"),
            Type::Void => write!(f, "Void"),
            Type::Undefined => write!(f, "Undefined"),
            Type::Array(array) => {
                write!(f, "{}[", array.element)?;
                for _ in 1..array.rank {
                    write!(f, ",")?;
                }
                write!(f, "]")
            }
        }
    }
}
