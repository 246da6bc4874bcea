//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use quill_types::{ElementType, Type};
use smallvec::SmallVec;

use crate::VmError;

/// A value on the operand stack or in a slot.
///
/// Booleans are `Int(0)`/`Int(1)`. Arrays are shared: copying an array
/// value copies the reference.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Array(ArrayRef),
}

pub type ArrayRef = Rc<RefCell<ArrayValue>>;

impl Value {
    pub fn str(text: impl Into<Rc<str>>) -> Value {
        Value::Str(text.into())
    }

    pub fn boolean(value: bool) -> Value {
        Value::Int(i64::from(value))
    }

    /// The value an unassigned slot of type `ty` starts with.
    pub fn default_for(ty: Type) -> Value {
        match ty {
            Type::Float => Value::Float(0.0),
            Type::String => Value::str(""),
            Type::Array(at) => {
                let dims = SmallVec::from_elem(0, usize::from(at.rank));
                Value::Array(Rc::new(RefCell::new(ArrayValue {
                    element: at.element,
                    dims,
                    data: Vec::new(),
                })))
            }
            Type::Integer | Type::Boolean | Type::Void | Type::Undefined => Value::Int(0),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
        }
    }

    pub fn as_int(&self) -> Result<i64, VmError> {
        match self {
            Value::Int(v) => Ok(*v),
            other => Err(VmError::type_mismatch("integer", other)),
        }
    }

    pub fn as_float(&self) -> Result<f64, VmError> {
        match self {
            Value::Float(v) => Ok(*v),
            other => Err(VmError::type_mismatch("float", other)),
        }
    }

    pub fn as_str(&self) -> Result<&str, VmError> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(VmError::type_mismatch("string", other)),
        }
    }

    pub fn as_array(&self) -> Result<&ArrayRef, VmError> {
        match self {
            Value::Array(a) => Ok(a),
            other => Err(VmError::type_mismatch("array", other)),
        }
    }
}

/// Two values are equal when they have the same kind and contents; arrays
/// compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::Array(a) => {
                let a = a.borrow();
                write!(f, "{}[", a.element)?;
                for (i, dim) in a.dims.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{dim}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A rectangular array stored row-major.
#[derive(Clone, Debug)]
pub struct ArrayValue {
    pub element: ElementType,
    pub dims: SmallVec<[usize; 4]>,
    pub data: Vec<Value>,
}

impl ArrayValue {
    /// Allocate an array filled with the element type's default value.
    pub fn new(element: ElementType, dims: &[i64]) -> Result<ArrayValue, VmError> {
        let mut sizes = SmallVec::with_capacity(dims.len());
        let mut total: usize = 1;
        for &dim in dims {
            let size = usize::try_from(dim).map_err(|_| VmError::InvalidDimension(dim))?;
            total = total
                .checked_mul(size)
                .ok_or(VmError::InvalidDimension(dim))?;
            sizes.push(size);
        }
        Ok(ArrayValue {
            element,
            dims: sizes,
            data: vec![Value::default_for(element.to_type()); total],
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major offset of `indices`, bounds-checked per dimension.
    pub fn offset(&self, indices: &[i64]) -> Result<usize, VmError> {
        if indices.len() != self.dims.len() {
            return Err(VmError::InvalidProgram(format!(
                "{} indices for an array of rank {}",
                indices.len(),
                self.dims.len()
            )));
        }
        let mut offset = 0;
        for (&index, &len) in indices.iter().zip(&self.dims) {
            let i = usize::try_from(index)
                .ok()
                .filter(|&i| i < len)
                .ok_or(VmError::IndexOutOfBounds { index, len })?;
            offset = offset * len + i;
        }
        Ok(offset)
    }

    pub fn get(&self, indices: &[i64]) -> Result<Value, VmError> {
        let offset = self.offset(indices)?;
        Ok(self.data[offset].clone())
    }

    pub fn set(&mut self, indices: &[i64], value: Value) -> Result<(), VmError> {
        let offset = self.offset(indices)?;
        self.data[offset] = value;
        Ok(())
    }
}
