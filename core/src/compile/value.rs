//! Dynamic runtime values.
//!
//! Values are `Copy`: every payload larger than a word lives in an arena
//! supplied by the caller of `call`, so passing values around is free and
//! the evaluator never tracks ownership.

use crate::Vec;
use crate::compile::error::EvalError;
use crate::tree::{Expr, LambdaExpr, Literal};
use bumpalo::Bump;
use core::fmt;
use core::ptr;

/// A runtime value produced by evaluating a compiled lambda.
#[derive(Clone, Copy, Debug)]
pub enum Value<'a> {
    /// The host's "no value".
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    Array(&'a [Value<'a>]),
    /// Named fields, sorted by name.
    Record(&'a [(&'a str, Value<'a>)]),
    /// A lambda evaluated to a value, with its captures.
    Function(&'a Closure<'a>),
    /// A host-registered function.
    Native(&'a NativeFn<'a>),
}

/// A lambda closed over the bindings visible where it was evaluated.
///
/// Captures are snapshots by value: assigning to an outer parameter after
/// the closure was built does not write through.
#[derive(Debug)]
pub struct Closure<'a> {
    pub(crate) lambda: &'a LambdaExpr<'a>,
    pub(crate) captures: &'a [(&'a Expr<'a>, Value<'a>)],
}

/// A host function callable from evaluated trees.
pub struct NativeFn<'a> {
    pub name: &'a str,
    pub run: &'a (dyn Fn(&'a Bump, &[Value<'a>]) -> Result<Value<'a>, EvalError> + 'a),
}

impl<'a> NativeFn<'a> {
    /// Allocate a native function in `arena`.
    pub fn new<F>(arena: &'a Bump, name: &str, f: F) -> &'a NativeFn<'a>
    where
        F: Fn(&'a Bump, &[Value<'a>]) -> Result<Value<'a>, EvalError> + 'a,
    {
        let run: &'a (dyn Fn(&'a Bump, &[Value<'a>]) -> Result<Value<'a>, EvalError> + 'a) =
            arena.alloc(f);
        arena.alloc(NativeFn {
            name: arena.alloc_str(name),
            run,
        })
    }
}

impl fmt::Debug for NativeFn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<'a> Value<'a> {
    /// The value's runtime type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "undefined",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::Function(_) => "function",
            Value::Native(_) => "function",
        }
    }

    /// Build a value from a constant literal. Array payloads are copied
    /// into `arena`.
    pub fn from_literal(arena: &'a Bump, literal: &Literal<'a>) -> Value<'a> {
        match literal {
            Literal::Absent => Value::Absent,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Str(s) => Value::Str(s),
            Literal::Array(items) => {
                let values: Vec<Value<'a>> = items
                    .iter()
                    .map(|item| Value::from_literal(arena, item))
                    .collect();
                Value::Array(arena.alloc_slice_copy(&values))
            }
        }
    }

    /// A string value copied into `arena`.
    pub fn str(arena: &'a Bump, s: &str) -> Value<'a> {
        Value::Str(arena.alloc_str(s))
    }

    /// An array value copied into `arena`.
    pub fn array(arena: &'a Bump, items: &[Value<'a>]) -> Value<'a> {
        Value::Array(arena.alloc_slice_copy(items))
    }

    /// A record value. Fields are sorted by name for binary search.
    pub fn record(arena: &'a Bump, fields: &[(&'a str, Value<'a>)]) -> Value<'a> {
        let mut sorted: Vec<(&'a str, Value<'a>)> = fields.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        Value::Record(arena.alloc_slice_copy(&sorted))
    }

    /// Look up a record field by name.
    pub fn field(&self, name: &str) -> Option<Value<'a>> {
        match self {
            Value::Record(fields) => fields
                .binary_search_by_key(&name, |(n, _)| *n)
                .ok()
                .map(|idx| fields[idx].1),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::TypeMismatch {
                expected: "bool",
                got: other.type_name(),
            }),
        }
    }

    pub fn as_int(&self) -> Result<i64, EvalError> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(EvalError::TypeMismatch {
                expected: "int",
                got: other.type_name(),
            }),
        }
    }

    pub fn as_float(&self) -> Result<f64, EvalError> {
        match self {
            Value::Float(x) => Ok(*x),
            other => Err(EvalError::TypeMismatch {
                expected: "float",
                got: other.type_name(),
            }),
        }
    }

    pub fn as_str(&self) -> Result<&'a str, EvalError> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(EvalError::TypeMismatch {
                expected: "string",
                got: other.type_name(),
            }),
        }
    }

    pub fn as_array(&self) -> Result<&'a [Value<'a>], EvalError> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(EvalError::TypeMismatch {
                expected: "array",
                got: other.type_name(),
            }),
        }
    }

    /// Numeric view for promotion: `Int` widens to `f64`.
    pub(crate) fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

/// Structural equality. Numbers compare across `Int`/`Float`; mismatched
/// types compare unequal rather than erroring; functions compare by
/// identity.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => ptr::eq(*a, *b),
            (Value::Native(a), Value::Native(b)) => ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "undefined"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(_) => write!(f, "<function>"),
            Value::Native(native) => write!(f, "<native {}>", native.name),
        }
    }
}
