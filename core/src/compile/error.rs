//! Runtime evaluation errors.
//!
//! These belong to the callable, not to lowering: a tree that compiled
//! cleanly can still divide by zero or index past the end of an array once
//! invoked. Trees are not type-checked, so type mismatches surface here as
//! well.
//!
//! `StackOverflow` is a resource-limit violation rather than a logic
//! error; it is reported through the same enum but callers should treat it
//! as non-recoverable.

use crate::String;
use crate::tree::NodeKind;

/// Error raised while evaluating a compiled lambda.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// An operand had the wrong runtime type for the operation.
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Array index outside the array's bounds.
    #[error("index {index} out of bounds (length {len})")]
    IndexOutOfBounds { index: i64, len: usize },

    /// A free identifier with no binding in the host environment.
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),

    /// A member or method name missing from the receiver.
    #[error("unknown member `{0}`")]
    UnknownMember(String),

    /// A type name with no registered constructor.
    #[error("unknown constructor `{0}`")]
    UnknownConstructor(String),

    /// A callable was invoked with the wrong number of arguments.
    #[error("expected {expected} argument(s), got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Assignment or increment targeting something that has no mutable
    /// slot at run time.
    #[error("unsupported assignment target: {0} node")]
    UnsupportedTarget(NodeKind),

    /// A value that is neither a closure nor a native function was called.
    #[error("value of type {0} is not callable")]
    NotCallable(&'static str),

    /// Evaluation recursion exceeded the configured ceiling.
    #[error("evaluation depth {depth} exceeds the maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },
}
