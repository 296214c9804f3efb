//! Binary and unary operator kernels.
//!
//! Integer arithmetic wraps rather than panicking; division and remainder
//! by zero are errors. Float arithmetic follows IEEE 754 and produces
//! inf/nan instead of failing. Mixed int/float operands promote to float.

use crate::compile::error::EvalError;
use crate::compile::value::Value;
use crate::tree::{BinaryOp, UnaryOp};
use bumpalo::Bump;

/// Apply a non-assigning, non-short-circuit binary operator to two values.
///
/// `AndAlso`/`OrElse` (need lazy right operands), `ArrayIndex`, and the
/// assignment family are dispatched by the evaluator itself and never
/// reach this kernel.
pub(super) fn apply_binary<'a>(
    arena: &'a Bump,
    op: BinaryOp,
    left: Value<'a>,
    right: Value<'a>,
) -> Result<Value<'a>, EvalError> {
    debug_assert!(
        !op.is_assignment() && !op.is_short_circuit() && op != BinaryOp::ArrayIndex,
        "operator {:?} is dispatched by the evaluator",
        op
    );

    match op {
        // Equality is structural and total: mismatched types are unequal.
        BinaryOp::Equal => return Ok(Value::Bool(left == right)),
        BinaryOp::NotEqual => return Ok(Value::Bool(left != right)),
        _ => {}
    }

    match (left, right) {
        (Value::Int(l), Value::Int(r)) => eval_binary_int(op, l, r),

        // Int promotes to float when either side is float.
        (Value::Float(_) | Value::Int(_), Value::Float(_) | Value::Int(_)) => {
            let l = left.as_number().unwrap_or_default();
            let r = right.as_number().unwrap_or_default();
            eval_binary_float(op, l, r)
        }

        (Value::Str(l), Value::Str(r)) => eval_binary_str(arena, op, l, r),

        (Value::Bool(l), Value::Bool(r)) => eval_binary_bool(op, l, r),

        (left, right) => Err(EvalError::TypeMismatch {
            expected: left.type_name(),
            got: right.type_name(),
        }),
    }
}

/// Apply a non-assigning unary operator to a value.
pub(super) fn apply_unary<'a>(op: UnaryOp, operand: Value<'a>) -> Result<Value<'a>, EvalError> {
    match (op, operand) {
        (UnaryOp::Negate, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::UnaryPlus, Value::Int(n)) => Ok(Value::Int(n)),
        (UnaryOp::UnaryPlus, Value::Float(x)) => Ok(Value::Float(x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::OnesComplement, Value::Int(n)) => Ok(Value::Int(!n)),

        (UnaryOp::Negate | UnaryOp::UnaryPlus, other) => Err(EvalError::TypeMismatch {
            expected: "number",
            got: other.type_name(),
        }),
        (UnaryOp::Not, other) => Err(EvalError::TypeMismatch {
            expected: "bool",
            got: other.type_name(),
        }),
        (UnaryOp::OnesComplement, other) => Err(EvalError::TypeMismatch {
            expected: "int",
            got: other.type_name(),
        }),

        (op, _) => unreachable!("operator {:?} is dispatched by the evaluator", op),
    }
}

fn eval_binary_int<'a>(op: BinaryOp, left: i64, right: i64) -> Result<Value<'a>, EvalError> {
    let value = match op {
        BinaryOp::Add => Value::Int(left.wrapping_add(right)),
        BinaryOp::Subtract => Value::Int(left.wrapping_sub(right)),
        BinaryOp::Multiply => Value::Int(left.wrapping_mul(right)),
        BinaryOp::Divide => {
            if right == 0 {
                return Err(EvalError::DivisionByZero);
            }
            // wrapping_div handles the i64::MIN / -1 case.
            Value::Int(left.wrapping_div(right))
        }
        BinaryOp::Modulo => {
            if right == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Value::Int(left.wrapping_rem(right))
        }
        BinaryOp::And => Value::Int(left & right),
        BinaryOp::Or => Value::Int(left | right),
        BinaryOp::ExclusiveOr => Value::Int(left ^ right),
        // Shift counts are masked to the word size.
        BinaryOp::LeftShift => Value::Int(left.wrapping_shl((right & 63) as u32)),
        BinaryOp::RightShift => Value::Int(left.wrapping_shr((right & 63) as u32)),
        BinaryOp::LessThan => Value::Bool(left < right),
        BinaryOp::LessThanOrEqual => Value::Bool(left <= right),
        BinaryOp::GreaterThan => Value::Bool(left > right),
        BinaryOp::GreaterThanOrEqual => Value::Bool(left >= right),
        op => unreachable!("operator {:?} is dispatched by the evaluator", op),
    };
    Ok(value)
}

fn eval_binary_float<'a>(op: BinaryOp, left: f64, right: f64) -> Result<Value<'a>, EvalError> {
    let value = match op {
        BinaryOp::Add => Value::Float(left + right),
        BinaryOp::Subtract => Value::Float(left - right),
        BinaryOp::Multiply => Value::Float(left * right),
        // Division by zero produces inf per IEEE 754.
        BinaryOp::Divide => Value::Float(left / right),
        BinaryOp::Modulo => Value::Float(left % right),
        BinaryOp::LessThan => Value::Bool(left < right),
        BinaryOp::LessThanOrEqual => Value::Bool(left <= right),
        BinaryOp::GreaterThan => Value::Bool(left > right),
        BinaryOp::GreaterThanOrEqual => Value::Bool(left >= right),
        _ => {
            return Err(EvalError::TypeMismatch {
                expected: "int",
                got: "float",
            });
        }
    };
    Ok(value)
}

fn eval_binary_str<'a>(
    arena: &'a Bump,
    op: BinaryOp,
    left: &'a str,
    right: &'a str,
) -> Result<Value<'a>, EvalError> {
    let value = match op {
        BinaryOp::Add => {
            let mut combined = crate::String::with_capacity(left.len() + right.len());
            combined.push_str(left);
            combined.push_str(right);
            Value::Str(arena.alloc_str(&combined))
        }
        BinaryOp::LessThan => Value::Bool(left < right),
        BinaryOp::LessThanOrEqual => Value::Bool(left <= right),
        BinaryOp::GreaterThan => Value::Bool(left > right),
        BinaryOp::GreaterThanOrEqual => Value::Bool(left >= right),
        _ => {
            return Err(EvalError::TypeMismatch {
                expected: "number",
                got: "string",
            });
        }
    };
    Ok(value)
}

fn eval_binary_bool<'a>(op: BinaryOp, left: bool, right: bool) -> Result<Value<'a>, EvalError> {
    let value = match op {
        // Eager logical forms; the short-circuit forms never reach here.
        BinaryOp::And => Value::Bool(left & right),
        BinaryOp::Or => Value::Bool(left | right),
        BinaryOp::ExclusiveOr => Value::Bool(left ^ right),
        _ => {
            return Err(EvalError::TypeMismatch {
                expected: "number",
                got: "bool",
            });
        }
    };
    Ok(value)
}
