//! Tree-walking evaluation.
//!
//! The evaluator interprets the IR directly instead of loading generated
//! text: same contract (tree in, callable out), no textual intermediate.
//! Operator semantics and evaluation order match the script lowering:
//! children left to right, test before the chosen branch, callee and
//! receiver before arguments.
//!
//! Trees are not type-checked, so the evaluator validates operand types as
//! it goes. Depth is tracked to keep adversarially deep trees or runaway
//! recursion from overflowing the real stack.

use crate::String;
use crate::compile::error::EvalError;
use crate::compile::host::HostEnv;
use crate::compile::operators;
use crate::compile::value::{Closure, Value};
use crate::scopes::{ParamScopes, ScopeFrame};
use crate::tree::{BinaryExpr, BinaryOp, Expr, ExprKind, UnaryOp};
use bumpalo::Bump;
use smallvec::SmallVec;

/// Evaluator for compiled lambdas.
pub(crate) struct Evaluator<'e, 'a> {
    arena: &'a Bump,
    env: &'e HostEnv<'a>,
    max_depth: usize,
    scopes: ParamScopes<'a, Value<'a>>,
    depth: usize,
}

impl<'e, 'a> Evaluator<'e, 'a> {
    pub(crate) fn new(arena: &'a Bump, env: &'e HostEnv<'a>, max_depth: usize) -> Self {
        Self {
            arena,
            env,
            max_depth,
            scopes: ParamScopes::new(),
            depth: 0,
        }
    }

    /// Install a parameter frame before evaluating a body.
    pub(crate) fn push_frame(&mut self, frame: ScopeFrame<'a, Value<'a>>) {
        self.scopes.push(frame);
    }

    /// Evaluate an expression node.
    pub(crate) fn eval_expr(&mut self, expr: &'a Expr<'a>) -> Result<Value<'a>, EvalError> {
        // Check depth before recursing.
        if self.depth >= self.max_depth {
            return Err(EvalError::StackOverflow {
                depth: self.depth,
                max_depth: self.max_depth,
            });
        }

        self.depth += 1;
        let result = self.eval_inner(expr);
        self.depth -= 1;

        result
    }

    fn eval_inner(&mut self, expr: &'a Expr<'a>) -> Result<Value<'a>, EvalError> {
        match expr.kind() {
            ExprKind::Constant(literal) => Ok(Value::from_literal(self.arena, literal)),

            &ExprKind::Parameter(name) => {
                // Binding is by identity; the name only serves the error.
                match self.scopes.lookup(expr) {
                    Some(value) => Ok(*value),
                    None => Err(EvalError::UnknownIdentifier(String::from(name))),
                }
            }

            ExprKind::Unary(unary) => match unary.op {
                // Quote lowers as transparent parentheses; evaluation
                // matches.
                UnaryOp::Quote => self.eval_expr(unary.operand),
                op if op.is_assigning() => self.eval_step(op, unary.operand),
                op => {
                    let operand = self.eval_expr(unary.operand)?;
                    operators::apply_unary(op, operand)
                }
            },

            ExprKind::Binary(binary) => {
                if binary.op.is_short_circuit() {
                    self.eval_short_circuit(binary)
                } else if binary.op == BinaryOp::ArrayIndex {
                    let receiver = self.eval_expr(binary.left)?;
                    let key = self.eval_expr(binary.right)?;
                    self.index_value(receiver, key)
                } else if binary.op.is_assignment() {
                    self.eval_assign(binary)
                } else {
                    let left = self.eval_expr(binary.left)?;
                    let right = self.eval_expr(binary.right)?;
                    operators::apply_binary(self.arena, binary.op, left, right)
                }
            }

            ExprKind::Conditional(cond) => {
                let test = self.eval_expr(cond.test)?.as_bool()?;
                // Only the chosen branch is evaluated.
                if test {
                    self.eval_expr(cond.if_true)
                } else {
                    self.eval_expr(cond.if_false)
                }
            }

            ExprKind::Lambda(lambda) => {
                // Capture the visible bindings by value.
                let captures = self.scopes.flatten();
                let closure = self.arena.alloc(Closure {
                    lambda,
                    captures: self.arena.alloc_slice_copy(&captures),
                });
                Ok(Value::Function(closure))
            }

            ExprKind::Invoke(invoke) => {
                let callee = self.eval_expr(invoke.callee)?;
                let args = self.eval_args(invoke.args)?;
                self.call_value(callee, &args)
            }

            ExprKind::Call(call) => match call.receiver {
                None => {
                    let callee = self
                        .env
                        .global(call.method)
                        .ok_or_else(|| EvalError::UnknownIdentifier(String::from(call.method)))?;
                    let args = self.eval_args(call.args)?;
                    self.call_value(callee, &args)
                }
                Some(receiver) => {
                    let receiver = self.eval_expr(receiver)?;
                    let method = match receiver {
                        Value::Record(_) => receiver
                            .field(call.method)
                            .ok_or_else(|| EvalError::UnknownMember(String::from(call.method)))?,
                        other => {
                            return Err(EvalError::TypeMismatch {
                                expected: "record",
                                got: other.type_name(),
                            });
                        }
                    };
                    let args = self.eval_args(call.args)?;
                    self.call_value(method, &args)
                }
            },

            ExprKind::New(new) => {
                let ctor = self
                    .env
                    .constructor(new.type_name)
                    .ok_or_else(|| EvalError::UnknownConstructor(String::from(new.type_name)))?;
                let args = self.eval_args(new.args)?;
                (ctor.run)(self.arena, &args)
            }

            ExprKind::Member(member) => match member.receiver {
                None => self
                    .env
                    .global(member.name)
                    .ok_or_else(|| EvalError::UnknownIdentifier(String::from(member.name))),
                Some(receiver) => {
                    let receiver = self.eval_expr(receiver)?;
                    match receiver {
                        Value::Record(_) => receiver
                            .field(member.name)
                            .ok_or_else(|| EvalError::UnknownMember(String::from(member.name))),
                        other => Err(EvalError::TypeMismatch {
                            expected: "record",
                            got: other.type_name(),
                        }),
                    }
                }
            },

            ExprKind::Index(index) => {
                let receiver = self.eval_expr(index.receiver)?;
                if index.args.len() != 1 {
                    return Err(EvalError::ArityMismatch {
                        expected: 1,
                        got: index.args.len(),
                    });
                }
                let key = self.eval_expr(index.args[0])?;
                self.index_value(receiver, key)
            }

            ExprKind::Extension(_) => {
                unreachable!("extension nodes are rejected when the tree is measured")
            }
        }
    }

    /// `&&`/`||` with a lazily evaluated right operand.
    fn eval_short_circuit(&mut self, binary: &'a BinaryExpr<'a>) -> Result<Value<'a>, EvalError> {
        let left = self.eval_expr(binary.left)?.as_bool()?;
        match binary.op {
            BinaryOp::AndAlso => {
                if !left {
                    return Ok(Value::Bool(false));
                }
            }
            BinaryOp::OrElse => {
                if left {
                    return Ok(Value::Bool(true));
                }
            }
            op => unreachable!("{:?} is not a short-circuit operator", op),
        }
        let right = self.eval_expr(binary.right)?.as_bool()?;
        Ok(Value::Bool(right))
    }

    /// Assignment family. Only parameter slots are writable.
    fn eval_assign(&mut self, binary: &'a BinaryExpr<'a>) -> Result<Value<'a>, EvalError> {
        let target = binary.left;
        let Some(name) = target.parameter_name() else {
            return Err(EvalError::UnsupportedTarget(target.node_kind()));
        };

        let value = match binary.op.compound_base() {
            None => self.eval_expr(binary.right)?,
            Some(base) => {
                // The slot is read before the right operand runs.
                let current = *self
                    .scopes
                    .lookup(target)
                    .ok_or_else(|| EvalError::UnknownIdentifier(String::from(name)))?;
                let right = self.eval_expr(binary.right)?;
                operators::apply_binary(self.arena, base, current, right)?
            }
        };

        if !self.scopes.assign(target, value) {
            return Err(EvalError::UnknownIdentifier(String::from(name)));
        }
        Ok(value)
    }

    /// Increment/decrement family. Pre-forms yield the new value,
    /// post-forms the old one.
    fn eval_step(&mut self, op: UnaryOp, operand: &'a Expr<'a>) -> Result<Value<'a>, EvalError> {
        let Some(name) = operand.parameter_name() else {
            return Err(EvalError::UnsupportedTarget(operand.node_kind()));
        };
        let current = *self
            .scopes
            .lookup(operand)
            .ok_or_else(|| EvalError::UnknownIdentifier(String::from(name)))?;

        let next = match current {
            Value::Int(n) => Value::Int(n.wrapping_add(op.step())),
            Value::Float(x) => Value::Float(x + op.step() as f64),
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: "number",
                    got: other.type_name(),
                });
            }
        };

        let assigned = self.scopes.assign(operand, next);
        debug_assert!(assigned, "lookup succeeded but assign missed");

        Ok(if op.is_postfix() { current } else { next })
    }

    fn index_value(&self, receiver: Value<'a>, key: Value<'a>) -> Result<Value<'a>, EvalError> {
        match receiver {
            Value::Array(items) => {
                let index = key.as_int()?;
                // Negative indices count from the end.
                let actual = if index < 0 {
                    let adjusted = items.len() as i64 + index;
                    if adjusted < 0 {
                        return Err(EvalError::IndexOutOfBounds {
                            index,
                            len: items.len(),
                        });
                    }
                    adjusted as usize
                } else {
                    index as usize
                };
                items.get(actual).copied().ok_or(EvalError::IndexOutOfBounds {
                    index,
                    len: items.len(),
                })
            }
            Value::Record(_) => {
                let name = key.as_str()?;
                receiver
                    .field(name)
                    .ok_or_else(|| EvalError::UnknownMember(String::from(name)))
            }
            other => Err(EvalError::TypeMismatch {
                expected: "array",
                got: other.type_name(),
            }),
        }
    }

    fn eval_args(
        &mut self,
        args: &'a [&'a Expr<'a>],
    ) -> Result<SmallVec<[Value<'a>; 4]>, EvalError> {
        let mut values = SmallVec::new();
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        Ok(values)
    }

    /// Invoke a closure or native function value.
    pub(crate) fn call_value(
        &mut self,
        callee: Value<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError> {
        match callee {
            Value::Function(closure) => self.call_closure(closure, args),
            Value::Native(native) => (native.run)(self.arena, args),
            other => Err(EvalError::NotCallable(other.type_name())),
        }
    }

    fn call_closure(
        &mut self,
        closure: &'a Closure<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError> {
        let params = closure.lambda.params;
        if args.len() != params.len() {
            return Err(EvalError::ArityMismatch {
                expected: params.len(),
                got: args.len(),
            });
        }

        // Lexical scoping: the body sees the closure's captures and its own
        // parameters, never the caller's frames.
        let saved = core::mem::replace(&mut self.scopes, ParamScopes::new());
        self.scopes.push(closure.captures.to_vec());
        self.scopes
            .push(params.iter().zip(args).map(|(p, v)| (*p, *v)).collect());

        let result = self.eval_expr(closure.lambda.body);

        self.scopes = saved;
        result
    }
}
