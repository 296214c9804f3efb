//! Lowering trees to callables and to script source.
//!
//! Two backends share one contract:
//!
//! - [`script::emit`] lowers a tree to script source text through a
//!   stack-based folder, and [`script::emit_loader`] wraps a lambda as a
//!   directly-invoked producer for hosts that load code from text.
//! - [`Compiler::compile`] returns a [`CompiledLambda`] that evaluates the
//!   IR directly, with the same operator semantics and evaluation order as
//!   the emitted text. No textual intermediate, no dynamic load step.
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use ramus_core::compile::{Compiler, Value};
//! use ramus_core::tree::{BinaryOp, ExprBuilder};
//!
//! let arena = Bump::new();
//! let b = ExprBuilder::new(&arena);
//!
//! // (x) => x + 1
//! let x = b.parameter("x");
//! let lambda = b.lambda(b.binary(BinaryOp::Add, x, b.int(1)), &[x]).unwrap();
//!
//! let compiler = Compiler::default();
//! let f = compiler.compile(lambda).unwrap();
//! let result = f.call(&arena, &[Value::Int(41)]).unwrap();
//! assert_eq!(result, Value::Int(42));
//! ```

mod error;
mod eval;
mod host;
mod limits;
mod operators;
pub mod script;
mod value;


pub use error::EvalError;
pub use host::HostEnv;
pub use limits::{TreeSize, measure};
pub use value::{Closure, NativeFn, Value};

use crate::errors::Error;
use crate::format;
use crate::scopes::ScopeFrame;
use crate::tree::{Expr, LambdaExpr};
use bumpalo::Bump;
use eval::Evaluator;

/// Caller-imposed cost ceilings.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Maximum node count accepted by `compile`.
    pub max_nodes: usize,
    /// Maximum evaluation recursion depth.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_nodes: 65_536,
            max_depth: 1_000,
        }
    }
}

/// Compiles lambda trees against a host environment.
///
/// The environment is built once through an init closure and shared
/// read-only by every lambda this compiler produces.
pub struct Compiler<'a> {
    env: HostEnv<'a>,
    options: CompileOptions,
}

impl<'a> Compiler<'a> {
    /// Create a compiler with a custom environment.
    ///
    /// ```
    /// use ramus_core::compile::{CompileOptions, Compiler, Value};
    ///
    /// let compiler = Compiler::new(CompileOptions::default(), |env| {
    ///     env.register("pi", Value::Float(3.14159));
    /// });
    /// # let _ = compiler;
    /// ```
    pub fn new(options: CompileOptions, init: impl FnOnce(&mut HostEnv<'a>)) -> Self {
        let mut env = HostEnv::new();
        init(&mut env);
        Self { env, options }
    }

    /// The host environment.
    pub fn env(&self) -> &HostEnv<'a> {
        &self.env
    }

    /// Lower a lambda-rooted tree to a callable.
    ///
    /// Fails with [`Error::InvalidOperation`] when the root is not a
    /// lambda, with [`Error::TreeTooLarge`] past the node ceiling, and
    /// with [`Error::UnsupportedExtension`] when an extension node is
    /// embedded in the tree (extensions are staging constructs; they have
    /// no runtime form).
    pub fn compile<'c>(&'c self, expr: &'a Expr<'a>) -> Result<CompiledLambda<'c, 'a>, Error> {
        let Some(lambda) = expr.as_lambda() else {
            return Err(Error::InvalidOperation(format!(
                "compile requires a lambda root, got a {} node",
                expr.node_kind()
            )));
        };

        let size = measure(expr)?;
        if size.nodes > self.options.max_nodes {
            return Err(Error::TreeTooLarge {
                nodes: size.nodes,
                limit: self.options.max_nodes,
            });
        }

        tracing::debug!(
            nodes = size.nodes,
            depth = size.depth,
            arity = lambda.params.len(),
            "compiled lambda"
        );

        Ok(CompiledLambda {
            lambda,
            env: &self.env,
            max_depth: self.options.max_depth,
        })
    }
}

impl Default for Compiler<'_> {
    fn default() -> Self {
        Self {
            env: HostEnv::new(),
            options: CompileOptions::default(),
        }
    }
}

/// A lambda lowered to a callable.
#[derive(Clone, Copy, Debug)]
pub struct CompiledLambda<'c, 'a> {
    lambda: &'a LambdaExpr<'a>,
    env: &'c HostEnv<'a>,
    max_depth: usize,
}

impl<'c, 'a> CompiledLambda<'c, 'a> {
    /// The declared parameter count.
    pub fn arity(&self) -> usize {
        self.lambda.params.len()
    }

    /// Invoke the callable. Result values are allocated in `arena`.
    pub fn call(&self, arena: &'a Bump, args: &[Value<'a>]) -> Result<Value<'a>, EvalError> {
        if args.len() != self.arity() {
            return Err(EvalError::ArityMismatch {
                expected: self.arity(),
                got: args.len(),
            });
        }

        let mut evaluator = Evaluator::new(arena, self.env, self.max_depth);
        let frame: ScopeFrame<'a, Value<'a>> = self
            .lambda
            .params
            .iter()
            .zip(args)
            .map(|(param, value)| (*param, *value))
            .collect();
        evaluator.push_frame(frame);
        evaluator.eval_expr(self.lambda.body)
    }
}
