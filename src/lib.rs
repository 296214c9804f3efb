//! Ramus - expression trees as first-class, inspectable data
//!
//! # Overview
//!
//! Ramus models executable computations as immutable expression trees that
//! can be inspected, rewritten, compiled into callables, and reified back
//! into source text that reconstructs them. The same IR serves use cases
//! like query providers, embeddable rule engines, and staged/quoted-code
//! tooling:
//!
//! - **Node model**: a closed taxonomy of tree shapes built through
//!   [`ExprBuilder`], plus an `Extension` escape hatch for new shapes.
//! - **Rewriter**: structure-preserving traversal with reference-identity
//!   structural sharing - an untouched subtree is never copied.
//! - **Folder**: a generic fold producing any per-node result type.
//! - **Compiler**: lowers a lambda tree to a [`CompiledLambda`] callable
//!   (a tree-walking backend; no textual intermediate), and to script
//!   source text through [`compile::script`].
//! - **Reifier**: lowers a lambda declaration to Rust source that rebuilds
//!   an equivalent tree, alpha-renaming binders to avoid capture.
//!
//! # Quick Start
//!
//! ```
//! use ramus::{BinaryOp, Bump, Compiler, ExprBuilder, Value};
//!
//! // Trees live in an arena; handles are plain references.
//! let arena = Bump::new();
//! let b = ExprBuilder::new(&arena);
//!
//! // (x) => x + 1
//! let x = b.parameter("x");
//! let lambda = b.lambda(b.binary(BinaryOp::Add, x, b.int(1)), &[x]).unwrap();
//!
//! // Compile to a callable and invoke it.
//! let compiler = Compiler::default();
//! let f = compiler.compile(lambda).unwrap();
//! assert_eq!(f.call(&arena, &[Value::Int(41)]).unwrap(), Value::Int(42));
//!
//! // Or lower the same tree to script text.
//! let source = ramus::compile::script::emit(lambda).unwrap();
//! assert_eq!(source, "function(x) { return (x + 1); }");
//! ```
//!
//! # Reification
//!
//! ```
//! use ramus::{BinaryOp, Bump, ExprBuilder, reify};
//!
//! let arena = Bump::new();
//! let b = ExprBuilder::new(&arena);
//!
//! // A named declaration marks the scope boundary the reifier enters.
//! let x = b.parameter("x");
//! let decl = b
//!     .lambda_decl("inc", b.binary(BinaryOp::Add, x, b.int(1)), &[x])
//!     .unwrap();
//!
//! // The output is source that, with a builder `b` in scope, rebuilds an
//! // equivalent tree with fresh parameter identities.
//! let source = reify(decl).unwrap();
//! assert!(source.starts_with("b.parameter(\"x\").let_in(|p0_0|"));
//! ```

pub use ramus_core::{compile, errors, reify, scopes, tree, visit};

pub use ramus_core::Error;
pub use ramus_core::compile::{
    CompileOptions, CompiledLambda, Compiler, EvalError, HostEnv, NativeFn, TreeSize, Value,
    measure,
};
pub use ramus_core::reify::{Reifier, reify};

pub use ramus_core::scopes::ParamScopes;
pub use ramus_core::tree::{
    BinaryExpr, BinaryOp, CallExpr, ConditionalExpr, Expr, ExprBuilder, ExprKind, ExtExpr,
    IndexExpr, InvokeExpr, LambdaDeclExpr, LambdaExpr, Literal, MemberExpr, NewExpr, NodeKind, Op,
    TreePrinter, UnaryExpr, UnaryOp,
};
pub use ramus_core::visit::{Folder, Rewriter};

// The arena type trees are allocated in, re-exported so callers don't need
// a direct bumpalo dependency.
pub use bumpalo::Bump;
