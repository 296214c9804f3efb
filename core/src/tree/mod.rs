//! The expression-tree node model.
//!
//! Trees are immutable, arena-allocated, and context-free: a node never
//! points at its parent, so any subtree can be shared by multiple parents.
//! All construction goes through [`ExprBuilder`]; all "modification" is
//! reconstruction through the `update` operations, which preserve the
//! original handle when nothing changed.

mod builder;
mod display;
mod expr;
mod ext;
mod literal;
mod ops;

#[cfg(test)]
mod expr_test;

pub use builder::ExprBuilder;
pub use display::TreePrinter;
pub use expr::{
    BinaryExpr, CallExpr, ConditionalExpr, Expr, ExprKind, IndexExpr, InvokeExpr, LambdaExpr,
    MemberExpr, NewExpr, NodeKind, UnaryExpr,
};
pub use ext::{ExtExpr, LambdaDeclExpr};
pub use literal::Literal;
pub use ops::{BinaryOp, Op, UnaryOp};
