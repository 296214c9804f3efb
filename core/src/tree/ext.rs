//! The open extension point.
//!
//! An extension node's primary tag is always `Extension`; its behavior is
//! fully determined by the secondary tag carried here. Visitors reach
//! extensions only through their dedicated extension hook, so adding a
//! variant to [`ExtExpr`] never touches the closed dispatch over
//! [`crate::tree::NodeKind`]. Dispatch over extensions is two-level
//! pattern matching, first on the primary kind and then on this union.

use crate::tree::expr::Expr;

/// Secondary tagged union behind the `Extension` node kind.
#[derive(Debug)]
pub enum ExtExpr<'a> {
    /// A named lambda declaration, the staging-level wrapper the reifier
    /// is driven from.
    LambdaDecl(LambdaDeclExpr<'a>),
}

impl ExtExpr<'_> {
    /// The secondary kind tag, used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            ExtExpr::LambdaDecl(_) => "lambda-decl",
        }
    }
}

/// A lambda carrying its declared name.
///
/// Unlike a bare lambda value, a declaration marks a scope boundary the
/// reifier can enter: reifying one produces source that reconstructs a
/// plain lambda with fresh parameter identities.
#[derive(Debug)]
pub struct LambdaDeclExpr<'a> {
    pub name: &'a str,
    pub body: &'a Expr<'a>,
    pub params: &'a [&'a Expr<'a>],
}
