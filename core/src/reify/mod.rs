//! Lowering trees back to source that rebuilds them.
//!
//! Reification freezes a quoted lambda's *structure*: the output is source
//! text that, evaluated against the node-factory API (an [`ExprBuilder`]
//! in scope named `b`), reconstructs an equivalent tree with fresh
//! parameter identities. Splicing that text where the quoted fragment
//! stood and processing the file again yields a tree of the same shape,
//! parameters re-identified by position.
//!
//! Because the reconstructing code itself declares nested binders, binder
//! names are synthesized per scope (`p0_0`, `p1_0`, ...) instead of
//! reusing the quoted names; concatenating reifications of independently
//! authored expressions can therefore never capture each other's
//! parameters.
//!
//! [`ExprBuilder`]: crate::tree::ExprBuilder

mod reifier;

#[cfg(test)]
mod reify_test;

pub use reifier::Reifier;

use crate::String;
use crate::errors::Error;
use crate::format;
use crate::tree::{Expr, ExtExpr};
use crate::visit::Folder;

/// Reify a named lambda declaration to reconstruction source.
///
/// The root must be a lambda-declaration extension node: the declaration
/// is the entry point that establishes the first parameter scope. A bare
/// lambda anywhere in the tree is [`Error::InvalidOperation`].
pub fn reify<'a>(expr: &'a Expr<'a>) -> Result<String, Error> {
    match expr.as_extension() {
        Some(ExtExpr::LambdaDecl(_)) => {
            let mut reifier = Reifier::new();
            reifier.fold_expr(expr)
        }
        _ => Err(Error::InvalidOperation(format!(
            "reification starts at a lambda declaration, got a {} node",
            expr.node_kind()
        ))),
    }
}
