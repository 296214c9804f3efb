//! Tree measurement for the compile-time size ceiling.
//!
//! The compiler is synchronous and has no cancellation point, so cost is
//! bounded up front: the tree is measured before lowering, and a tree past
//! the configured ceiling is rejected as a whole.

use crate::errors::Error;
use crate::tree::{
    BinaryExpr, CallExpr, ConditionalExpr, Expr, ExtExpr, IndexExpr, InvokeExpr, LambdaExpr,
    Literal, MemberExpr, NewExpr, UnaryExpr,
};
use crate::visit::Folder;

/// Node count and maximum depth of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeSize {
    pub nodes: usize,
    pub depth: usize,
}

/// Folder that counts nodes and tracks depth.
///
/// Extension nodes are rejected: a tree headed for the evaluator must be
/// extension-free, and measuring is the gate where that is enforced.
struct TreeMeter {
    nodes: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Folder<'a> for TreeMeter {
    type Output = ();

    fn fold_expr(&mut self, node: &'a Expr<'a>) -> Result<(), Error> {
        self.nodes += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);

        let result = self.super_fold_expr(node);

        self.depth -= 1;
        result
    }

    fn fold_constant(&mut self, _node: &'a Expr<'a>, _value: &'a Literal<'a>) -> Result<(), Error> {
        Ok(())
    }

    fn fold_parameter(&mut self, _node: &'a Expr<'a>, _name: &'a str) -> Result<(), Error> {
        Ok(())
    }

    fn fold_unary(&mut self, _node: &'a Expr<'a>, unary: &'a UnaryExpr<'a>) -> Result<(), Error> {
        self.fold_expr(unary.operand)
    }

    fn fold_binary(&mut self, _node: &'a Expr<'a>, binary: &'a BinaryExpr<'a>) -> Result<(), Error> {
        self.fold_expr(binary.left)?;
        self.fold_expr(binary.right)
    }

    fn fold_conditional(
        &mut self,
        _node: &'a Expr<'a>,
        cond: &'a ConditionalExpr<'a>,
    ) -> Result<(), Error> {
        self.fold_expr(cond.test)?;
        self.fold_expr(cond.if_true)?;
        self.fold_expr(cond.if_false)
    }

    fn fold_lambda(&mut self, _node: &'a Expr<'a>, lambda: &'a LambdaExpr<'a>) -> Result<(), Error> {
        self.fold_expr(lambda.body)?;
        self.fold_many(lambda.params)?;
        Ok(())
    }

    fn fold_invoke(&mut self, _node: &'a Expr<'a>, invoke: &'a InvokeExpr<'a>) -> Result<(), Error> {
        self.fold_expr(invoke.callee)?;
        self.fold_many(invoke.args)?;
        Ok(())
    }

    fn fold_call(&mut self, _node: &'a Expr<'a>, call: &'a CallExpr<'a>) -> Result<(), Error> {
        self.fold_opt(call.receiver)?;
        self.fold_many(call.args)?;
        Ok(())
    }

    fn fold_new(&mut self, _node: &'a Expr<'a>, new: &'a NewExpr<'a>) -> Result<(), Error> {
        self.fold_many(new.args)?;
        Ok(())
    }

    fn fold_member(&mut self, _node: &'a Expr<'a>, member: &'a MemberExpr<'a>) -> Result<(), Error> {
        self.fold_opt(member.receiver)?;
        Ok(())
    }

    fn fold_index(&mut self, _node: &'a Expr<'a>, index: &'a IndexExpr<'a>) -> Result<(), Error> {
        self.fold_expr(index.receiver)?;
        self.fold_many(index.args)?;
        Ok(())
    }

    fn fold_extension(&mut self, _node: &'a Expr<'a>, ext: &'a ExtExpr<'a>) -> Result<(), Error> {
        Err(Error::UnsupportedExtension(ext.tag()))
    }
}

/// Measure a tree's node count and maximum depth.
pub fn measure<'a>(expr: &'a Expr<'a>) -> Result<TreeSize, Error> {
    let mut meter = TreeMeter {
        nodes: 0,
        depth: 0,
        max_depth: 0,
    };
    meter.fold_expr(expr)?;
    Ok(TreeSize {
        nodes: meter.nodes,
        depth: meter.max_depth,
    })
}
