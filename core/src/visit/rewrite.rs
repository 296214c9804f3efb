//! Structure-preserving tree rewriting.
//!
//! A [`Rewriter`] walks a tree and produces a new tree of the same node
//! kinds. The default behavior for every kind is to rewrite the children
//! and then `update` the node, which returns the original handle when no
//! child changed, so an untouched subtree is shared rather than copied. A
//! concrete rewriter overrides only the kinds it wants to transform.
//!
//! Extension nodes have no default: a rewriter that receives one it does
//! not recognize fails with [`Error::UnsupportedExtension`] instead of
//! dropping or passing it through silently.

use crate::Vec;
use crate::errors::Error;
use crate::tree::{
    BinaryExpr, CallExpr, ConditionalExpr, Expr, ExprBuilder, ExprKind, ExtExpr, IndexExpr,
    InvokeExpr, LambdaExpr, Literal, MemberExpr, NewExpr, UnaryExpr,
};

/// Trait for rewriting trees with structural sharing.
///
/// `builder` supplies the arena for any node that does need reallocating;
/// a pure identity pass never allocates at all.
pub trait Rewriter<'a> {
    /// The builder used to reconstruct changed nodes.
    fn builder(&self) -> ExprBuilder<'a>;

    /// Rewrite one node.
    fn rewrite_expr(&mut self, node: &'a Expr<'a>) -> Result<&'a Expr<'a>, Error> {
        self.super_rewrite_expr(node)
    }

    /// Dispatch on the node kind. Not meant to be overridden.
    fn super_rewrite_expr(&mut self, node: &'a Expr<'a>) -> Result<&'a Expr<'a>, Error> {
        match node.kind() {
            ExprKind::Constant(value) => self.rewrite_constant(node, value),
            &ExprKind::Parameter(name) => self.rewrite_parameter(node, name),
            ExprKind::Unary(unary) => self.rewrite_unary(node, unary),
            ExprKind::Binary(binary) => self.rewrite_binary(node, binary),
            ExprKind::Conditional(cond) => self.rewrite_conditional(node, cond),
            ExprKind::Lambda(lambda) => self.rewrite_lambda(node, lambda),
            ExprKind::Invoke(invoke) => self.rewrite_invoke(node, invoke),
            ExprKind::Call(call) => self.rewrite_call(node, call),
            ExprKind::New(new) => self.rewrite_new(node, new),
            ExprKind::Member(member) => self.rewrite_member(node, member),
            ExprKind::Index(index) => self.rewrite_index(node, index),
            &ExprKind::Extension(ext) => self.rewrite_extension(node, ext),
        }
    }

    fn rewrite_constant(
        &mut self,
        node: &'a Expr<'a>,
        _value: &'a Literal<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        Ok(node)
    }

    fn rewrite_parameter(
        &mut self,
        node: &'a Expr<'a>,
        _name: &'a str,
    ) -> Result<&'a Expr<'a>, Error> {
        Ok(node)
    }

    fn rewrite_unary(
        &mut self,
        node: &'a Expr<'a>,
        unary: &'a UnaryExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        let operand = self.rewrite_expr(unary.operand)?;
        Ok(node.update_unary(self.builder(), operand))
    }

    fn rewrite_binary(
        &mut self,
        node: &'a Expr<'a>,
        binary: &'a BinaryExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        let left = self.rewrite_expr(binary.left)?;
        let right = self.rewrite_expr(binary.right)?;
        Ok(node.update_binary(self.builder(), left, right))
    }

    fn rewrite_conditional(
        &mut self,
        node: &'a Expr<'a>,
        cond: &'a ConditionalExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        let test = self.rewrite_expr(cond.test)?;
        let if_true = self.rewrite_expr(cond.if_true)?;
        let if_false = self.rewrite_expr(cond.if_false)?;
        Ok(node.update_conditional(self.builder(), test, if_true, if_false))
    }

    fn rewrite_lambda(
        &mut self,
        node: &'a Expr<'a>,
        lambda: &'a LambdaExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        let body = self.rewrite_expr(lambda.body)?;
        let params = self.rewrite_many(lambda.params)?;
        node.update_lambda(self.builder(), body, &params)
    }

    fn rewrite_invoke(
        &mut self,
        node: &'a Expr<'a>,
        invoke: &'a InvokeExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        let callee = self.rewrite_expr(invoke.callee)?;
        let args = self.rewrite_many(invoke.args)?;
        Ok(node.update_invoke(self.builder(), callee, &args))
    }

    fn rewrite_call(
        &mut self,
        node: &'a Expr<'a>,
        call: &'a CallExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        let receiver = self.rewrite_opt(call.receiver)?;
        let args = self.rewrite_many(call.args)?;
        Ok(node.update_call(self.builder(), receiver, &args))
    }

    fn rewrite_new(
        &mut self,
        node: &'a Expr<'a>,
        new: &'a NewExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        let args = self.rewrite_many(new.args)?;
        Ok(node.update_new(self.builder(), &args))
    }

    fn rewrite_member(
        &mut self,
        node: &'a Expr<'a>,
        member: &'a MemberExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        let receiver = self.rewrite_opt(member.receiver)?;
        Ok(node.update_member(self.builder(), receiver))
    }

    fn rewrite_index(
        &mut self,
        node: &'a Expr<'a>,
        index: &'a IndexExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        let receiver = self.rewrite_expr(index.receiver)?;
        let args = self.rewrite_many(index.args)?;
        Ok(node.update_index(self.builder(), receiver, &args))
    }

    /// No default traversal for extensions: failing loudly beats silently
    /// returning a node whose children were never visited.
    fn rewrite_extension(
        &mut self,
        _node: &'a Expr<'a>,
        ext: &'a ExtExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        Err(Error::UnsupportedExtension(ext.tag()))
    }

    /// Rewrite an optional child. An empty tree position stays empty.
    fn rewrite_opt(
        &mut self,
        node: Option<&'a Expr<'a>>,
    ) -> Result<Option<&'a Expr<'a>>, Error> {
        match node {
            Some(node) => Ok(Some(self.rewrite_expr(node)?)),
            None => Ok(None),
        }
    }

    /// Rewrite an ordered list of children, left to right.
    fn rewrite_many(&mut self, nodes: &[&'a Expr<'a>]) -> Result<Vec<&'a Expr<'a>>, Error> {
        let mut results = Vec::with_capacity(nodes.len());
        for node in nodes {
            results.push(self.rewrite_expr(node)?);
        }
        Ok(results)
    }
}
