//! Generic fold over expression trees.
//!
//! A [`Folder`] maps every node to a caller-chosen `Output`. There is no
//! structural default: a folder must supply a handler for every node kind
//! it will encounter, and an inherited handler fails with
//! [`Error::NotImplemented`] rather than guessing. Both the script
//! compiler and the reifier are folders.

use crate::Vec;
use crate::errors::Error;
use crate::tree::{
    BinaryExpr, CallExpr, ConditionalExpr, Expr, ExprKind, ExtExpr, IndexExpr, InvokeExpr,
    LambdaExpr, Literal, MemberExpr, NewExpr, NodeKind, UnaryExpr,
};

/// Trait for folding a tree into a value of an arbitrary result type.
///
/// Override `fold_expr` to hook every node (bookkeeping such as depth or
/// node counting) and call `super_fold_expr` to dispatch; override the
/// per-kind methods to define the fold itself.
pub trait Folder<'a> {
    /// The type of value produced per node.
    type Output;

    /// Fold one node.
    fn fold_expr(&mut self, node: &'a Expr<'a>) -> Result<Self::Output, Error> {
        self.super_fold_expr(node)
    }

    /// Dispatch on the node kind. Not meant to be overridden.
    fn super_fold_expr(&mut self, node: &'a Expr<'a>) -> Result<Self::Output, Error> {
        match node.kind() {
            ExprKind::Constant(value) => self.fold_constant(node, value),
            &ExprKind::Parameter(name) => self.fold_parameter(node, name),
            ExprKind::Unary(unary) => self.fold_unary(node, unary),
            ExprKind::Binary(binary) => self.fold_binary(node, binary),
            ExprKind::Conditional(cond) => self.fold_conditional(node, cond),
            ExprKind::Lambda(lambda) => self.fold_lambda(node, lambda),
            ExprKind::Invoke(invoke) => self.fold_invoke(node, invoke),
            ExprKind::Call(call) => self.fold_call(node, call),
            ExprKind::New(new) => self.fold_new(node, new),
            ExprKind::Member(member) => self.fold_member(node, member),
            ExprKind::Index(index) => self.fold_index(node, index),
            &ExprKind::Extension(ext) => self.fold_extension(node, ext),
        }
    }

    fn fold_constant(
        &mut self,
        _node: &'a Expr<'a>,
        _value: &'a Literal<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Constant))
    }

    fn fold_parameter(
        &mut self,
        _node: &'a Expr<'a>,
        _name: &'a str,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Parameter))
    }

    fn fold_unary(
        &mut self,
        _node: &'a Expr<'a>,
        _unary: &'a UnaryExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Unary))
    }

    fn fold_binary(
        &mut self,
        _node: &'a Expr<'a>,
        _binary: &'a BinaryExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Binary))
    }

    fn fold_conditional(
        &mut self,
        _node: &'a Expr<'a>,
        _cond: &'a ConditionalExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Conditional))
    }

    fn fold_lambda(
        &mut self,
        _node: &'a Expr<'a>,
        _lambda: &'a LambdaExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Lambda))
    }

    fn fold_invoke(
        &mut self,
        _node: &'a Expr<'a>,
        _invoke: &'a InvokeExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Invoke))
    }

    fn fold_call(
        &mut self,
        _node: &'a Expr<'a>,
        _call: &'a CallExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Call))
    }

    fn fold_new(
        &mut self,
        _node: &'a Expr<'a>,
        _new: &'a NewExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::New))
    }

    fn fold_member(
        &mut self,
        _node: &'a Expr<'a>,
        _member: &'a MemberExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Member))
    }

    fn fold_index(
        &mut self,
        _node: &'a Expr<'a>,
        _index: &'a IndexExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Index))
    }

    fn fold_extension(
        &mut self,
        _node: &'a Expr<'a>,
        _ext: &'a ExtExpr<'a>,
    ) -> Result<Self::Output, Error> {
        Err(Error::NotImplemented(NodeKind::Extension))
    }

    /// Fold an optional child. An empty tree position folds to `None`.
    fn fold_opt(&mut self, node: Option<&'a Expr<'a>>) -> Result<Option<Self::Output>, Error> {
        match node {
            Some(node) => Ok(Some(self.fold_expr(node)?)),
            None => Ok(None),
        }
    }

    /// Fold an ordered list of children, left to right.
    ///
    /// Callers rely on the ordering for both side-effect sequencing and
    /// operand-stack discipline; do not reorder.
    fn fold_many(&mut self, nodes: &[&'a Expr<'a>]) -> Result<Vec<Self::Output>, Error> {
        let mut results = Vec::with_capacity(nodes.len());
        for node in nodes {
            results.push(self.fold_expr(node)?);
        }
        Ok(results)
    }
}
