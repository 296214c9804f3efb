//! Arena-backed node factories.
//!
//! `ExprBuilder` is a `Copy` wrapper over a bump arena; every factory
//! allocates one immutable node and hands back the `&Expr` that is its
//! identity from then on. There is no deduplication: building the same
//! constant twice yields two distinct handles, and that is what makes
//! pointer identity a usable notion of "the same node".

use crate::errors::Error;
use crate::format;
use crate::tree::expr::{
    BinaryExpr, CallExpr, ConditionalExpr, Expr, ExprKind, IndexExpr, InvokeExpr, LambdaExpr,
    MemberExpr, NewExpr, UnaryExpr,
};
use crate::tree::ext::{ExtExpr, LambdaDeclExpr};
use crate::tree::literal::Literal;
use crate::tree::ops::{BinaryOp, Op, UnaryOp};
use bumpalo::Bump;
use core::ptr;

/// Factory for expression nodes, one operation per node kind.
#[derive(Clone, Copy, Debug)]
pub struct ExprBuilder<'a> {
    arena: &'a Bump,
}

// Two builders are equal when they allocate from the same arena.
impl PartialEq for ExprBuilder<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.arena, other.arena)
    }
}

impl Eq for ExprBuilder<'_> {}

impl<'a> ExprBuilder<'a> {
    /// Create a builder allocating from `arena`.
    pub fn new(arena: &'a Bump) -> Self {
        Self { arena }
    }

    fn alloc(self, kind: ExprKind<'a>) -> &'a Expr<'a> {
        self.arena.alloc(Expr { kind })
    }

    fn alloc_children(self, children: &[&'a Expr<'a>]) -> &'a [&'a Expr<'a>] {
        self.arena.alloc_slice_copy(children)
    }

    /// A constant node.
    pub fn constant(self, value: Literal<'a>) -> &'a Expr<'a> {
        self.alloc(ExprKind::Constant(value))
    }

    /// An integer constant.
    pub fn int(self, value: i64) -> &'a Expr<'a> {
        self.constant(Literal::Int(value))
    }

    /// A floating-point constant.
    pub fn float(self, value: f64) -> &'a Expr<'a> {
        self.constant(Literal::Float(value))
    }

    /// A boolean constant.
    pub fn bool(self, value: bool) -> &'a Expr<'a> {
        self.constant(Literal::Bool(value))
    }

    /// A string constant. The text is copied into the arena.
    pub fn str(self, value: &str) -> &'a Expr<'a> {
        self.constant(Literal::Str(self.arena.alloc_str(value)))
    }

    /// The no-value constant.
    pub fn absent(self) -> &'a Expr<'a> {
        self.constant(Literal::Absent)
    }

    /// An array constant. The elements are copied into the arena.
    pub fn array(self, items: &[Literal<'a>]) -> &'a Expr<'a> {
        self.constant(Literal::Array(self.arena.alloc_slice_copy(items)))
    }

    /// A parameter node. Every call mints a fresh identity, even for a name
    /// already in use: binding is identity-based, never name-based.
    pub fn parameter(self, name: &str) -> &'a Expr<'a> {
        self.alloc(ExprKind::Parameter(self.arena.alloc_str(name)))
    }

    /// A unary node.
    pub fn unary(self, op: UnaryOp, operand: &'a Expr<'a>) -> &'a Expr<'a> {
        self.alloc(ExprKind::Unary(UnaryExpr { op, operand }))
    }

    /// A binary node.
    pub fn binary(self, op: BinaryOp, left: &'a Expr<'a>, right: &'a Expr<'a>) -> &'a Expr<'a> {
        self.alloc(ExprKind::Binary(BinaryExpr { op, left, right }))
    }

    /// A conditional node. The false branch is stored on its own, not
    /// aliased to the true branch.
    pub fn conditional(
        self,
        test: &'a Expr<'a>,
        if_true: &'a Expr<'a>,
        if_false: &'a Expr<'a>,
    ) -> &'a Expr<'a> {
        self.alloc(ExprKind::Conditional(ConditionalExpr {
            test,
            if_true,
            if_false,
        }))
    }

    /// A lambda node over a body and zero or more distinct parameter nodes.
    ///
    /// Fails with [`Error::InvalidArity`] when an element of `params` is
    /// not a parameter node or when the same parameter identity appears
    /// twice.
    pub fn lambda(
        self,
        body: &'a Expr<'a>,
        params: &[&'a Expr<'a>],
    ) -> Result<&'a Expr<'a>, Error> {
        self.check_params(params)?;
        Ok(self.alloc(ExprKind::Lambda(LambdaExpr {
            body,
            params: self.alloc_children(params),
        })))
    }

    /// An invocation of a computed callee.
    pub fn invoke(self, callee: &'a Expr<'a>, args: &[&'a Expr<'a>]) -> &'a Expr<'a> {
        self.alloc(ExprKind::Invoke(InvokeExpr {
            callee,
            args: self.alloc_children(args),
        }))
    }

    /// A named-method call on an optional receiver.
    pub fn call(
        self,
        receiver: Option<&'a Expr<'a>>,
        method: &str,
        args: &[&'a Expr<'a>],
    ) -> &'a Expr<'a> {
        self.alloc(ExprKind::Call(CallExpr {
            receiver,
            method: self.arena.alloc_str(method),
            args: self.alloc_children(args),
        }))
    }

    /// An object construction by type name.
    pub fn new_object(self, type_name: &str, args: &[&'a Expr<'a>]) -> &'a Expr<'a> {
        self.alloc(ExprKind::New(NewExpr {
            type_name: self.arena.alloc_str(type_name),
            args: self.alloc_children(args),
        }))
    }

    /// A property access on an optional receiver.
    pub fn member(self, receiver: Option<&'a Expr<'a>>, name: &str) -> &'a Expr<'a> {
        self.alloc(ExprKind::Member(MemberExpr {
            receiver,
            name: self.arena.alloc_str(name),
        }))
    }

    /// An indexer access.
    pub fn index(self, receiver: &'a Expr<'a>, args: &[&'a Expr<'a>]) -> &'a Expr<'a> {
        self.alloc(ExprKind::Index(IndexExpr {
            receiver,
            args: self.alloc_children(args),
        }))
    }

    /// An extension node from an already-built secondary payload.
    pub fn extension(self, ext: ExtExpr<'a>) -> &'a Expr<'a> {
        self.alloc(ExprKind::Extension(self.arena.alloc(ext)))
    }

    /// A named lambda declaration (extension node). Parameter validation is
    /// the same as for [`ExprBuilder::lambda`].
    pub fn lambda_decl(
        self,
        name: &str,
        body: &'a Expr<'a>,
        params: &[&'a Expr<'a>],
    ) -> Result<&'a Expr<'a>, Error> {
        self.check_params(params)?;
        Ok(self.extension(ExtExpr::LambdaDecl(LambdaDeclExpr {
            name: self.arena.alloc_str(name),
            body,
            params: self.alloc_children(params),
        })))
    }

    /// Generic constructor for when the operator kind is only known at run
    /// time. Checks the operand count against the operator's arity and
    /// fails with [`Error::InvalidArity`] on mismatch.
    pub fn compound(self, op: Op, operands: &[&'a Expr<'a>]) -> Result<&'a Expr<'a>, Error> {
        match (op, operands) {
            (Op::Unary(op), &[operand]) => Ok(self.unary(op, operand)),
            (Op::Binary(op), &[left, right]) => Ok(self.binary(op, left, right)),
            (op, operands) => Err(Error::InvalidArity(format!(
                "operator {:?} expects {} operand(s), got {}",
                op,
                op.arity(),
                operands.len()
            ))),
        }
    }

    /// Every element is a parameter node and the list is identity-distinct.
    fn check_params(self, params: &[&'a Expr<'a>]) -> Result<(), Error> {
        for (i, param) in params.iter().enumerate() {
            if !param.is_parameter() {
                return Err(Error::InvalidArity(format!(
                    "parameter list entry {} is a {} node, expected a parameter",
                    i,
                    param.node_kind()
                )));
            }
            if params[..i].iter().any(|seen| ptr::eq(*seen, *param)) {
                return Err(Error::InvalidArity(format!(
                    "parameter `{}` is declared twice in the same list",
                    param.parameter_name().unwrap_or_default()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_parameter_rejected() {
        let arena = Bump::new();
        let b = ExprBuilder::new(&arena);
        let x = b.parameter("x");
        let err = b.lambda(x, &[x, x]).unwrap_err();
        assert!(matches!(err, Error::InvalidArity(_)));
    }

    #[test]
    fn test_same_name_distinct_identity_accepted() {
        let arena = Bump::new();
        let b = ExprBuilder::new(&arena);
        // Two parameters named "x" are different binders.
        let x1 = b.parameter("x");
        let x2 = b.parameter("x");
        let lambda = b.lambda(x1, &[x1, x2]).unwrap();
        let node = lambda.as_lambda().unwrap();
        assert_eq!(node.params.len(), 2);
        assert!(!core::ptr::eq(node.params[0], node.params[1]));
    }

    #[test]
    fn test_non_parameter_in_list_rejected() {
        let arena = Bump::new();
        let b = ExprBuilder::new(&arena);
        let x = b.parameter("x");
        let one = b.int(1);
        let err = b.lambda(x, &[one]).unwrap_err();
        assert!(matches!(err, Error::InvalidArity(_)));
    }

    #[test]
    fn test_compound_arity_checked() {
        let arena = Bump::new();
        let b = ExprBuilder::new(&arena);
        let one = b.int(1);
        let two = b.int(2);

        let node = b.compound(Op::Binary(BinaryOp::Add), &[one, two]).unwrap();
        assert!(matches!(node.kind(), ExprKind::Binary(_)));

        let err = b.compound(Op::Binary(BinaryOp::Add), &[one]).unwrap_err();
        assert!(matches!(err, Error::InvalidArity(_)));

        let err = b
            .compound(Op::Unary(UnaryOp::Not), &[one, two])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArity(_)));
    }
}
