//! Immutable expression nodes.
//!
//! Nodes are arena-allocated and handled as `&'a Expr<'a>`. A handle's
//! address is its identity: two parameters with the same name are distinct
//! binders unless they are the same allocation. Because nodes are immutable
//! a subtree may be shared by any number of parents, and `update` exploits
//! that by returning the original handle whenever every supplied child is
//! pointer-identical to the current one.

use crate::Vec;
use crate::errors::Error;
use crate::tree::builder::ExprBuilder;
use crate::tree::ext::ExtExpr;
use crate::tree::literal::Literal;
use crate::tree::ops::{BinaryOp, UnaryOp};
use core::fmt;
use core::ptr;

/// The primary tag of a node, used for dispatch diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Constant,
    Parameter,
    Unary,
    Binary,
    Conditional,
    Lambda,
    Invoke,
    Call,
    New,
    Member,
    Index,
    Extension,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Constant => "constant",
            NodeKind::Parameter => "parameter",
            NodeKind::Unary => "unary",
            NodeKind::Binary => "binary",
            NodeKind::Conditional => "conditional",
            NodeKind::Lambda => "lambda",
            NodeKind::Invoke => "invoke",
            NodeKind::Call => "call",
            NodeKind::New => "new",
            NodeKind::Member => "member",
            NodeKind::Index => "index",
            NodeKind::Extension => "extension",
        };
        f.write_str(name)
    }
}

/// Unary operation over one operand.
#[derive(Debug)]
pub struct UnaryExpr<'a> {
    pub op: UnaryOp,
    pub operand: &'a Expr<'a>,
}

/// Binary operation over two operands.
#[derive(Debug)]
pub struct BinaryExpr<'a> {
    pub op: BinaryOp,
    pub left: &'a Expr<'a>,
    pub right: &'a Expr<'a>,
}

/// Ternary conditional. `if_false` is stored independently of `if_true`.
#[derive(Debug)]
pub struct ConditionalExpr<'a> {
    pub test: &'a Expr<'a>,
    pub if_true: &'a Expr<'a>,
    pub if_false: &'a Expr<'a>,
}

/// Anonymous function value. Every element of `params` is a parameter node
/// and the list is identity-distinct; the builder enforces both.
#[derive(Debug)]
pub struct LambdaExpr<'a> {
    pub body: &'a Expr<'a>,
    pub params: &'a [&'a Expr<'a>],
}

/// Call of a computed callee.
#[derive(Debug)]
pub struct InvokeExpr<'a> {
    pub callee: &'a Expr<'a>,
    pub args: &'a [&'a Expr<'a>],
}

/// Named-method call. `receiver` may legitimately be empty (a free
/// function call).
#[derive(Debug)]
pub struct CallExpr<'a> {
    pub receiver: Option<&'a Expr<'a>>,
    pub method: &'a str,
    pub args: &'a [&'a Expr<'a>],
}

/// Object construction by type name.
#[derive(Debug)]
pub struct NewExpr<'a> {
    pub type_name: &'a str,
    pub args: &'a [&'a Expr<'a>],
}

/// Property access. `receiver` may be empty (a free identifier).
#[derive(Debug)]
pub struct MemberExpr<'a> {
    pub receiver: Option<&'a Expr<'a>>,
    pub name: &'a str,
}

/// Indexer access.
#[derive(Debug)]
pub struct IndexExpr<'a> {
    pub receiver: &'a Expr<'a>,
    pub args: &'a [&'a Expr<'a>],
}

/// The closed node taxonomy.
///
/// The one escape hatch is `Extension`, whose payload is a secondary
/// tagged union ([`ExtExpr`]); new tree shapes are added there without
/// touching this enum or the visitors' closed dispatch.
#[derive(Debug)]
pub enum ExprKind<'a> {
    Constant(Literal<'a>),
    Parameter(&'a str),
    Unary(UnaryExpr<'a>),
    Binary(BinaryExpr<'a>),
    Conditional(ConditionalExpr<'a>),
    Lambda(LambdaExpr<'a>),
    Invoke(InvokeExpr<'a>),
    Call(CallExpr<'a>),
    New(NewExpr<'a>),
    Member(MemberExpr<'a>),
    Index(IndexExpr<'a>),
    Extension(&'a ExtExpr<'a>),
}

/// An immutable expression node.
#[derive(Debug)]
pub struct Expr<'a> {
    pub(crate) kind: ExprKind<'a>,
}

/// Pointer identity of two handles.
fn same(a: &Expr<'_>, b: &Expr<'_>) -> bool {
    ptr::eq(a, b)
}

fn same_opt(a: Option<&Expr<'_>>, b: Option<&Expr<'_>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => ptr::eq(a, b),
        _ => false,
    }
}

/// Elementwise pointer identity. An equal-length list of identical handles
/// counts as unchanged even when the slice allocations differ.
fn same_list(a: &[&Expr<'_>], b: &[&Expr<'_>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| ptr::eq(*x, *y))
}

impl<'a> Expr<'a> {
    /// The node's shape.
    pub fn kind(&self) -> &ExprKind<'a> {
        &self.kind
    }

    /// The node's primary tag.
    pub fn node_kind(&self) -> NodeKind {
        match &self.kind {
            ExprKind::Constant(_) => NodeKind::Constant,
            ExprKind::Parameter(_) => NodeKind::Parameter,
            ExprKind::Unary(_) => NodeKind::Unary,
            ExprKind::Binary(_) => NodeKind::Binary,
            ExprKind::Conditional(_) => NodeKind::Conditional,
            ExprKind::Lambda(_) => NodeKind::Lambda,
            ExprKind::Invoke(_) => NodeKind::Invoke,
            ExprKind::Call(_) => NodeKind::Call,
            ExprKind::New(_) => NodeKind::New,
            ExprKind::Member(_) => NodeKind::Member,
            ExprKind::Index(_) => NodeKind::Index,
            ExprKind::Extension(_) => NodeKind::Extension,
        }
    }

    /// Check if this is a parameter node.
    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, ExprKind::Parameter(_))
    }

    /// The declared name, if this is a parameter node.
    pub fn parameter_name(&self) -> Option<&'a str> {
        match self.kind {
            ExprKind::Parameter(name) => Some(name),
            _ => None,
        }
    }

    /// The lambda payload, if this is a lambda node.
    pub fn as_lambda(&self) -> Option<&LambdaExpr<'a>> {
        match &self.kind {
            ExprKind::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }

    /// The extension payload, if this is an extension node.
    pub fn as_extension(&self) -> Option<&'a ExtExpr<'a>> {
        match self.kind {
            ExprKind::Extension(ext) => Some(ext),
            _ => None,
        }
    }

    /// The scoping combinator: applies `f` to this handle and returns the
    /// result. Reified source uses it to capture a freshly built parameter
    /// under a synthesized binder before reconstructing the body.
    pub fn let_in<R>(&'a self, f: impl FnOnce(&'a Expr<'a>) -> R) -> R {
        f(self)
    }

    /// Reconstruct a unary node from a possibly-new operand.
    pub fn update_unary(&'a self, builder: ExprBuilder<'a>, operand: &'a Expr<'a>) -> &'a Expr<'a> {
        let ExprKind::Unary(node) = &self.kind else {
            unreachable!("update_unary on a {} node", self.node_kind())
        };
        if same(node.operand, operand) {
            self
        } else {
            builder.unary(node.op, operand)
        }
    }

    /// Reconstruct a binary node from possibly-new operands.
    pub fn update_binary(
        &'a self,
        builder: ExprBuilder<'a>,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> &'a Expr<'a> {
        let ExprKind::Binary(node) = &self.kind else {
            unreachable!("update_binary on a {} node", self.node_kind())
        };
        if same(node.left, left) && same(node.right, right) {
            self
        } else {
            builder.binary(node.op, left, right)
        }
    }

    /// Reconstruct a conditional node from possibly-new children.
    pub fn update_conditional(
        &'a self,
        builder: ExprBuilder<'a>,
        test: &'a Expr<'a>,
        if_true: &'a Expr<'a>,
        if_false: &'a Expr<'a>,
    ) -> &'a Expr<'a> {
        let ExprKind::Conditional(node) = &self.kind else {
            unreachable!("update_conditional on a {} node", self.node_kind())
        };
        if same(node.test, test) && same(node.if_true, if_true) && same(node.if_false, if_false) {
            self
        } else {
            builder.conditional(test, if_true, if_false)
        }
    }

    /// Reconstruct a lambda node from possibly-new children.
    ///
    /// Fallible: a rewrite may have replaced a parameter with something
    /// that is not a parameter node, so the list is revalidated.
    pub fn update_lambda(
        &'a self,
        builder: ExprBuilder<'a>,
        body: &'a Expr<'a>,
        params: &[&'a Expr<'a>],
    ) -> Result<&'a Expr<'a>, Error> {
        let ExprKind::Lambda(node) = &self.kind else {
            unreachable!("update_lambda on a {} node", self.node_kind())
        };
        if same(node.body, body) && same_list(node.params, params) {
            Ok(self)
        } else {
            builder.lambda(body, params)
        }
    }

    /// Reconstruct an invocation node from possibly-new children.
    pub fn update_invoke(
        &'a self,
        builder: ExprBuilder<'a>,
        callee: &'a Expr<'a>,
        args: &[&'a Expr<'a>],
    ) -> &'a Expr<'a> {
        let ExprKind::Invoke(node) = &self.kind else {
            unreachable!("update_invoke on a {} node", self.node_kind())
        };
        if same(node.callee, callee) && same_list(node.args, args) {
            self
        } else {
            builder.invoke(callee, args)
        }
    }

    /// Reconstruct a call node from a possibly-new receiver and arguments.
    /// The method name is not a child and is carried over.
    pub fn update_call(
        &'a self,
        builder: ExprBuilder<'a>,
        receiver: Option<&'a Expr<'a>>,
        args: &[&'a Expr<'a>],
    ) -> &'a Expr<'a> {
        let ExprKind::Call(node) = &self.kind else {
            unreachable!("update_call on a {} node", self.node_kind())
        };
        if same_opt(node.receiver, receiver) && same_list(node.args, args) {
            self
        } else {
            builder.call(receiver, node.method, args)
        }
    }

    /// Reconstruct a construction node from possibly-new arguments.
    pub fn update_new(&'a self, builder: ExprBuilder<'a>, args: &[&'a Expr<'a>]) -> &'a Expr<'a> {
        let ExprKind::New(node) = &self.kind else {
            unreachable!("update_new on a {} node", self.node_kind())
        };
        if same_list(node.args, args) {
            self
        } else {
            builder.new_object(node.type_name, args)
        }
    }

    /// Reconstruct a member node from a possibly-new receiver.
    pub fn update_member(
        &'a self,
        builder: ExprBuilder<'a>,
        receiver: Option<&'a Expr<'a>>,
    ) -> &'a Expr<'a> {
        let ExprKind::Member(node) = &self.kind else {
            unreachable!("update_member on a {} node", self.node_kind())
        };
        if same_opt(node.receiver, receiver) {
            self
        } else {
            builder.member(receiver, node.name)
        }
    }

    /// Reconstruct an index node from possibly-new children.
    pub fn update_index(
        &'a self,
        builder: ExprBuilder<'a>,
        receiver: &'a Expr<'a>,
        args: &[&'a Expr<'a>],
    ) -> &'a Expr<'a> {
        let ExprKind::Index(node) = &self.kind else {
            unreachable!("update_index on a {} node", self.node_kind())
        };
        if same(node.receiver, receiver) && same_list(node.args, args) {
            self
        } else {
            builder.index(receiver, args)
        }
    }

    /// Reconstruct a lambda-declaration extension node from possibly-new
    /// children. Same revalidation as [`Expr::update_lambda`].
    pub fn update_lambda_decl(
        &'a self,
        builder: ExprBuilder<'a>,
        body: &'a Expr<'a>,
        params: &[&'a Expr<'a>],
    ) -> Result<&'a Expr<'a>, Error> {
        let Some(ExtExpr::LambdaDecl(node)) = self.as_extension() else {
            unreachable!("update_lambda_decl on a {} node", self.node_kind())
        };
        if same(node.body, body) && same_list(node.params, params) {
            Ok(self)
        } else {
            builder.lambda_decl(node.name, body, params)
        }
    }

    /// Structural equivalence modulo parameter identity.
    ///
    /// Node kinds, operators, literals, names, and list lengths must agree;
    /// parameters are re-identified by binding position rather than
    /// compared by pointer or name, so two independently built trees of the
    /// same shape compare equal. A lambda declaration and the lambda it
    /// declares have the same shape (reification freezes a declaration as a
    /// plain lambda reconstruction).
    pub fn same_shape(&self, other: &Expr<'_>) -> bool {
        let mut binds = Vec::new();
        shape_eq(self, other, &mut binds)
    }
}

fn shape_eq<'x, 'y>(
    a: &'x Expr<'x>,
    b: &'y Expr<'y>,
    binds: &mut Vec<(&'x Expr<'x>, &'y Expr<'y>)>,
) -> bool {
    match (a.kind(), b.kind()) {
        (ExprKind::Constant(la), ExprKind::Constant(lb)) => la == lb,

        (ExprKind::Parameter(na), ExprKind::Parameter(nb)) => {
            // Innermost binding wins; a bound parameter on either side must
            // be bound to its counterpart on the other.
            for (pa, pb) in binds.iter().rev() {
                let hit_a = ptr::eq(*pa, a);
                let hit_b = ptr::eq(*pb, b);
                if hit_a || hit_b {
                    return hit_a && hit_b;
                }
            }
            // Both free: match by name.
            na == nb
        }

        (ExprKind::Unary(ua), ExprKind::Unary(ub)) => {
            ua.op == ub.op && shape_eq(ua.operand, ub.operand, binds)
        }

        (ExprKind::Binary(ba), ExprKind::Binary(bb)) => {
            ba.op == bb.op
                && shape_eq(ba.left, bb.left, binds)
                && shape_eq(ba.right, bb.right, binds)
        }

        (ExprKind::Conditional(ca), ExprKind::Conditional(cb)) => {
            shape_eq(ca.test, cb.test, binds)
                && shape_eq(ca.if_true, cb.if_true, binds)
                && shape_eq(ca.if_false, cb.if_false, binds)
        }

        (ExprKind::Lambda(la), ExprKind::Lambda(lb)) => {
            lambda_shape_eq(la.body, la.params, lb.body, lb.params, binds)
        }

        (ExprKind::Invoke(ia), ExprKind::Invoke(ib)) => {
            shape_eq(ia.callee, ib.callee, binds) && list_shape_eq(ia.args, ib.args, binds)
        }

        (ExprKind::Call(ca), ExprKind::Call(cb)) => {
            ca.method == cb.method
                && opt_shape_eq(ca.receiver, cb.receiver, binds)
                && list_shape_eq(ca.args, cb.args, binds)
        }

        (ExprKind::New(na), ExprKind::New(nb)) => {
            na.type_name == nb.type_name && list_shape_eq(na.args, nb.args, binds)
        }

        (ExprKind::Member(ma), ExprKind::Member(mb)) => {
            ma.name == mb.name && opt_shape_eq(ma.receiver, mb.receiver, binds)
        }

        (ExprKind::Index(ia), ExprKind::Index(ib)) => {
            shape_eq(ia.receiver, ib.receiver, binds) && list_shape_eq(ia.args, ib.args, binds)
        }

        (ExprKind::Extension(ea), ExprKind::Extension(eb)) => match (ea, eb) {
            (ExtExpr::LambdaDecl(da), ExtExpr::LambdaDecl(db)) => {
                lambda_shape_eq(da.body, da.params, db.body, db.params, binds)
            }
        },

        // A declaration and the lambda it declares are shape-equivalent.
        (ExprKind::Extension(ExtExpr::LambdaDecl(d)), ExprKind::Lambda(l)) => {
            lambda_shape_eq(d.body, d.params, l.body, l.params, binds)
        }
        (ExprKind::Lambda(l), ExprKind::Extension(ExtExpr::LambdaDecl(d))) => {
            lambda_shape_eq(l.body, l.params, d.body, d.params, binds)
        }

        _ => false,
    }
}

fn lambda_shape_eq<'x, 'y>(
    body_a: &'x Expr<'x>,
    params_a: &[&'x Expr<'x>],
    body_b: &'y Expr<'y>,
    params_b: &[&'y Expr<'y>],
    binds: &mut Vec<(&'x Expr<'x>, &'y Expr<'y>)>,
) -> bool {
    if params_a.len() != params_b.len() {
        return false;
    }
    let mark = binds.len();
    binds.extend(params_a.iter().zip(params_b).map(|(x, y)| (*x, *y)));
    let ok = shape_eq(body_a, body_b, binds);
    binds.truncate(mark);
    ok
}

fn opt_shape_eq<'x, 'y>(
    a: Option<&'x Expr<'x>>,
    b: Option<&'y Expr<'y>>,
    binds: &mut Vec<(&'x Expr<'x>, &'y Expr<'y>)>,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => shape_eq(a, b, binds),
        _ => false,
    }
}

fn list_shape_eq<'x, 'y>(
    a: &[&'x Expr<'x>],
    b: &[&'y Expr<'y>],
    binds: &mut Vec<(&'x Expr<'x>, &'y Expr<'y>)>,
) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| shape_eq(*x, *y, binds))
}

