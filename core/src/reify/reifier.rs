//! The reifying fold.

use crate::errors::Error;
use crate::scopes::{ParamScopes, ScopeFrame};
use crate::tree::{
    BinaryExpr, CallExpr, ConditionalExpr, Expr, ExtExpr, IndexExpr, InvokeExpr, LambdaDeclExpr,
    LambdaExpr, Literal, MemberExpr, NewExpr, UnaryExpr,
};
use crate::visit::Folder;
use crate::{String, Vec, format};
use core::fmt::Write;

/// Folder producing factory-call source for each node.
///
/// Holds one parameter scope per lambda declaration currently being
/// reified. Parameter references resolve innermost-to-outermost by
/// identity and always reify as the synthesized binder name.
pub struct Reifier<'a> {
    scopes: ParamScopes<'a, String>,
}

impl<'a> Reifier<'a> {
    /// Create a reifier with no open scopes.
    pub fn new() -> Self {
        Self {
            scopes: ParamScopes::new(),
        }
    }

    fn fold_args(&mut self, args: &'a [&'a Expr<'a>]) -> Result<String, Error> {
        Ok(self.fold_many(args)?.join(", "))
    }

    fn fold_lambda_decl(&mut self, decl: &'a LambdaDeclExpr<'a>) -> Result<String, Error> {
        let depth = self.scopes.depth();
        let nested = depth > 0;

        // One scoping combinator per parameter: the freshly built node is
        // captured under its synthesized name before the body is rebuilt.
        let mut binders = String::new();
        let mut closers = String::new();
        let mut frame: ScopeFrame<'a, String> = Vec::new();
        for (position, param) in decl.params.iter().enumerate() {
            let Some(original) = param.parameter_name() else {
                unreachable!("declaration parameter lists hold parameter nodes")
            };
            let binder = format!("p{}_{}", depth, position);
            let _ = write!(
                binders,
                "b.parameter(\"{}\").let_in(|{}| ",
                escape_str(original),
                binder
            );
            closers.push(')');
            frame.push((*param, binder));
        }

        self.scopes.push(frame);
        let folded = self.fold_expr(decl.body).and_then(|body| {
            let params = self.fold_many(decl.params)?;
            Ok((body, params))
        });
        self.scopes.pop();
        let (body, params) = folded?;

        tracing::trace!(
            name = decl.name,
            params = decl.params.len(),
            depth,
            "reified lambda declaration"
        );

        let mut out = binders;
        let _ = write!(out, "b.lambda({}, &[{}])", body, params.join(", "));
        out.push_str(&closers);
        // In child position the fragment is used as an operand, so the
        // fallible lambda factory needs unwrapping there.
        if nested {
            out.push('?');
        }
        Ok(out)
    }
}

impl<'a> Default for Reifier<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Folder<'a> for Reifier<'a> {
    type Output = String;

    fn fold_constant(&mut self, _node: &'a Expr<'a>, value: &'a Literal<'a>) -> Result<String, Error> {
        Ok(constant_factory(value))
    }

    fn fold_parameter(&mut self, node: &'a Expr<'a>, name: &'a str) -> Result<String, Error> {
        // Never the original name: an identity bound in no open scope is a
        // dangling reference, and rebuilding it by name would mint a new
        // binder and silently change the tree's shape.
        match self.scopes.lookup(node) {
            Some(binder) => Ok(binder.clone()),
            None => Err(Error::InvalidOperation(format!(
                "parameter `{}` is not bound in any enclosing reified scope",
                name
            ))),
        }
    }

    fn fold_unary(&mut self, _node: &'a Expr<'a>, unary: &'a UnaryExpr<'a>) -> Result<String, Error> {
        let operand = self.fold_expr(unary.operand)?;
        Ok(format!("b.unary(UnaryOp::{:?}, {})", unary.op, operand))
    }

    fn fold_binary(&mut self, _node: &'a Expr<'a>, binary: &'a BinaryExpr<'a>) -> Result<String, Error> {
        let left = self.fold_expr(binary.left)?;
        let right = self.fold_expr(binary.right)?;
        Ok(format!(
            "b.binary(BinaryOp::{:?}, {}, {})",
            binary.op, left, right
        ))
    }

    fn fold_conditional(
        &mut self,
        _node: &'a Expr<'a>,
        cond: &'a ConditionalExpr<'a>,
    ) -> Result<String, Error> {
        let test = self.fold_expr(cond.test)?;
        let if_true = self.fold_expr(cond.if_true)?;
        let if_false = self.fold_expr(cond.if_false)?;
        Ok(format!("b.conditional({}, {}, {})", test, if_true, if_false))
    }

    fn fold_lambda(
        &mut self,
        _node: &'a Expr<'a>,
        _lambda: &'a LambdaExpr<'a>,
    ) -> Result<String, Error> {
        // This visitor is driven from a declaration-level entry point that
        // pushes the scope; a bare lambda value has no scope to enter.
        Err(Error::InvalidOperation(String::from(
            "reification reached a bare lambda; only lambda declarations reify",
        )))
    }

    fn fold_invoke(&mut self, _node: &'a Expr<'a>, invoke: &'a InvokeExpr<'a>) -> Result<String, Error> {
        let callee = self.fold_expr(invoke.callee)?;
        let args = self.fold_args(invoke.args)?;
        Ok(format!("b.invoke({}, &[{}])", callee, args))
    }

    fn fold_call(&mut self, _node: &'a Expr<'a>, call: &'a CallExpr<'a>) -> Result<String, Error> {
        let args = self.fold_args(call.args)?;
        Ok(match self.fold_opt(call.receiver)? {
            Some(receiver) => format!(
                "b.call(Some({}), \"{}\", &[{}])",
                receiver,
                escape_str(call.method),
                args
            ),
            None => format!("b.call(None, \"{}\", &[{}])", escape_str(call.method), args),
        })
    }

    fn fold_new(&mut self, _node: &'a Expr<'a>, new: &'a NewExpr<'a>) -> Result<String, Error> {
        let args = self.fold_args(new.args)?;
        Ok(format!(
            "b.new_object(\"{}\", &[{}])",
            escape_str(new.type_name),
            args
        ))
    }

    fn fold_member(&mut self, _node: &'a Expr<'a>, member: &'a MemberExpr<'a>) -> Result<String, Error> {
        Ok(match self.fold_opt(member.receiver)? {
            Some(receiver) => format!(
                "b.member(Some({}), \"{}\")",
                receiver,
                escape_str(member.name)
            ),
            None => format!("b.member(None, \"{}\")", escape_str(member.name)),
        })
    }

    fn fold_index(&mut self, _node: &'a Expr<'a>, index: &'a IndexExpr<'a>) -> Result<String, Error> {
        let receiver = self.fold_expr(index.receiver)?;
        let args = self.fold_args(index.args)?;
        Ok(format!("b.index({}, &[{}])", receiver, args))
    }

    fn fold_extension(&mut self, _node: &'a Expr<'a>, ext: &'a ExtExpr<'a>) -> Result<String, Error> {
        // Secondary-kind dispatch: each extension supplies its own rule.
        match ext {
            ExtExpr::LambdaDecl(decl) => self.fold_lambda_decl(decl),
        }
    }
}

/// Factory-call text for a constant node.
fn constant_factory(value: &Literal<'_>) -> String {
    match value {
        Literal::Absent => String::from("b.absent()"),
        Literal::Bool(v) => format!("b.bool({})", v),
        Literal::Int(n) => format!("b.int({})", n),
        Literal::Float(x) => format!("b.float({})", float_literal(*x)),
        Literal::Str(s) => format!("b.str(\"{}\")", escape_str(s)),
        Literal::Array(items) => {
            let elements: Vec<String> = items.iter().map(literal_expr).collect();
            format!("b.array(&[{}])", elements.join(", "))
        }
    }
}

/// Rust-expression text for a literal value inside an array payload.
fn literal_expr(value: &Literal<'_>) -> String {
    match value {
        Literal::Absent => String::from("Literal::Absent"),
        Literal::Bool(v) => format!("Literal::Bool({})", v),
        Literal::Int(n) => format!("Literal::Int({})", n),
        Literal::Float(x) => format!("Literal::Float({})", float_literal(*x)),
        Literal::Str(s) => format!("Literal::Str(\"{}\")", escape_str(s)),
        Literal::Array(items) => {
            let elements: Vec<String> = items.iter().map(literal_expr).collect();
            format!("Literal::Array(&[{}])", elements.join(", "))
        }
    }
}

/// A float as valid Rust source.
fn float_literal(x: f64) -> String {
    if x.is_nan() {
        return String::from("f64::NAN");
    }
    if x.is_infinite() {
        return String::from(if x > 0.0 { "f64::INFINITY" } else { "f64::NEG_INFINITY" });
    }
    let mut s = format!("{}", x);
    // Keep the token a float literal even for whole values.
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push_str(".0");
    }
    s
}

/// Escape text for inclusion in a Rust string literal.
fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:04x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
