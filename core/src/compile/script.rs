//! Lowering trees to script source text.
//!
//! The compiler is a folder over string fragments with an explicit operand
//! stack: every compound visit folds its children first (each pushing one
//! fragment), then pops exactly the fragments it consumed, last-in
//! first-out, and pushes the combined fragment. Fragments are always
//! parenthesized where the surrounding context could change precedence, so
//! a fragment means the same thing wherever it is spliced.
//!
//! `finish` enforces the invariant the whole scheme rests on: one
//! expression in, exactly one fragment out.

use crate::errors::Error;
use crate::tree::{
    BinaryExpr, BinaryOp, CallExpr, ConditionalExpr, Expr, IndexExpr, InvokeExpr, LambdaExpr,
    Literal, MemberExpr, NewExpr, UnaryExpr,
};
use crate::visit::Folder;
use crate::{String, Vec, format};

/// Stack-based script emitter.
pub struct ScriptCompiler {
    stack: Vec<String>,
}

impl ScriptCompiler {
    /// Create an emitter with an empty operand stack.
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    fn push(&mut self, fragment: String) {
        self.stack.push(fragment);
    }

    fn pop(&mut self) -> Result<String, Error> {
        self.stack
            .pop()
            .ok_or(Error::CodeGeneration(0))
    }

    /// Pop `n` fragments pushed left to right, restoring their order.
    fn pop_list(&mut self, n: usize) -> Result<Vec<String>, Error> {
        let mut items = Vec::new();
        items.resize(n, String::new());
        for i in (0..n).rev() {
            items[i] = self.pop()?;
        }
        Ok(items)
    }

    /// The single assembled fragment.
    ///
    /// Fails with [`Error::CodeGeneration`] unless the stack holds exactly
    /// one fragment.
    pub fn finish(mut self) -> Result<String, Error> {
        if self.stack.len() != 1 {
            return Err(Error::CodeGeneration(self.stack.len()));
        }
        self.pop()
    }
}

impl Default for ScriptCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Folder<'a> for ScriptCompiler {
    type Output = ();

    fn fold_constant(&mut self, _node: &'a Expr<'a>, value: &'a Literal<'a>) -> Result<(), Error> {
        let mut fragment = String::new();
        value.script(&mut fragment);
        self.push(fragment);
        Ok(())
    }

    fn fold_parameter(&mut self, _node: &'a Expr<'a>, name: &'a str) -> Result<(), Error> {
        self.push(String::from(name));
        Ok(())
    }

    fn fold_unary(&mut self, _node: &'a Expr<'a>, unary: &'a UnaryExpr<'a>) -> Result<(), Error> {
        self.fold_expr(unary.operand)?;
        let operand = self.pop()?;

        // Quote lowers as transparent parentheses: its token is empty.
        let fragment = if unary.op.is_postfix() {
            format!("({}{})", operand, unary.op.token())
        } else {
            format!("({}{})", unary.op.token(), operand)
        };
        self.push(fragment);
        Ok(())
    }

    fn fold_binary(&mut self, _node: &'a Expr<'a>, binary: &'a BinaryExpr<'a>) -> Result<(), Error> {
        self.fold_expr(binary.left)?;
        self.fold_expr(binary.right)?;

        let right = self.pop()?;
        let left = self.pop()?;

        let fragment = if binary.op == BinaryOp::ArrayIndex {
            format!("({}[{}])", left, right)
        } else {
            format!("({} {} {})", left, binary.op.token(), right)
        };
        self.push(fragment);
        Ok(())
    }

    fn fold_conditional(
        &mut self,
        _node: &'a Expr<'a>,
        cond: &'a ConditionalExpr<'a>,
    ) -> Result<(), Error> {
        self.fold_expr(cond.test)?;
        self.fold_expr(cond.if_true)?;
        self.fold_expr(cond.if_false)?;

        let if_false = self.pop()?;
        let if_true = self.pop()?;
        let test = self.pop()?;

        self.push(format!("({} ? {} : {})", test, if_true, if_false));
        Ok(())
    }

    fn fold_lambda(&mut self, _node: &'a Expr<'a>, lambda: &'a LambdaExpr<'a>) -> Result<(), Error> {
        self.fold_many(lambda.params)?;
        self.fold_expr(lambda.body)?;

        let body = self.pop()?;
        let params = self.pop_list(lambda.params.len())?;

        self.push(format!(
            "function({}) {{ return {}; }}",
            params.join(", "),
            body
        ));
        Ok(())
    }

    fn fold_invoke(&mut self, _node: &'a Expr<'a>, invoke: &'a InvokeExpr<'a>) -> Result<(), Error> {
        self.fold_expr(invoke.callee)?;
        self.fold_many(invoke.args)?;

        let args = self.pop_list(invoke.args.len())?;
        let callee = self.pop()?;

        self.push(format!("{}({})", callee, args.join(", ")));
        Ok(())
    }

    fn fold_call(&mut self, _node: &'a Expr<'a>, call: &'a CallExpr<'a>) -> Result<(), Error> {
        let mut fragment = String::new();
        if let Some(receiver) = call.receiver {
            self.fold_expr(receiver)?;
            fragment = self.pop()?;
            fragment.push('.');
        }

        self.fold_many(call.args)?;
        let args = self.pop_list(call.args.len())?;

        fragment.push_str(call.method);
        fragment.push('(');
        fragment.push_str(&args.join(", "));
        fragment.push(')');
        self.push(fragment);
        Ok(())
    }

    fn fold_new(&mut self, _node: &'a Expr<'a>, new: &'a NewExpr<'a>) -> Result<(), Error> {
        self.fold_many(new.args)?;
        let args = self.pop_list(new.args.len())?;

        self.push(format!("new {}({})", new.type_name, args.join(", ")));
        Ok(())
    }

    fn fold_member(&mut self, _node: &'a Expr<'a>, member: &'a MemberExpr<'a>) -> Result<(), Error> {
        let mut fragment = String::new();
        if let Some(receiver) = member.receiver {
            self.fold_expr(receiver)?;
            fragment = self.pop()?;
            fragment.push('.');
        }
        fragment.push_str(member.name);
        self.push(fragment);
        Ok(())
    }

    fn fold_index(&mut self, _node: &'a Expr<'a>, index: &'a IndexExpr<'a>) -> Result<(), Error> {
        self.fold_expr(index.receiver)?;
        let mut fragment = self.pop()?;

        self.fold_many(index.args)?;
        let args = self.pop_list(index.args.len())?;

        fragment.push('[');
        fragment.push_str(&args.join(", "));
        fragment.push(']');
        self.push(fragment);
        Ok(())
    }
}

/// Lower a tree to a script fragment.
pub fn emit<'a>(expr: &'a Expr<'a>) -> Result<String, Error> {
    let mut compiler = ScriptCompiler::new();
    compiler.fold_expr(expr)?;
    compiler.finish()
}

/// Lower a lambda to a directly-invoked producer for a host with a dynamic
/// code loader: double quotes escaped, newlines stripped, wrapped as
/// `new Function("return <code>;")`.
pub fn emit_loader<'a>(expr: &'a Expr<'a>) -> Result<String, Error> {
    if expr.as_lambda().is_none() {
        return Err(Error::InvalidOperation(format!(
            "loader source requires a lambda root, got a {} node",
            expr.node_kind()
        )));
    }

    let code = emit(expr)?;
    let escaped = code.replace('"', "\\\"").replace(['\n', '\r'], "");
    Ok(format!("new Function(\"return {};\")", escaped))
}
