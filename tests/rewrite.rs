//! Rewriting scenarios through the facade.

use pretty_assertions::assert_eq;
use ramus::{
    BinaryOp, Bump, Compiler, Error, Expr, ExprBuilder, Folder, Literal, Rewriter, Value,
};

/// Replaces free `Member(None, name)` references with registered constant
/// values, the way a query provider inlines captured environment state.
struct InlineConstants<'a> {
    builder: ExprBuilder<'a>,
    bindings: &'a [(&'a str, i64)],
}

impl<'a> Rewriter<'a> for InlineConstants<'a> {
    fn builder(&self) -> ExprBuilder<'a> {
        self.builder
    }

    fn rewrite_member(
        &mut self,
        node: &'a Expr<'a>,
        member: &'a ramus::MemberExpr<'a>,
    ) -> Result<&'a Expr<'a>, Error> {
        if member.receiver.is_none() {
            if let Some((_, value)) = self.bindings.iter().find(|(n, _)| *n == member.name) {
                return Ok(self.builder.int(*value));
            }
        }
        let receiver = self.rewrite_opt(member.receiver)?;
        Ok(node.update_member(self.builder(), receiver))
    }
}

#[test]
fn inlining_pass_feeds_the_compiler() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    // (x) => x * factor, with `factor` inlined before compilation.
    let x = b.parameter("x");
    let body = b.binary(BinaryOp::Multiply, x, b.member(None, "factor"));
    let lambda = b.lambda(body, &[x]).unwrap();

    let bindings = [("factor", 6_i64)];
    let mut pass = InlineConstants {
        builder: b,
        bindings: &bindings,
    };
    let inlined = pass.rewrite_expr(lambda).unwrap();

    assert_eq!(
        inlined.to_string(),
        "Lambda(Multiply(Parameter(x), Constant(6)), Parameter(x))"
    );

    let compiler = Compiler::default();
    let f = compiler.compile(inlined).unwrap();
    assert_eq!(f.call(&arena, &[Value::Int(7)]).unwrap(), Value::Int(42));
}

#[test]
fn no_op_pass_returns_the_identical_tree() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let body = b.binary(BinaryOp::Multiply, x, b.member(Some(x), "len"));
    let lambda = b.lambda(body, &[x]).unwrap();

    let mut pass = InlineConstants {
        builder: b,
        bindings: &[],
    };
    let rewritten = pass.rewrite_expr(lambda).unwrap();
    // Nothing matched, so nothing was allocated.
    assert!(std::ptr::eq(lambda, rewritten));
}

#[test]
fn unknown_extensions_do_not_slip_through_rewrites() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let decl = b.lambda_decl("f", x, &[x]).unwrap();

    let mut pass = InlineConstants {
        builder: b,
        bindings: &[],
    };
    assert_eq!(
        pass.rewrite_expr(decl).unwrap_err(),
        Error::UnsupportedExtension("lambda-decl")
    );
}

/// Counts constants, as a smoke test that folds compose with rewrites.
struct CountConstants {
    count: usize,
}

impl<'a> Folder<'a> for CountConstants {
    type Output = ();

    fn fold_expr(&mut self, node: &'a Expr<'a>) -> Result<(), Error> {
        if matches!(node.kind(), ramus::ExprKind::Constant(_)) {
            self.count += 1;
        }
        self.super_fold_expr(node)
    }

    fn fold_constant(&mut self, _node: &'a Expr<'a>, _value: &'a Literal<'a>) -> Result<(), Error> {
        Ok(())
    }

    fn fold_parameter(&mut self, _node: &'a Expr<'a>, _name: &'a str) -> Result<(), Error> {
        Ok(())
    }

    fn fold_binary(
        &mut self,
        _node: &'a Expr<'a>,
        binary: &'a ramus::BinaryExpr<'a>,
    ) -> Result<(), Error> {
        self.fold_expr(binary.left)?;
        self.fold_expr(binary.right)
    }

    fn fold_lambda(
        &mut self,
        _node: &'a Expr<'a>,
        lambda: &'a ramus::LambdaExpr<'a>,
    ) -> Result<(), Error> {
        self.fold_expr(lambda.body)?;
        self.fold_many(lambda.params)?;
        Ok(())
    }
}

#[test]
fn folds_observe_what_rewrites_produced() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let body = b.binary(
        BinaryOp::Add,
        b.member(None, "offset"),
        b.binary(BinaryOp::Multiply, x, b.member(None, "factor")),
    );
    let lambda = b.lambda(body, &[x]).unwrap();

    let bindings = [("offset", 2_i64), ("factor", 10_i64)];
    let mut pass = InlineConstants {
        builder: b,
        bindings: &bindings,
    };
    let inlined = pass.rewrite_expr(lambda).unwrap();

    let mut counter = CountConstants { count: 0 };
    counter.fold_expr(inlined).unwrap();
    assert_eq!(counter.count, 2);

    let compiler = Compiler::default();
    let f = compiler.compile(inlined).unwrap();
    assert_eq!(f.call(&arena, &[Value::Int(4)]).unwrap(), Value::Int(42));
}
