use crate::errors::Error;
use crate::reify::reify;
use crate::tree::{BinaryOp, ExprBuilder, Literal, UnaryOp};
use bumpalo::Bump;
use pretty_assertions::assert_eq;

#[test]
fn test_reify_simple_declaration() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let decl = b
        .lambda_decl("inc", b.binary(BinaryOp::Add, x, b.int(1)), &[x])
        .unwrap();

    assert_eq!(
        reify(decl).unwrap(),
        "b.parameter(\"x\").let_in(|p0_0| \
         b.lambda(b.binary(BinaryOp::Add, p0_0, b.int(1)), &[p0_0]))"
    );
}

#[test]
fn test_reified_source_reconstructs_the_same_shape() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let decl = b
        .lambda_decl("inc", b.binary(BinaryOp::Add, x, b.int(1)), &[x])
        .unwrap();

    let source = reify(decl).unwrap();
    // The transcription below constructs exactly what `source` evaluates to.
    assert_eq!(
        source,
        "b.parameter(\"x\").let_in(|p0_0| \
         b.lambda(b.binary(BinaryOp::Add, p0_0, b.int(1)), &[p0_0]))"
    );
    let rebuilt = b
        .parameter("x")
        .let_in(|p0_0| b.lambda(b.binary(BinaryOp::Add, p0_0, b.int(1)), &[p0_0]))
        .unwrap();

    assert!(decl.same_shape(rebuilt));
    // Fresh identities, same positions.
    let lambda = rebuilt.as_lambda().unwrap();
    assert_eq!(lambda.params.len(), 1);
    assert!(!core::ptr::eq(lambda.params[0], x));
}

#[test]
fn test_reify_multi_parameter_declaration() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let y = b.parameter("y");
    let decl = b
        .lambda_decl("sub", b.binary(BinaryOp::Subtract, x, y), &[x, y])
        .unwrap();

    assert_eq!(
        reify(decl).unwrap(),
        "b.parameter(\"x\").let_in(|p0_0| b.parameter(\"y\").let_in(|p0_1| \
         b.lambda(b.binary(BinaryOp::Subtract, p0_0, p0_1), &[p0_0, p0_1])))"
    );
}

#[test]
fn test_reify_nested_declaration_with_cross_scope_reference() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let y = b.parameter("y");
    let inner = b
        .lambda_decl("inner", b.binary(BinaryOp::Add, y, x), &[y])
        .unwrap();
    let outer = b
        .lambda_decl("outer", b.invoke(inner, &[x]), &[x])
        .unwrap();

    let source = reify(outer).unwrap();
    assert_eq!(
        source,
        "b.parameter(\"x\").let_in(|p0_0| b.lambda(b.invoke(\
         b.parameter(\"y\").let_in(|p1_0| \
         b.lambda(b.binary(BinaryOp::Add, p1_0, p0_0), &[p1_0]))?, \
         &[p0_0]), &[p0_0]))"
    );

    // The transcription below constructs exactly what `source` evaluates to.
    let rebuilt = b
        .parameter("x")
        .let_in(|p0_0| {
            b.lambda(
                b.invoke(
                    b.parameter("y")
                        .let_in(|p1_0| b.lambda(b.binary(BinaryOp::Add, p1_0, p0_0), &[p1_0]))?,
                    &[p0_0],
                ),
                &[p0_0],
            )
        })
        .unwrap();

    assert!(outer.same_shape(rebuilt));

    // One parameter at each scope depth.
    let outer_lambda = rebuilt.as_lambda().unwrap();
    assert_eq!(outer_lambda.params.len(), 1);
    let crate::tree::ExprKind::Invoke(invoke) = outer_lambda.body.kind() else {
        panic!("expected the rebuilt body to be an invocation");
    };
    let inner_lambda = invoke.callee.as_lambda().unwrap();
    assert_eq!(inner_lambda.params.len(), 1);
    assert!(!core::ptr::eq(outer_lambda.params[0], inner_lambda.params[0]));
}

#[test]
fn test_sibling_declarations_do_not_capture_each_other() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    // Two independently authored declarations, both binding `x`.
    let x1 = b.parameter("x");
    let first = b.lambda_decl("first", x1, &[x1]).unwrap();
    let x2 = b.parameter("x");
    let second = b.lambda_decl("second", x2, &[x2]).unwrap();

    let source_first = reify(first).unwrap();
    let source_second = reify(second).unwrap();
    // Both reuse the synthesized name: scope depth restarts per
    // declaration, and that is safe because each reconstruction opens its
    // own binder.
    assert_eq!(
        source_first,
        "b.parameter(\"x\").let_in(|p0_0| b.lambda(p0_0, &[p0_0]))"
    );
    assert_eq!(source_second, source_first);

    // The transcriptions below construct exactly what the two sources evaluate to.
    let rebuilt_first = b.parameter("x").let_in(|p0_0| b.lambda(p0_0, &[p0_0])).unwrap();
    let rebuilt_second = b.parameter("x").let_in(|p0_0| b.lambda(p0_0, &[p0_0])).unwrap();

    let first_lambda = rebuilt_first.as_lambda().unwrap();
    let second_lambda = rebuilt_second.as_lambda().unwrap();

    // Distinct identities, each body bound to its own binder.
    assert!(!core::ptr::eq(first_lambda.params[0], second_lambda.params[0]));
    assert!(core::ptr::eq(first_lambda.body, first_lambda.params[0]));
    assert!(core::ptr::eq(second_lambda.body, second_lambda.params[0]));
    assert!(!core::ptr::eq(first_lambda.body, second_lambda.params[0]));
}

#[test]
fn test_reify_rejects_non_declaration_roots() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");

    let bare = b.lambda(x, &[x]).unwrap();
    assert!(matches!(reify(bare).unwrap_err(), Error::InvalidOperation(_)));
    assert!(matches!(reify(b.int(1)).unwrap_err(), Error::InvalidOperation(_)));
}

#[test]
fn test_reify_rejects_bare_lambda_in_body() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let y = b.parameter("y");
    let bare = b.lambda(y, &[y]).unwrap();
    let decl = b.lambda_decl("f", b.invoke(bare, &[x]), &[x]).unwrap();

    assert!(matches!(reify(decl).unwrap_err(), Error::InvalidOperation(_)));
}

#[test]
fn test_reify_rejects_dangling_parameter_reference() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let stray = b.parameter("z");
    let decl = b
        .lambda_decl("f", b.binary(BinaryOp::Add, x, stray), &[x])
        .unwrap();

    let err = reify(decl).unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
}

#[test]
fn test_reify_constant_payloads() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let body = b.call(
        Some(b.str("a\"b")),
        "pad",
        &[
            b.float(2.0),
            b.absent(),
            b.array(&[Literal::Int(1), Literal::Str("s")]),
        ],
    );
    let decl = b.lambda_decl("f", body, &[]).unwrap();

    assert_eq!(
        reify(decl).unwrap(),
        "b.lambda(b.call(Some(b.str(\"a\\\"b\")), \"pad\", \
         &[b.float(2.0), b.absent(), \
         b.array(&[Literal::Int(1), Literal::Str(\"s\")])]), &[])"
    );
}

#[test]
fn test_reify_operator_and_member_forms() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let body = b.conditional(
        b.unary(UnaryOp::Not, b.member(Some(x), "done")),
        b.index(x, &[b.int(0)]),
        b.new_object("Point", &[x]),
    );
    let decl = b.lambda_decl("f", body, &[x]).unwrap();

    assert_eq!(
        reify(decl).unwrap(),
        "b.parameter(\"x\").let_in(|p0_0| b.lambda(b.conditional(\
         b.unary(UnaryOp::Not, b.member(Some(p0_0), \"done\")), \
         b.index(p0_0, &[b.int(0)]), \
         b.new_object(\"Point\", &[p0_0])), &[p0_0]))"
    );
}
