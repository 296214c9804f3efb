use crate::tree::{BinaryOp, ExprBuilder, ExprKind, Literal, NodeKind, UnaryOp};
use bumpalo::Bump;
use pretty_assertions::assert_eq;

#[test]
fn test_update_with_identical_children_returns_same_handle() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let one = b.int(1);
    let sum = b.binary(BinaryOp::Add, x, one);

    let updated = sum.update_binary(b, x, one);
    assert!(core::ptr::eq(sum, updated));
}

#[test]
fn test_update_with_new_child_allocates() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let one = b.int(1);
    let sum = b.binary(BinaryOp::Add, x, one);

    let two = b.int(2);
    let updated = sum.update_binary(b, x, two);
    assert!(!core::ptr::eq(sum, updated));
    // Same kind and operator, untouched child shared.
    let ExprKind::Binary(node) = updated.kind() else {
        panic!("expected a binary node");
    };
    assert_eq!(node.op, BinaryOp::Add);
    assert!(core::ptr::eq(node.left, x));
    assert!(core::ptr::eq(node.right, two));
}

#[test]
fn test_list_update_is_elementwise() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let f = b.parameter("f");
    let one = b.int(1);
    let two = b.int(2);
    let invoke = b.invoke(f, &[one, two]);

    // A freshly collected list of the same handles is "unchanged".
    let same_args = vec![one, two];
    assert!(core::ptr::eq(invoke, invoke.update_invoke(b, f, &same_args)));

    let other = b.int(3);
    let changed = invoke.update_invoke(b, f, &[one, other]);
    assert!(!core::ptr::eq(invoke, changed));
}

#[test]
fn test_lambda_update_shares_through_fresh_param_list() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let lambda = b.lambda(x, &[x]).unwrap();
    let node = lambda.as_lambda().unwrap();

    let fresh_list = vec![node.params[0]];
    let updated = lambda.update_lambda(b, node.body, &fresh_list).unwrap();
    assert!(core::ptr::eq(lambda, updated));
}

#[test]
fn test_conditional_branches_are_independent() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let test = b.bool(false);
    let ten = b.int(10);
    let twenty = b.int(20);
    let cond = b.conditional(test, ten, twenty);

    let ExprKind::Conditional(node) = cond.kind() else {
        panic!("expected a conditional node");
    };
    assert!(core::ptr::eq(node.if_true, ten));
    assert!(core::ptr::eq(node.if_false, twenty));
    assert!(!core::ptr::eq(node.if_true, node.if_false));
}

#[test]
fn test_node_kinds() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    assert_eq!(x.node_kind(), NodeKind::Parameter);
    assert_eq!(b.int(1).node_kind(), NodeKind::Constant);
    assert_eq!(b.unary(UnaryOp::Not, x).node_kind(), NodeKind::Unary);
    assert_eq!(
        b.lambda_decl("f", x, &[x]).unwrap().node_kind(),
        NodeKind::Extension
    );
}

#[test]
fn test_let_in_passes_the_handle_through() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let lambda = b
        .parameter("x")
        .let_in(|p| b.lambda(b.binary(BinaryOp::Add, p, b.int(1)), &[p]))
        .unwrap();
    let node = lambda.as_lambda().unwrap();
    assert_eq!(node.params.len(), 1);
    assert_eq!(node.params[0].parameter_name(), Some("x"));
}

#[test]
fn test_same_shape_ignores_parameter_identity_and_name() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    let x = b.parameter("x");
    let first = b.lambda(b.binary(BinaryOp::Add, x, b.int(1)), &[x]).unwrap();

    let y = b.parameter("y");
    let second = b.lambda(b.binary(BinaryOp::Add, y, b.int(1)), &[y]).unwrap();

    assert!(first.same_shape(second));
}

#[test]
fn test_same_shape_rejects_different_structure() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    let x = b.parameter("x");
    let add = b.lambda(b.binary(BinaryOp::Add, x, b.int(1)), &[x]).unwrap();

    let y = b.parameter("y");
    let sub = b
        .lambda(b.binary(BinaryOp::Subtract, y, b.int(1)), &[y])
        .unwrap();

    assert!(!add.same_shape(sub));
}

#[test]
fn test_same_shape_tracks_binding_not_position_in_text() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    // (a, b) => a   vs   (c, d) => d: both one-parameter references, but
    // they refer to different binding positions.
    let a = b.parameter("a");
    let p2 = b.parameter("b");
    let first = b.lambda(a, &[a, p2]).unwrap();

    let c = b.parameter("c");
    let d = b.parameter("d");
    let second = b.lambda(d, &[c, d]).unwrap();

    assert!(!first.same_shape(second));
}

#[test]
fn test_declaration_matches_declared_lambda_shape() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    let x = b.parameter("x");
    let decl = b
        .lambda_decl("inc", b.binary(BinaryOp::Add, x, b.int(1)), &[x])
        .unwrap();

    let y = b.parameter("y");
    let lambda = b.lambda(b.binary(BinaryOp::Add, y, b.int(1)), &[y]).unwrap();

    assert!(decl.same_shape(lambda));
    assert!(lambda.same_shape(decl));
}

#[test]
fn test_display_prints_structure() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let tree = b.binary(BinaryOp::Add, x, b.int(1));
    assert_eq!(tree.to_string(), "Add(Parameter(x), Constant(1))");

    let cond = b.conditional(b.bool(true), b.int(1), b.int(2));
    assert_eq!(
        cond.to_string(),
        "Conditional(Constant(true), Constant(1), Constant(2))"
    );

    let call = b.call(Some(x), "foo", &[b.int(1), b.int(2)]);
    assert_eq!(
        call.to_string(),
        "Call(foo, Parameter(x), Constant(1), Constant(2))"
    );
}

#[test]
fn test_display_of_array_constant() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let tree = b.array(&[Literal::Int(1), Literal::Int(2)]);
    assert_eq!(tree.to_string(), "Constant([1, 2])");
}
