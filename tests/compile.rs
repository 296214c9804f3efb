//! End-to-end compilation scenarios through the facade.

use pretty_assertions::assert_eq;
use ramus::{
    BinaryOp, Bump, CompileOptions, Compiler, EvalError, ExprBuilder, NativeFn, UnaryOp, Value,
    compile::script,
};

#[test]
fn add_one_compiles_and_invokes() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);
    let x = b.parameter("x");
    let lambda = b.lambda(b.binary(BinaryOp::Add, x, b.int(1)), &[x]).unwrap();

    let compiler = Compiler::default();
    let f = compiler.compile(lambda).unwrap();
    assert_eq!(f.call(&arena, &[Value::Int(41)]).unwrap(), Value::Int(42));
}

#[test]
fn script_and_callable_backends_agree() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    // (n) => n % 2 === 0 ? -n : ~n
    let n = b.parameter("n");
    let even = b.binary(
        BinaryOp::Equal,
        b.binary(BinaryOp::Modulo, n, b.int(2)),
        b.int(0),
    );
    let body = b.conditional(
        even,
        b.unary(UnaryOp::Negate, n),
        b.unary(UnaryOp::OnesComplement, n),
    );
    let lambda = b.lambda(body, &[n]).unwrap();

    assert_eq!(
        script::emit(lambda).unwrap(),
        "function(n) { return (((n % 2) === 0) ? (-n) : (~n)); }"
    );
    assert_eq!(
        script::emit_loader(lambda).unwrap(),
        "new Function(\"return function(n) { return (((n % 2) === 0) ? (-n) : (~n)); };\")"
    );

    let compiler = Compiler::default();
    let f = compiler.compile(lambda).unwrap();
    assert_eq!(f.call(&arena, &[Value::Int(4)]).unwrap(), Value::Int(-4));
    assert_eq!(f.call(&arena, &[Value::Int(3)]).unwrap(), Value::Int(-4));
}

#[test]
fn host_environment_supports_globals_methods_and_constructors() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    let point_ctor = NativeFn::new(&arena, "Point", |arena, args| {
        Ok(Value::record(arena, &[("x", args[0]), ("y", args[1])]))
    });
    let norm1 = NativeFn::new(&arena, "norm1", |_, args| {
        let p = args[0];
        let x = p.field("x").ok_or(EvalError::UnknownMember("x".into()))?;
        let y = p.field("y").ok_or(EvalError::UnknownMember("y".into()))?;
        Ok(Value::Int(x.as_int()?.abs() + y.as_int()?.abs()))
    });

    let compiler = Compiler::new(CompileOptions::default(), |env| {
        env.register("origin_x", Value::Int(0));
        env.register("norm1", Value::Native(norm1));
        env.register_constructor("Point", point_ctor);
    });

    // () => norm1(new Point(3 - origin_x, -4))
    let point = b.new_object(
        "Point",
        &[
            b.binary(BinaryOp::Subtract, b.int(3), b.member(None, "origin_x")),
            b.int(-4),
        ],
    );
    let body = b.call(None, "norm1", &[point]);
    let lambda = b.lambda(body, &[]).unwrap();

    let f = compiler.compile(lambda).unwrap();
    assert_eq!(f.call(&arena, &[]).unwrap(), Value::Int(7));
}

#[test]
fn higher_order_lambdas_close_over_their_environment() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    // (x) => ((y) => x * 10 + y)(2)
    let x = b.parameter("x");
    let y = b.parameter("y");
    let inner_body = b.binary(
        BinaryOp::Add,
        b.binary(BinaryOp::Multiply, x, b.int(10)),
        y,
    );
    let inner = b.lambda(inner_body, &[y]).unwrap();
    let outer = b.lambda(b.invoke(inner, &[b.int(2)]), &[x]).unwrap();

    let compiler = Compiler::default();
    let f = compiler.compile(outer).unwrap();
    assert_eq!(f.call(&arena, &[Value::Int(4)]).unwrap(), Value::Int(42));
}

#[test]
fn oversized_trees_are_rejected_before_evaluation() {
    let arena = Bump::new();
    let b = ExprBuilder::new(&arena);

    let mut body = b.int(0);
    for i in 1..100 {
        body = b.binary(BinaryOp::Add, body, b.int(i));
    }
    let lambda = b.lambda(body, &[]).unwrap();

    let compiler = Compiler::new(
        CompileOptions {
            max_nodes: 50,
            ..CompileOptions::default()
        },
        |_| {},
    );
    assert!(matches!(
        compiler.compile(lambda),
        Err(ramus::Error::TreeTooLarge { .. })
    ));
}
