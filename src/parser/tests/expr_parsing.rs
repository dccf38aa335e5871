use crate::parser::ast::{BinaryOp, Expr, Stmt};
use crate::parser::parser::Parser;

fn first_expr(source: &str) -> Expr {
    let mut program = Parser::parse(source);
    assert_eq!(program.errors, vec![], "unexpected parse errors");
    let stmt = program
        .statements
        .drain(..)
        .find(|s| !matches!(s, Stmt::Nop { .. }))
        .expect("expected a statement");
    match stmt {
        Stmt::Expression { expr, .. } => expr,
        Stmt::Return {
            expr: Some(expr), ..
        } => expr,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let Expr::Binary {
        op: BinaryOp::Plus,
        right,
        ..
    } = first_expr("<?php return 1 + 2 * 3;")
    else {
        panic!("expected addition at the top");
    };
    assert!(matches!(
        *right,
        Expr::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn power_is_right_associative() {
    let Expr::Binary {
        op: BinaryOp::Pow,
        right,
        ..
    } = first_expr("<?php return 2 ** 3 ** 2;")
    else {
        panic!("expected power at the top");
    };
    assert!(matches!(
        *right,
        Expr::Binary {
            op: BinaryOp::Pow,
            ..
        }
    ));
}

#[test]
fn concat_chains_parse() {
    let expr = first_expr("<?php return 'a' . 'b' . 'c';");
    assert!(matches!(
        expr,
        Expr::Binary {
            op: BinaryOp::Concat,
            ..
        }
    ));
}

#[test]
fn parses_array_literals_with_keys_and_spread() {
    let Expr::Array { items, .. } = first_expr("<?php return [1, 'k' => 2, ...$rest];") else {
        panic!("expected array");
    };
    assert_eq!(items.len(), 3);
    assert!(items[0].key.is_none());
    assert!(items[1].key.is_some());
    assert!(items[2].unpack);
}

#[test]
fn parses_legacy_array_syntax() {
    let Expr::Array { items, .. } = first_expr("<?php return array(1, 2);") else {
        panic!("expected array");
    };
    assert_eq!(items.len(), 2);
}

#[test]
fn parses_closures_with_use_list() {
    let Expr::Closure {
        params,
        uses,
        return_type,
        is_static,
        ..
    } = first_expr("<?php return static function (int $a) use (&$b, $c): void {};")
    else {
        panic!("expected closure");
    };
    assert!(is_static);
    assert_eq!(params.len(), 1);
    assert_eq!(uses.len(), 2);
    assert!(uses[0].by_ref);
    assert_eq!(uses[1].name, "c");
    assert!(return_type.is_some());
}

#[test]
fn parses_arrow_functions() {
    let Expr::ArrowFunction { params, expr, .. } = first_expr("<?php return fn($x) => $x + 1;")
    else {
        panic!("expected arrow function");
    };
    assert_eq!(params.len(), 1);
    assert!(matches!(*expr, Expr::Binary { .. }));
}

#[test]
fn parses_class_constant_and_static_access() {
    let Expr::ClassConstFetch {
        class, constant, ..
    } = first_expr("<?php return Foo::BAR;")
    else {
        panic!("expected class const fetch");
    };
    assert!(matches!(*class, Expr::ConstFetch { .. }));
    let Expr::Identifier { name, .. } = *constant else {
        panic!("expected identifier member");
    };
    assert_eq!(name, "BAR");

    let Expr::ClassConstFetch { constant, .. } = first_expr("<?php return Foo::class;") else {
        panic!("expected ::class fetch");
    };
    let Expr::Identifier { name, .. } = *constant else {
        panic!("expected identifier member");
    };
    assert_eq!(name, "class");
}

#[test]
fn parses_method_and_property_chains() {
    let Expr::MethodCall {
        target, nullsafe, ..
    } = first_expr("<?php return $a->b?->c();")
    else {
        panic!("expected method call");
    };
    assert!(nullsafe);
    assert!(matches!(
        *target,
        Expr::PropertyFetch {
            nullsafe: false,
            ..
        }
    ));
}

#[test]
fn parses_match_expressions() {
    let Expr::Match { arms, .. } =
        first_expr("<?php return match($x) { 1, 2 => 'low', default => 'high' };")
    else {
        panic!("expected match");
    };
    assert_eq!(arms.len(), 2);
    assert_eq!(arms[0].conditions.as_ref().unwrap().len(), 2);
    assert!(arms[1].conditions.is_none());
}

#[test]
fn parses_ternary_and_coalesce() {
    assert!(matches!(
        first_expr("<?php return $a ? 1 : 2;"),
        Expr::Ternary { .. }
    ));
    assert!(matches!(
        first_expr("<?php return $a ?: 2;"),
        Expr::Ternary { if_true: None, .. }
    ));
    assert!(matches!(
        first_expr("<?php return $a ?? $b ?? $c;"),
        Expr::Binary {
            op: BinaryOp::Coalesce,
            ..
        }
    ));
}

#[test]
fn parses_new_with_arguments() {
    let Expr::New { class, args, .. } = first_expr("<?php return new \\App\\Thing(1, x: 2);")
    else {
        panic!("expected new");
    };
    let Expr::ConstFetch { name, .. } = *class else {
        panic!("expected class name");
    };
    assert!(name.leading_slash);
    assert_eq!(name.joined(), "App\\Thing");
    assert_eq!(args.len(), 2);
    assert_eq!(args[1].name.as_ref().unwrap().name, "x");
}

#[test]
fn parses_first_class_callable_syntax() {
    let Expr::Call { args, .. } = first_expr("<?php return strlen(...);") else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 1);
    assert!(matches!(args[0].value, Expr::VariadicPlaceholder { .. }));
}

#[test]
fn parses_casts_and_unary() {
    assert!(matches!(
        first_expr("<?php return (int) '5';"),
        Expr::Cast { .. }
    ));
    assert!(matches!(
        first_expr("<?php return -5;"),
        Expr::Unary { .. }
    ));
}

#[test]
fn parses_instanceof() {
    assert!(matches!(
        first_expr("<?php return $a instanceof Foo;"),
        Expr::Binary {
            op: BinaryOp::Instanceof,
            ..
        }
    ));
}
