use crate::parser::ast::{Stmt, UseKind};
use crate::parser::parser::Parser;

fn stmts(source: &str) -> Vec<Stmt> {
    let program = Parser::parse(source);
    assert_eq!(program.errors, vec![], "unexpected parse errors");
    program
        .statements
        .into_iter()
        .filter(|s| !matches!(s, Stmt::Nop { .. }))
        .collect()
}

#[test]
fn parses_rest_of_file_namespace() {
    let stmts = stmts("<?php namespace App\\Model; class User {}");
    let Stmt::Namespace { name, body, .. } = &stmts[0] else {
        panic!("expected namespace");
    };
    assert_eq!(name.as_ref().unwrap().joined(), "App\\Model");
    assert!(body.is_none());
    assert!(matches!(stmts[1], Stmt::Class { .. }));
}

#[test]
fn parses_braced_namespaces() {
    let stmts = stmts(
        "<?php namespace A { class X {} } namespace B { class Y {} } namespace { class Z {} }",
    );
    assert_eq!(stmts.len(), 3);
    for stmt in &stmts {
        let Stmt::Namespace { body, .. } = stmt else {
            panic!("expected namespace");
        };
        assert_eq!(body.as_ref().unwrap().len(), 1);
    }
    let Stmt::Namespace { name, .. } = &stmts[2] else {
        unreachable!();
    };
    assert!(name.is_none());
}

#[test]
fn parses_use_imports() {
    let stmts = stmts(
        "<?php use A\\B; use C\\D as E; use function f\\g; use const H\\I; use J\\{K, L as M};",
    );

    let Stmt::Use { uses, .. } = &stmts[0] else {
        panic!("expected use");
    };
    assert_eq!(uses[0].name.joined(), "A\\B");
    assert!(uses[0].alias.is_none());

    let Stmt::Use { uses, .. } = &stmts[1] else {
        panic!("expected use");
    };
    assert_eq!(uses[0].alias.as_ref().unwrap().name, "E");

    let Stmt::Use { uses, .. } = &stmts[2] else {
        panic!("expected use");
    };
    assert_eq!(uses[0].kind, UseKind::Function);

    let Stmt::Use { uses, .. } = &stmts[3] else {
        panic!("expected use");
    };
    assert_eq!(uses[0].kind, UseKind::Const);

    let Stmt::Use { uses, .. } = &stmts[4] else {
        panic!("expected use");
    };
    assert_eq!(uses.len(), 2);
    assert_eq!(uses[0].name.joined(), "J\\K");
    assert_eq!(uses[1].name.joined(), "J\\L");
    assert_eq!(uses[1].alias.as_ref().unwrap().name, "M");
}

#[test]
fn parses_top_level_const_and_define() {
    let stmts = stmts("<?php const VERSION = '1.0', BUILD = 2; define('LEGACY', true);");
    let Stmt::Const { consts, .. } = &stmts[0] else {
        panic!("expected const");
    };
    assert_eq!(consts.len(), 2);
    assert_eq!(consts[0].name.name, "VERSION");
    assert!(matches!(stmts[1], Stmt::Expression { .. }));
}

#[test]
fn parses_alternative_control_syntax() {
    let stmts = stmts(
        "<?php if ($a): echo 1; elseif ($b): echo 2; else: echo 3; endif; \
         while ($c): echo 4; endwhile; \
         foreach ($d as $k => $v): echo 5; endforeach;",
    );
    assert!(matches!(stmts[0], Stmt::If { .. }));
    assert!(matches!(stmts[1], Stmt::While { .. }));
    assert!(matches!(stmts[2], Stmt::Foreach { .. }));
}
