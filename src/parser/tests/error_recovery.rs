use crate::parser::ast::Stmt;
use crate::parser::parser::Parser;

#[test]
fn missing_semicolon_is_recorded_and_parsing_continues() {
    let program = Parser::parse("<?php $a = 1 $b = 2;");
    assert!(!program.errors.is_empty());
    assert!(program.errors.iter().any(|e| e.message.contains("semicolon")));
}

#[test]
fn unterminated_class_reports_missing_brace() {
    let program = Parser::parse("<?php class Foo { public function m() {}");
    assert!(program.errors.iter().any(|e| e.message.contains("'}'")));
    // The class node itself still exists for later statements to follow.
    assert!(
        program
            .statements
            .iter()
            .any(|s| matches!(s, Stmt::Class { .. }))
    );
}

#[test]
fn error_messages_carry_line_and_column() {
    let source = "<?php\n$a = 1\n$b = 2;\n";
    let program = Parser::parse(source);
    let error = program.errors.first().expect("expected an error");
    let rendered = error.to_human_readable_with_path(source.as_bytes(), Some("broken.php"));
    assert!(rendered.contains("broken.php:3"), "got: {rendered}");
}

#[test]
fn duplicate_interface_in_implements_is_flagged() {
    let program = Parser::parse("<?php class C implements A, A {}");
    assert!(
        program
            .errors
            .iter()
            .any(|e| e.message.contains("duplicate interface"))
    );
}

#[test]
fn abstract_method_with_body_is_flagged() {
    let program = Parser::parse("<?php abstract class C { abstract public function m() {} }");
    assert!(
        program
            .errors
            .iter()
            .any(|e| e.message.contains("abstract method"))
    );
}
