use crate::parser::parser::Parser;

#[test]
fn program_serializes_to_json() {
    let program = Parser::parse("<?php class Foo { public function m(int $x = 1): void {} }");
    let json = serde_json::to_value(&program).expect("AST should serialize");

    let dump = json.to_string();
    assert!(dump.contains("\"Class\""));
    assert!(dump.contains("\"Method\""));
    assert!(dump.contains("\"Foo\""));
}

#[test]
fn spans_serialize_with_offsets() {
    let program = Parser::parse("<?php $a;");
    let json = serde_json::to_value(&program).expect("AST should serialize");
    assert!(json["span"]["start"].is_number());
    assert!(json["span"]["end"].is_number());
}
