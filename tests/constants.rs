mod common;

use common::reflector_for;
use php_reflect::parser::ast::Expr;
use php_reflect::{ReflectionError, Value};

#[test]
fn parameter_default_referencing_self_resolves_to_the_declared_value() {
    let reflector = reflector_for(
        r#"<?php
class Config {
    const LIMIT = 5;
    public function take(int $n = self::LIMIT): void {}
}
"#,
    );
    let class = reflector.reflect_class("Config").unwrap();
    let param = &class.method("take").unwrap().parameters()[0];
    assert_eq!(param.default_text(), Some("self::LIMIT"));
    assert_eq!(param.default_value(&reflector).unwrap(), Some(Value::Int(5)));
}

#[test]
fn parameter_default_referencing_parent_walks_the_hierarchy() {
    let reflector = reflector_for(
        r#"<?php
class Base { const MODE = 'auto'; }
class Child extends Base {
    public function run(string $mode = parent::MODE): void {}
}
"#,
    );
    let class = reflector.reflect_class("Child").unwrap();
    let param = &class.method("run").unwrap().parameters()[0];
    assert_eq!(
        param.default_value(&reflector).unwrap(),
        Some(Value::String("auto".to_owned()))
    );
}

#[test]
fn defaults_referencing_an_imported_class_constant_resolve_by_name() {
    let reflector = reflector_for(
        r#"<?php
namespace App;
use Lib\Settings;
class Worker {
    public function boot(int $v = Settings::VERSION): void {}
}
namespace Lib;
class Settings { const VERSION = 3; }
"#,
    );
    let class = reflector.reflect_class("App\\Worker").unwrap();
    let param = &class.method("boot").unwrap().parameters()[0];
    assert_eq!(param.default_value(&reflector).unwrap(), Some(Value::Int(3)));
}

#[test]
fn free_constants_resolve_for_defaults() {
    let reflector = reflector_for(
        "<?php const GREETING = 'hello'; function greet(string $who = GREETING) {}",
    );
    let function = reflector.reflect_function("greet").unwrap();
    assert_eq!(
        function.parameters()[0].default_value(&reflector).unwrap(),
        Some(Value::String("hello".to_owned()))
    );
}

#[test]
fn define_calls_declare_reflectable_constants() {
    let reflector = reflector_for("<?php define('LEGACY_MODE', true); const MODERN = false;");

    let legacy = reflector.reflect_constant("LEGACY_MODE").unwrap();
    assert!(legacy.is_define());
    assert_eq!(legacy.value(&reflector).unwrap(), Value::Bool(true));

    let modern = reflector.reflect_constant("MODERN").unwrap();
    assert!(!modern.is_define());

    let all = reflector.reflect_all_constants().unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["LEGACY_MODE", "MODERN"]);
}

#[test]
fn unqualified_constants_fall_back_to_the_global_namespace() {
    let reflector = reflector_for(
        r#"<?php
namespace App;
const LOCAL = 1;
function f($a = LOCAL, $b = PHP_INT_SIZE) {}
"#,
    );
    let function = reflector.reflect_function("App\\f").unwrap();
    assert_eq!(
        function.parameters()[0].default_value(&reflector).unwrap(),
        Some(Value::Int(1))
    );
    assert_eq!(
        function.parameters()[1].default_value(&reflector).unwrap(),
        Some(Value::Int(8))
    );
}

#[test]
fn class_name_resolution_compiles_to_the_qualified_string() {
    let reflector = reflector_for(
        r#"<?php
namespace App;
use Lib\Widget;
class Tool {
    public function m($c = Widget::class, $s = self::class) {}
}
"#,
    );
    let class = reflector.reflect_class("App\\Tool").unwrap();
    let method = class.method("m").unwrap();
    assert_eq!(
        method.parameters()[0].default_value(&reflector).unwrap(),
        Some(Value::String("Lib\\Widget".to_owned()))
    );
    assert_eq!(
        method.parameters()[1].default_value(&reflector).unwrap(),
        Some(Value::String("App\\Tool".to_owned()))
    );
}

#[test]
fn array_defaults_compile_element_wise() {
    let reflector = reflector_for(
        "<?php class C { const TABLE = [1, 'k' => 2, 3.5, null]; }",
    );
    let class = reflector.reflect_class("C").unwrap();
    let value = class.constant("TABLE").unwrap().value(&reflector).unwrap();
    assert_eq!(
        value,
        Value::Array(vec![
            (None, Value::Int(1)),
            (Some(Value::String("k".to_owned())), Value::Int(2)),
            (None, Value::Float(3.5)),
            (None, Value::Null),
        ])
    );
}

#[test]
fn integer_literal_bases_and_separators_compile() {
    let reflector = reflector_for(
        "<?php class N { const HEX = 0xFF; const BIN = 0b101; const OCT = 0o17; const LEGACY_OCT = 017; const BIG = 1_000_000; const NEG = -42; }",
    );
    let class = reflector.reflect_class("N").unwrap();
    let value = |name: &str| class.constant(name).unwrap().value(&reflector).unwrap();
    assert_eq!(value("HEX"), Value::Int(255));
    assert_eq!(value("BIN"), Value::Int(5));
    assert_eq!(value("OCT"), Value::Int(15));
    assert_eq!(value("LEGACY_OCT"), Value::Int(15));
    assert_eq!(value("BIG"), Value::Int(1_000_000));
    assert_eq!(value("NEG"), Value::Int(-42));
}

#[test]
fn new_in_initializer_position_is_kept_structurally() {
    let reflector = reflector_for(
        "<?php class C { public function m($x = new \\ArrayObject()) {} }",
    );
    let class = reflector.reflect_class("C").unwrap();
    let value = class.method("m").unwrap().parameters()[0]
        .default_value(&reflector)
        .unwrap()
        .unwrap();
    assert!(
        matches!(value, Value::Expr(Expr::New { .. })),
        "got: {value:?}"
    );
}

#[test]
fn enum_case_defaults_compile_to_case_references() {
    let reflector = reflector_for(
        r#"<?php
enum Status { case Active; case Retired; }
class Job { public function m(Status $s = Status::Active) {} }
"#,
    );
    let class = reflector.reflect_class("Job").unwrap();
    let value = class.method("m").unwrap().parameters()[0]
        .default_value(&reflector)
        .unwrap();
    assert_eq!(
        value,
        Some(Value::EnumCase {
            class: "Status".to_owned(),
            case: "Active".to_owned(),
        })
    );
}

#[test]
fn mutually_recursive_constants_are_a_circular_dependency() {
    let reflector = reflector_for("<?php const A = B; const B = A;");
    let a = reflector.reflect_constant("A").unwrap();
    let err = a.value(&reflector).unwrap_err();
    assert!(
        matches!(err, ReflectionError::CircularDependency { .. }),
        "got: {err}"
    );
}

#[test]
fn a_class_constant_referencing_itself_is_a_circular_dependency() {
    let reflector = reflector_for("<?php class C { const SELF_REF = self::SELF_REF; }");
    let class = reflector.reflect_class("C").unwrap();
    let err = class
        .constant("SELF_REF")
        .unwrap()
        .value(&reflector)
        .unwrap_err();
    assert!(
        matches!(err, ReflectionError::CircularDependency { .. }),
        "got: {err}"
    );
}

#[test]
fn missing_referenced_constants_surface_as_not_found() {
    let reflector = reflector_for("<?php function f($x = UNDEFINED_CONSTANT) {}");
    let function = reflector.reflect_function("f").unwrap();
    let err = function.parameters()[0]
        .default_value(&reflector)
        .unwrap_err();
    assert!(err.is_not_found(), "got: {err}");
}
