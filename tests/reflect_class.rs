mod common;

use common::reflector_for;
use php_reflect::{ClassKind, Value, Visibility};

#[test]
fn reflects_a_minimal_class() {
    let reflector = reflector_for("<?php class Foo {}");
    let class = reflector.reflect_class("Foo").unwrap();

    assert_eq!(class.name(), "Foo");
    assert_eq!(class.kind(), ClassKind::Class);
    assert!(class.parent_class_name().is_none());
    assert!(class.interface_names().is_empty());
    assert!(class.methods().is_empty());
    assert!(class.properties().is_empty());
    assert!(!class.is_abstract());
    assert!(!class.is_final());
}

#[test]
fn class_name_lookup_is_case_insensitive() {
    let reflector = reflector_for("<?php class CaseMatters {}");
    let class = reflector.reflect_class("casematters").unwrap();
    assert_eq!(class.name(), "CaseMatters");
}

#[test]
fn reflects_members_with_visibility_and_modifiers() {
    let reflector = reflector_for(
        r#"<?php
final class Account {
    public const TYPE = 'checking';
    private static int $instances = 0;
    protected ?string $owner = null;

    public function __construct(string $owner) {}
    abstract public function x();
    final protected static function open(): static {}
}
"#,
    );
    // The abstract-method-in-final-class defect makes this a parse error,
    // so trim the offending line for the real assertions below.
    assert!(reflector.reflect_class("Account").is_err());

    let reflector = reflector_for(
        r#"<?php
final class Account {
    public const TYPE = 'checking';
    private static int $instances = 0;
    protected ?string $owner = null;

    public function __construct(string $owner) {}
    final protected static function open(): static {}
}
"#,
    );
    let class = reflector.reflect_class("Account").unwrap();
    assert!(class.is_final());

    let constant = class.constant("TYPE").unwrap();
    assert_eq!(constant.visibility(), Visibility::Public);
    assert_eq!(
        constant.value(&reflector).unwrap(),
        Value::String("checking".to_owned())
    );

    let instances = class.property("instances").unwrap();
    assert_eq!(instances.visibility(), Visibility::Private);
    assert!(instances.is_static());
    assert_eq!(
        instances.default_value(&reflector).unwrap(),
        Some(Value::Int(0))
    );

    let owner = class.property("owner").unwrap();
    assert_eq!(owner.visibility(), Visibility::Protected);
    assert_eq!(
        owner.default_value(&reflector).unwrap(),
        Some(Value::Null)
    );

    let open = class.method("open").unwrap();
    assert_eq!(open.visibility(), Visibility::Protected);
    assert!(open.is_static());
    assert!(open.is_final());
    assert_eq!(open.return_type().unwrap().to_string(), "static");

    let ctor = class.constructor().unwrap();
    assert!(ctor.is_constructor());
    assert_eq!(ctor.parameters().len(), 1);
    assert_eq!(ctor.parameters()[0].name(), "owner");
}

#[test]
fn method_lookup_is_case_insensitive() {
    let reflector = reflector_for("<?php class C { public function doThing() {} }");
    let class = reflector.reflect_class("C").unwrap();
    assert!(class.has_method("dothing"));
    assert_eq!(class.method("DOTHING").unwrap().name(), "doThing");
}

#[test]
fn promoted_constructor_parameters_become_properties() {
    let reflector = reflector_for(
        "<?php class P { public function __construct(private int $x, public readonly string $y = 'a') {} }",
    );
    let class = reflector.reflect_class("P").unwrap();

    let x = class.property("x").unwrap();
    assert!(x.is_promoted());
    assert_eq!(x.visibility(), Visibility::Private);

    let y = class.property("y").unwrap();
    assert!(y.is_readonly());
    assert_eq!(y.default_value(&reflector).unwrap(), Some(Value::String("a".into())));

    let ctor = class.constructor().unwrap();
    assert!(ctor.parameters()[0].is_promoted());
}

#[test]
fn captures_doc_comments_and_attributes() {
    let reflector = reflector_for(
        r#"<?php
/** The widget. */
#[Table('widgets'), Deprecated]
class Widget {
    /** Does things. */
    #[Internal(level: 3)]
    public function run() {}
}
"#,
    );
    let class = reflector.reflect_class("Widget").unwrap();
    assert!(class.doc_comment().unwrap().contains("The widget."));
    assert_eq!(class.attributes().len(), 2);
    assert_eq!(class.attributes()[0].name(), "Table");
    assert_eq!(
        class.attributes()[0].args()[0].1,
        Value::String("widgets".to_owned())
    );

    let method = class.method("run").unwrap();
    assert!(method.doc_comment().unwrap().contains("Does things."));
    assert_eq!(method.attributes()[0].name(), "Internal");
    assert_eq!(
        method.attributes()[0].arg("level"),
        Some(&Value::Int(3))
    );
}

#[test]
fn records_source_spans_and_lines() {
    let source = "<?php\nclass Lines {\n    public function m() {}\n}\n";
    let reflector = reflector_for(source);
    let class = reflector.reflect_class("Lines").unwrap();
    assert_eq!(class.start_line(), 2);
    assert_eq!(class.end_line(), 4);

    let method = class.method("m").unwrap();
    assert_eq!(method.start_line(), 3);
    assert_eq!(method.located_source().text(), source);
}

#[test]
fn reflects_interfaces_and_traits_as_class_kinds() {
    let reflector = reflector_for("<?php interface I {} trait T {}");
    assert_eq!(
        reflector.reflect_class("I").unwrap().kind(),
        ClassKind::Interface
    );
    assert_eq!(
        reflector.reflect_class("T").unwrap().kind(),
        ClassKind::Trait
    );
}

#[test]
fn reflects_functions_with_parameters() {
    let reflector = reflector_for(
        "<?php function greet(string $name, int ...$extra): string { return $name; }",
    );
    let function = reflector.reflect_function("greet").unwrap();
    assert_eq!(function.name(), "greet");
    assert_eq!(function.number_of_parameters(), 2);
    assert_eq!(function.number_of_required_parameters(), 1);
    assert!(function.parameters()[1].is_variadic());
    assert_eq!(function.return_type().unwrap().to_string(), "string");
}

#[test]
fn function_names_are_case_insensitive() {
    let reflector = reflector_for("<?php function MixedCase() {}");
    assert!(reflector.reflect_function("mixedcase").is_ok());
}
