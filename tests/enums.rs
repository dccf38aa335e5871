mod common;

use common::{reflector_for, reflector_with_stubs};
use php_reflect::{ClassKind, SourceOrigin, Value};

const SOURCE: &str = r#"<?php
interface HasLabel { public function label(): string; }

enum Suit: string implements HasLabel {
    case Hearts = 'H';
    case Spades = 'S';

    public function label(): string {
        return match($this) {
            Suit::Hearts => 'hearts',
            Suit::Spades => 'spades',
        };
    }
}

enum Direction {
    case North;
    case South;
}
"#;

#[test]
fn backed_enums_synthesize_unit_and_backed_interfaces() {
    let reflector = reflector_for(SOURCE);
    let suit = reflector.reflect_class("Suit").unwrap();

    assert_eq!(suit.kind(), ClassKind::Enum);
    assert!(suit.is_enum());
    assert!(suit.is_final());
    // Engine-assigned interfaces come first, source-declared ones after.
    assert_eq!(
        suit.interface_names(),
        ["UnitEnum", "BackedEnum", "HasLabel"]
    );
    assert_eq!(suit.backing_type().unwrap().to_string(), "string");
}

#[test]
fn pure_enums_synthesize_only_the_unit_interface() {
    let reflector = reflector_for(SOURCE);
    let direction = reflector.reflect_class("Direction").unwrap();
    assert_eq!(direction.interface_names(), ["UnitEnum"]);
    assert!(direction.backing_type().is_none());
}

#[test]
fn backed_cases_carry_compiled_scalar_values() {
    let reflector = reflector_for(SOURCE);
    let suit = reflector.reflect_class("Suit").unwrap();

    let cases: Vec<&str> = suit.cases().keys().map(String::as_str).collect();
    assert_eq!(cases, vec!["Hearts", "Spades"]);

    let hearts = suit.case("Hearts").unwrap();
    assert!(hearts.is_backed());
    assert_eq!(
        hearts.backing_value(&reflector).unwrap(),
        Some(Value::String("H".to_owned()))
    );
}

#[test]
fn pure_cases_have_no_backing_value() {
    let reflector = reflector_for(SOURCE);
    let direction = reflector.reflect_class("Direction").unwrap();

    let north = direction.case("North").unwrap();
    assert!(!north.is_backed());
    assert_eq!(north.backing_value(&reflector).unwrap(), None);
}

#[test]
fn synthesized_enum_interfaces_resolve_through_the_builtin_stubs() {
    let reflector = reflector_with_stubs(SOURCE);
    let suit = reflector.reflect_class("Suit").unwrap();

    let interfaces = suit.interfaces(&reflector).unwrap();
    assert_eq!(interfaces.len(), 3);
    let unit = &interfaces[0];
    assert_eq!(unit.name(), "UnitEnum");
    assert!(unit.is_interface());
    assert_eq!(unit.located_source().origin(), SourceOrigin::Internal);
    assert!(unit.has_method("cases"));

    assert!(suit.implements_interface(&reflector, "UnitEnum").unwrap());
    assert!(suit.implements_interface(&reflector, "BackedEnum").unwrap());
}

#[test]
fn enum_methods_reflect_like_class_methods() {
    let reflector = reflector_for(SOURCE);
    let suit = reflector.reflect_class("Suit").unwrap();

    let label = suit.method("label").unwrap();
    assert!(label.has_body());
    assert_eq!(label.return_type().unwrap().to_string(), "string");
}

#[test]
fn builtin_exception_stubs_resolve_with_their_hierarchy() {
    let reflector = reflector_with_stubs("<?php class App {}");
    let exception = reflector.reflect_class("Exception").unwrap();

    assert_eq!(exception.interface_names(), ["Throwable"]);
    assert!(exception.has_method("getMessage"));
    assert!(exception.implements_interface(&reflector, "Stringable").unwrap());
    assert!(exception.located_source().is_internal());
}
