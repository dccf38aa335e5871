mod common;

use common::reflector_for;
use php_reflect::{ReflectionError, Visibility};

#[test]
fn trait_methods_merge_into_the_using_class() {
    let reflector = reflector_for(
        r#"<?php
trait Greets {
    public function greet(): string { return 'hi'; }
}
class Host { use Greets; }
"#,
    );
    let host = reflector.reflect_class("Host").unwrap();
    assert_eq!(host.trait_names(), ["Greets"]);

    let greet = host.method("greet").expect("composed from the trait");
    assert_eq!(greet.declaring_class_name(), "Host");
    assert_eq!(greet.defined_in(), "Greets");
    assert!(greet.comes_from_trait());
}

#[test]
fn class_declarations_shadow_trait_members() {
    let reflector = reflector_for(
        r#"<?php
trait Walks { public function move(): string { return 'walk'; } }
class Robot {
    use Walks;
    public function move(): string { return 'roll'; }
}
"#,
    );
    let robot = reflector.reflect_class("Robot").unwrap();
    let m = robot.method("move").unwrap();
    assert_eq!(m.defined_in(), "Robot");
    assert!(!m.comes_from_trait());
}

#[test]
fn undeclared_method_conflict_between_traits_is_ambiguous() {
    let reflector = reflector_for(
        r#"<?php
trait A { public function m() {} }
trait B { public function m() {} }
class C { use A, B; }
"#,
    );
    let err = reflector.reflect_class("C").unwrap_err();
    let ReflectionError::AmbiguousTraitUse { class, member, traits } = err else {
        panic!("expected ambiguous trait use, got: {err}");
    };
    assert_eq!(class, "C");
    assert_eq!(member, "m");
    assert_eq!(traits, vec!["A".to_owned(), "B".to_owned()]);
}

#[test]
fn insteadof_picks_the_surviving_copy() {
    let reflector = reflector_for(
        r#"<?php
trait A { public function m(): string { return 'a'; } }
trait B { public function m(): string { return 'b'; } }
class C {
    use A, B { A::m insteadof B; }
}
"#,
    );
    let class = reflector.reflect_class("C").unwrap();
    assert_eq!(class.method("m").unwrap().defined_in(), "A");
}

#[test]
fn aliasing_copies_under_a_new_name_without_removing_the_original() {
    let reflector = reflector_for(
        r#"<?php
trait A { public function m(): string { return 'a'; } }
trait B { public function m(): string { return 'b'; } }
class C {
    use A, B {
        A::m insteadof B;
        B::m as protected mFromB;
    }
}
"#,
    );
    let class = reflector.reflect_class("C").unwrap();

    let original = class.method("m").unwrap();
    assert_eq!(original.defined_in(), "A");
    assert!(original.aliased_from().is_none());

    let alias = class.method("mFromB").unwrap();
    assert_eq!(alias.defined_in(), "B");
    assert_eq!(alias.aliased_from(), Some("m"));
    assert_eq!(alias.visibility(), Visibility::Protected);
    // Aliasing may adjust visibility, never the signature.
    assert_eq!(alias.parameters().len(), original.parameters().len());
}

#[test]
fn alias_without_qualifier_narrows_visibility_in_place() {
    let reflector = reflector_for(
        r#"<?php
trait Helpers { public function internals() {} }
class Service {
    use Helpers { internals as private; }
}
"#,
    );
    let class = reflector.reflect_class("Service").unwrap();
    let m = class.method("internals").unwrap();
    assert_eq!(m.visibility(), Visibility::Private);
    assert_eq!(m.defined_in(), "Helpers");
}

#[test]
fn diamond_composition_of_one_origin_merges_silently() {
    let reflector = reflector_for(
        r#"<?php
trait Root { public function shared() {} }
trait Left { use Root; }
trait Right { use Root; }
class Leaf { use Left, Right; }
"#,
    );
    let leaf = reflector.reflect_class("Leaf").unwrap();
    assert_eq!(leaf.method("shared").unwrap().defined_in(), "Root");
}

#[test]
fn a_trait_using_itself_is_a_circular_dependency() {
    let reflector = reflector_for("<?php trait Loop { use Loop; }");
    let err = reflector.reflect_class("Loop").unwrap_err();
    assert!(
        matches!(err, ReflectionError::CircularDependency { .. }),
        "got: {err}"
    );
}

#[test]
fn mutually_using_traits_are_a_circular_dependency() {
    let reflector = reflector_for("<?php trait A { use B; } trait B { use A; }");
    let err = reflector.reflect_class("A").unwrap_err();
    assert!(
        matches!(err, ReflectionError::CircularDependency { .. }),
        "got: {err}"
    );
}

#[test]
fn using_a_non_trait_is_rejected() {
    let reflector = reflector_for("<?php class Plain {} class User { use Plain; }");
    let err = reflector.reflect_class("User").unwrap_err();
    assert!(matches!(err, ReflectionError::NotATrait { .. }), "got: {err}");
}

#[test]
fn identical_trait_properties_merge_and_conflicting_ones_do_not() {
    let reflector = reflector_for(
        r#"<?php
trait P1 { public $x = 1; }
trait P2 { public $x = 1; }
class Fine { use P1, P2; }

trait Q1 { public $y = 1; }
trait Q2 { public $y = 2; }
class Broken { use Q1, Q2; }
"#,
    );
    let fine = reflector.reflect_class("Fine").unwrap();
    assert!(fine.property("x").is_some());

    let err = reflector.reflect_class("Broken").unwrap_err();
    let ReflectionError::AmbiguousTraitUse { member, .. } = err else {
        panic!("expected ambiguous trait use, got: {err}");
    };
    assert_eq!(member, "$y");
}

#[test]
fn trait_properties_and_constants_report_the_using_class() {
    let reflector = reflector_for(
        r#"<?php
trait HasState {
    public const DEFAULT_STATE = 'idle';
    protected string $state = 'idle';
}
class Machine { use HasState; }
"#,
    );
    let machine = reflector.reflect_class("Machine").unwrap();

    let state = machine.property("state").unwrap();
    assert_eq!(state.declaring_class_name(), "Machine");
    assert_eq!(state.defined_in(), "HasState");
    assert_eq!(state.visibility(), Visibility::Protected);

    let constant = machine.constant("DEFAULT_STATE").unwrap();
    assert_eq!(constant.declaring_class(), "Machine");
}
