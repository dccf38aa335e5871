mod common;

use common::reflector_for;
use php_reflect::ReflectionError;

const SOURCE: &str = r#"<?php
interface Speaks {
    public function speak(): string;
}

class Animal implements Speaks {
    public function speak(): string {}
    public function sleep(): void {}
    private function secret(): void {}
}

class Dog extends Animal {
    public function speak(): string {}
}
"#;

#[test]
fn resolves_parent_class_lazily() {
    let reflector = reflector_for(SOURCE);
    let dog = reflector.reflect_class("Dog").unwrap();
    assert_eq!(dog.parent_class_name(), Some("Animal"));

    let animal = dog.parent_class(&reflector).unwrap().unwrap();
    assert_eq!(animal.name(), "Animal");
    assert!(animal.parent_class(&reflector).unwrap().is_none());
}

#[test]
fn unlocatable_parent_fails_only_when_asked() {
    let reflector = reflector_for("<?php class Orphan extends Missing {}");
    let orphan = reflector.reflect_class("Orphan").unwrap();
    assert_eq!(orphan.parent_class_name(), Some("Missing"));

    let err = orphan.parent_class(&reflector).unwrap_err();
    assert!(err.is_not_found(), "got: {err}");
}

#[test]
fn inherited_methods_exclude_private_and_prefer_own() {
    let reflector = reflector_for(SOURCE);
    let dog = reflector.reflect_class("Dog").unwrap();

    let methods = dog.methods_with_inherited(&reflector).unwrap();
    assert!(methods.contains_key("sleep"));
    assert!(!methods.contains_key("secret"));
    // The override wins over the inherited declaration.
    assert_eq!(methods["speak"].declaring_class_name(), "Dog");
    assert_eq!(methods["sleep"].declaring_class_name(), "Animal");
}

#[test]
fn prototype_walks_parent_chain_first() {
    let reflector = reflector_for(SOURCE);
    let dog = reflector.reflect_class("Dog").unwrap();

    let prototype = dog
        .method("speak")
        .unwrap()
        .prototype(&reflector)
        .unwrap()
        .expect("speak is declared by Animal");
    assert_eq!(prototype.declaring_class_name(), "Animal");
}

#[test]
fn prototype_falls_back_to_interfaces() {
    let reflector = reflector_for(SOURCE);
    let animal = reflector.reflect_class("Animal").unwrap();

    let prototype = animal
        .method("speak")
        .unwrap()
        .prototype(&reflector)
        .unwrap()
        .expect("speak is declared by the interface");
    assert_eq!(prototype.declaring_class_name(), "Speaks");
    assert!(prototype.is_abstract());
}

#[test]
fn missing_prototype_is_a_condition_not_an_error() {
    let reflector = reflector_for(SOURCE);
    let animal = reflector.reflect_class("Animal").unwrap();
    let prototype = animal
        .method("sleep")
        .unwrap()
        .prototype(&reflector)
        .unwrap();
    assert!(prototype.is_none());
}

#[test]
fn subclass_and_interface_checks() {
    let reflector = reflector_for(SOURCE);
    let dog = reflector.reflect_class("Dog").unwrap();

    assert!(dog.is_subclass_of(&reflector, "Animal").unwrap());
    assert!(dog.is_subclass_of(&reflector, "Speaks").unwrap());
    assert!(!dog.is_subclass_of(&reflector, "Dog").unwrap());
    assert!(dog.implements_interface(&reflector, "speaks").unwrap());

    let interfaces = dog.all_interface_names(&reflector).unwrap();
    assert_eq!(interfaces, vec!["Speaks".to_owned()]);
}

#[test]
fn interface_extension_chains_resolve() {
    let reflector = reflector_for(
        "<?php interface A {} interface B extends A {} class C implements B {}",
    );
    let class = reflector.reflect_class("C").unwrap();
    let names = class.all_interface_names(&reflector).unwrap();
    assert_eq!(names, vec!["B".to_owned(), "A".to_owned()]);
}

#[test]
fn extends_cycle_is_detected_structurally() {
    let reflector = reflector_for("<?php class A extends B {} class B extends A {}");
    let a = reflector.reflect_class("A").unwrap();
    let err = a.is_subclass_of(&reflector, "Missing").unwrap_err();
    assert!(
        matches!(err, ReflectionError::CircularDependency { .. }),
        "got: {err}"
    );
}

#[test]
fn constants_resolve_through_the_hierarchy() {
    let reflector = reflector_for(
        r#"<?php
interface WithDefault { const MODE = 'auto'; }
class Base { const LIMIT = 10; }
class Child extends Base implements WithDefault {}
"#,
    );
    let child = reflector.reflect_class("Child").unwrap();
    let limit = child
        .constant_with_inherited(&reflector, "LIMIT")
        .unwrap()
        .expect("inherited from Base");
    assert_eq!(limit.declaring_class(), "Base");

    let mode = child
        .constant_with_inherited(&reflector, "MODE")
        .unwrap()
        .expect("inherited from the interface");
    assert_eq!(mode.declaring_class(), "WithDefault");

    assert!(
        child
            .constant_with_inherited(&reflector, "NOPE")
            .unwrap()
            .is_none()
    );
}
