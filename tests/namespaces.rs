mod common;

use common::reflector_for;

#[test]
fn unqualified_parent_names_resolve_against_the_namespace() {
    let reflector = reflector_for(
        "<?php namespace App; class Base {} class Sub extends Base {}",
    );
    let sub = reflector.reflect_class("App\\Sub").unwrap();
    assert_eq!(sub.parent_class_name(), Some("App\\Base"));

    let parent = sub.parent_class(&reflector).unwrap().unwrap();
    assert_eq!(parent.name(), "App\\Base");
}

#[test]
fn use_imports_redirect_parent_resolution() {
    let reflector = reflector_for(
        "<?php namespace App; use Other\\Base; class Sub extends Base {}",
    );
    let sub = reflector.reflect_class("App\\Sub").unwrap();
    assert_eq!(sub.parent_class_name(), Some("Other\\Base"));
}

#[test]
fn leading_backslash_names_are_fully_qualified() {
    let reflector = reflector_for(
        "<?php namespace App; class Sub extends \\Root {} class Root {}",
    );
    let sub = reflector.reflect_class("App\\Sub").unwrap();
    assert_eq!(sub.parent_class_name(), Some("Root"));
}

#[test]
fn group_use_aliases_apply_to_member_types() {
    let reflector = reflector_for(
        r#"<?php
namespace App;
use Lib\{Widget, Gadget as G};
class Holder {
    public Widget $w;
    public function swap(?G $next): Widget|G {}
}
"#,
    );
    let holder = reflector.reflect_class("App\\Holder").unwrap();

    let w = holder.property("w").unwrap();
    assert_eq!(w.declared_type().unwrap().to_string(), "Lib\\Widget");

    let swap = holder.method("swap").unwrap();
    let param_type = swap.parameters()[0].declared_type().unwrap();
    assert_eq!(param_type.to_string(), "?Lib\\Gadget");
    assert!(param_type.allows_null());
    assert_eq!(
        swap.return_type().unwrap().to_string(),
        "Lib\\Widget|Lib\\Gadget"
    );
}

#[test]
fn class_names_resolve_case_insensitively_with_namespaces() {
    let reflector = reflector_for("<?php namespace App\\Model; class User {}");
    let user = reflector.reflect_class("app\\model\\USER").unwrap();
    assert_eq!(user.name(), "App\\Model\\User");
    assert_eq!(user.short_name(), "User");
    assert_eq!(user.namespace_name(), Some("App\\Model"));
    assert!(user.in_namespace());
}

#[test]
fn braced_namespaces_partition_declarations() {
    let reflector = reflector_for(
        "<?php namespace A { class X {} } namespace B { class Y {} interface Z {} }",
    );
    assert!(reflector.reflect_class("A\\X").is_ok());
    assert!(reflector.reflect_class("B\\Y").is_ok());
    assert!(reflector.reflect_class("B\\Z").is_ok());
    assert!(reflector.reflect_class("A\\Y").unwrap_err().is_not_found());

    let all = reflector.reflect_all_classes().unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["A\\X", "B\\Y", "B\\Z"]);
}

#[test]
fn later_namespace_statements_reset_the_import_table() {
    let reflector = reflector_for(
        r#"<?php
namespace First;
use Lib\Helper;
class UsesImport extends Helper {}
namespace Second;
class NoImport extends Helper {}
"#,
    );
    let first = reflector.reflect_class("First\\UsesImport").unwrap();
    assert_eq!(first.parent_class_name(), Some("Lib\\Helper"));

    let second = reflector.reflect_class("Second\\NoImport").unwrap();
    assert_eq!(second.parent_class_name(), Some("Second\\Helper"));
}

#[test]
fn functions_declared_inside_other_functions_are_discoverable() {
    let reflector = reflector_for(
        "<?php namespace N; function outer() { function inner() {} }",
    );
    assert!(reflector.reflect_function("N\\outer").is_ok());
    assert!(reflector.reflect_function("N\\inner").is_ok());

    let all = reflector.reflect_all_functions().unwrap();
    let names: Vec<&str> = all.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["N\\outer", "N\\inner"]);
}

#[test]
fn conditionally_declared_classes_are_discoverable() {
    let reflector = reflector_for(
        "<?php if (true) { class Conditional {} } else { class Fallback {} }",
    );
    assert!(reflector.reflect_class("Conditional").is_ok());
    assert!(reflector.reflect_class("Fallback").is_ok());
}
