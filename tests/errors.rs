mod common;

use common::reflector_for;
use php_reflect::{IdentifierKind, ReflectionError};

#[test]
fn chain_exhaustion_is_not_found_only_at_the_facade() {
    let reflector = reflector_for("<?php class Exists {}");
    let err = reflector.reflect_class("Missing").unwrap_err();
    let ReflectionError::NotFound { kind, name } = &err else {
        panic!("expected not-found, got: {err}");
    };
    assert_eq!(*kind, IdentifierKind::Class);
    assert_eq!(name, "Missing");
    assert_eq!(err.to_string(), "class Missing could not be located");
}

#[test]
fn syntactically_broken_sources_are_a_parse_error_not_not_found() {
    let reflector = reflector_for("<?php\nclass Broken {\n    public function ...\n");
    let err = reflector.reflect_class("Broken").unwrap_err();
    let ReflectionError::Parse { line, .. } = &err else {
        panic!("expected parse error, got: {err}");
    };
    assert!(*line >= 2, "error should carry the offending line, got {line}");
    assert!(!err.is_not_found());
}

#[test]
fn parse_errors_report_even_symbols_the_source_does_not_declare() {
    // Callers can tell "the code is broken" from "the code is not here".
    let reflector = reflector_for("<?php class Broken {");
    let err = reflector.reflect_class("SomethingElse").unwrap_err();
    assert!(matches!(err, ReflectionError::Parse { .. }), "got: {err}");
}

#[test]
fn each_identifier_kind_reports_its_own_not_found() {
    let reflector = reflector_for("<?php class OnlyClass {}");

    let err = reflector.reflect_function("missing_fn").unwrap_err();
    assert!(matches!(
        err,
        ReflectionError::NotFound {
            kind: IdentifierKind::Function,
            ..
        }
    ));

    let err = reflector.reflect_constant("MISSING").unwrap_err();
    assert!(matches!(
        err,
        ReflectionError::NotFound {
            kind: IdentifierKind::Constant,
            ..
        }
    ));
}

#[test]
fn constants_are_case_sensitive_unlike_classes_and_functions() {
    let reflector = reflector_for("<?php const Answer = 42; class Box {} function lid() {}");

    assert!(reflector.reflect_constant("Answer").is_ok());
    assert!(reflector.reflect_constant("ANSWER").unwrap_err().is_not_found());

    assert!(reflector.reflect_class("BOX").is_ok());
    assert!(reflector.reflect_function("LID").is_ok());
}

#[test]
fn error_messages_carry_diagnostic_context() {
    let err = ReflectionError::AmbiguousTraitUse {
        class: "C".to_owned(),
        member: "m".to_owned(),
        traits: vec!["A".to_owned(), "B".to_owned()],
    };
    assert_eq!(
        err.to_string(),
        "trait member C::m is provided by A and B; add an insteadof rule"
    );

    let err = ReflectionError::AmbiguousPosition {
        path: "/tmp/two.php".into(),
        line: 7,
        count: 2,
    };
    assert_eq!(
        err.to_string(),
        "2 candidates start on line 7 of /tmp/two.php; position is ambiguous"
    );
}
