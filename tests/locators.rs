mod common;

use common::reflector_for;
use php_reflect::{
    AggregateSourceLocator, Identifier, IdentifierKind, MemoizingSourceLocator, Reflection,
    ReflectionError, Reflector, SourceLocator, StringSourceLocator,
};
use std::cell::Cell;
use std::rc::Rc;

/// Counts delegate invocations so tests can observe short-circuiting and
/// memoization behavior.
struct CountingLocator {
    inner: Rc<dyn SourceLocator>,
    locate_calls: Rc<Cell<usize>>,
}

impl CountingLocator {
    fn new(inner: Rc<dyn SourceLocator>) -> (Rc<Self>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Rc::new(Self {
                inner,
                locate_calls: calls.clone(),
            }),
            calls,
        )
    }
}

impl SourceLocator for CountingLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        self.locate_calls.set(self.locate_calls.get() + 1);
        self.inner.locate(reflector, identifier)
    }

    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        self.inner.locate_all_of_kind(reflector, kind)
    }
}

fn string_locator(source: &str) -> Rc<dyn SourceLocator> {
    Rc::new(StringSourceLocator::new(source.to_owned()).unwrap())
}

#[test]
fn empty_source_text_is_a_configuration_error() {
    let err = StringSourceLocator::new(String::new()).unwrap_err();
    assert!(matches!(err, ReflectionError::Configuration { .. }));
}

#[test]
fn aggregate_returns_first_hit_and_short_circuits() {
    let (first, first_calls) = CountingLocator::new(string_locator("<?php class Other {}"));
    let resolving = string_locator("<?php class Target {}");
    let (last, last_calls) = CountingLocator::new(string_locator("<?php class Target {}"));

    let reflector = Reflector::new(Rc::new(AggregateSourceLocator::new(vec![
        first, resolving, last,
    ])));

    let class = reflector.reflect_class("Target").unwrap();
    assert_eq!(class.name(), "Target");
    assert_eq!(first_calls.get(), 1);
    assert_eq!(last_calls.get(), 0);
}

#[test]
fn aggregate_bulk_lookup_concatenates_without_deduplication() {
    let locator = AggregateSourceLocator::new(vec![
        string_locator("<?php class A {}"),
        string_locator("<?php class A {} class B {}"),
    ]);
    let reflector = Reflector::new(Rc::new(AggregateSourceLocator::new(vec![])));

    let found = locator
        .locate_all_of_kind(&reflector, IdentifierKind::Class)
        .unwrap();
    let names: Vec<&str> = found.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["A", "A", "B"]);
}

#[test]
fn memoizing_locator_invokes_its_delegate_at_most_once_per_identifier() {
    let (counted, calls) = CountingLocator::new(string_locator("<?php class Foo {}"));
    let memo = Rc::new(MemoizingSourceLocator::new(counted));
    let reflector = Reflector::new(memo.clone());

    let foo = Identifier::class("Foo");
    assert!(memo.locate(&reflector, &foo).unwrap().is_some());
    assert!(memo.locate(&reflector, &foo).unwrap().is_some());
    // Case-insensitive: the same cache entry serves a differently-cased name.
    assert!(memo.locate(&reflector, &Identifier::class("FOO")).unwrap().is_some());
    assert_eq!(calls.get(), 1);
}

#[test]
fn memoizing_locator_caches_negative_results() {
    let (counted, calls) = CountingLocator::new(string_locator("<?php class Foo {}"));
    let memo = Rc::new(MemoizingSourceLocator::new(counted));
    let reflector = Reflector::new(memo.clone());

    let missing = Identifier::class("Missing");
    assert!(memo.locate(&reflector, &missing).unwrap().is_none());
    assert!(memo.locate(&reflector, &missing).unwrap().is_none());
    assert_eq!(calls.get(), 1);
}

#[test]
fn memoization_is_partitioned_by_reflector_identity() {
    let (counted, calls) = CountingLocator::new(string_locator("<?php class Foo {}"));
    let memo = Rc::new(MemoizingSourceLocator::new(counted));
    let first = Reflector::new(memo.clone());
    let second = Reflector::new(memo.clone());
    assert_ne!(first.id(), second.id());

    let foo = Identifier::class("Foo");
    memo.locate(&first, &foo).unwrap();
    memo.locate(&second, &foo).unwrap();
    assert_eq!(calls.get(), 2);
    assert_eq!(memo.cached_lookup_count(), 2);
}

#[test]
fn repeated_lookups_return_the_identical_cached_object() {
    let reflector = reflector_for(
        "<?php class Foo {} function bar() {} const BAZ = 1;",
    );

    let c1 = reflector.reflect_class("Foo").unwrap();
    let c2 = reflector.reflect_class("foo").unwrap();
    assert!(Rc::ptr_eq(&c1, &c2));

    let f1 = reflector.reflect_function("bar").unwrap();
    let f2 = reflector.reflect_function("BAR").unwrap();
    assert!(Rc::ptr_eq(&f1, &f2));

    let k1 = reflector.reflect_constant("BAZ").unwrap();
    let k2 = reflector.reflect_constant("BAZ").unwrap();
    assert!(Rc::ptr_eq(&k1, &k2));
}

#[test]
fn bulk_lookup_keeps_distinct_same_named_declarations() {
    let reflector = Reflector::new(Rc::new(AggregateSourceLocator::new(vec![
        string_locator("<?php class Dup { public function first() {} }"),
        string_locator("<?php class Dup { public function second() {} } class Only {}"),
    ])));

    let all = reflector.reflect_all_classes().unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Dup", "Dup", "Only"]);
    assert!(all[0].has_method("first"));
    assert!(all[1].has_method("second"));
    assert!(!Rc::ptr_eq(&all[0], &all[1]));

    // By-name lookup shares the first declaration folded into the cache.
    let dup = reflector.reflect_class("Dup").unwrap();
    assert!(Rc::ptr_eq(&dup, &all[0]));
}

#[test]
fn identical_source_text_is_parsed_once_across_locators() {
    let text = "<?php class A {} class B {}";
    let reflector = Reflector::new(Rc::new(AggregateSourceLocator::new(vec![
        string_locator(text),
        string_locator(text),
    ])));

    reflector.reflect_class("A").unwrap();
    // A miss walks both locators; the second parse is served from cache.
    assert!(reflector.reflect_class("Zed").is_err());
    assert_eq!(reflector.parsed_source_count(), 1);
}

#[test]
fn evaled_sources_are_tagged_with_their_origin() {
    let locator = StringSourceLocator::evaled("<?php class FromEval {}".to_owned()).unwrap();
    let reflector = Reflector::new(Rc::new(locator));

    let class = reflector.reflect_class("FromEval").unwrap();
    assert!(class.located_source().is_evaled());
    assert!(class.located_source().origin_path().is_none());
}
