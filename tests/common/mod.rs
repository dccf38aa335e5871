#![allow(dead_code)]

use php_reflect::{
    AggregateSourceLocator, InternalSourceLocator, Reflector, SourceLocator, StringSourceLocator,
};
use std::rc::Rc;

/// A reflector over one in-memory source.
pub fn reflector_for(source: &str) -> Reflector {
    Reflector::new(Rc::new(
        StringSourceLocator::new(source.to_owned()).expect("source must not be empty"),
    ))
}

/// A reflector over one in-memory source, backed by the built-in stubs for
/// engine interfaces (UnitEnum, Throwable, ...).
pub fn reflector_with_stubs(source: &str) -> Reflector {
    let string: Rc<dyn SourceLocator> = Rc::new(
        StringSourceLocator::new(source.to_owned()).expect("source must not be empty"),
    );
    let stubs: Rc<dyn SourceLocator> = Rc::new(InternalSourceLocator::builtin());
    Reflector::new(Rc::new(AggregateSourceLocator::new(vec![string, stubs])))
}
