//! Static reflection for PHP source code.
//!
//! Reflects classes, interfaces, traits, enums, functions, and constants
//! directly from source text, without ever including, autoloading, or
//! executing the code being inspected. Sources are discovered through a
//! chain of pluggable [`SourceLocator`] strategies, parsed once into a
//! cached AST, and converted into an immutable reflection graph.
//!
//! ```no_run
//! use php_reflect::{Reflector, StringSourceLocator};
//! use std::rc::Rc;
//!
//! let locator = StringSourceLocator::new("<?php class Foo {}".to_owned())?;
//! let reflector = Reflector::new(Rc::new(locator));
//! let class = reflector.reflect_class("Foo")?;
//! assert_eq!(class.name(), "Foo");
//! # Ok::<(), php_reflect::ReflectionError>(())
//! ```

pub mod parser;
pub mod reflection;

pub use reflection::Reflection;
pub use reflection::class::{
    ClassKind, ReflectionClass, ReflectionClassConstant, ReflectionEnumCase,
};
pub use reflection::constant::ReflectionConstant;
pub use reflection::error::ReflectionError;
pub use reflection::function::{
    CLOSURE_NAME, ReflectionFunction, ReflectionMethod, ReflectionParameter,
};
pub use reflection::identifier::{Identifier, IdentifierKind};
pub use reflection::property::ReflectionProperty;
pub use reflection::types::{ReflectionAttribute, TypeExpr, Visibility};
pub use reflection::value::Value;
pub use reflection::locator::SourceLocator;
pub use reflection::locator::autoload::{AutoloadResolver, AutoloadSourceLocator};
pub use reflection::locator::composer::{ComposerSourceLocator, Psr4Resolver};
pub use reflection::locator::composite::{AggregateSourceLocator, MemoizingSourceLocator};
pub use reflection::locator::internal::{BuiltinStubs, InternalSourceLocator, StubProvider};
pub use reflection::locator::position::{AnonymousClassSourceLocator, ClosureSourceLocator};
pub use reflection::locator::strategies::{
    DirectorySourceLocator, SingleFileSourceLocator, StringSourceLocator,
};
pub use reflection::reflector::Reflector;
pub use reflection::source::{LocatedSource, SourceOrigin};
