pub mod ast_locator;
pub mod class;
pub mod constant;
pub mod convert;
pub mod error;
pub mod function;
pub mod identifier;
pub mod locator;
pub mod property;
pub mod reflector;
pub mod source;
pub mod types;
pub mod value;

pub use class::{ClassKind, ReflectionClass, ReflectionClassConstant, ReflectionEnumCase};
pub use constant::ReflectionConstant;
pub use error::ReflectionError;
pub use function::{ReflectionFunction, ReflectionMethod, ReflectionParameter};
pub use identifier::{Identifier, IdentifierKind};
pub use property::ReflectionProperty;
pub use reflector::Reflector;
pub use source::{LocatedSource, SourceOrigin};
pub use types::{ReflectionAttribute, TypeExpr, Visibility};
pub use value::Value;

use std::rc::Rc;

/// A successfully resolved reflection of any identifier kind. Every variant
/// carries the [`LocatedSource`] it was built from.
#[derive(Debug, Clone)]
pub enum Reflection {
    Class(Rc<ReflectionClass>),
    Function(Rc<ReflectionFunction>),
    Constant(Rc<ReflectionConstant>),
}

impl Reflection {
    pub fn kind(&self) -> IdentifierKind {
        match self {
            Reflection::Class(_) => IdentifierKind::Class,
            Reflection::Function(_) => IdentifierKind::Function,
            Reflection::Constant(_) => IdentifierKind::Constant,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Reflection::Class(c) => c.name(),
            Reflection::Function(f) => f.name(),
            Reflection::Constant(c) => c.name(),
        }
    }

    pub fn located_source(&self) -> &Rc<LocatedSource> {
        match self {
            Reflection::Class(c) => c.located_source(),
            Reflection::Function(f) => f.located_source(),
            Reflection::Constant(c) => c.located_source(),
        }
    }

    pub fn into_class(self) -> Option<Rc<ReflectionClass>> {
        match self {
            Reflection::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_function(self) -> Option<Rc<ReflectionFunction>> {
        match self {
            Reflection::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn into_constant(self) -> Option<Rc<ReflectionConstant>> {
        match self {
            Reflection::Constant(c) => Some(c),
            _ => None,
        }
    }
}
