pub mod autoload;
pub mod composer;
pub mod composite;
pub mod internal;
pub mod position;
pub mod strategies;

use crate::reflection::Reflection;
use crate::reflection::error::ReflectionError;
use crate::reflection::identifier::{Identifier, IdentifierKind};
use crate::reflection::reflector::Reflector;

/// A pluggable source-discovery strategy.
///
/// `locate` answers a miss with `Ok(None)`, never an error: errors are
/// reserved for configuration problems and genuine ambiguity, so an
/// aggregate can keep trying on `None` and stop on `Err`. Every returned
/// [`Reflection`] carries the [`LocatedSource`](crate::LocatedSource) it
/// was built from.
pub trait SourceLocator {
    /// Find a source defining `identifier` and reflect the declaration.
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError>;

    /// Reflect every declaration of `kind` this locator can see.
    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError>;
}
