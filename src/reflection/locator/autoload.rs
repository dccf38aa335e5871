use crate::reflection::Reflection;
use crate::reflection::ast_locator::reflect_in_source;
use crate::reflection::error::ReflectionError;
use crate::reflection::identifier::{Identifier, IdentifierKind};
use crate::reflection::locator::SourceLocator;
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use log::debug;
use std::path::PathBuf;

/// Records the path the host autoloader *would* load for a symbol,
/// without reading or executing anything.
///
/// This replaces the classic trick of overriding the process-wide file
/// access layer around an autoload trigger: the resolver is an explicit,
/// call-scoped collaborator, so there is no global interception state to
/// restore when a lookup unwinds.
pub trait AutoloadResolver {
    /// The file that would define `class_name`, if the autoloader knows one.
    fn class_path(&self, class_name: &str) -> Option<PathBuf>;

    /// The file that would define `function_name`. The engine has no
    /// function autoloading, so the default answer is "unknown".
    fn function_path(&self, _function_name: &str) -> Option<PathBuf> {
        None
    }
}

/// Locates symbols by asking an [`AutoloadResolver`] for the candidate
/// file and reading it directly. A recorded path whose file has vanished
/// is a miss, never a crash.
pub struct AutoloadSourceLocator {
    resolver: Box<dyn AutoloadResolver>,
}

impl AutoloadSourceLocator {
    pub fn new(resolver: Box<dyn AutoloadResolver>) -> Self {
        Self { resolver }
    }
}

impl SourceLocator for AutoloadSourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        if identifier.is_wildcard() {
            return Ok(None);
        }
        let path = match identifier.kind() {
            IdentifierKind::Class => self.resolver.class_path(identifier.name()),
            IdentifierKind::Function => self.resolver.function_path(identifier.name()),
            IdentifierKind::Constant => None,
        };
        let Some(path) = path else {
            return Ok(None);
        };

        let source = match LocatedSource::from_file(&path) {
            Ok(source) => source,
            Err(err) => {
                debug!(
                    "autoload candidate {} is unreadable: {}",
                    path.display(),
                    err
                );
                return Ok(None);
            }
        };
        debug!("autoload probe mapped {} to {}", identifier, path.display());
        reflect_in_source(reflector, &source, identifier)
    }

    fn locate_all_of_kind(
        &self,
        _reflector: &Reflector,
        _kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        // The resolver is keyed by name; there is nothing to enumerate.
        Ok(Vec::new())
    }
}
