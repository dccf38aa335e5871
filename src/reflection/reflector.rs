use crate::reflection::Reflection;
use crate::reflection::ast_locator::AstLocator;
use crate::reflection::class::ReflectionClass;
use crate::reflection::constant::ReflectionConstant;
use crate::reflection::error::ReflectionError;
use crate::reflection::function::ReflectionFunction;
use crate::reflection::identifier::{Identifier, IdentifierKind, normalize};
use crate::reflection::locator::SourceLocator;
use crate::reflection::locator::position::{AnonymousClassSourceLocator, ClosureSourceLocator};
use log::debug;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REFLECTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Facade coordinating source location, AST search, and conversion.
///
/// One reflector represents one view of a codebase: it owns the parse
/// cache and per-kind reflection caches, and every lookup made through it
/// for the same identifier yields the same shared reflection.
pub struct Reflector {
    id: u64,
    locator: Rc<dyn SourceLocator>,
    ast: AstLocator,
    classes: RefCell<HashMap<String, Rc<ReflectionClass>>>,
    functions: RefCell<HashMap<String, Rc<ReflectionFunction>>>,
    constants: RefCell<HashMap<String, Rc<ReflectionConstant>>>,
    resolving: RefCell<HashSet<String>>,
}

/// Removes the in-progress marker when resolution unwinds, error or not.
struct ResolveGuard<'a> {
    resolving: &'a RefCell<HashSet<String>>,
    key: String,
}

impl Drop for ResolveGuard<'_> {
    fn drop(&mut self) {
        self.resolving.borrow_mut().remove(&self.key);
    }
}

impl Reflector {
    pub fn new(locator: Rc<dyn SourceLocator>) -> Self {
        Self {
            id: NEXT_REFLECTOR_ID.fetch_add(1, Ordering::Relaxed),
            locator,
            ast: AstLocator::new(),
            classes: RefCell::new(HashMap::new()),
            functions: RefCell::new(HashMap::new()),
            constants: RefCell::new(HashMap::new()),
            resolving: RefCell::new(HashSet::new()),
        }
    }

    /// Identity of this reflector, used to partition memoization caches.
    /// Two reflectors never share cache entries even when configured
    /// identically, since they may represent different source universes.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn source_locator(&self) -> &Rc<dyn SourceLocator> {
        &self.locator
    }

    pub(crate) fn ast_locator(&self) -> &AstLocator {
        &self.ast
    }

    /// Number of distinct sources parsed through this reflector.
    pub fn parsed_source_count(&self) -> usize {
        self.ast.parsed_count()
    }

    fn guard(&self, key: String) -> Result<ResolveGuard<'_>, ReflectionError> {
        if !self.resolving.borrow_mut().insert(key.clone()) {
            return Err(ReflectionError::CircularDependency {
                name: key.split_once(' ').map(|(_, n)| n).unwrap_or(&key).to_owned(),
            });
        }
        Ok(ResolveGuard {
            resolving: &self.resolving,
            key,
        })
    }

    /// Reflect a class, interface, trait, or enum by (fully-qualified) name.
    pub fn reflect_class(&self, name: &str) -> Result<Rc<ReflectionClass>, ReflectionError> {
        let key = normalize(name, IdentifierKind::Class);
        if let Some(class) = self.classes.borrow().get(&key) {
            return Ok(class.clone());
        }

        let _guard = self.guard(format!("class {}", key))?;
        debug!("resolving class {}", name);

        let identifier = Identifier::class(name);
        match self.locator.locate(self, &identifier)? {
            Some(Reflection::Class(class)) => {
                self.classes.borrow_mut().insert(key, class.clone());
                Ok(class)
            }
            _ => Err(ReflectionError::NotFound {
                kind: IdentifierKind::Class,
                name: name.to_owned(),
            }),
        }
    }

    pub fn reflect_function(&self, name: &str) -> Result<Rc<ReflectionFunction>, ReflectionError> {
        let key = normalize(name, IdentifierKind::Function);
        if let Some(function) = self.functions.borrow().get(&key) {
            return Ok(function.clone());
        }

        let _guard = self.guard(format!("function {}", key))?;
        debug!("resolving function {}", name);

        let identifier = Identifier::function(name);
        match self.locator.locate(self, &identifier)? {
            Some(Reflection::Function(function)) => {
                self.functions.borrow_mut().insert(key, function.clone());
                Ok(function)
            }
            _ => Err(ReflectionError::NotFound {
                kind: IdentifierKind::Function,
                name: name.to_owned(),
            }),
        }
    }

    pub fn reflect_constant(&self, name: &str) -> Result<Rc<ReflectionConstant>, ReflectionError> {
        let key = normalize(name, IdentifierKind::Constant);
        if let Some(constant) = self.constants.borrow().get(&key) {
            return Ok(constant.clone());
        }

        let _guard = self.guard(format!("constant {}", key))?;
        debug!("resolving constant {}", name);

        let identifier = Identifier::constant(name);
        match self.locator.locate(self, &identifier)? {
            Some(Reflection::Constant(constant)) => {
                self.constants.borrow_mut().insert(key, constant.clone());
                Ok(constant)
            }
            _ => Err(ReflectionError::NotFound {
                kind: IdentifierKind::Constant,
                name: name.to_owned(),
            }),
        }
    }

    /// All classes the locator chain can see. The first declaration of each
    /// name is folded into the per-name cache so later by-name lookups
    /// return the same object; further same-named declarations are returned
    /// as located, since de-duplication is the caller's responsibility.
    pub fn reflect_all_classes(&self) -> Result<Vec<Rc<ReflectionClass>>, ReflectionError> {
        let found = self
            .locator
            .locate_all_of_kind(self, IdentifierKind::Class)?;
        let mut emitted = HashSet::new();
        let mut out = Vec::with_capacity(found.len());
        for reflection in found {
            let Reflection::Class(class) = reflection else {
                continue;
            };
            let key = normalize(class.name(), IdentifierKind::Class);
            let class = if class.is_anonymous() || !emitted.insert(key.clone()) {
                class
            } else {
                let mut cache = self.classes.borrow_mut();
                cache.entry(key).or_insert(class).clone()
            };
            out.push(class);
        }
        Ok(out)
    }

    pub fn reflect_all_functions(&self) -> Result<Vec<Rc<ReflectionFunction>>, ReflectionError> {
        let found = self
            .locator
            .locate_all_of_kind(self, IdentifierKind::Function)?;
        let mut emitted = HashSet::new();
        let mut out = Vec::with_capacity(found.len());
        for reflection in found {
            let Reflection::Function(function) = reflection else {
                continue;
            };
            let key = normalize(function.name(), IdentifierKind::Function);
            let function = if function.is_closure() || !emitted.insert(key.clone()) {
                function
            } else {
                let mut cache = self.functions.borrow_mut();
                cache.entry(key).or_insert(function).clone()
            };
            out.push(function);
        }
        Ok(out)
    }

    pub fn reflect_all_constants(&self) -> Result<Vec<Rc<ReflectionConstant>>, ReflectionError> {
        let found = self
            .locator
            .locate_all_of_kind(self, IdentifierKind::Constant)?;
        let mut emitted = HashSet::new();
        let mut out = Vec::with_capacity(found.len());
        for reflection in found {
            let Reflection::Constant(constant) = reflection else {
                continue;
            };
            let key = normalize(constant.name(), IdentifierKind::Constant);
            let constant = if emitted.insert(key.clone()) {
                let mut cache = self.constants.borrow_mut();
                cache.entry(key).or_insert(constant).clone()
            } else {
                constant
            };
            out.push(constant);
        }
        Ok(out)
    }

    /// Reflect the closure that starts on `line` of `path`. More than one
    /// closure starting on that line is a fatal ambiguity.
    pub fn reflect_closure_at(
        &self,
        path: &Path,
        line: usize,
    ) -> Result<Rc<ReflectionFunction>, ReflectionError> {
        let locator = ClosureSourceLocator::new(path.to_path_buf(), line)?;
        match locator.locate(self, &Identifier::wildcard(IdentifierKind::Function))? {
            Some(Reflection::Function(function)) => Ok(function),
            _ => Err(ReflectionError::NotFound {
                kind: IdentifierKind::Function,
                name: format!("{{closure}} at {}:{}", path.display(), line),
            }),
        }
    }

    /// Reflect the anonymous class that starts on `line` of `path`.
    pub fn reflect_anonymous_class_at(
        &self,
        path: &Path,
        line: usize,
    ) -> Result<Rc<ReflectionClass>, ReflectionError> {
        let locator = AnonymousClassSourceLocator::new(path.to_path_buf(), line)?;
        match locator.locate(self, &Identifier::wildcard(IdentifierKind::Class))? {
            Some(Reflection::Class(class)) => Ok(class),
            _ => Err(ReflectionError::NotFound {
                kind: IdentifierKind::Class,
                name: format!("class@anonymous at {}:{}", path.display(), line),
            }),
        }
    }
}

impl std::fmt::Debug for Reflector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reflector").field("id", &self.id).finish()
    }
}
