use crate::reflection::Reflection;
use crate::reflection::error::ReflectionError;
use crate::reflection::identifier::{Identifier, IdentifierKind};
use crate::reflection::locator::SourceLocator;
use crate::reflection::reflector::Reflector;
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Tries an ordered list of locators and returns the first hit.
///
/// Order is semantically significant: it is the caller's priority list.
/// `locate` short-circuits on the first `Some`; `locate_all_of_kind`
/// concatenates every child's results without de-duplicating.
pub struct AggregateSourceLocator {
    locators: Vec<Rc<dyn SourceLocator>>,
}

impl AggregateSourceLocator {
    pub fn new(locators: Vec<Rc<dyn SourceLocator>>) -> Self {
        Self { locators }
    }
}

impl SourceLocator for AggregateSourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        for (index, locator) in self.locators.iter().enumerate() {
            if let Some(reflection) = locator.locate(reflector, identifier)? {
                trace!("aggregate child {} resolved {}", index, identifier);
                return Ok(Some(reflection));
            }
        }
        Ok(None)
    }

    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        let mut out = Vec::new();
        for locator in &self.locators {
            out.extend(locator.locate_all_of_kind(reflector, kind)?);
        }
        Ok(out)
    }
}

/// Caching decorator guaranteeing at most one delegate invocation per
/// `(reflector identity, identifier)` key, negative results included.
///
/// Reflector *identity* partitions the cache: two reflector instances
/// never share entries, since they may represent different source
/// universes.
pub struct MemoizingSourceLocator {
    delegate: Rc<dyn SourceLocator>,
    single: RefCell<HashMap<(u64, IdentifierKind, String), Option<Reflection>>>,
    bulk: RefCell<HashMap<(u64, IdentifierKind), Vec<Reflection>>>,
}

impl MemoizingSourceLocator {
    pub fn new(delegate: Rc<dyn SourceLocator>) -> Self {
        Self {
            delegate,
            single: RefCell::new(HashMap::new()),
            bulk: RefCell::new(HashMap::new()),
        }
    }

    pub fn cached_lookup_count(&self) -> usize {
        self.single.borrow().len()
    }
}

impl SourceLocator for MemoizingSourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        let key = (
            reflector.id(),
            identifier.kind(),
            identifier.normalized_name(),
        );
        if let Some(cached) = self.single.borrow().get(&key) {
            trace!("memoized result for {}", identifier);
            return Ok(cached.clone());
        }
        let result = self.delegate.locate(reflector, identifier)?;
        self.single.borrow_mut().insert(key, result.clone());
        Ok(result)
    }

    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        let key = (reflector.id(), kind);
        if let Some(cached) = self.bulk.borrow().get(&key) {
            return Ok(cached.clone());
        }
        let result = self.delegate.locate_all_of_kind(reflector, kind)?;
        self.bulk.borrow_mut().insert(key, result.clone());
        Ok(result)
    }
}
