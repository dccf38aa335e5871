use crate::parser::span::Span;
use crate::reflection::error::ReflectionError;
use crate::reflection::function::ReflectionMethod;
use crate::reflection::identifier::{IdentifierKind, normalize};
use crate::reflection::property::ReflectionProperty;
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use crate::reflection::types::{ReflectionAttribute, TypeExpr, Visibility};
use crate::reflection::value::{Value, ValueScope, compile_guarded};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
    Enum,
}

/// An immutable snapshot of one class-like declaration.
///
/// Own members (including members composed from used traits) are stored
/// directly; the parent class and interfaces are kept as fully-qualified
/// names and resolved on demand through the owning [`Reflector`].
#[derive(Debug)]
pub struct ReflectionClass {
    pub(crate) name: String,
    pub(crate) kind: ClassKind,
    pub(crate) is_abstract: bool,
    pub(crate) is_final: bool,
    pub(crate) is_readonly: bool,
    pub(crate) is_anonymous: bool,
    pub(crate) parent_name: Option<String>,
    pub(crate) interface_names: Vec<String>,
    pub(crate) trait_names: Vec<String>,
    /// Keyed by constant name, case-sensitive, declaration order.
    pub(crate) constants: IndexMap<String, Rc<ReflectionClassConstant>>,
    /// Keyed by property name, declaration order.
    pub(crate) properties: IndexMap<String, Rc<ReflectionProperty>>,
    /// Keyed by casefolded method name, declaration order.
    pub(crate) methods: IndexMap<String, Rc<ReflectionMethod>>,
    pub(crate) cases: IndexMap<String, Rc<ReflectionEnumCase>>,
    pub(crate) backing_type: Option<TypeExpr>,
    pub(crate) attributes: Vec<ReflectionAttribute>,
    pub(crate) doc_comment: Option<String>,
    pub(crate) located_source: Rc<LocatedSource>,
    pub(crate) span: Span,
    pub(crate) start_line: usize,
    pub(crate) end_line: usize,
}

impl ReflectionClass {
    /// Fully-qualified name, without a leading backslash.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        match self.name.rfind('\\') {
            Some(pos) => &self.name[pos + 1..],
            None => &self.name,
        }
    }

    pub fn namespace_name(&self) -> Option<&str> {
        self.name.rfind('\\').map(|pos| &self.name[..pos])
    }

    pub fn in_namespace(&self) -> bool {
        self.namespace_name().is_some()
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_trait(&self) -> bool {
        self.kind == ClassKind::Trait
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }

    pub fn is_instantiable(&self) -> bool {
        self.kind == ClassKind::Class && !self.is_abstract
    }

    pub fn located_source(&self) -> &Rc<LocatedSource> {
        &self.located_source
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    pub fn attributes(&self) -> &[ReflectionAttribute] {
        &self.attributes
    }

    /// Fully-qualified parent class name, unresolved.
    pub fn parent_class_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Resolve the parent class through `reflector`. Fails only when a
    /// declared parent cannot be located, not when there is none.
    pub fn parent_class(
        &self,
        reflector: &Reflector,
    ) -> Result<Option<Rc<ReflectionClass>>, ReflectionError> {
        match &self.parent_name {
            Some(parent) => Ok(Some(reflector.reflect_class(parent)?)),
            None => Ok(None),
        }
    }

    /// Directly declared (or, for enums, synthesized) interface names.
    pub fn interface_names(&self) -> &[String] {
        &self.interface_names
    }

    /// Resolve the directly declared interfaces.
    pub fn interfaces(
        &self,
        reflector: &Reflector,
    ) -> Result<Vec<Rc<ReflectionClass>>, ReflectionError> {
        self.interface_names
            .iter()
            .map(|name| reflector.reflect_class(name))
            .collect()
    }

    /// Every interface name this class satisfies: its own, its ancestors',
    /// and those the interfaces themselves extend.
    pub fn all_interface_names(
        &self,
        reflector: &Reflector,
    ) -> Result<Vec<String>, ReflectionError> {
        let mut queue: Vec<String> = self.interface_names.clone();

        let mut chain_seen = HashSet::new();
        chain_seen.insert(normalize(&self.name, IdentifierKind::Class));
        let mut current = self.parent_class(reflector)?;
        while let Some(parent) = current {
            if !chain_seen.insert(normalize(parent.name(), IdentifierKind::Class)) {
                return Err(ReflectionError::CircularDependency {
                    name: parent.name().to_owned(),
                });
            }
            queue.extend(parent.interface_names().iter().cloned());
            current = parent.parent_class(reflector)?;
        }

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut index = 0;
        while index < queue.len() {
            let name = queue[index].clone();
            index += 1;
            if !seen.insert(normalize(&name, IdentifierKind::Class)) {
                continue;
            }
            let iface = reflector.reflect_class(&name)?;
            out.push(iface.name().to_owned());
            queue.extend(iface.interface_names().iter().cloned());
        }
        Ok(out)
    }

    pub fn implements_interface(
        &self,
        reflector: &Reflector,
        interface: &str,
    ) -> Result<bool, ReflectionError> {
        let target = normalize(interface, IdentifierKind::Class);
        Ok(self
            .all_interface_names(reflector)?
            .iter()
            .any(|name| normalize(name, IdentifierKind::Class) == target))
    }

    /// Whether this class has `other` among its ancestors (classes or
    /// interfaces). A class is not a subclass of itself.
    pub fn is_subclass_of(
        &self,
        reflector: &Reflector,
        other: &str,
    ) -> Result<bool, ReflectionError> {
        let target = normalize(other, IdentifierKind::Class);
        let mut seen = HashSet::new();
        seen.insert(normalize(&self.name, IdentifierKind::Class));
        let mut current = self.parent_class(reflector)?;
        while let Some(parent) = current {
            if normalize(parent.name(), IdentifierKind::Class) == target {
                return Ok(true);
            }
            if !seen.insert(normalize(parent.name(), IdentifierKind::Class)) {
                return Err(ReflectionError::CircularDependency {
                    name: parent.name().to_owned(),
                });
            }
            current = parent.parent_class(reflector)?;
        }
        self.implements_interface(reflector, other)
    }

    /// Fully-qualified names of the traits used directly by this class.
    pub fn trait_names(&self) -> &[String] {
        &self.trait_names
    }

    /// Own methods, including methods composed from used traits, keyed by
    /// casefolded name in declaration order.
    pub fn methods(&self) -> &IndexMap<String, Rc<ReflectionMethod>> {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&Rc<ReflectionMethod>> {
        self.methods.get(&name.to_ascii_lowercase())
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    pub fn constructor(&self) -> Option<&Rc<ReflectionMethod>> {
        self.method("__construct")
    }

    /// Own and inherited methods; a method declared nearer the class wins.
    pub fn methods_with_inherited(
        &self,
        reflector: &Reflector,
    ) -> Result<IndexMap<String, Rc<ReflectionMethod>>, ReflectionError> {
        let mut out = self.methods.clone();

        let mut seen = HashSet::new();
        seen.insert(normalize(&self.name, IdentifierKind::Class));
        let mut current = self.parent_class(reflector)?;
        while let Some(parent) = current {
            if !seen.insert(normalize(parent.name(), IdentifierKind::Class)) {
                return Err(ReflectionError::CircularDependency {
                    name: parent.name().to_owned(),
                });
            }
            for (key, method) in parent.methods() {
                if !out.contains_key(key) && !method.visibility().is_private() {
                    out.insert(key.clone(), method.clone());
                }
            }
            current = parent.parent_class(reflector)?;
        }

        for interface in self.all_interface_names(reflector)? {
            let interface = reflector.reflect_class(&interface)?;
            for (key, method) in interface.methods() {
                if !out.contains_key(key) {
                    out.insert(key.clone(), method.clone());
                }
            }
        }
        Ok(out)
    }

    /// Own properties, including trait-composed and promoted ones.
    pub fn properties(&self) -> &IndexMap<String, Rc<ReflectionProperty>> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Rc<ReflectionProperty>> {
        self.properties.get(name)
    }

    pub fn properties_with_inherited(
        &self,
        reflector: &Reflector,
    ) -> Result<IndexMap<String, Rc<ReflectionProperty>>, ReflectionError> {
        let mut out = self.properties.clone();
        let mut seen = HashSet::new();
        seen.insert(normalize(&self.name, IdentifierKind::Class));
        let mut current = self.parent_class(reflector)?;
        while let Some(parent) = current {
            if !seen.insert(normalize(parent.name(), IdentifierKind::Class)) {
                return Err(ReflectionError::CircularDependency {
                    name: parent.name().to_owned(),
                });
            }
            for (key, property) in parent.properties() {
                if !out.contains_key(key) && !property.visibility().is_private() {
                    out.insert(key.clone(), property.clone());
                }
            }
            current = parent.parent_class(reflector)?;
        }
        Ok(out)
    }

    /// Own class constants.
    pub fn constants(&self) -> &IndexMap<String, Rc<ReflectionClassConstant>> {
        &self.constants
    }

    pub fn constant(&self, name: &str) -> Option<&Rc<ReflectionClassConstant>> {
        self.constants.get(name)
    }

    /// Find a constant on this class, its ancestors, or its interfaces.
    pub fn constant_with_inherited(
        &self,
        reflector: &Reflector,
        name: &str,
    ) -> Result<Option<Rc<ReflectionClassConstant>>, ReflectionError> {
        if let Some(constant) = self.constants.get(name) {
            return Ok(Some(constant.clone()));
        }
        let mut seen = HashSet::new();
        seen.insert(normalize(&self.name, IdentifierKind::Class));
        let mut current = self.parent_class(reflector)?;
        while let Some(parent) = current {
            if !seen.insert(normalize(parent.name(), IdentifierKind::Class)) {
                return Err(ReflectionError::CircularDependency {
                    name: parent.name().to_owned(),
                });
            }
            if let Some(constant) = parent.constant(name) {
                return Ok(Some(constant.clone()));
            }
            current = parent.parent_class(reflector)?;
        }
        for interface in self.all_interface_names(reflector)? {
            let interface = reflector.reflect_class(&interface)?;
            if let Some(constant) = interface.constant(name) {
                return Ok(Some(constant.clone()));
            }
        }
        Ok(None)
    }

    /// Enum cases; empty for non-enums.
    pub fn cases(&self) -> &IndexMap<String, Rc<ReflectionEnumCase>> {
        &self.cases
    }

    pub fn case(&self, name: &str) -> Option<&Rc<ReflectionEnumCase>> {
        self.cases.get(name)
    }

    /// The scalar backing type of a backed enum.
    pub fn backing_type(&self) -> Option<&TypeExpr> {
        self.backing_type.as_ref()
    }
}

/// One class constant declaration.
#[derive(Debug, Clone)]
pub struct ReflectionClassConstant {
    pub(crate) name: String,
    pub(crate) visibility: Visibility,
    pub(crate) is_final: bool,
    pub(crate) ty: Option<TypeExpr>,
    pub(crate) value_expr: crate::parser::ast::Expr,
    pub(crate) value_text: String,
    pub(crate) scope: ValueScope,
    pub(crate) declaring_class: String,
    pub(crate) attributes: Vec<ReflectionAttribute>,
    pub(crate) doc_comment: Option<String>,
}

impl ReflectionClassConstant {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn declared_type(&self) -> Option<&TypeExpr> {
        self.ty.as_ref()
    }

    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    pub fn attributes(&self) -> &[ReflectionAttribute] {
        &self.attributes
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    /// The constant's value expression as written.
    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    /// Compile the constant's value, resolving referenced constants by name.
    pub fn value(&self, reflector: &Reflector) -> Result<Value, ReflectionError> {
        let mut guard = vec![format!("classconst {}::{}", self.declaring_class, self.name)];
        self.compile_value_guarded(reflector, &mut guard)
    }

    pub(crate) fn compile_value(
        &self,
        reflector: &Reflector,
        guard: &mut Vec<String>,
    ) -> Result<Value, ReflectionError> {
        self.compile_value_guarded(reflector, guard)
    }

    fn compile_value_guarded(
        &self,
        reflector: &Reflector,
        guard: &mut Vec<String>,
    ) -> Result<Value, ReflectionError> {
        compile_guarded(&self.value_expr, reflector, &self.scope, guard)
    }
}

/// One case of an enum. Backed enums carry a scalar backing value.
#[derive(Debug, Clone)]
pub struct ReflectionEnumCase {
    pub(crate) name: String,
    pub(crate) value_expr: Option<crate::parser::ast::Expr>,
    pub(crate) value_text: Option<String>,
    pub(crate) scope: ValueScope,
    pub(crate) declaring_class: String,
    pub(crate) attributes: Vec<ReflectionAttribute>,
    pub(crate) doc_comment: Option<String>,
}

impl ReflectionEnumCase {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    pub fn is_backed(&self) -> bool {
        self.value_expr.is_some()
    }

    pub fn value_text(&self) -> Option<&str> {
        self.value_text.as_deref()
    }

    pub fn attributes(&self) -> &[ReflectionAttribute] {
        &self.attributes
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    /// The compiled backing value, or `None` for a pure enum's case.
    pub fn backing_value(&self, reflector: &Reflector) -> Result<Option<Value>, ReflectionError> {
        match &self.value_expr {
            Some(expr) => {
                let mut guard = Vec::new();
                Ok(Some(compile_guarded(expr, reflector, &self.scope, &mut guard)?))
            }
            None => Ok(None),
        }
    }
}
