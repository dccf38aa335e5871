use crate::parser::ast::Expr;
use crate::parser::span::Span;
use crate::reflection::error::ReflectionError;
use crate::reflection::identifier::{IdentifierKind, normalize};
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use crate::reflection::types::{ReflectionAttribute, TypeExpr, Visibility};
use crate::reflection::value::{Value, ValueScope, compile_guarded};
use std::collections::HashSet;
use std::rc::Rc;

/// The name given to reflected closures, mirroring the engine's own.
pub const CLOSURE_NAME: &str = "{closure}";

/// A free function or closure.
#[derive(Debug)]
pub struct ReflectionFunction {
    pub(crate) name: String,
    pub(crate) is_closure: bool,
    pub(crate) is_static_closure: bool,
    pub(crate) returns_reference: bool,
    pub(crate) parameters: Vec<Rc<ReflectionParameter>>,
    pub(crate) return_type: Option<TypeExpr>,
    pub(crate) attributes: Vec<ReflectionAttribute>,
    pub(crate) doc_comment: Option<String>,
    pub(crate) located_source: Rc<LocatedSource>,
    pub(crate) span: Span,
    pub(crate) start_line: usize,
    pub(crate) end_line: usize,
}

impl ReflectionFunction {
    /// Fully-qualified name; closures are named `{closure}`.
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

    pub fn is_closure(&self) -> bool {
        self.is_closure
    }

    pub fn is_static_closure(&self) -> bool {
        self.is_static_closure
    }

    pub fn returns_reference(&self) -> bool {
        self.returns_reference
    }

    pub fn parameters(&self) -> &[Rc<ReflectionParameter>] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Rc<ReflectionParameter>> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub fn number_of_parameters(&self) -> usize {
        self.parameters.len()
    }

    pub fn number_of_required_parameters(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_required()).count()
    }

    pub fn return_type(&self) -> Option<&TypeExpr> {
        self.return_type.as_ref()
    }

    pub fn attributes(&self) -> &[ReflectionAttribute] {
        &self.attributes
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
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
}

/// A method, possibly composed into its class from a trait.
#[derive(Debug, Clone)]
pub struct ReflectionMethod {
    pub(crate) name: String,
    pub(crate) visibility: Visibility,
    pub(crate) is_static: bool,
    pub(crate) is_abstract: bool,
    pub(crate) is_final: bool,
    pub(crate) returns_reference: bool,
    pub(crate) has_body: bool,
    pub(crate) parameters: Vec<Rc<ReflectionParameter>>,
    pub(crate) return_type: Option<TypeExpr>,
    /// The class through which this method was obtained.
    pub(crate) declaring_class: String,
    /// The class or trait whose declaration supplied the body.
    pub(crate) defined_in: String,
    /// Original method name when imported under a trait alias.
    pub(crate) aliased_from: Option<String>,
    pub(crate) attributes: Vec<ReflectionAttribute>,
    pub(crate) doc_comment: Option<String>,
    pub(crate) located_source: Rc<LocatedSource>,
    pub(crate) span: Span,
    pub(crate) start_line: usize,
    pub(crate) end_line: usize,
}

impl ReflectionMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn returns_reference(&self) -> bool {
        self.returns_reference
    }

    pub fn has_body(&self) -> bool {
        self.has_body
    }

    pub fn is_constructor(&self) -> bool {
        self.name.eq_ignore_ascii_case("__construct")
    }

    pub fn is_destructor(&self) -> bool {
        self.name.eq_ignore_ascii_case("__destruct")
    }

    pub fn parameters(&self) -> &[Rc<ReflectionParameter>] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Rc<ReflectionParameter>> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub fn return_type(&self) -> Option<&TypeExpr> {
        self.return_type.as_ref()
    }

    /// Name of the class through which this method was obtained.
    pub fn declaring_class_name(&self) -> &str {
        &self.declaring_class
    }

    pub fn declaring_class(
        &self,
        reflector: &Reflector,
    ) -> Result<Rc<crate::reflection::class::ReflectionClass>, ReflectionError> {
        reflector.reflect_class(&self.declaring_class)
    }

    /// Name of the class or trait whose declaration supplied the body. For
    /// a trait-composed method this is the trait.
    pub fn defined_in(&self) -> &str {
        &self.defined_in
    }

    pub fn comes_from_trait(&self) -> bool {
        normalize(&self.declaring_class, IdentifierKind::Class)
            != normalize(&self.defined_in, IdentifierKind::Class)
    }

    /// Original name when this method is a trait alias import.
    pub fn aliased_from(&self) -> Option<&str> {
        self.aliased_from.as_deref()
    }

    pub fn attributes(&self) -> &[ReflectionAttribute] {
        &self.attributes
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
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

    /// The nearest ancestor declaration of a method with this name: the
    /// parent-class chain is searched first, then the interfaces. `None`
    /// when no ancestor declares it.
    pub fn prototype(
        &self,
        reflector: &Reflector,
    ) -> Result<Option<Rc<ReflectionMethod>>, ReflectionError> {
        let class = self.declaring_class(reflector)?;

        let mut seen = HashSet::new();
        seen.insert(normalize(class.name(), IdentifierKind::Class));
        let mut current = class.parent_class(reflector)?;
        while let Some(parent) = current {
            if !seen.insert(normalize(parent.name(), IdentifierKind::Class)) {
                return Err(ReflectionError::CircularDependency {
                    name: parent.name().to_owned(),
                });
            }
            if let Some(method) = parent.method(&self.name) {
                if !method.visibility().is_private() {
                    return Ok(Some(method.clone()));
                }
            }
            current = parent.parent_class(reflector)?;
        }

        for interface in class.all_interface_names(reflector)? {
            let interface = reflector.reflect_class(&interface)?;
            if let Some(method) = interface.method(&self.name) {
                return Ok(Some(method.clone()));
            }
        }
        Ok(None)
    }

    /// A copy rebound to `class`, used when composing trait methods.
    pub(crate) fn rebind(&self, class: &str) -> ReflectionMethod {
        let mut method = self.clone();
        method.declaring_class = class.to_owned();
        method
    }

    /// A copy imported under an alias name, optionally with narrowed
    /// visibility. The signature is never altered.
    pub(crate) fn as_alias(
        &self,
        class: &str,
        name: &str,
        visibility: Option<Visibility>,
    ) -> ReflectionMethod {
        let mut method = self.clone();
        method.declaring_class = class.to_owned();
        method.aliased_from = Some(self.name.clone());
        method.name = name.to_owned();
        if let Some(visibility) = visibility {
            method.visibility = visibility;
        }
        method
    }
}

/// One parameter of a function or method.
#[derive(Debug, Clone)]
pub struct ReflectionParameter {
    pub(crate) name: String,
    pub(crate) position: usize,
    pub(crate) ty: Option<TypeExpr>,
    pub(crate) default_expr: Option<Expr>,
    pub(crate) default_text: Option<String>,
    pub(crate) scope: ValueScope,
    pub(crate) by_ref: bool,
    pub(crate) variadic: bool,
    pub(crate) promoted: bool,
    pub(crate) attributes: Vec<ReflectionAttribute>,
}

impl ReflectionParameter {
    /// Parameter name without the `$` sigil.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position in the parameter list.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn declared_type(&self) -> Option<&TypeExpr> {
        self.ty.as_ref()
    }

    pub fn is_passed_by_reference(&self) -> bool {
        self.by_ref
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    pub fn is_optional(&self) -> bool {
        self.default_expr.is_some() || self.variadic
    }

    pub fn is_required(&self) -> bool {
        !self.is_optional()
    }

    pub fn has_default(&self) -> bool {
        self.default_expr.is_some()
    }

    /// The default value expression as written.
    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    pub fn attributes(&self) -> &[ReflectionAttribute] {
        &self.attributes
    }

    /// Compile the default value, resolving constant references (including
    /// `self::X` and `parent::X`) by name through `reflector`.
    pub fn default_value(&self, reflector: &Reflector) -> Result<Option<Value>, ReflectionError> {
        match &self.default_expr {
            Some(expr) => {
                let mut guard = Vec::new();
                Ok(Some(compile_guarded(expr, reflector, &self.scope, &mut guard)?))
            }
            None => Ok(None),
        }
    }
}
