use crate::parser::ast::Expr;
use crate::reflection::error::ReflectionError;
use crate::reflection::reflector::Reflector;
use crate::reflection::types::{ReflectionAttribute, TypeExpr, Visibility};
use crate::reflection::value::{Value, ValueScope, compile_guarded};

/// A declared (or promoted, or trait-composed) property.
#[derive(Debug, Clone)]
pub struct ReflectionProperty {
    pub(crate) name: String,
    pub(crate) visibility: Visibility,
    pub(crate) is_static: bool,
    pub(crate) is_readonly: bool,
    pub(crate) is_promoted: bool,
    pub(crate) ty: Option<TypeExpr>,
    pub(crate) default_expr: Option<Expr>,
    pub(crate) default_text: Option<String>,
    pub(crate) scope: ValueScope,
    /// The class through which this property was obtained.
    pub(crate) declaring_class: String,
    /// The class or trait whose declaration supplied it.
    pub(crate) defined_in: String,
    pub(crate) attributes: Vec<ReflectionAttribute>,
    pub(crate) doc_comment: Option<String>,
}

impl ReflectionProperty {
    /// Property name without the `$` sigil.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    /// Whether this property was promoted from a constructor parameter.
    pub fn is_promoted(&self) -> bool {
        self.is_promoted
    }

    pub fn declared_type(&self) -> Option<&TypeExpr> {
        self.ty.as_ref()
    }

    pub fn declaring_class_name(&self) -> &str {
        &self.declaring_class
    }

    pub fn defined_in(&self) -> &str {
        &self.defined_in
    }

    pub fn attributes(&self) -> &[ReflectionAttribute] {
        &self.attributes
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    pub fn has_default(&self) -> bool {
        self.default_expr.is_some()
    }

    /// The default value expression as written.
    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    /// Compile the default value, resolving constant references by name.
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
