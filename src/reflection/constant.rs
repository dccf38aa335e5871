use crate::parser::ast::Expr;
use crate::parser::span::Span;
use crate::reflection::error::ReflectionError;
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use crate::reflection::value::{Value, ValueScope, compile_guarded};
use std::rc::Rc;

/// A free constant, declared with `const` or a literal `define()` call.
#[derive(Debug)]
pub struct ReflectionConstant {
    pub(crate) name: String,
    pub(crate) value_expr: Expr,
    pub(crate) value_text: String,
    pub(crate) scope: ValueScope,
    pub(crate) from_define: bool,
    pub(crate) doc_comment: Option<String>,
    pub(crate) located_source: Rc<LocatedSource>,
    pub(crate) span: Span,
    pub(crate) start_line: usize,
    pub(crate) end_line: usize,
}

impl ReflectionConstant {
    /// Fully-qualified constant name.
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

    /// Whether the constant was declared through `define()` rather than a
    /// `const` statement.
    pub fn is_define(&self) -> bool {
        self.from_define
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

    /// The value expression as written.
    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    /// Compile the constant's value.
    pub fn value(&self, reflector: &Reflector) -> Result<Value, ReflectionError> {
        let mut guard = vec![format!("const {}", self.name)];
        compile_guarded(&self.value_expr, reflector, &self.scope, &mut guard)
    }

    pub(crate) fn compile_value(
        &self,
        reflector: &Reflector,
        guard: &mut Vec<String>,
    ) -> Result<Value, ReflectionError> {
        compile_guarded(&self.value_expr, reflector, &self.scope, guard)
    }
}
