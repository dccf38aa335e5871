use crate::parser::ast::visitor::{Visitor, walk_expr, walk_stmt};
use crate::parser::ast::{Expr, Stmt};
use crate::reflection::Reflection;
use crate::reflection::ast_locator::ensure_no_errors;
use crate::reflection::convert::{
    self, ClassLikeNode, FunctionLikeNode, NameContext,
};
use crate::reflection::error::ReflectionError;
use crate::reflection::function::CLOSURE_NAME;
use crate::reflection::identifier::{Identifier, IdentifierKind};
use crate::reflection::locator::SourceLocator;
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Closure,
    AnonymousClass,
}

/// Walks a parsed file collecting every closure (or anonymous-class)
/// expression together with the name-resolution context it appears under.
struct PositionCollector<'ast> {
    target: Target,
    ctx: NameContext,
    snapshot: Option<Rc<NameContext>>,
    out: Vec<(&'ast Expr, Rc<NameContext>)>,
}

impl<'ast> PositionCollector<'ast> {
    fn new(target: Target) -> Self {
        Self {
            target,
            ctx: NameContext::new(None),
            snapshot: None,
            out: Vec::new(),
        }
    }

    fn ctx_rc(&mut self) -> Rc<NameContext> {
        if self.snapshot.is_none() {
            self.snapshot = Some(Rc::new(self.ctx.clone()));
        }
        self.snapshot.clone().unwrap()
    }
}

impl<'ast> Visitor<'ast> for PositionCollector<'ast> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Namespace { name, body, .. } => {
                let namespace = name.as_ref().map(|n| n.joined());
                match body {
                    Some(body) => {
                        let saved_ctx =
                            std::mem::replace(&mut self.ctx, NameContext::new(namespace));
                        let saved_snapshot = self.snapshot.take();
                        for stmt in body {
                            self.visit_stmt(stmt);
                        }
                        self.ctx = saved_ctx;
                        self.snapshot = saved_snapshot;
                    }
                    None => {
                        self.ctx.set_namespace(namespace);
                        self.snapshot = None;
                    }
                }
            }
            Stmt::Use { uses, .. } => {
                for item in uses {
                    self.ctx.add_use(item);
                }
                self.snapshot = None;
            }
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        let collect = match (self.target, expr) {
            (Target::Closure, Expr::Closure { .. } | Expr::ArrowFunction { .. }) => true,
            (Target::AnonymousClass, Expr::AnonymousClass { .. }) => true,
            _ => false,
        };
        if collect {
            let ctx = self.ctx_rc();
            self.out.push((expr, ctx));
        }
        walk_expr(self, expr);
    }
}

fn locate_at_line(
    reflector: &Reflector,
    path: &PathBuf,
    line: usize,
    target: Target,
) -> Result<Option<Reflection>, ReflectionError> {
    let source = LocatedSource::from_file(path).map_err(|err| ReflectionError::Io {
        path: path.clone(),
        source: err,
    })?;
    let unit = reflector.ast_locator().parse(&source);
    ensure_no_errors(&source, &unit)?;

    let mut collector = PositionCollector::new(target);
    collector.visit_program(&unit.program);

    let matches: Vec<_> = collector
        .out
        .into_iter()
        .filter(|(expr, _)| unit.line_index.line_of(expr.span().start) == line)
        .collect();

    match matches.len() {
        0 => Ok(None),
        1 => {
            let (expr, ctx) = matches.into_iter().next().unwrap();
            let reflection = match target {
                Target::Closure => Reflection::Function(convert::function_from_node(
                    &source,
                    &unit,
                    FunctionLikeNode::Closure(expr),
                    ctx,
                )?),
                Target::AnonymousClass => Reflection::Class(convert::class_from_node(
                    reflector,
                    &source,
                    &unit,
                    ClassLikeNode::Anonymous(expr),
                    ctx,
                )?),
            };
            Ok(Some(reflection))
        }
        count => Err(ReflectionError::AmbiguousPosition {
            path: path.clone(),
            line,
            count,
        }),
    }
}

/// Locates the closure that starts on a known line of a known file; a
/// closure has no stable name, so file and line are all there is to go on.
#[derive(Debug)]
pub struct ClosureSourceLocator {
    path: PathBuf,
    line: usize,
}

impl ClosureSourceLocator {
    pub fn new(path: PathBuf, line: usize) -> Result<Self, ReflectionError> {
        if !path.is_file() {
            return Err(ReflectionError::configuration(format!(
                "{} is not a file",
                path.display()
            )));
        }
        Ok(Self { path, line })
    }
}

impl SourceLocator for ClosureSourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        if identifier.kind() != IdentifierKind::Function {
            return Ok(None);
        }
        if !identifier.is_wildcard() && identifier.name() != CLOSURE_NAME {
            return Ok(None);
        }
        locate_at_line(reflector, &self.path, self.line, Target::Closure)
    }

    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        Ok(self
            .locate(reflector, &Identifier::wildcard(kind))?
            .into_iter()
            .collect())
    }
}

/// Locates the anonymous class that starts on a known line of a known file.
pub struct AnonymousClassSourceLocator {
    path: PathBuf,
    line: usize,
}

impl AnonymousClassSourceLocator {
    pub fn new(path: PathBuf, line: usize) -> Result<Self, ReflectionError> {
        if !path.is_file() {
            return Err(ReflectionError::configuration(format!(
                "{} is not a file",
                path.display()
            )));
        }
        Ok(Self { path, line })
    }
}

impl SourceLocator for AnonymousClassSourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        if identifier.kind() != IdentifierKind::Class {
            return Ok(None);
        }
        locate_at_line(reflector, &self.path, self.line, Target::AnonymousClass)
    }

    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        Ok(self
            .locate(reflector, &Identifier::wildcard(kind))?
            .into_iter()
            .collect())
    }
}
