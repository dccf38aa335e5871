use crate::parser::ast::{ConstEntry, Expr, Program, Stmt};
use crate::parser::line_index::LineIndex;
use crate::parser::parser::Parser;
use crate::parser::span::Span;
use crate::reflection::Reflection;
use crate::reflection::convert::{
    self, ClassLikeNode, FunctionLikeNode, NameContext,
};
use crate::reflection::error::ReflectionError;
use crate::reflection::identifier::{Identifier, IdentifierKind};
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use log::{debug, trace};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// One parsed source, cached for the owning locator's lifetime.
#[derive(Debug)]
pub struct ParsedUnit {
    pub program: Program,
    pub line_index: LineIndex,
}

/// Parses located sources and finds the declaration nodes matching an
/// identifier. Parses are memoized by `(origin path, text)` so identical
/// sources reached through different locators are parsed once.
#[derive(Debug, Default)]
pub struct AstLocator {
    cache: RefCell<HashMap<(Option<PathBuf>, String), Rc<ParsedUnit>>>,
}

impl AstLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&self, source: &LocatedSource) -> Rc<ParsedUnit> {
        let key = (
            source.origin_path().map(|p| p.to_path_buf()),
            source.text().to_owned(),
        );
        if let Some(unit) = self.cache.borrow().get(&key) {
            trace!("parse cache hit for {:?}", key.0);
            return unit.clone();
        }
        debug!(
            "parsing {} ({} bytes)",
            key.0
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<string>".to_owned()),
            source.text().len()
        );
        let program = Parser::parse(source.text());
        let unit = Rc::new(ParsedUnit {
            line_index: LineIndex::new(source.text().as_bytes()),
            program,
        });
        self.cache.borrow_mut().insert(key, unit.clone());
        unit
    }

    /// Number of distinct sources parsed so far.
    pub fn parsed_count(&self) -> usize {
        self.cache.borrow().len()
    }
}

/// Reject a source whose parse produced errors, with origin context.
pub(crate) fn ensure_no_errors(
    source: &LocatedSource,
    unit: &ParsedUnit,
) -> Result<(), ReflectionError> {
    let Some(error) = unit.program.errors.first() else {
        return Ok(());
    };
    let (line, column) = unit.line_index.line_col(error.span.start);
    Err(ReflectionError::Parse {
        message: error.message.to_owned(),
        path: source.origin_path().map(|p| p.to_path_buf()),
        line,
        column,
    })
}

/// A declaration node found in a parsed source, with its qualified name
/// and the name-resolution context it appeared under.
pub(crate) struct FoundDecl<'a> {
    pub node: DeclNode<'a>,
    pub fqn: String,
    pub ctx: Rc<NameContext>,
}

pub(crate) enum DeclNode<'a> {
    ClassLike(&'a Stmt),
    Function(&'a Stmt),
    Const {
        entry: &'a ConstEntry,
        doc: Option<Span>,
    },
    Define {
        name: String,
        value: &'a Expr,
        span: Span,
    },
}

impl DeclNode<'_> {
    fn kind(&self) -> IdentifierKind {
        match self {
            DeclNode::ClassLike(_) => IdentifierKind::Class,
            DeclNode::Function(_) => IdentifierKind::Function,
            DeclNode::Const { .. } | DeclNode::Define { .. } => IdentifierKind::Constant,
        }
    }
}

struct DeclCollector<'a> {
    ctx: NameContext,
    snapshot: Option<Rc<NameContext>>,
    out: Vec<FoundDecl<'a>>,
}

impl<'a> DeclCollector<'a> {
    fn new() -> Self {
        Self {
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

    fn walk_stmts(&mut self, stmts: &'a [Stmt]) {
        for stmt in stmts {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Namespace { name, body, .. } => {
                let namespace = name.as_ref().map(|n| n.joined());
                match body {
                    Some(body) => {
                        let saved_ctx = std::mem::replace(&mut self.ctx, NameContext::new(namespace));
                        let saved_snapshot = self.snapshot.take();
                        self.walk_stmts(body);
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
            Stmt::Class { name, .. }
            | Stmt::Interface { name, .. }
            | Stmt::Trait { name, .. }
            | Stmt::Enum { name, .. } => {
                let fqn = self.ctx.qualify(&name.name);
                let ctx = self.ctx_rc();
                self.out.push(FoundDecl {
                    node: DeclNode::ClassLike(stmt),
                    fqn,
                    ctx,
                });
            }
            Stmt::Function { name, body, .. } => {
                let fqn = self.ctx.qualify(&name.name);
                let ctx = self.ctx_rc();
                self.out.push(FoundDecl {
                    node: DeclNode::Function(stmt),
                    fqn,
                    ctx,
                });
                // Conditionally defined nested declarations become visible
                // once the enclosing function runs.
                self.walk_stmts(body);
            }
            Stmt::Const {
                consts,
                doc_comment,
                ..
            } => {
                for entry in consts {
                    let fqn = self.ctx.qualify(&entry.name.name);
                    let ctx = self.ctx_rc();
                    self.out.push(FoundDecl {
                        node: DeclNode::Const {
                            entry,
                            doc: *doc_comment,
                        },
                        fqn,
                        ctx,
                    });
                }
            }
            Stmt::Expression { expr, span } => {
                if let Some((name, value)) = match_define(expr) {
                    let ctx = self.ctx_rc();
                    self.out.push(FoundDecl {
                        fqn: name.trim_start_matches('\\').to_owned(),
                        node: DeclNode::Define {
                            name,
                            value,
                            span: *span,
                        },
                        ctx,
                    });
                }
            }
            Stmt::Block { statements, .. } => self.walk_stmts(statements),
            Stmt::If {
                then_block,
                else_block,
                ..
            } => {
                self.walk_stmts(then_block);
                if let Some(else_block) = else_block {
                    self.walk_stmts(else_block);
                }
            }
            Stmt::While { body, .. }
            | Stmt::DoWhile { body, .. }
            | Stmt::For { body, .. }
            | Stmt::Foreach { body, .. }
            | Stmt::Declare { body, .. } => self.walk_stmts(body),
            Stmt::Switch { cases, .. } => {
                for case in cases {
                    self.walk_stmts(&case.body);
                }
            }
            Stmt::Try {
                body,
                catches,
                finally,
                ..
            } => {
                self.walk_stmts(body);
                for catch in catches {
                    self.walk_stmts(&catch.body);
                }
                if let Some(finally) = finally {
                    self.walk_stmts(finally);
                }
            }
            _ => {}
        }
    }
}

/// A literal, unconditional `define('NAME', value)` call.
fn match_define(expr: &Expr) -> Option<(String, &Expr)> {
    let Expr::Call { func, args, .. } = expr else {
        return None;
    };
    let Expr::ConstFetch { name, .. } = func.as_ref() else {
        return None;
    };
    if name.parts.len() != 1 || !name.parts[0].eq_ignore_ascii_case("define") {
        return None;
    }
    if args.len() < 2 || args.iter().any(|a| a.unpack || a.name.is_some()) {
        return None;
    }
    let Expr::String { value, .. } = &args[0].value else {
        return None;
    };
    Some((value.clone(), &args[1].value))
}

pub(crate) fn collect_declarations(program: &Program) -> Vec<FoundDecl<'_>> {
    let mut collector = DeclCollector::new();
    collector.walk_stmts(&program.statements);
    collector.out
}

fn convert_found(
    reflector: &Reflector,
    source: &Rc<LocatedSource>,
    unit: &ParsedUnit,
    found: FoundDecl<'_>,
) -> Result<Reflection, ReflectionError> {
    match found.node {
        DeclNode::ClassLike(stmt) => Ok(Reflection::Class(convert::class_from_node(
            reflector,
            source,
            unit,
            ClassLikeNode::Stmt(stmt),
            found.ctx,
        )?)),
        DeclNode::Function(stmt) => Ok(Reflection::Function(convert::function_from_node(
            source,
            unit,
            FunctionLikeNode::Stmt(stmt),
            found.ctx,
        )?)),
        DeclNode::Const { entry, doc } => Ok(Reflection::Constant(
            convert::constant_from_entry(source, unit, entry, doc, found.ctx),
        )),
        DeclNode::Define { name, value, span } => Ok(Reflection::Constant(
            convert::constant_from_define(source, unit, name, value, span, found.ctx),
        )),
    }
}

/// Find and convert the declaration matching `identifier` inside one
/// located source. A miss is the expected "identifier not found in this
/// source" condition and maps to `Ok(None)` so the next locator in an
/// aggregate gets its turn.
pub(crate) fn reflect_in_source(
    reflector: &Reflector,
    source: &Rc<LocatedSource>,
    identifier: &Identifier,
) -> Result<Option<Reflection>, ReflectionError> {
    let unit = reflector.ast_locator().parse(source);
    ensure_no_errors(source, &unit)?;

    for found in collect_declarations(&unit.program) {
        if found.node.kind() != identifier.kind() {
            continue;
        }
        if !identifier.matches(&found.fqn) {
            continue;
        }
        return convert_found(reflector, source, &unit, found).map(Some);
    }
    Ok(None)
}

/// Convert every declaration of `kind` in one located source.
pub(crate) fn reflect_all_in_source(
    reflector: &Reflector,
    source: &Rc<LocatedSource>,
    kind: IdentifierKind,
) -> Result<Vec<Reflection>, ReflectionError> {
    let unit = reflector.ast_locator().parse(source);
    ensure_no_errors(source, &unit)?;

    let mut out = Vec::new();
    for found in collect_declarations(&unit.program) {
        if found.node.kind() != kind {
            continue;
        }
        out.push(convert_found(reflector, source, &unit, found)?);
    }
    Ok(out)
}
