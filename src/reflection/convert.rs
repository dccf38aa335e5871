use crate::parser::ast::{
    Arg, AttributeGroup, ClassMember, ConstEntry, Expr, Modifier, Name, Param, Stmt,
    TraitAdaptation, Type, UseItem, UseKind,
};
use crate::parser::span::Span;
use crate::reflection::ast_locator::ParsedUnit;
use crate::reflection::class::{
    ClassKind, ReflectionClass, ReflectionClassConstant, ReflectionEnumCase,
};
use crate::reflection::constant::ReflectionConstant;
use crate::reflection::error::ReflectionError;
use crate::reflection::function::{
    CLOSURE_NAME, ReflectionFunction, ReflectionMethod, ReflectionParameter,
};
use crate::reflection::identifier::{IdentifierKind, normalize};
use crate::reflection::property::ReflectionProperty;
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use crate::reflection::types::{ReflectionAttribute, TypeExpr, Visibility};
use crate::reflection::value::{Value, ValueScope};
use indexmap::IndexMap;
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// The declarative context surrounding a declaration: the enclosing
/// namespace and the file's `use` imports. Referenced names resolve
/// against it into fully-qualified form.
#[derive(Debug, Clone, Default)]
pub struct NameContext {
    namespace: Option<String>,
    /// Casefolded alias -> fully-qualified name.
    class_imports: HashMap<String, String>,
    function_imports: HashMap<String, String>,
    /// Constant aliases are case-sensitive.
    const_imports: HashMap<String, String>,
}

impl NameContext {
    pub fn new(namespace: Option<String>) -> Self {
        Self {
            namespace,
            ..Self::default()
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub(crate) fn set_namespace(&mut self, namespace: Option<String>) {
        self.namespace = namespace;
        self.class_imports.clear();
        self.function_imports.clear();
        self.const_imports.clear();
    }

    pub(crate) fn add_use(&mut self, item: &UseItem) {
        let target = item.name.joined();
        let alias = item
            .alias
            .as_ref()
            .map(|a| a.name.clone())
            .or_else(|| item.name.parts.last().cloned())
            .unwrap_or_default();
        if alias.is_empty() {
            return;
        }
        match item.kind {
            UseKind::Normal => {
                self.class_imports.insert(alias.to_ascii_lowercase(), target);
            }
            UseKind::Function => {
                self.function_imports
                    .insert(alias.to_ascii_lowercase(), target);
            }
            UseKind::Const => {
                self.const_imports.insert(alias, target);
            }
        }
    }

    /// Prefix a short name with the current namespace.
    pub(crate) fn qualify(&self, short: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}\\{}", ns, short),
            None => short.to_owned(),
        }
    }

    /// Resolve a class-like name reference to a fully-qualified name. The
    /// relative class references `self`, `parent`, and `static` pass
    /// through untouched.
    pub(crate) fn resolve_class_name(&self, name: &Name) -> String {
        if name.leading_slash {
            return name.joined();
        }
        if name.is_unqualified()
            && matches!(
                name.parts[0].to_ascii_lowercase().as_str(),
                "self" | "parent" | "static"
            )
        {
            return name.parts[0].clone();
        }
        if name.relative {
            return self.qualify(&name.joined());
        }
        if let Some(first) = name.parts.first() {
            if let Some(import) = self.class_imports.get(&first.to_ascii_lowercase()) {
                if name.parts.len() == 1 {
                    return import.clone();
                }
                let rest = name.parts[1..].join("\\");
                return format!("{}\\{}", import, rest);
            }
        }
        self.qualify(&name.joined())
    }

    /// Resolve a function name: `(candidate, global fallback)`. Unqualified
    /// names fall back to the global namespace when not found locally.
    pub(crate) fn resolve_function_name(&self, name: &Name) -> (String, Option<String>) {
        if name.leading_slash {
            return (name.joined(), None);
        }
        if name.relative {
            return (self.qualify(&name.joined()), None);
        }
        if name.parts.len() == 1 {
            if let Some(import) = self.function_imports.get(&name.parts[0].to_ascii_lowercase()) {
                return (import.clone(), None);
            }
            if self.namespace.is_some() {
                return (self.qualify(&name.parts[0]), Some(name.parts[0].clone()));
            }
            return (name.parts[0].clone(), None);
        }
        if let Some(import) = self.class_imports.get(&name.parts[0].to_ascii_lowercase()) {
            let rest = name.parts[1..].join("\\");
            return (format!("{}\\{}", import, rest), None);
        }
        (self.qualify(&name.joined()), None)
    }

    /// Resolve a constant name: `(candidate, global fallback)`.
    pub(crate) fn resolve_const_name(&self, name: &Name) -> (String, Option<String>) {
        if name.leading_slash {
            return (name.joined(), None);
        }
        if name.relative {
            return (self.qualify(&name.joined()), None);
        }
        if name.parts.len() == 1 {
            if let Some(import) = self.const_imports.get(&name.parts[0]) {
                return (import.clone(), None);
            }
            if self.namespace.is_some() {
                return (self.qualify(&name.parts[0]), Some(name.parts[0].clone()));
            }
            return (name.parts[0].clone(), None);
        }
        if let Some(import) = self.class_imports.get(&name.parts[0].to_ascii_lowercase()) {
            let rest = name.parts[1..].join("\\");
            return (format!("{}\\{}", import, rest), None);
        }
        (self.qualify(&name.joined()), None)
    }
}

fn source_text(source: &LocatedSource, span: Span) -> String {
    span.text(source.text())
}

fn doc_text(source: &LocatedSource, doc: Option<Span>) -> Option<String> {
    doc.map(|span| source_text(source, span))
}

fn convert_attr_args(args: &[Arg]) -> Vec<(Option<String>, Value)> {
    args.iter()
        .map(|arg| {
            let value =
                Value::from_literal(&arg.value).unwrap_or_else(|| Value::Expr(arg.value.clone()));
            (arg.name.as_ref().map(|n| n.name.clone()), value)
        })
        .collect()
}

pub(crate) fn convert_attributes(
    groups: &[AttributeGroup],
    ctx: &NameContext,
) -> Vec<ReflectionAttribute> {
    let mut out = Vec::new();
    for group in groups {
        for attribute in &group.attributes {
            out.push(ReflectionAttribute::new(
                ctx.resolve_class_name(&attribute.name),
                convert_attr_args(&attribute.args),
            ));
        }
    }
    out
}

fn convert_type(ty: &Option<Type>, ctx: &NameContext) -> Option<TypeExpr> {
    ty.as_ref().map(|t| TypeExpr::from_ast(t, ctx))
}

fn convert_parameters(
    params: &[Param],
    source: &LocatedSource,
    ctx: &Rc<NameContext>,
    class: Option<&str>,
) -> Vec<Rc<ReflectionParameter>> {
    params
        .iter()
        .enumerate()
        .map(|(position, param)| {
            Rc::new(ReflectionParameter {
                name: param.name.clone(),
                position,
                ty: convert_type(&param.ty, ctx),
                default_expr: param.default.clone(),
                default_text: param
                    .default
                    .as_ref()
                    .map(|e| source_text(source, e.span())),
                scope: ValueScope::new(ctx.clone(), class.map(str::to_owned)),
                by_ref: param.by_ref,
                variadic: param.variadic,
                promoted: !param.modifiers.is_empty(),
                attributes: convert_attributes(&param.attributes, ctx),
            })
        })
        .collect()
}

/// A uniform view over the four named class-like statements and the
/// anonymous-class expression.
pub(crate) enum ClassLikeNode<'a> {
    Stmt(&'a Stmt),
    Anonymous(&'a Expr),
}

struct ClassSrc<'a> {
    kind: ClassKind,
    short_name: Option<&'a str>,
    modifiers: &'a [Modifier],
    extends: Option<&'a Name>,
    interface_refs: Vec<&'a Name>,
    members: &'a [ClassMember],
    backed_type: Option<&'a Type>,
    attributes: &'a [AttributeGroup],
    doc_comment: Option<Span>,
    span: Span,
}

fn class_src<'a>(node: &ClassLikeNode<'a>) -> Option<ClassSrc<'a>> {
    match node {
        ClassLikeNode::Stmt(Stmt::Class {
            attributes,
            modifiers,
            name,
            extends,
            implements,
            members,
            doc_comment,
            span,
        }) => Some(ClassSrc {
            kind: ClassKind::Class,
            short_name: Some(&name.name),
            modifiers,
            extends: extends.as_ref(),
            interface_refs: implements.iter().collect(),
            members,
            backed_type: None,
            attributes,
            doc_comment: *doc_comment,
            span: *span,
        }),
        ClassLikeNode::Stmt(Stmt::Interface {
            attributes,
            name,
            extends,
            members,
            doc_comment,
            span,
        }) => Some(ClassSrc {
            kind: ClassKind::Interface,
            short_name: Some(&name.name),
            modifiers: &[],
            extends: None,
            interface_refs: extends.iter().collect(),
            members,
            backed_type: None,
            attributes,
            doc_comment: *doc_comment,
            span: *span,
        }),
        ClassLikeNode::Stmt(Stmt::Trait {
            attributes,
            name,
            members,
            doc_comment,
            span,
        }) => Some(ClassSrc {
            kind: ClassKind::Trait,
            short_name: Some(&name.name),
            modifiers: &[],
            extends: None,
            interface_refs: Vec::new(),
            members,
            backed_type: None,
            attributes,
            doc_comment: *doc_comment,
            span: *span,
        }),
        ClassLikeNode::Stmt(Stmt::Enum {
            attributes,
            name,
            backed_type,
            implements,
            members,
            doc_comment,
            span,
        }) => Some(ClassSrc {
            kind: ClassKind::Enum,
            short_name: Some(&name.name),
            modifiers: &[],
            extends: None,
            interface_refs: implements.iter().collect(),
            members,
            backed_type: backed_type.as_ref(),
            attributes,
            doc_comment: *doc_comment,
            span: *span,
        }),
        ClassLikeNode::Anonymous(Expr::AnonymousClass {
            attributes,
            extends,
            implements,
            members,
            span,
            ..
        }) => Some(ClassSrc {
            kind: ClassKind::Class,
            short_name: None,
            modifiers: &[],
            extends: extends.as_ref(),
            interface_refs: implements.iter().collect(),
            members,
            backed_type: None,
            attributes,
            doc_comment: None,
            span: *span,
        }),
        _ => None,
    }
}

/// Convert a class-like AST node into its reflection, composing used
/// traits by re-entering `reflector`.
pub(crate) fn class_from_node(
    reflector: &Reflector,
    source: &Rc<LocatedSource>,
    unit: &ParsedUnit,
    node: ClassLikeNode<'_>,
    ctx: Rc<NameContext>,
) -> Result<Rc<ReflectionClass>, ReflectionError> {
    let src = class_src(&node).ok_or_else(|| {
        ReflectionError::configuration("node is not a class-like declaration")
    })?;

    let (fqn, is_anonymous) = match src.short_name {
        Some(short) => (ctx.qualify(short), false),
        None => {
            let base = src
                .extends
                .map(|name| ctx.resolve_class_name(name))
                .or_else(|| {
                    src.interface_refs
                        .first()
                        .map(|name| ctx.resolve_class_name(name))
                })
                .unwrap_or_else(|| "class".to_owned());
            (format!("{}@anonymous", base), true)
        }
    };
    trace!("converting class-like declaration {}", fqn);

    let mut interface_names = Vec::new();
    if src.kind == ClassKind::Enum {
        interface_names.push("UnitEnum".to_owned());
        if src.backed_type.is_some() {
            interface_names.push("BackedEnum".to_owned());
        }
    }
    interface_names.extend(
        src.interface_refs
            .iter()
            .map(|name| ctx.resolve_class_name(name)),
    );

    let scope = ValueScope::new(ctx.clone(), Some(fqn.clone()));

    let mut constants = IndexMap::new();
    let mut properties = IndexMap::new();
    let mut methods: IndexMap<String, Rc<ReflectionMethod>> = IndexMap::new();
    let mut cases = IndexMap::new();
    let mut trait_uses: Vec<(Vec<String>, &[TraitAdaptation])> = Vec::new();

    for member in src.members {
        match member {
            ClassMember::Const {
                attributes,
                modifiers,
                ty,
                consts,
                doc_comment,
                ..
            } => {
                for entry in consts {
                    constants.insert(
                        entry.name.name.clone(),
                        Rc::new(ReflectionClassConstant {
                            name: entry.name.name.clone(),
                            visibility: Visibility::from_modifiers(modifiers),
                            is_final: modifiers.contains(&Modifier::Final),
                            ty: convert_type(ty, &ctx),
                            value_expr: entry.value.clone(),
                            value_text: source_text(source, entry.value.span()),
                            scope: scope.clone(),
                            declaring_class: fqn.clone(),
                            attributes: convert_attributes(attributes, &ctx),
                            doc_comment: doc_text(source, *doc_comment),
                        }),
                    );
                }
            }
            ClassMember::Property {
                attributes,
                modifiers,
                ty,
                entries,
                doc_comment,
                ..
            } => {
                for entry in entries {
                    properties.insert(
                        entry.name.clone(),
                        Rc::new(ReflectionProperty {
                            name: entry.name.clone(),
                            visibility: Visibility::from_modifiers(modifiers),
                            is_static: modifiers.contains(&Modifier::Static),
                            is_readonly: modifiers.contains(&Modifier::Readonly),
                            is_promoted: false,
                            ty: convert_type(ty, &ctx),
                            default_expr: entry.default.clone(),
                            default_text: entry
                                .default
                                .as_ref()
                                .map(|e| source_text(source, e.span())),
                            scope: scope.clone(),
                            declaring_class: fqn.clone(),
                            defined_in: fqn.clone(),
                            attributes: convert_attributes(attributes, &ctx),
                            doc_comment: doc_text(source, *doc_comment),
                        }),
                    );
                }
            }
            ClassMember::Method {
                attributes,
                modifiers,
                name,
                by_ref,
                params,
                return_type,
                body,
                doc_comment,
                span,
            } => {
                let (start_line, end_line) = unit.line_index.line_range(*span);
                let method = Rc::new(ReflectionMethod {
                    name: name.name.clone(),
                    visibility: Visibility::from_modifiers(modifiers),
                    is_static: modifiers.contains(&Modifier::Static),
                    is_abstract: modifiers.contains(&Modifier::Abstract)
                        || src.kind == ClassKind::Interface,
                    is_final: modifiers.contains(&Modifier::Final),
                    returns_reference: *by_ref,
                    has_body: body.is_some(),
                    parameters: convert_parameters(params, source, &ctx, Some(&fqn)),
                    return_type: convert_type(return_type, &ctx),
                    declaring_class: fqn.clone(),
                    defined_in: fqn.clone(),
                    aliased_from: None,
                    attributes: convert_attributes(attributes, &ctx),
                    doc_comment: doc_text(source, *doc_comment),
                    located_source: source.clone(),
                    span: *span,
                    start_line,
                    end_line,
                });
                methods.insert(name.name.to_ascii_lowercase(), method);

                // Promoted constructor parameters become properties.
                if name.name.eq_ignore_ascii_case("__construct") {
                    for param in params {
                        if param.modifiers.is_empty() {
                            continue;
                        }
                        properties.insert(
                            param.name.clone(),
                            Rc::new(ReflectionProperty {
                                name: param.name.clone(),
                                visibility: Visibility::from_modifiers(&param.modifiers),
                                is_static: false,
                                is_readonly: param.modifiers.contains(&Modifier::Readonly),
                                is_promoted: true,
                                ty: convert_type(&param.ty, &ctx),
                                default_expr: param.default.clone(),
                                default_text: param
                                    .default
                                    .as_ref()
                                    .map(|e| source_text(source, e.span())),
                                scope: scope.clone(),
                                declaring_class: fqn.clone(),
                                defined_in: fqn.clone(),
                                attributes: convert_attributes(&param.attributes, &ctx),
                                doc_comment: None,
                            }),
                        );
                    }
                }
            }
            ClassMember::Case {
                attributes,
                name,
                value,
                doc_comment,
                ..
            } => {
                cases.insert(
                    name.name.clone(),
                    Rc::new(ReflectionEnumCase {
                        name: name.name.clone(),
                        value_expr: value.clone(),
                        value_text: value.as_ref().map(|e| source_text(source, e.span())),
                        scope: scope.clone(),
                        declaring_class: fqn.clone(),
                        attributes: convert_attributes(attributes, &ctx),
                        doc_comment: doc_text(source, *doc_comment),
                    }),
                );
            }
            ClassMember::TraitUse {
                traits,
                adaptations,
                ..
            } => {
                let resolved = traits
                    .iter()
                    .map(|name| ctx.resolve_class_name(name))
                    .collect::<Vec<_>>();
                trait_uses.push((resolved, adaptations));
            }
        }
    }

    let trait_names: Vec<String> = trait_uses
        .iter()
        .flat_map(|(names, _)| names.iter().cloned())
        .collect();

    compose_traits(
        reflector,
        &fqn,
        &ctx,
        &trait_uses,
        &mut methods,
        &mut properties,
        &mut constants,
    )?;

    let (start_line, end_line) = unit.line_index.line_range(src.span);

    Ok(Rc::new(ReflectionClass {
        name: fqn,
        kind: src.kind,
        is_abstract: src.modifiers.contains(&Modifier::Abstract),
        is_final: src.modifiers.contains(&Modifier::Final) || src.kind == ClassKind::Enum,
        is_readonly: src.modifiers.contains(&Modifier::Readonly),
        is_anonymous,
        parent_name: src.extends.map(|name| ctx.resolve_class_name(name)),
        interface_names,
        trait_names,
        constants,
        properties,
        methods,
        cases,
        backing_type: src.backed_type.map(|ty| TypeExpr::from_ast(ty, &ctx)),
        attributes: convert_attributes(src.attributes, &ctx),
        doc_comment: doc_text(source, src.doc_comment),
        located_source: source.clone(),
        span: src.span,
        start_line,
        end_line,
    }))
}

/// Merge trait members into the class's own member tables, honouring
/// `insteadof` precedence rules and `as` aliases. A member the class
/// declares directly always shadows the trait copy.
fn compose_traits(
    reflector: &Reflector,
    class: &str,
    ctx: &Rc<NameContext>,
    trait_uses: &[(Vec<String>, &[TraitAdaptation])],
    methods: &mut IndexMap<String, Rc<ReflectionMethod>>,
    properties: &mut IndexMap<String, Rc<ReflectionProperty>>,
    constants: &mut IndexMap<String, Rc<ReflectionClassConstant>>,
) -> Result<(), ReflectionError> {
    if trait_uses.is_empty() {
        return Ok(());
    }
    debug!("composing traits into {}", class);

    let own_methods: HashSet<String> = methods.keys().cloned().collect();
    let own_properties: HashSet<String> = properties.keys().cloned().collect();
    let own_constants: HashSet<String> = constants.keys().cloned().collect();

    // Winner-per-method map built from insteadof rules.
    let mut precedence: HashMap<String, String> = HashMap::new();
    for (_, adaptations) in trait_uses {
        for adaptation in *adaptations {
            if let TraitAdaptation::Precedence {
                trait_name, method, ..
            } = adaptation
            {
                precedence.insert(
                    method.name.to_ascii_lowercase(),
                    normalize(&ctx.resolve_class_name(trait_name), IdentifierKind::Class),
                );
            }
        }
    }

    // Imported-from bookkeeping for conflict reporting.
    let mut method_origin: HashMap<String, String> = HashMap::new();
    let mut used_traits: Vec<Rc<ReflectionClass>> = Vec::new();

    for (names, _) in trait_uses {
        for trait_name in names {
            let trait_reflection = reflector.reflect_class(trait_name)?;
            if !trait_reflection.is_trait() {
                return Err(ReflectionError::NotATrait {
                    name: trait_reflection.name().to_owned(),
                });
            }

            for (key, method) in trait_reflection.methods() {
                if own_methods.contains(key) {
                    continue;
                }
                if let Some(winner) = precedence.get(key) {
                    if *winner != normalize(trait_reflection.name(), IdentifierKind::Class) {
                        continue;
                    }
                }
                if let Some(existing) = methods.get(key) {
                    if normalize(existing.defined_in(), IdentifierKind::Class)
                        == normalize(method.defined_in(), IdentifierKind::Class)
                    {
                        continue;
                    }
                    return Err(ReflectionError::AmbiguousTraitUse {
                        class: class.to_owned(),
                        member: method.name().to_owned(),
                        traits: vec![
                            existing.defined_in().to_owned(),
                            method.defined_in().to_owned(),
                        ],
                    });
                }
                methods.insert(key.clone(), Rc::new(method.rebind(class)));
                method_origin.insert(key.clone(), trait_reflection.name().to_owned());
            }

            for (key, property) in trait_reflection.properties() {
                if own_properties.contains(key) {
                    continue;
                }
                if let Some(existing) = properties.get(key) {
                    let compatible = existing.visibility() == property.visibility()
                        && existing.is_static() == property.is_static()
                        && existing.is_readonly() == property.is_readonly()
                        && existing.default_text() == property.default_text();
                    if compatible {
                        continue;
                    }
                    return Err(ReflectionError::AmbiguousTraitUse {
                        class: class.to_owned(),
                        member: format!("${}", property.name()),
                        traits: vec![
                            existing.defined_in().to_owned(),
                            property.defined_in().to_owned(),
                        ],
                    });
                }
                let mut imported = property.as_ref().clone();
                imported.declaring_class = class.to_owned();
                properties.insert(key.clone(), Rc::new(imported));
            }

            for (key, constant) in trait_reflection.constants() {
                if own_constants.contains(key) {
                    continue;
                }
                if let Some(existing) = constants.get(key) {
                    let compatible = existing.visibility() == constant.visibility()
                        && existing.value_text() == constant.value_text();
                    if compatible {
                        continue;
                    }
                    return Err(ReflectionError::AmbiguousTraitUse {
                        class: class.to_owned(),
                        member: constant.name().to_owned(),
                        traits: vec![
                            existing.declaring_class().to_owned(),
                            constant.declaring_class().to_owned(),
                        ],
                    });
                }
                let mut imported = constant.as_ref().clone();
                imported.declaring_class = class.to_owned();
                constants.insert(key.clone(), Rc::new(imported));
            }

            used_traits.push(trait_reflection);
        }
    }

    // Alias imports happen after the plain merge so an alias can re-import
    // a method that an insteadof rule excluded.
    for (_, adaptations) in trait_uses {
        for adaptation in *adaptations {
            let TraitAdaptation::Alias {
                trait_name,
                method,
                alias,
                visibility,
                ..
            } = adaptation
            else {
                continue;
            };

            let source_method = match trait_name {
                Some(trait_name) => {
                    let resolved = ctx.resolve_class_name(trait_name);
                    let trait_reflection = reflector.reflect_class(&resolved)?;
                    trait_reflection.method(&method.name).cloned().ok_or_else(|| {
                        ReflectionError::NotFound {
                            kind: IdentifierKind::Function,
                            name: format!("{}::{}", trait_reflection.name(), method.name),
                        }
                    })?
                }
                None => {
                    let mut found: Vec<Rc<ReflectionMethod>> = Vec::new();
                    for trait_reflection in &used_traits {
                        if let Some(m) = trait_reflection.method(&method.name) {
                            if !found
                                .iter()
                                .any(|f| normalize(f.defined_in(), IdentifierKind::Class)
                                    == normalize(m.defined_in(), IdentifierKind::Class))
                            {
                                found.push(m.clone());
                            }
                        }
                    }
                    match found.len() {
                        0 => {
                            return Err(ReflectionError::NotFound {
                                kind: IdentifierKind::Function,
                                name: format!("{}::{}", class, method.name),
                            });
                        }
                        1 => found.pop().unwrap(),
                        _ => {
                            return Err(ReflectionError::AmbiguousTraitUse {
                                class: class.to_owned(),
                                member: method.name.clone(),
                                traits: found
                                    .iter()
                                    .map(|m| m.defined_in().to_owned())
                                    .collect(),
                            });
                        }
                    }
                }
            };

            let visibility = visibility.as_ref().map(|m| Visibility::from_modifiers(&[*m]));
            match alias {
                Some(alias) => {
                    let key = alias.name.to_ascii_lowercase();
                    if own_methods.contains(&key) || method_origin.contains_key(&key) {
                        return Err(ReflectionError::AmbiguousTraitUse {
                            class: class.to_owned(),
                            member: alias.name.clone(),
                            traits: vec![source_method.defined_in().to_owned()],
                        });
                    }
                    methods.insert(
                        key,
                        Rc::new(source_method.as_alias(class, &alias.name, visibility)),
                    );
                }
                None => {
                    // Visibility change of the imported method itself.
                    let key = method.name.to_ascii_lowercase();
                    if own_methods.contains(&key) {
                        continue;
                    }
                    let original = source_method.name().to_owned();
                    let mut rebound = source_method.as_alias(class, &original, visibility);
                    rebound.aliased_from = None;
                    methods.insert(key, Rc::new(rebound));
                }
            }
        }
    }

    Ok(())
}

/// A uniform view over named functions, closures, and arrow functions.
pub(crate) enum FunctionLikeNode<'a> {
    Stmt(&'a Stmt),
    Closure(&'a Expr),
}

pub(crate) fn function_from_node(
    source: &Rc<LocatedSource>,
    unit: &ParsedUnit,
    node: FunctionLikeNode<'_>,
    ctx: Rc<NameContext>,
) -> Result<Rc<ReflectionFunction>, ReflectionError> {
    let (name, by_ref, params, return_type, attributes, doc_comment, span, is_closure, is_static) =
        match node {
            FunctionLikeNode::Stmt(Stmt::Function {
                attributes,
                name,
                by_ref,
                params,
                return_type,
                doc_comment,
                span,
                ..
            }) => (
                ctx.qualify(&name.name),
                *by_ref,
                params,
                return_type,
                attributes,
                *doc_comment,
                *span,
                false,
                false,
            ),
            FunctionLikeNode::Closure(Expr::Closure {
                attributes,
                is_static,
                by_ref,
                params,
                return_type,
                span,
                ..
            })
            | FunctionLikeNode::Closure(Expr::ArrowFunction {
                attributes,
                is_static,
                by_ref,
                params,
                return_type,
                span,
                ..
            }) => (
                match ctx.namespace() {
                    Some(ns) => format!("{}\\{}", ns, CLOSURE_NAME),
                    None => CLOSURE_NAME.to_owned(),
                },
                *by_ref,
                params,
                return_type,
                attributes,
                None,
                *span,
                true,
                *is_static,
            ),
            _ => {
                return Err(ReflectionError::configuration(
                    "node is not a function-like declaration",
                ));
            }
        };

    let (start_line, end_line) = unit.line_index.line_range(span);
    Ok(Rc::new(ReflectionFunction {
        name,
        is_closure,
        is_static_closure: is_closure && is_static,
        returns_reference: by_ref,
        parameters: convert_parameters(params, source, &ctx, None),
        return_type: convert_type(return_type, &ctx),
        attributes: convert_attributes(attributes, &ctx),
        doc_comment: doc_text(source, doc_comment),
        located_source: source.clone(),
        span,
        start_line,
        end_line,
    }))
}

pub(crate) fn constant_from_entry(
    source: &Rc<LocatedSource>,
    unit: &ParsedUnit,
    entry: &ConstEntry,
    doc_comment: Option<Span>,
    ctx: Rc<NameContext>,
) -> Rc<ReflectionConstant> {
    let (start_line, end_line) = unit.line_index.line_range(entry.span);
    Rc::new(ReflectionConstant {
        name: ctx.qualify(&entry.name.name),
        value_expr: entry.value.clone(),
        value_text: source_text(source, entry.value.span()),
        scope: ValueScope::new(ctx, None),
        from_define: false,
        doc_comment: doc_text(source, doc_comment),
        located_source: source.clone(),
        span: entry.span,
        start_line,
        end_line,
    })
}

pub(crate) fn constant_from_define(
    source: &Rc<LocatedSource>,
    unit: &ParsedUnit,
    name: String,
    value: &Expr,
    span: Span,
    ctx: Rc<NameContext>,
) -> Rc<ReflectionConstant> {
    let (start_line, end_line) = unit.line_index.line_range(span);
    Rc::new(ReflectionConstant {
        name: name.trim_start_matches('\\').to_owned(),
        value_expr: value.clone(),
        value_text: source_text(source, value.span()),
        scope: ValueScope::new(ctx, None),
        from_define: true,
        doc_comment: None,
        located_source: source.clone(),
        span,
        start_line,
        end_line,
    })
}
