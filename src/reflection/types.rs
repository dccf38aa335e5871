use crate::parser::ast::{Modifier, Type};
use crate::reflection::convert::NameContext;
use crate::reflection::value::Value;
use std::fmt;

/// Three-state member visibility. Members without an explicit modifier
/// default to public.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn from_modifiers(modifiers: &[Modifier]) -> Self {
        for m in modifiers {
            match m {
                Modifier::Public => return Visibility::Public,
                Modifier::Protected => return Visibility::Protected,
                Modifier::Private => return Visibility::Private,
                _ => {}
            }
        }
        Visibility::Public
    }

    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }

    pub fn is_protected(self) -> bool {
        self == Visibility::Protected
    }

    pub fn is_private(self) -> bool {
        self == Visibility::Private
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Protected => f.write_str("protected"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// A declared type with class-like names resolved to fully-qualified form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A builtin type keyword (`int`, `string`, `void`, ...).
    Simple(String),
    /// A class-like type, fully qualified.
    Named(String),
    Nullable(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
}

impl TypeExpr {
    pub(crate) fn from_ast(ty: &Type, ctx: &NameContext) -> Self {
        match ty {
            Type::Simple(ident) => TypeExpr::Simple(ident.name.clone()),
            Type::Named(name) => TypeExpr::Named(ctx.resolve_class_name(name)),
            Type::Nullable(inner) => TypeExpr::Nullable(Box::new(Self::from_ast(inner, ctx))),
            Type::Union(types) => {
                TypeExpr::Union(types.iter().map(|t| Self::from_ast(t, ctx)).collect())
            }
            Type::Intersection(types) => {
                TypeExpr::Intersection(types.iter().map(|t| Self::from_ast(t, ctx)).collect())
            }
        }
    }

    pub fn allows_null(&self) -> bool {
        match self {
            TypeExpr::Simple(name) => name == "null" || name == "mixed",
            TypeExpr::Nullable(_) => true,
            TypeExpr::Union(types) => types.iter().any(TypeExpr::allows_null),
            _ => false,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Simple(name) => f.write_str(name),
            TypeExpr::Named(name) => f.write_str(name),
            TypeExpr::Nullable(inner) => write!(f, "?{}", inner),
            TypeExpr::Union(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    match ty {
                        TypeExpr::Intersection(_) => write!(f, "({})", ty)?,
                        _ => write!(f, "{}", ty)?,
                    }
                }
                Ok(())
            }
            TypeExpr::Intersection(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str("&")?;
                    }
                    write!(f, "{}", ty)?;
                }
                Ok(())
            }
        }
    }
}

/// One `#[Attr(...)]` application on a declaration.
#[derive(Debug, Clone)]
pub struct ReflectionAttribute {
    name: String,
    args: Vec<(Option<String>, Value)>,
}

impl ReflectionAttribute {
    pub(crate) fn new(name: String, args: Vec<(Option<String>, Value)>) -> Self {
        Self { name, args }
    }

    /// Fully-qualified attribute class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[(Option<String>, Value)] {
        &self.args
    }

    /// The value of a named argument.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args
            .iter()
            .find(|(n, _)| n.as_deref() == Some(name))
            .map(|(_, v)| v)
    }
}
