use crate::parser::ast::{Expr, UnaryOp};
use crate::reflection::convert::NameContext;
use crate::reflection::error::ReflectionError;
use crate::reflection::reflector::Reflector;
use std::rc::Rc;

/// A compiled constant expression.
///
/// Literals compile to their value; constant references resolve by name
/// through the owning [`Reflector`], never by executing anything; every
/// other expression shape is preserved structurally as [`Value::Expr`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Key-value pairs in declaration order; `None` keys are positional.
    Array(Vec<(Option<Value>, Value)>),
    /// An enum case reference (`Status::Active`).
    EnumCase { class: String, case: String },
    /// An expression form that has no compile-time value; kept structurally.
    Expr(Expr),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Compile a literal-only expression without symbol resolution. Returns
    /// `None` when the expression references other symbols.
    pub fn from_literal(expr: &Expr) -> Option<Value> {
        match expr {
            Expr::Null { .. } => Some(Value::Null),
            Expr::Boolean { value, .. } => Some(Value::Bool(*value)),
            Expr::Integer { value, .. } => Some(compile_int(value)),
            Expr::Float { value, .. } => Some(Value::Float(parse_float_literal(value))),
            Expr::String { value, .. } => Some(Value::String(value.clone())),
            Expr::Unary {
                op: UnaryOp::Minus,
                expr,
                ..
            } => match Value::from_literal(expr)? {
                Value::Int(i) => Some(Value::Int(-i)),
                Value::Float(f) => Some(Value::Float(-f)),
                _ => None,
            },
            Expr::Unary {
                op: UnaryOp::Plus,
                expr,
                ..
            } => Value::from_literal(expr),
            Expr::Array { items, .. } => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if item.unpack {
                        return None;
                    }
                    let key = match &item.key {
                        Some(key) => Some(Value::from_literal(key)?),
                        None => None,
                    };
                    out.push((key, Value::from_literal(&item.value)?));
                }
                Some(Value::Array(out))
            }
            _ => None,
        }
    }
}

/// The declarative context a constant expression was written in: the
/// file's namespace and imports, plus the class it belongs to, if any.
#[derive(Debug, Clone)]
pub struct ValueScope {
    pub(crate) ctx: Rc<NameContext>,
    pub(crate) class: Option<String>,
}

impl ValueScope {
    pub(crate) fn new(ctx: Rc<NameContext>, class: Option<String>) -> Self {
        Self { ctx, class }
    }
}

/// Engine constants that have no source declaration anywhere.
fn engine_constant(name: &str) -> Option<Value> {
    match name {
        "PHP_EOL" => Some(Value::String("\n".to_owned())),
        "PHP_INT_MAX" => Some(Value::Int(i64::MAX)),
        "PHP_INT_MIN" => Some(Value::Int(i64::MIN)),
        "PHP_INT_SIZE" => Some(Value::Int(8)),
        "PHP_FLOAT_DIG" => Some(Value::Int(15)),
        "PHP_FLOAT_EPSILON" => Some(Value::Float(f64::EPSILON)),
        "PHP_FLOAT_MAX" => Some(Value::Float(f64::MAX)),
        "PHP_FLOAT_MIN" => Some(Value::Float(f64::MIN_POSITIVE)),
        "DIRECTORY_SEPARATOR" => Some(Value::String("/".to_owned())),
        "PATH_SEPARATOR" => Some(Value::String(":".to_owned())),
        "M_PI" => Some(Value::Float(std::f64::consts::PI)),
        "M_E" => Some(Value::Float(std::f64::consts::E)),
        _ => None,
    }
}

/// Compile a constant expression, resolving constant references through
/// `reflector` under `scope`.
pub fn compile(
    expr: &Expr,
    reflector: &Reflector,
    scope: &ValueScope,
) -> Result<Value, ReflectionError> {
    let mut guard = Vec::new();
    compile_guarded(expr, reflector, scope, &mut guard)
}

pub(crate) fn compile_guarded(
    expr: &Expr,
    reflector: &Reflector,
    scope: &ValueScope,
    guard: &mut Vec<String>,
) -> Result<Value, ReflectionError> {
    match expr {
        Expr::Null { .. }
        | Expr::Boolean { .. }
        | Expr::Integer { .. }
        | Expr::Float { .. }
        | Expr::String { .. } => Ok(Value::from_literal(expr).unwrap()),
        Expr::Unary {
            op: op @ (UnaryOp::Minus | UnaryOp::Plus),
            expr: inner,
            ..
        } => match compile_guarded(inner, reflector, scope, guard)? {
            Value::Int(i) if *op == UnaryOp::Minus => Ok(Value::Int(-i)),
            Value::Float(f) if *op == UnaryOp::Minus => Ok(Value::Float(-f)),
            v @ (Value::Int(_) | Value::Float(_)) => Ok(v),
            _ => Ok(Value::Expr(expr.clone())),
        },
        Expr::Array { items, .. } => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if item.unpack {
                    return Ok(Value::Expr(expr.clone()));
                }
                let key = match &item.key {
                    Some(key) => Some(compile_guarded(key, reflector, scope, guard)?),
                    None => None,
                };
                out.push((key, compile_guarded(&item.value, reflector, scope, guard)?));
            }
            Ok(Value::Array(out))
        }
        Expr::ConstFetch { name, .. } => {
            let (candidate, fallback) = scope.ctx.resolve_const_name(name);
            if let Some(value) = engine_constant(&candidate) {
                return Ok(value);
            }
            let constant = match reflector.reflect_constant(&candidate) {
                Ok(constant) => constant,
                Err(err) if err.is_not_found() => match fallback {
                    Some(global) => {
                        if let Some(value) = engine_constant(&global) {
                            return Ok(value);
                        }
                        reflector.reflect_constant(&global)?
                    }
                    None => return Err(err),
                },
                Err(err) => return Err(err),
            };
            let key = format!("const {}", constant.name());
            if guard.contains(&key) {
                return Err(ReflectionError::CircularDependency {
                    name: constant.name().to_owned(),
                });
            }
            guard.push(key);
            let value = constant.compile_value(reflector, guard)?;
            guard.pop();
            Ok(value)
        }
        Expr::ClassConstFetch {
            class, constant, ..
        } => compile_class_const(expr, class, constant, reflector, scope, guard),
        _ => Ok(Value::Expr(expr.clone())),
    }
}

fn compile_class_const(
    whole: &Expr,
    class: &Expr,
    constant: &Expr,
    reflector: &Reflector,
    scope: &ValueScope,
    guard: &mut Vec<String>,
) -> Result<Value, ReflectionError> {
    let Expr::ConstFetch { name, .. } = class else {
        return Ok(Value::Expr(whole.clone()));
    };
    let Expr::Identifier {
        name: member_name, ..
    } = constant
    else {
        return Ok(Value::Expr(whole.clone()));
    };

    let class_fqn = if name.is_unqualified()
        && matches!(
            name.parts[0].to_ascii_lowercase().as_str(),
            "self" | "static"
        ) {
        match &scope.class {
            Some(class) => class.clone(),
            None => return Ok(Value::Expr(whole.clone())),
        }
    } else if name.is_unqualified() && name.parts[0].eq_ignore_ascii_case("parent") {
        let Some(current) = &scope.class else {
            return Ok(Value::Expr(whole.clone()));
        };
        let current = reflector.reflect_class(current)?;
        match current.parent_class_name() {
            Some(parent) => parent.to_owned(),
            None => return Ok(Value::Expr(whole.clone())),
        }
    } else {
        scope.ctx.resolve_class_name(name)
    };

    if member_name == "class" {
        return Ok(Value::String(class_fqn));
    }

    let class_reflection = reflector.reflect_class(&class_fqn)?;

    if let Some(case) = class_reflection.case(member_name) {
        return Ok(Value::EnumCase {
            class: class_reflection.name().to_owned(),
            case: case.name().to_owned(),
        });
    }

    let Some(class_constant) = class_reflection.constant_with_inherited(reflector, member_name)?
    else {
        return Err(ReflectionError::NotFound {
            kind: crate::reflection::identifier::IdentifierKind::Constant,
            name: format!("{}::{}", class_fqn, member_name),
        });
    };

    let key = format!("classconst {}::{}", class_constant.declaring_class(), member_name);
    if guard.contains(&key) {
        return Err(ReflectionError::CircularDependency {
            name: format!("{}::{}", class_fqn, member_name),
        });
    }
    guard.push(key);
    let value = class_constant.compile_value(reflector, guard)?;
    guard.pop();
    Ok(value)
}

fn compile_int(text: &str) -> Value {
    match parse_int_literal(text) {
        Some(i) => Value::Int(i),
        // Integer literals overflowing i64 become floats, as in the engine.
        None => Value::Float(parse_float_literal(text)),
    }
}

pub(crate) fn parse_int_literal(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()
    } else if lower.len() > 1 && lower.starts_with('0') && lower.chars().all(|c| c.is_ascii_digit())
    {
        i64::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse::<i64>().ok()
    }
}

pub(crate) fn parse_float_literal(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}
