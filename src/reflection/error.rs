use crate::reflection::identifier::IdentifierKind;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ReflectionError {
    /// No locator in the configured chain could resolve the identifier.
    NotFound {
        kind: IdentifierKind,
        name: String,
    },
    /// Two closures or anonymous classes start on the same line of the same
    /// file; position-based resolution cannot pick one.
    AmbiguousPosition {
        path: PathBuf,
        line: usize,
        count: usize,
    },
    /// Two used traits declare the same member and no `insteadof` rule says
    /// which copy survives.
    AmbiguousTraitUse {
        class: String,
        member: String,
        traits: Vec<String>,
    },
    /// The located source is not syntactically valid.
    Parse {
        message: String,
        path: Option<PathBuf>,
        line: usize,
        column: usize,
    },
    /// A locator was constructed with invalid configuration.
    Configuration { message: String },
    /// Resolution re-entered a symbol that is already being resolved, e.g.
    /// a trait using itself.
    CircularDependency { name: String },
    /// A `use` clause names a symbol that is not a trait.
    NotATrait { name: String },
    /// A file read failed mid-lookup.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ReflectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReflectionError::NotFound { kind, name } => {
                write!(f, "{} {} could not be located", kind, name)
            }
            ReflectionError::AmbiguousPosition { path, line, count } => {
                write!(
                    f,
                    "{} candidates start on line {} of {}; position is ambiguous",
                    count,
                    line,
                    path.display()
                )
            }
            ReflectionError::AmbiguousTraitUse {
                class,
                member,
                traits,
            } => {
                write!(
                    f,
                    "trait member {}::{} is provided by {}; add an insteadof rule",
                    class,
                    member,
                    traits.join(" and ")
                )
            }
            ReflectionError::Parse {
                message,
                path,
                line,
                column,
            } => match path {
                Some(path) => write!(f, "{}:{}:{}: {}", path.display(), line, column, message),
                None => write!(f, "line {}, column {}: {}", line, column, message),
            },
            ReflectionError::Configuration { message } => write!(f, "{}", message),
            ReflectionError::CircularDependency { name } => {
                write!(f, "circular dependency while resolving {}", name)
            }
            ReflectionError::NotATrait { name } => {
                write!(f, "{} is used as a trait but is not one", name)
            }
            ReflectionError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ReflectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReflectionError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ReflectionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ReflectionError::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error represents a missing symbol rather than a defect.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReflectionError::NotFound { .. })
    }
}
