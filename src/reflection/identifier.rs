use std::fmt;
use std::hash::{Hash, Hasher};

/// Reserved name requesting every declaration of a kind in a source.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// Classes, interfaces, traits, and enums.
    Class,
    Function,
    Constant,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Class => f.write_str("class"),
            IdentifierKind::Function => f.write_str("function"),
            IdentifierKind::Constant => f.write_str("constant"),
        }
    }
}

/// A symbol to resolve: a name plus the kind of declaration it refers to.
///
/// Class and function names compare case-insensitively, constants
/// case-sensitively, matching the engine's own symbol-table rules. A
/// leading `\` is ignored everywhere.
#[derive(Debug, Clone)]
pub struct Identifier {
    name: String,
    kind: IdentifierKind,
}

impl Identifier {
    pub fn new(name: impl Into<String>, kind: IdentifierKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, IdentifierKind::Class)
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name, IdentifierKind::Function)
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self::new(name, IdentifierKind::Constant)
    }

    pub fn wildcard(kind: IdentifierKind) -> Self {
        Self::new(WILDCARD, kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD
    }

    /// The cache key form of the name: no leading backslash, casefolded for
    /// kinds the engine treats case-insensitively.
    pub fn normalized_name(&self) -> String {
        normalize(&self.name, self.kind)
    }

    /// Whether a declaration with the given fully-qualified name satisfies
    /// this identifier.
    pub fn matches(&self, fqn: &str) -> bool {
        if self.is_wildcard() {
            return true;
        }
        self.normalized_name() == normalize(fqn, self.kind)
    }
}

/// Normalize a symbol name for comparison under the given kind's rules.
pub fn normalize(name: &str, kind: IdentifierKind) -> String {
    let name = name.trim_start_matches('\\');
    match kind {
        IdentifierKind::Class | IdentifierKind::Function => name.to_ascii_lowercase(),
        IdentifierKind::Constant => name.to_owned(),
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.normalized_name() == other.normalized_name()
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.normalized_name().hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}
