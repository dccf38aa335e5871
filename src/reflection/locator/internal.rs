use crate::reflection::Reflection;
use crate::reflection::ast_locator::reflect_in_source;
use crate::reflection::error::ReflectionError;
use crate::reflection::identifier::{Identifier, IdentifierKind};
use crate::reflection::locator::SourceLocator;
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

/// Fabricates declaration text for symbols that have no real source,
/// such as engine built-ins.
pub trait StubProvider {
    /// Synthesized source text declaring `identifier`, if known.
    fn stub(&self, identifier: &Identifier) -> Option<String>;

    /// Names this provider can synthesize for a kind, for bulk lookups.
    fn known_names(&self, _kind: IdentifierKind) -> Vec<String> {
        Vec::new()
    }
}

/// Serves internal symbols from a pluggable [`StubProvider`]; the
/// resulting sources are tagged [`SourceOrigin::Internal`](crate::SourceOrigin).
pub struct InternalSourceLocator {
    provider: Box<dyn StubProvider>,
}

impl InternalSourceLocator {
    pub fn new(provider: Box<dyn StubProvider>) -> Self {
        Self { provider }
    }

    /// A locator over the stub table built into this crate.
    pub fn builtin() -> Self {
        Self::new(Box::new(BuiltinStubs))
    }
}

impl SourceLocator for InternalSourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        if identifier.is_wildcard() {
            return Ok(None);
        }
        let Some(stub) = self.provider.stub(identifier) else {
            return Ok(None);
        };
        debug!("synthesized stub for {}", identifier);
        let source = Rc::new(LocatedSource::internal(stub));
        reflect_in_source(reflector, &source, identifier)
    }

    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        let mut out = Vec::new();
        for name in self.provider.known_names(kind) {
            let identifier = Identifier::new(name, kind);
            if let Some(reflection) = self.locate(reflector, &identifier)? {
                out.push(reflection);
            }
        }
        Ok(out)
    }
}

lazy_static! {
    /// Declaration stubs for the engine interfaces and classes the core
    /// itself needs to resolve, keyed by casefolded name.
    static ref BUILTIN_STUBS: HashMap<&'static str, &'static str> = {
        let mut stubs = HashMap::new();
        stubs.insert(
            "unitenum",
            "<?php interface UnitEnum { public static function cases(): array; }",
        );
        stubs.insert(
            "backedenum",
            "<?php interface BackedEnum extends UnitEnum {\n\
             public static function from(int|string $value): static;\n\
             public static function tryFrom(int|string $value): ?static;\n\
             }",
        );
        stubs.insert(
            "stringable",
            "<?php interface Stringable { public function __toString(): string; }",
        );
        stubs.insert("traversable", "<?php interface Traversable {}");
        stubs.insert(
            "iterator",
            "<?php interface Iterator extends Traversable {\n\
             public function current(): mixed;\n\
             public function key(): mixed;\n\
             public function next(): void;\n\
             public function rewind(): void;\n\
             public function valid(): bool;\n\
             }",
        );
        stubs.insert(
            "iteratoraggregate",
            "<?php interface IteratorAggregate extends Traversable {\n\
             public function getIterator(): Traversable;\n\
             }",
        );
        stubs.insert(
            "countable",
            "<?php interface Countable { public function count(): int; }",
        );
        stubs.insert(
            "arrayaccess",
            "<?php interface ArrayAccess {\n\
             public function offsetExists(mixed $offset): bool;\n\
             public function offsetGet(mixed $offset): mixed;\n\
             public function offsetSet(mixed $offset, mixed $value): void;\n\
             public function offsetUnset(mixed $offset): void;\n\
             }",
        );
        stubs.insert(
            "jsonserializable",
            "<?php interface JsonSerializable { public function jsonSerialize(): mixed; }",
        );
        stubs.insert(
            "throwable",
            "<?php interface Throwable extends Stringable {\n\
             public function getMessage(): string;\n\
             public function getCode();\n\
             public function getFile(): string;\n\
             public function getLine(): int;\n\
             public function getTrace(): array;\n\
             public function getTraceAsString(): string;\n\
             public function getPrevious(): ?Throwable;\n\
             }",
        );
        stubs.insert(
            "exception",
            "<?php class Exception implements Throwable {\n\
             protected $message = '';\n\
             protected $code = 0;\n\
             protected string $file = '';\n\
             protected int $line = 0;\n\
             public function __construct(string $message = '', int $code = 0, ?Throwable $previous = null) {}\n\
             public function getMessage(): string {}\n\
             public function getCode() {}\n\
             public function getFile(): string {}\n\
             public function getLine(): int {}\n\
             public function getTrace(): array {}\n\
             public function getTraceAsString(): string {}\n\
             public function getPrevious(): ?Throwable {}\n\
             public function __toString(): string {}\n\
             }",
        );
        stubs.insert(
            "error",
            "<?php class Error implements Throwable {\n\
             protected $message = '';\n\
             protected $code = 0;\n\
             protected string $file = '';\n\
             protected int $line = 0;\n\
             public function __construct(string $message = '', int $code = 0, ?Throwable $previous = null) {}\n\
             public function getMessage(): string {}\n\
             public function getCode() {}\n\
             public function getFile(): string {}\n\
             public function getLine(): int {}\n\
             public function getTrace(): array {}\n\
             public function getTraceAsString(): string {}\n\
             public function getPrevious(): ?Throwable {}\n\
             public function __toString(): string {}\n\
             }",
        );
        stubs
    };
}

/// The stub table built into this crate: the engine interfaces enums and
/// exceptions depend on.
pub struct BuiltinStubs;

impl StubProvider for BuiltinStubs {
    fn stub(&self, identifier: &Identifier) -> Option<String> {
        if identifier.kind() != IdentifierKind::Class {
            return None;
        }
        BUILTIN_STUBS
            .get(identifier.normalized_name().as_str())
            .map(|stub| (*stub).to_owned())
    }

    fn known_names(&self, kind: IdentifierKind) -> Vec<String> {
        if kind != IdentifierKind::Class {
            return Vec::new();
        }
        let mut names: Vec<String> = BUILTIN_STUBS.keys().map(|k| (*k).to_owned()).collect();
        names.sort();
        names
    }
}
