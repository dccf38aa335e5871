use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Where a piece of located source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Ordinary source read from a file or supplied as text.
    Ordinary,
    /// Synthesized stub text standing in for an engine built-in.
    Internal,
    /// Source that only ever existed inside an `eval()` call.
    Evaled,
}

/// Raw source text plus provenance for a symbol's candidate definition.
///
/// Immutable once constructed; reading it never causes the underlying
/// symbol to be loaded or executed.
#[derive(Debug, Clone)]
pub struct LocatedSource {
    text: String,
    origin_path: Option<PathBuf>,
    origin: SourceOrigin,
}

impl LocatedSource {
    pub fn new(text: String, origin_path: Option<PathBuf>) -> Self {
        Self {
            text,
            origin_path,
            origin: SourceOrigin::Ordinary,
        }
    }

    pub fn internal(text: String) -> Self {
        Self {
            text,
            origin_path: None,
            origin: SourceOrigin::Internal,
        }
    }

    pub fn evaled(text: String) -> Self {
        Self {
            text,
            origin_path: None,
            origin: SourceOrigin::Evaled,
        }
    }

    /// Read a file into an ordinary located source.
    pub fn from_file(path: &Path) -> std::io::Result<Rc<Self>> {
        let text = std::fs::read_to_string(path)?;
        Ok(Rc::new(Self::new(text, Some(path.to_path_buf()))))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin_path(&self) -> Option<&Path> {
        self.origin_path.as_deref()
    }

    pub fn origin(&self) -> SourceOrigin {
        self.origin
    }

    pub fn is_internal(&self) -> bool {
        self.origin == SourceOrigin::Internal
    }

    pub fn is_evaled(&self) -> bool {
        self.origin == SourceOrigin::Evaled
    }
}
