use crate::reflection::Reflection;
use crate::reflection::ast_locator::{reflect_all_in_source, reflect_in_source};
use crate::reflection::error::ReflectionError;
use crate::reflection::identifier::{Identifier, IdentifierKind};
use crate::reflection::locator::SourceLocator;
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use log::{trace, warn};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::WalkDir;

/// Serves one fixed piece of source text, regardless of identifier.
#[derive(Debug)]
pub struct StringSourceLocator {
    source: Rc<LocatedSource>,
}

impl StringSourceLocator {
    pub fn new(text: String) -> Result<Self, ReflectionError> {
        if text.is_empty() {
            return Err(ReflectionError::configuration(
                "source text must not be empty",
            ));
        }
        Ok(Self {
            source: Rc::new(LocatedSource::new(text, None)),
        })
    }

    /// Source that only ever existed inside an `eval()` call.
    pub fn evaled(text: String) -> Result<Self, ReflectionError> {
        if text.is_empty() {
            return Err(ReflectionError::configuration(
                "source text must not be empty",
            ));
        }
        Ok(Self {
            source: Rc::new(LocatedSource::evaled(text)),
        })
    }
}

impl SourceLocator for StringSourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        reflect_in_source(reflector, &self.source, identifier)
    }

    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        reflect_all_in_source(reflector, &self.source, kind)
    }
}

/// Serves the contents of one fixed file, read once at construction.
#[derive(Debug)]
pub struct SingleFileSourceLocator {
    source: Rc<LocatedSource>,
}

impl SingleFileSourceLocator {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ReflectionError> {
        let path = path.as_ref();
        let source = LocatedSource::from_file(path).map_err(|err| {
            ReflectionError::configuration(format!(
                "cannot read source file {}: {}",
                path.display(),
                err
            ))
        })?;
        Ok(Self { source })
    }
}

impl SourceLocator for SingleFileSourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        reflect_in_source(reflector, &self.source, identifier)
    }

    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        reflect_all_in_source(reflector, &self.source, kind)
    }
}

/// Iterates every `.php` file under one or more directory roots, in
/// deterministic path order. The file list is fixed at construction;
/// files are read lazily per lookup.
#[derive(Debug)]
pub struct DirectorySourceLocator {
    files: Vec<PathBuf>,
}

impl DirectorySourceLocator {
    pub fn new(roots: &[PathBuf]) -> Result<Self, ReflectionError> {
        let mut files = Vec::new();
        for root in roots {
            if !root.is_dir() {
                return Err(ReflectionError::configuration(format!(
                    "{} is not a directory",
                    root.display()
                )));
            }
            for entry in WalkDir::new(root).follow_links(true) {
                let entry = entry.map_err(|err| {
                    ReflectionError::configuration(format!(
                        "cannot walk {}: {}",
                        root.display(),
                        err
                    ))
                })?;
                if entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("php"))
                {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
        files.sort();
        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl SourceLocator for DirectorySourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        for path in &self.files {
            let source = match LocatedSource::from_file(path) {
                Ok(source) => source,
                Err(err) => {
                    // A file that vanished since construction is a miss for
                    // this strategy, not a crash.
                    warn!("skipping unreadable file {}: {}", path.display(), err);
                    continue;
                }
            };
            trace!("probing {} for {}", path.display(), identifier);
            if let Some(reflection) = reflect_in_source(reflector, &source, identifier)? {
                return Ok(Some(reflection));
            }
        }
        Ok(None)
    }

    fn locate_all_of_kind(
        &self,
        reflector: &Reflector,
        kind: IdentifierKind,
    ) -> Result<Vec<Reflection>, ReflectionError> {
        let mut out = Vec::new();
        for path in &self.files {
            let source = match LocatedSource::from_file(path) {
                Ok(source) => source,
                Err(err) => {
                    warn!("skipping unreadable file {}: {}", path.display(), err);
                    continue;
                }
            };
            out.extend(reflect_all_in_source(reflector, &source, kind)?);
        }
        Ok(out)
    }
}
