use crate::reflection::Reflection;
use crate::reflection::ast_locator::{reflect_all_in_source, reflect_in_source};
use crate::reflection::error::ReflectionError;
use crate::reflection::identifier::{Identifier, IdentifierKind};
use crate::reflection::locator::SourceLocator;
use crate::reflection::locator::autoload::AutoloadResolver;
use crate::reflection::reflector::Reflector;
use crate::reflection::source::LocatedSource;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn check_dir(dir: &Path) -> Result<(), ReflectionError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(ReflectionError::configuration(format!(
            "{} is not a directory",
            dir.display()
        )))
    }
}

/// Candidate file paths for a class under PSR-4 prefix mappings.
fn psr4_candidates(prefixes: &[(String, Vec<PathBuf>)], class: &str) -> Vec<PathBuf> {
    let class = class.trim_start_matches('\\');
    let class_lower = class.to_ascii_lowercase();
    let mut out = Vec::new();
    for (prefix, dirs) in prefixes {
        let prefix_lower = prefix.to_ascii_lowercase();
        if !class_lower.starts_with(&prefix_lower) {
            continue;
        }
        let rest = &class[prefix.len()..];
        let rest = rest.trim_start_matches('\\');
        let relative = format!("{}.php", rest.replace('\\', "/"));
        for dir in dirs {
            out.push(dir.join(&relative));
        }
    }
    out
}

/// Maps class names to files the way a composer-style autoloader would:
/// an explicit classmap first, then PSR-4 prefixes, then fallback
/// directories rooted at the global namespace.
#[derive(Debug)]
pub struct ComposerSourceLocator {
    psr4: Vec<(String, Vec<PathBuf>)>,
    classmap: HashMap<String, PathBuf>,
    fallback_dirs: Vec<PathBuf>,
}

impl ComposerSourceLocator {
    pub fn new(psr4: Vec<(String, PathBuf)>) -> Result<Self, ReflectionError> {
        let mut prefixes: Vec<(String, Vec<PathBuf>)> = Vec::new();
        for (prefix, dir) in psr4 {
            check_dir(&dir)?;
            let prefix = prefix.trim_matches('\\').to_owned();
            match prefixes.iter_mut().find(|(p, _)| *p == prefix) {
                Some((_, dirs)) => dirs.push(dir),
                None => prefixes.push((prefix, vec![dir])),
            }
        }
        // Longest prefix wins, as in composer's own lookup order.
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(Self {
            psr4: prefixes,
            classmap: HashMap::new(),
            fallback_dirs: Vec::new(),
        })
    }

    pub fn add_classmap_entry(&mut self, class: impl AsRef<str>, path: PathBuf) {
        self.classmap.insert(
            class.as_ref().trim_start_matches('\\').to_ascii_lowercase(),
            path,
        );
    }

    pub fn add_fallback_dir(&mut self, dir: PathBuf) -> Result<(), ReflectionError> {
        check_dir(&dir)?;
        self.fallback_dirs.push(dir);
        Ok(())
    }

    fn candidate_paths(&self, class: &str) -> Vec<PathBuf> {
        let key = class.trim_start_matches('\\').to_ascii_lowercase();
        let mut out = Vec::new();
        if let Some(path) = self.classmap.get(&key) {
            out.push(path.clone());
        }
        out.extend(psr4_candidates(&self.psr4, class));
        for dir in &self.fallback_dirs {
            let relative = format!("{}.php", class.trim_start_matches('\\').replace('\\', "/"));
            out.push(dir.join(relative));
        }
        out
    }

    fn all_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.classmap.values().cloned().collect();
        let roots = self
            .psr4
            .iter()
            .flat_map(|(_, dirs)| dirs.iter())
            .chain(self.fallback_dirs.iter());
        for root in roots {
            for entry in WalkDir::new(root).follow_links(true).into_iter().flatten() {
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
        files.dedup();
        files
    }
}

impl SourceLocator for ComposerSourceLocator {
    fn locate(
        &self,
        reflector: &Reflector,
        identifier: &Identifier,
    ) -> Result<Option<Reflection>, ReflectionError> {
        if identifier.kind() != IdentifierKind::Class || identifier.is_wildcard() {
            return Ok(None);
        }
        for path in self.candidate_paths(identifier.name()) {
            if !path.is_file() {
                continue;
            }
            let source = match LocatedSource::from_file(&path) {
                Ok(source) => source,
                Err(err) => {
                    warn!("skipping unreadable file {}: {}", path.display(), err);
                    continue;
                }
            };
            debug!("trying {} for {}", path.display(), identifier);
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
        for path in self.all_files() {
            let source = match LocatedSource::from_file(&path) {
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

/// A standalone PSR-4 candidate-path resolver, usable as the recorder
/// collaborator of the autoload-probe strategy.
pub struct Psr4Resolver {
    prefixes: Vec<(String, Vec<PathBuf>)>,
}

impl Psr4Resolver {
    pub fn new(prefixes: Vec<(String, PathBuf)>) -> Result<Self, ReflectionError> {
        let mut out: Vec<(String, Vec<PathBuf>)> = Vec::new();
        for (prefix, dir) in prefixes {
            check_dir(&dir)?;
            let prefix = prefix.trim_matches('\\').to_owned();
            match out.iter_mut().find(|(p, _)| *p == prefix) {
                Some((_, dirs)) => dirs.push(dir),
                None => out.push((prefix, vec![dir])),
            }
        }
        out.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(Self { prefixes: out })
    }
}

impl AutoloadResolver for Psr4Resolver {
    fn class_path(&self, class_name: &str) -> Option<PathBuf> {
        psr4_candidates(&self.prefixes, class_name)
            .into_iter()
            .find(|path| path.is_file())
    }
}
