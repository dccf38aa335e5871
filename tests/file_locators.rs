use anyhow::Result;
use php_reflect::{
    AutoloadResolver, AutoloadSourceLocator, ComposerSourceLocator, DirectorySourceLocator,
    Psr4Resolver, ReflectionError, Reflector, SingleFileSourceLocator, SourceOrigin,
};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

#[test]
fn single_file_locator_serves_the_file_contents() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("shapes.php");
    fs::write(&path, "<?php class Circle {} class Square {}")?;

    let reflector = Reflector::new(Rc::new(SingleFileSourceLocator::new(&path)?));
    let circle = reflector.reflect_class("Circle")?;
    assert_eq!(circle.located_source().origin_path(), Some(path.as_path()));
    assert_eq!(circle.located_source().origin(), SourceOrigin::Ordinary);
    Ok(())
}

#[test]
fn single_file_locator_rejects_a_missing_file_at_construction() {
    let err = SingleFileSourceLocator::new("/no/such/file.php").unwrap_err();
    assert!(matches!(err, ReflectionError::Configuration { .. }));
}

#[test]
fn directory_locator_walks_roots_for_php_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("sub"))?;
    fs::write(dir.path().join("a.php"), "<?php class InRoot {}")?;
    fs::write(dir.path().join("sub/b.php"), "<?php class InSub {}")?;
    fs::write(dir.path().join("notes.txt"), "not php")?;

    let locator = DirectorySourceLocator::new(&[dir.path().to_path_buf()])?;
    assert_eq!(locator.files().len(), 2);

    let reflector = Reflector::new(Rc::new(locator));
    assert!(reflector.reflect_class("InRoot").is_ok());
    assert!(reflector.reflect_class("InSub").is_ok());
    assert!(reflector.reflect_class("Elsewhere").unwrap_err().is_not_found());
    Ok(())
}

#[test]
fn directory_locator_rejects_a_non_directory_root() {
    let err = DirectorySourceLocator::new(&[PathBuf::from("/no/such/dir")]).unwrap_err();
    assert!(matches!(err, ReflectionError::Configuration { .. }));
}

#[test]
fn directory_locator_enumerates_all_declarations() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("a.php"), "<?php class One {}")?;
    fs::write(dir.path().join("b.php"), "<?php class Two {} function helper() {}")?;

    let reflector = Reflector::new(Rc::new(DirectorySourceLocator::new(&[dir
        .path()
        .to_path_buf()])?));
    let classes = reflector.reflect_all_classes()?;
    let names: Vec<&str> = classes.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["One", "Two"]);

    let functions = reflector.reflect_all_functions()?;
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name(), "helper");
    Ok(())
}

#[test]
fn composer_locator_derives_paths_from_psr4_prefixes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("src/Model"))?;
    fs::write(
        dir.path().join("src/Model/User.php"),
        "<?php namespace App\\Model; class User {}",
    )?;

    let locator = ComposerSourceLocator::new(vec![(
        "App\\".to_owned(),
        dir.path().join("src"),
    )])?;
    let reflector = Reflector::new(Rc::new(locator));

    let user = reflector.reflect_class("App\\Model\\User")?;
    assert_eq!(user.name(), "App\\Model\\User");
    assert!(reflector.reflect_class("App\\Model\\Ghost").unwrap_err().is_not_found());
    Ok(())
}

#[test]
fn composer_locator_prefers_classmap_entries() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("src"))?;
    fs::write(
        dir.path().join("legacy.php"),
        "<?php class Legacy_Thing {}",
    )?;

    let mut locator =
        ComposerSourceLocator::new(vec![("App\\".to_owned(), dir.path().join("src"))])?;
    locator.add_classmap_entry("Legacy_Thing", dir.path().join("legacy.php"));

    let reflector = Reflector::new(Rc::new(locator));
    assert!(reflector.reflect_class("Legacy_Thing").is_ok());
    Ok(())
}

#[test]
fn composer_locator_falls_back_to_global_namespace_dirs() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("Toplevel.php"), "<?php class Toplevel {}")?;

    let mut locator = ComposerSourceLocator::new(Vec::new())?;
    locator.add_fallback_dir(dir.path().to_path_buf())?;

    let reflector = Reflector::new(Rc::new(locator));
    assert!(reflector.reflect_class("Toplevel").is_ok());
    Ok(())
}

#[test]
fn composer_locator_validates_directories_at_construction() {
    let err =
        ComposerSourceLocator::new(vec![("App\\".to_owned(), PathBuf::from("/no/such/dir"))])
            .unwrap_err();
    assert!(matches!(err, ReflectionError::Configuration { .. }));
}

#[test]
fn autoload_probe_reads_the_recorded_candidate_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("Service.php"),
        "<?php namespace App; class Service {}",
    )?;

    let resolver = Psr4Resolver::new(vec![("App\\".to_owned(), dir.path().to_path_buf())])?;
    let reflector = Reflector::new(Rc::new(AutoloadSourceLocator::new(Box::new(resolver))));

    let service = reflector.reflect_class("App\\Service")?;
    assert_eq!(service.name(), "App\\Service");
    assert!(reflector.reflect_class("App\\Ghost").unwrap_err().is_not_found());
    Ok(())
}

/// A resolver that confidently reports a path that no longer exists.
struct StaleResolver(PathBuf);

impl AutoloadResolver for StaleResolver {
    fn class_path(&self, _class_name: &str) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

#[test]
fn vanished_autoload_candidate_is_not_found_rather_than_a_crash() {
    let locator = AutoloadSourceLocator::new(Box::new(StaleResolver(PathBuf::from(
        "/deleted/since/indexing.php",
    ))));
    let reflector = Reflector::new(Rc::new(locator));

    let err = reflector.reflect_class("Gone").unwrap_err();
    assert!(err.is_not_found(), "got: {err}");
}

#[test]
fn functions_are_never_autoloaded() {
    let resolver = Psr4Resolver::new(Vec::new()).unwrap();
    let reflector = Reflector::new(Rc::new(AutoloadSourceLocator::new(Box::new(resolver))));
    assert!(reflector.reflect_function("strlen").unwrap_err().is_not_found());
}
