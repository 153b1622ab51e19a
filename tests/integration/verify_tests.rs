//! Integration tests for the reference verifier.
//!
//! Each test builds a small Python project in a temp directory and checks
//! the verdict for a candidate symbol.

use deadaudit::verify::RefKind;
use deadaudit::{Config, Verifier};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A minimal project: pyproject marker plus a `pkg` package.
fn project(files: &[(&str, &str)]) -> (TempDir, Config) {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "pyproject.toml", "[project]\nname = \"pkg\"\n");
    write(tmp.path(), "pkg/__init__.py", "");
    for (rel, contents) in files {
        write(tmp.path(), rel, contents);
    }
    let config = Config::resolve(tmp.path(), &[]).unwrap();
    (tmp, config)
}

#[test]
fn never_mentioned_symbol_is_dead() {
    let (_tmp, config) = project(&[("pkg/a.py", "def helper():\n    return 1\n")]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(result.is_dead);
    assert!(!result.notebook_only);
    assert!(result.references.is_empty());
    assert!(!result.steps.is_empty());
}

#[test]
fn same_file_usage_is_alive() {
    let (_tmp, config) = project(&[(
        "pkg/a.py",
        "def helper():\n    return 1\n\ndef caller():\n    return helper()\n",
    )]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(!result.is_dead);
    assert!(result
        .references
        .iter()
        .any(|r| r.kind == RefKind::Direct && r.location.contains("pkg/a.py:5")));
}

#[test]
fn cross_file_usage_is_alive() {
    let (_tmp, config) = project(&[
        ("pkg/a.py", "def helper():\n    return 1\n"),
        ("pkg/b.py", "from pkg.a import helper\n\nhelper()\n"),
    ]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(!result.is_dead);
}

#[test]
fn test_directory_references_do_not_count() {
    // References under recognized test directories are not live by design.
    let (_tmp, config) = project(&[
        ("pkg/a.py", "def helper():\n    return 1\n"),
        ("pkg/tests_slow/test_a.py", "from pkg.a import helper\nhelper()\n"),
    ]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(result.is_dead);
    assert!(!result.notebook_only);
}

#[test]
fn comment_references_do_not_count() {
    let (_tmp, config) = project(&[
        ("pkg/a.py", "def helper():\n    return 1\n"),
        ("pkg/b.py", "# helper is deprecated, do not use\nx = 1\n"),
    ]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(result.is_dead);
}

#[test]
fn notebook_reference_sets_notebook_only() {
    let notebook = r#"{
        "cells": [
            {"cell_type": "code", "source": ["from pkg.a import helper\n", "helper()\n"]}
        ]
    }"#;
    let (_tmp, config) = project(&[
        ("pkg/a.py", "def helper():\n    return 1\n"),
        ("notebooks/explore.ipynb", notebook),
    ]);
    assert_eq!(config.notebook_paths.len(), 1);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(result.is_dead);
    assert!(result.notebook_only);
    assert_eq!(result.notebook_references.len(), 1);
    assert!(result.notebook_references[0].contains("explore.ipynb"));
}

#[test]
fn notebook_markdown_mention_does_not_count() {
    let notebook = r#"{
        "cells": [
            {"cell_type": "markdown", "source": ["helper is described here\n"]}
        ]
    }"#;
    let (_tmp, config) = project(&[
        ("pkg/a.py", "def helper():\n    return 1\n"),
        ("notebooks/explore.ipynb", notebook),
    ]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(result.is_dead);
    assert!(!result.notebook_only);
}

#[test]
fn string_literal_reference_is_alive_and_tagged() {
    let (_tmp, config) = project(&[
        ("pkg/a.py", "def helper():\n    return 1\n"),
        ("pkg/dispatch.py", "TABLE = {\"helper\": \"pkg.a\"}\n"),
    ]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(!result.is_dead);
    assert!(result
        .references
        .iter()
        .any(|r| r.kind == RefKind::StringLiteral && r.location.contains("pkg/dispatch.py")));
}

#[test]
fn init_import_is_a_reexport_reference() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "pyproject.toml", "[project]\nname = \"pkg\"\n");
    write(tmp.path(), "pkg/__init__.py", "from pkg.a import helper\n");
    write(tmp.path(), "pkg/a.py", "def helper():\n    return 1\n");
    let config = Config::resolve(tmp.path(), &[]).unwrap();

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(!result.is_dead);
    assert!(result.references.iter().any(|r| r.kind == RefKind::ReExport));
}

#[test]
fn quoted_name_in_init_with_all_is_an_export_reference() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "pyproject.toml", "[project]\nname = \"pkg\"\n");
    write(tmp.path(), "pkg/__init__.py", "__all__ = [\"helper\"]\n");
    write(tmp.path(), "pkg/a.py", "def helper():\n    return 1\n");
    let config = Config::resolve(tmp.path(), &[]).unwrap();

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(!result.is_dead);
    assert!(result
        .references
        .iter()
        .any(|r| r.kind == RefKind::ExportList));
}

#[test]
fn subclass_usage_of_capitalized_name_is_alive_and_tagged() {
    let (_tmp, config) = project(&[
        ("pkg/models.py", "class OldBase:\n    pass\n"),
        ("pkg/impl.py", "class Child(OldBase):\n    pass\n"),
    ]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("OldBase", "pkg/models.py");

    assert!(!result.is_dead);
    assert!(result
        .references
        .iter()
        .any(|r| r.kind == RefKind::Inheritance && r.location.contains("pkg/impl.py")));
}

#[test]
fn lowercase_names_skip_the_inheritance_search() {
    let (_tmp, config) = project(&[("pkg/a.py", "def helper():\n    return 1\n")]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(!result
        .steps
        .iter()
        .any(|s| s.contains("inheritance")));
}

#[test]
fn substring_match_inside_identifier_counts_as_alive() {
    // Documented limitation of the lexical search: `helper` matches inside
    // `helper_v2`.
    let (_tmp, config) = project(&[
        ("pkg/a.py", "def helper():\n    return 1\n"),
        ("pkg/b.py", "def helper_v2():\n    return 2\n"),
    ]);

    let verifier = Verifier::new(&config);
    let result = verifier.verify("helper", "pkg/a.py");

    assert!(!result.is_dead);
}

#[test]
fn verification_is_idempotent() {
    let notebook = r#"{"cells": [{"cell_type": "code", "source": "helper()"}]}"#;
    let (_tmp, config) = project(&[
        ("pkg/a.py", "def helper():\n    return 1\n\ndef orphan():\n    return 2\n"),
        ("notebooks/explore.ipynb", notebook),
    ]);

    let verifier = Verifier::new(&config);
    for name in ["helper", "orphan"] {
        let first = verifier.verify(name, "pkg/a.py");
        let second = verifier.verify(name, "pkg/a.py");
        assert_eq!(first.is_dead, second.is_dead);
        assert_eq!(first.notebook_only, second.notebook_only);
        assert_eq!(first.references.len(), second.references.len());
    }
}

#[test]
fn variable_and_annotated_definitions_are_not_self_references() {
    let (_tmp, config) = project(&[(
        "pkg/settings.py",
        "TIMEOUT = 30\nretry_count: int = 3\n",
    )]);

    let verifier = Verifier::new(&config);
    assert!(verifier.verify("TIMEOUT", "pkg/settings.py").is_dead);
    assert!(verifier.verify("retry_count", "pkg/settings.py").is_dead);
}
