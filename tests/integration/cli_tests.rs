//! End-to-end CLI tests.
//!
//! The external detectors are not installed in the test environment, so
//! full runs exercise the degrade-to-empty path: the audit still succeeds
//! and still produces its artifacts.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn deadaudit() -> Command {
    Command::cargo_bin("deadaudit").unwrap()
}

#[test]
fn help_lists_the_audit_flags() {
    deadaudit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-skylos"))
        .stdout(predicate::str::contains("--vulture-confidence"))
        .stdout(predicate::str::contains("--source-dirs"));
}

#[test]
fn fails_without_a_project_root() {
    let tmp = TempDir::new().unwrap();
    deadaudit()
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("repo root"));
}

#[test]
fn fails_without_source_directories() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "pyproject.toml", "[project]\nname = \"empty\"\n");

    deadaudit()
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("source directories"));
}

#[test]
fn run_produces_artifacts_even_when_detectors_are_missing() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "pyproject.toml", "[project]\nname = \"mypkg\"\n");
    write(tmp.path(), "mypkg/__init__.py", "");
    write(tmp.path(), "mypkg/core.py", "def run():\n    pass\n");
    let out = tmp.path().join("audit-out");

    deadaudit()
        .current_dir(tmp.path())
        .args(["--output-dir", out.to_str().unwrap(), "--quiet"])
        .assert()
        .success();

    let names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert!(names
        .iter()
        .any(|n| n.starts_with("dead_code_candidates_") && n.ends_with(".json")));
    assert!(names
        .iter()
        .any(|n| n.starts_with("dead_code_report_") && n.ends_with(".md")));
}

#[test]
fn no_report_skips_the_markdown_artifact() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "pyproject.toml", "[project]\nname = \"mypkg\"\n");
    write(tmp.path(), "mypkg/__init__.py", "");
    let out = tmp.path().join("audit-out");

    deadaudit()
        .current_dir(tmp.path())
        .args(["--output-dir", out.to_str().unwrap(), "--no-report", "--quiet"])
        .assert()
        .success();

    let names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert!(names.iter().any(|n| n.starts_with("dead_code_candidates_")));
    assert!(!names.iter().any(|n| n.starts_with("dead_code_report_")));
}

#[test]
fn candidates_file_carries_run_metadata() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "pyproject.toml", "[project]\nname = \"mypkg\"\n");
    write(tmp.path(), "mypkg/__init__.py", "");
    write(tmp.path(), "notebooks/explore.ipynb", "{\"cells\": []}");
    let out = tmp.path().join("audit-out");

    deadaudit()
        .current_dir(tmp.path())
        .args([
            "--output-dir",
            out.to_str().unwrap(),
            "--vulture-confidence",
            "80",
            "--skip-skylos",
            "--quiet",
        ])
        .assert()
        .success();

    let candidates_file = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with("dead_code_candidates_"))
                .unwrap_or(false)
        })
        .expect("candidates file written");

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(candidates_file).unwrap()).unwrap();
    assert_eq!(doc["metadata"]["source_dirs"][0], "mypkg");
    assert_eq!(doc["metadata"]["vulture_confidence"], 80);
    assert_eq!(doc["metadata"]["notebook_count"], 1);
    assert_eq!(doc["metadata"]["total_candidates"], 0);
    assert!(doc["candidates"].as_array().unwrap().is_empty());
}
