// Configuration resolution and project auto-detection
//
// Handles:
// - Finding the repository root by walking upward
// - Loading the optional .dead-code-auditor.json override file
// - Auto-detecting Python source and test directories
// - Finding all notebooks by extension

use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Fatal configuration errors. Nothing downstream runs when these occur.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("could not find repo root (no pyproject.toml, setup.py, setup.cfg, or .git found)")]
    #[diagnostic(help("run from inside a Python project, or pass a path to one"))]
    RootNotFound,

    #[error("no Python source directories found")]
    #[diagnostic(help("create a package with __init__.py or specify --source-dirs"))]
    NoSourceDirs,
}

/// Directories never treated as source, regardless of contents.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "tests",
    "test",
    "__pycache__",
    "*.egg-info",
    "build",
    "dist",
    ".git",
    ".tox",
    ".venv",
    "venv",
    ".eggs",
    "node_modules",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
];

/// Decorators whose targets are invoked by frameworks, not by direct calls.
pub const DEFAULT_IGNORED_DECORATORS: &[&str] = &[
    "@pytest.fixture",
    "@pytest.mark.*",
    "@lru_cache",
    "@cached_property",
    "@property",
    "@staticmethod",
    "@classmethod",
    "@abstractmethod",
    "@overload",
    // Flyte
    "@task",
    "@workflow",
    "@dynamic",
    // Web frameworks
    "@app.route",
    "@app.get",
    "@app.post",
    "@app.put",
    "@app.delete",
    "@router.get",
    "@router.post",
    "@router.put",
    "@router.delete",
    // Click/Typer CLI
    "@click.command",
    "@click.group",
    "@app.command",
];

/// Name patterns the detectors should never report.
pub const DEFAULT_IGNORED_NAMES: &[&str] = &[
    "test_*",
    "*_fixture",
    "setUp",
    "tearDown",
    "setUpClass",
    "tearDownClass",
    "setUpModule",
    "tearDownModule",
    "_*", // Private by convention
];

const OVERRIDE_FILE_NAME: &str = ".dead-code-auditor.json";
const ROOT_MARKERS: &[&str] = &["pyproject.toml", "setup.py", "setup.cfg", ".git"];

/// Resolved configuration for a single audit run.
///
/// Built once per run, read-only thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path to the repository root
    pub repo_root: PathBuf,

    /// Source directories relative to the root, in priority order
    pub source_dirs: Vec<String>,

    /// Directory names / glob patterns excluded from every scan
    pub exclude_dirs: Vec<String>,

    /// Extra glob patterns excluded from analysis
    pub exclude_patterns: Vec<String>,

    /// Decorators passed through to the detectors as ignored
    pub ignored_decorators: Vec<String>,

    /// Bare-name patterns passed through to the detectors as ignored
    pub ignored_names: Vec<String>,

    /// All notebooks found under the root, sorted
    pub notebook_paths: Vec<PathBuf>,

    /// Detected test directories relative to the root
    pub test_dirs: Vec<String>,
}

/// Shape of the optional `.dead-code-auditor.json` override file.
///
/// Every key extends the built-in defaults except `source_dirs`, which
/// selects the directories outright.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectOverrides {
    source_dirs: Vec<String>,
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<String>,
    extra_ignored_decorators: Vec<String>,
    extra_ignored_names: Vec<String>,
}

impl Config {
    /// Resolve configuration starting from `start_dir`.
    ///
    /// Source directory priority: explicit argument, then the override
    /// file, then auto-detection.
    pub fn resolve(start_dir: &Path, explicit_source_dirs: &[String]) -> Result<Self, ConfigError> {
        let repo_root = find_repo_root(start_dir)?;
        debug!("Repo root: {}", repo_root.display());

        let overrides = load_overrides(&repo_root);

        let source_dirs = if !explicit_source_dirs.is_empty() {
            explicit_source_dirs.to_vec()
        } else if !overrides.source_dirs.is_empty() {
            overrides.source_dirs.clone()
        } else {
            detect_source_dirs(&repo_root)
        };

        if source_dirs.is_empty() {
            return Err(ConfigError::NoSourceDirs);
        }

        let test_dirs = detect_test_dirs(&repo_root);

        let mut exclude_dirs: Vec<String> =
            DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect();
        exclude_dirs.extend(overrides.exclude_dirs);
        // Detected test dirs are excluded from detector runs as well
        for t in &test_dirs {
            if !exclude_dirs.contains(t) {
                exclude_dirs.push(t.clone());
            }
        }
        exclude_dirs.sort();
        exclude_dirs.dedup();

        let mut ignored_decorators: Vec<String> = DEFAULT_IGNORED_DECORATORS
            .iter()
            .map(|s| s.to_string())
            .collect();
        ignored_decorators.extend(overrides.extra_ignored_decorators);

        let mut ignored_names: Vec<String> =
            DEFAULT_IGNORED_NAMES.iter().map(|s| s.to_string()).collect();
        ignored_names.extend(overrides.extra_ignored_names);

        let notebook_paths = find_notebooks(&repo_root, &exclude_dirs);

        Ok(Self {
            repo_root,
            source_dirs,
            exclude_dirs,
            exclude_patterns: overrides.exclude_patterns,
            ignored_decorators,
            ignored_names,
            notebook_paths,
            test_dirs,
        })
    }

    /// Absolute paths of the source directories that actually exist.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.source_dirs
            .iter()
            .map(|d| self.repo_root.join(d))
            .filter(|p| p.exists())
            .collect()
    }

    /// Check whether a path lies under a recognized test directory.
    pub fn is_test_path(&self, path: &Path) -> bool {
        for part in path.components() {
            let part = part.as_os_str().to_string_lossy();
            if self.test_dirs.iter().any(|t| t == part.as_ref()) {
                return true;
            }
            if is_test_dir_name(&part) {
                return true;
            }
        }
        false
    }

    /// Comma-joined exclude list in the form vulture's `--exclude` expects.
    pub fn vulture_exclude_arg(&self) -> String {
        self.exclude_dirs.join(",")
    }

    /// Comma-joined decorator list for vulture's `--ignore-decorators`.
    pub fn vulture_ignore_decorators_arg(&self) -> String {
        self.ignored_decorators.join(",")
    }

    /// Comma-joined name-pattern list for vulture's `--ignore-names`.
    pub fn vulture_ignore_names_arg(&self) -> String {
        self.ignored_names.join(",")
    }
}

/// Walk upward from `start` until a directory containing a project marker
/// is found.
pub fn find_repo_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        if ROOT_MARKERS.iter().any(|m| current.join(m).exists()) {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::RootNotFound);
        }
    }
}

/// Load the override file if present. Malformed JSON is treated the same
/// as no file at all.
fn load_overrides(repo_root: &Path) -> ProjectOverrides {
    let path = repo_root.join(OVERRIDE_FILE_NAME);
    if !path.exists() {
        return ProjectOverrides::default();
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return ProjectOverrides::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(overrides) => overrides,
        Err(e) => {
            warn!("Ignoring malformed {}: {}", OVERRIDE_FILE_NAME, e);
            ProjectOverrides::default()
        }
    }
}

/// Auto-detect Python source directories.
///
/// Looks for packages (directories with `__init__.py`) at the repo root,
/// and inside a conventional `src/` layout.
pub fn detect_source_dirs(repo_root: &Path) -> Vec<String> {
    let mut source_dirs = Vec::new();

    for entry in read_dirs(repo_root) {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if DEFAULT_EXCLUDE_DIRS.iter().any(|d| glob_match(d, &name)) {
            continue;
        }
        if is_test_dir_name(&name) {
            continue;
        }
        if entry.path().join("__init__.py").exists() {
            source_dirs.push(name);
        }
    }

    let src_dir = repo_root.join("src");
    if src_dir.is_dir() {
        for entry in read_dirs(&src_dir) {
            if entry.path().join("__init__.py").exists() {
                source_dirs.push(format!("src/{}", entry.file_name().to_string_lossy()));
            }
        }
    }

    source_dirs.sort();
    source_dirs
}

/// Auto-detect test directories at the repo root by name pattern.
pub fn detect_test_dirs(repo_root: &Path) -> Vec<String> {
    let mut test_dirs: Vec<String> = read_dirs(repo_root)
        .into_iter()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| is_test_dir_name(name))
        .collect();
    test_dirs.sort();
    test_dirs
}

/// Find all Jupyter notebooks under the root, skipping excluded and
/// hidden directories.
pub fn find_notebooks(repo_root: &Path, exclude_dirs: &[String]) -> Vec<PathBuf> {
    let mut notebooks: Vec<PathBuf> = WalkDir::new(repo_root)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !exclude_dirs.iter().any(|x| glob_match(x, &name))
        })
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path().extension().and_then(|x| x.to_str()) == Some("ipynb")
        })
        .map(|e| e.into_path())
        .collect();
    notebooks.sort();
    notebooks
}

/// Directory names that look like test trees: `tests`, `test`,
/// `tests_foo`, `foo_tests`.
fn is_test_dir_name(name: &str) -> bool {
    name == "tests"
        || name == "test"
        || name.starts_with("tests_")
        || name.starts_with("test_")
        || name.ends_with("_tests")
        || name.ends_with("_test")
}

/// Match a single path component against an exclusion pattern with
/// leading/trailing `*` wildcards, like `*.egg-info`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        return text.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return text.starts_with(prefix);
    }
    text == pattern
}

fn read_dirs(dir: &Path) -> Vec<std::fs::DirEntry> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .collect(),
        Err(e) => {
            warn!("Failed to read {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}
