// Reference verification - the evidence-gathering core of the audit.
//
// Given a symbol name and its defining file, decide whether any live
// reference exists anywhere else in the project. The search is textual
// (plain substring and small regexes), not scope- or AST-aware: a match
// inside a larger identifier counts. That limitation is intentional; the
// verdict errs toward calling code alive, because a false "dead" verdict
// means deleting used code.

use crate::config::{glob_match, Config};
use crate::notebook::NotebookCode;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How a live reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Plain occurrence of the name in source
    Direct,
    /// The name inside a quoted string (dynamic dispatch)
    StringLiteral,
    /// A direct import in a package `__init__.py`
    ReExport,
    /// The quoted name in an `__init__.py` that defines `__all__`
    ExportList,
    /// The name inside a parenthesized subclass list
    Inheritance,
}

impl RefKind {
    pub fn tag(&self) -> &'static str {
        match self {
            RefKind::Direct => "direct",
            RefKind::StringLiteral => "string ref",
            RefKind::ReExport => "re-export",
            RefKind::ExportList => "__all__",
            RefKind::Inheritance => "inheritance",
        }
    }
}

/// A single piece of evidence that a symbol is alive.
#[derive(Debug, Clone)]
pub struct Reference {
    pub kind: RefKind,
    /// `file:line: text` location description
    pub location: String,
}

/// Verdict for one candidate.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub name: String,
    pub file_path: String,
    /// No live references found in source
    pub is_dead: bool,
    /// Dead in source but referenced from at least one notebook
    pub notebook_only: bool,
    pub references: Vec<Reference>,
    pub notebook_references: Vec<String>,
    /// Audit trail of the searches performed
    pub steps: Vec<String>,
}

struct SourceEntry {
    rel_path: PathBuf,
    is_test: bool,
    lines: Vec<String>,
}

struct InitEntry {
    rel_path: PathBuf,
    contents: String,
}

/// Verifies candidates against a snapshot of the project's source.
///
/// Source files, package `__init__.py` files, and notebook code cells are
/// loaded once; each `verify` call is then a pure function of
/// (name, defining file). Verification of one candidate never depends on
/// another's outcome.
pub struct Verifier<'a> {
    config: &'a Config,
    sources: Vec<SourceEntry>,
    inits: Vec<InitEntry>,
    notebooks: Vec<NotebookCode>,
}

impl<'a> Verifier<'a> {
    pub fn new(config: &'a Config) -> Self {
        let sources = load_sources(config);
        let inits = sources
            .iter()
            .filter(|s| s.rel_path.file_name().and_then(|n| n.to_str()) == Some("__init__.py"))
            .map(|s| InitEntry {
                rel_path: s.rel_path.clone(),
                contents: s.lines.join("\n"),
            })
            .collect();
        let notebooks = config
            .notebook_paths
            .iter()
            .map(|p| NotebookCode::load(p))
            .collect();

        debug!("Verifier snapshot: {} source files", sources.len());

        Self {
            config,
            sources,
            inits,
            notebooks,
        }
    }

    /// Verify whether `name`, defined in `file_path`, is truly dead.
    pub fn verify(&self, name: &str, file_path: &str) -> VerificationResult {
        let mut references = Vec::new();
        let mut notebook_references = Vec::new();
        let mut steps = Vec::new();

        let def_path = Path::new(file_path);
        let escaped = regex::escape(name);
        let definition_res = definition_patterns(&escaped);

        // 1. Plain occurrences in source
        steps.push(format!(
            "search '{}' in {}",
            name,
            self.config.source_dirs.join(" ")
        ));
        for entry in &self.sources {
            for (idx, line) in entry.lines.iter().enumerate() {
                if !line.contains(name) {
                    continue;
                }
                if entry.rel_path == def_path && definition_res.iter().any(|re| re.is_match(line)) {
                    continue;
                }
                if entry.is_test {
                    continue;
                }
                if line.trim_start().starts_with('#') {
                    continue;
                }
                references.push(Reference {
                    kind: RefKind::Direct,
                    location: format!("{}:{}: {}", entry.rel_path.display(), idx + 1, line.trim()),
                });
            }
        }

        // 2. Notebook code cells, recorded separately
        steps.push(format!("search '{}' in notebook code cells", name));
        for nb in &self.notebooks {
            let rel = nb
                .path
                .strip_prefix(&self.config.repo_root)
                .unwrap_or(&nb.path);
            for cell in nb.cells_containing(name) {
                notebook_references.push(format!("{}:cell {}", rel.display(), cell + 1));
            }
        }

        // 3. Quoted string literal (dynamic dispatch)
        steps.push(format!("search '\"{}\"' as string literal in source", name));
        if let Some(string_re) = compile(&format!(r#""{0}"|'{0}'"#, escaped)) {
            for entry in &self.sources {
                if entry.is_test {
                    continue;
                }
                for (idx, line) in entry.lines.iter().enumerate() {
                    if string_re.is_match(line) {
                        references.push(Reference {
                            kind: RefKind::StringLiteral,
                            location: format!(
                                "{}:{}: {}",
                                entry.rel_path.display(),
                                idx + 1,
                                line.trim()
                            ),
                        });
                    }
                }
            }
        }

        // 4. Package __init__.py re-exports
        steps.push("check __init__.py files for re-exports".to_string());
        let import_re = compile(&format!(r"\bimport\s+{}\b", escaped));
        let quoted_re = compile(&format!(r#"["']{}["']"#, escaped));
        for init in &self.inits {
            if let Some(ref re) = import_re {
                if re.is_match(&init.contents) {
                    references.push(Reference {
                        kind: RefKind::ReExport,
                        location: format!("{}:import {}", init.rel_path.display(), name),
                    });
                }
            }
            if let Some(ref re) = quoted_re {
                if re.is_match(&init.contents) && init.contents.contains("__all__") {
                    references.push(Reference {
                        kind: RefKind::ExportList,
                        location: init.rel_path.display().to_string(),
                    });
                }
            }
        }

        // 5. Subclass lists, for type-like names only
        if name.chars().next().is_some_and(|c| c.is_uppercase()) {
            steps.push(format!("check for class inheritance ({})", name));
            if let Some(inherit_re) =
                compile(&format!(r"\({0}\)|\({0},|,\s*{0}\)", escaped))
            {
                for entry in &self.sources {
                    if entry.is_test {
                        continue;
                    }
                    for (idx, line) in entry.lines.iter().enumerate() {
                        if inherit_re.is_match(line) {
                            references.push(Reference {
                                kind: RefKind::Inheritance,
                                location: format!(
                                    "{}:{}: {}",
                                    entry.rel_path.display(),
                                    idx + 1,
                                    line.trim()
                                ),
                            });
                        }
                    }
                }
            }
        }

        let is_dead = references.is_empty();
        let notebook_only = is_dead && !notebook_references.is_empty();

        VerificationResult {
            name: name.to_string(),
            file_path: file_path.to_string(),
            is_dead,
            notebook_only,
            references,
            notebook_references,
            steps,
        }
    }
}

/// Recognizers for the line that defines the symbol itself: function and
/// class declarations, bare assignment, and type-annotated declaration.
fn definition_patterns(escaped_name: &str) -> Vec<Regex> {
    [
        format!(r"^\s*def\s+{}\s*\(", escaped_name),
        format!(r"^\s*async\s+def\s+{}\s*\(", escaped_name),
        format!(r"^\s*class\s+{}\s*[:\(]", escaped_name),
        format!(r"^\s*{}\s*=", escaped_name),
        format!(r"^\s*{}\s*:", escaped_name),
    ]
    .iter()
    .filter_map(|p| compile(p))
    .collect()
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping unusable search pattern {:?}: {}", pattern, e);
            None
        }
    }
}

/// Load every `.py` file under the source directories, skipping excluded
/// and hidden directories. Unreadable files contribute nothing.
fn load_sources(config: &Config) -> Vec<SourceEntry> {
    let mut sources = Vec::new();

    for dir in config.source_paths() {
        let walker = WalkDir::new(&dir).into_iter().filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.')
                && !config.exclude_dirs.iter().any(|x| glob_match(x, &name))
        });

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|x| x.to_str()) != Some("py")
            {
                continue;
            }

            let contents = match std::fs::read_to_string(entry.path()) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Skipping unreadable {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let rel_path = entry
                .path()
                .strip_prefix(&config.repo_root)
                .unwrap_or(entry.path())
                .to_path_buf();
            let is_test = config.is_test_path(&rel_path);

            sources.push(SourceEntry {
                rel_path,
                is_test,
                lines: contents.lines().map(|l| l.to_string()).collect(),
            });
        }
    }

    sources.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    sources
}
