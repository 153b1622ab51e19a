// Whitelist of names always treated as alive.
//
// Plain-text format: one name per line, blank lines and `#` lines are
// skipped, the first whitespace-delimited token is the name and the rest
// of the line is a human comment.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Names from common Python framework patterns that detectors routinely
/// flag as unused. Shipped with the tool.
const BUILTIN_WHITELIST: &str = include_str!("../../assets/whitelist_builtin.txt");

/// Read-only map from whitelisted name to the comment explaining why it
/// is exempt. Loaded once at startup, never mutated afterwards.
#[derive(Debug, Default, Clone)]
pub struct Whitelist {
    entries: HashMap<String, String>,
}

impl Whitelist {
    /// The built-in whitelist shipped with the tool.
    pub fn builtin() -> Self {
        let mut wl = Self::default();
        wl.extend_from_text(BUILTIN_WHITELIST);
        wl
    }

    /// Load additional entries from a project whitelist file. An unreadable
    /// file contributes nothing.
    pub fn extend_from_file(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let before = self.entries.len();
                self.extend_from_text(&text);
                debug!(
                    "Loaded {} whitelist entries from {}",
                    self.entries.len() - before,
                    path.display()
                );
            }
            Err(e) => warn!("Failed to read whitelist {}: {}", path.display(), e),
        }
    }

    /// Parse whitelist lines and merge them in.
    pub fn extend_from_text(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, char::is_whitespace);
            let name = match parts.next() {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };
            let comment = parts
                .next()
                .map(|c| c.trim().trim_start_matches('#').trim().to_string())
                .unwrap_or_default();
            self.entries.entry(name).or_insert(comment);
        }
    }

    /// Merge entry-point names discovered in `pyproject.toml`. Scripts and
    /// plugin entry points are invoked externally, so the functions they
    /// name never show up as in-tree references.
    pub fn extend_from_pyproject(&mut self, repo_root: &Path) {
        for (name, comment) in pyproject_entry_points(repo_root) {
            self.entries.entry(name).or_insert(comment);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract function names referenced by `[project.scripts]`,
/// `[project.gui-scripts]`, and `[project.entry-points.*]` tables.
/// Entries look like `mypackage.cli:main`; the part after `:` is the name.
fn pyproject_entry_points(repo_root: &Path) -> Vec<(String, String)> {
    let path = repo_root.join("pyproject.toml");
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let doc: toml::Value = match toml::from_str(&contents) {
        Ok(d) => d,
        Err(e) => {
            warn!("Failed to parse {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut results = Vec::new();
    let project = match doc.get("project") {
        Some(p) => p,
        None => return results,
    };

    for (table, label) in [("scripts", "CLI entry point"), ("gui-scripts", "GUI entry point")] {
        if let Some(scripts) = project.get(table).and_then(|v| v.as_table()) {
            for (script_name, entry) in scripts {
                if let Some(func) = entry_point_function(entry) {
                    results.push((func, format!("{}: {}", label, script_name)));
                }
            }
        }
    }

    if let Some(groups) = project.get("entry-points").and_then(|v| v.as_table()) {
        for (group, entries) in groups {
            if let Some(entries) = entries.as_table() {
                for (entry_name, entry) in entries {
                    if let Some(func) = entry_point_function(entry) {
                        results.push((func, format!("Entry point ({}): {}", group, entry_name)));
                    }
                }
            }
        }
    }

    results
}

fn entry_point_function(entry: &toml::Value) -> Option<String> {
    let entry = entry.as_str()?;
    let (_, func) = entry.rsplit_once(':')?;
    Some(func.to_string())
}
