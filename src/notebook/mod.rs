// Jupyter notebook code-cell extraction.
//
// Notebooks are JSON documents; only the `source` of code cells matters
// for reference searching. Searching extracted cells instead of the raw
// file keeps matches in notebook metadata and outputs from counting.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RawNotebook {
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Debug, Deserialize)]
struct RawCell {
    #[serde(default)]
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// Notebook `source` fields appear both as a single string and as a list
/// of line strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Lines(Vec<String>),
    Text(String),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl CellSource {
    fn join(self) -> String {
        match self {
            CellSource::Lines(lines) => lines.concat(),
            CellSource::Text(text) => text,
        }
    }
}

/// The code cells of one notebook, in document order.
#[derive(Debug, Clone)]
pub struct NotebookCode {
    pub path: PathBuf,
    pub cells: Vec<String>,
}

impl NotebookCode {
    /// Parse a notebook file. An unreadable or malformed notebook
    /// contributes no cells.
    pub fn load(path: &Path) -> Self {
        let cells = match std::fs::read_to_string(path) {
            Ok(contents) => parse_code_cells(&contents).unwrap_or_else(|e| {
                warn!("Skipping malformed notebook {}: {}", path.display(), e);
                Vec::new()
            }),
            Err(e) => {
                warn!("Failed to read notebook {}: {}", path.display(), e);
                Vec::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            cells,
        }
    }

    /// Cell indices whose code contains `needle` as a substring.
    pub fn cells_containing(&self, needle: &str) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, code)| code.contains(needle))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Extract code-cell sources from notebook JSON.
pub fn parse_code_cells(contents: &str) -> Result<Vec<String>, serde_json::Error> {
    let nb: RawNotebook = serde_json::from_str(contents)?;
    Ok(nb
        .cells
        .into_iter()
        .filter(|c| c.cell_type == "code")
        .map(|c| c.source.join())
        .collect())
}
