// Adapter for skylos's structured JSON output.
//
// skylos emits one JSON document with findings grouped under
// unused-category keys (`unused_functions`, `unused_classes`, ...).

use super::exec::run_with_timeout;
use super::{Candidate, DetectorId, SymbolKind};
use crate::config::Config;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::warn;

const SKYLOS_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SkylosReport {
    unused_functions: Vec<SkylosItem>,
    unused_classes: Vec<SkylosItem>,
    unused_imports: Vec<SkylosItem>,
    unused_variables: Vec<SkylosItem>,
    unused_parameters: Vec<SkylosItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SkylosItem {
    name: String,
    simple_name: Option<String>,
    file: String,
    line: u32,
    #[serde(rename = "type")]
    kind: Option<String>,
    confidence: u8,
}

pub struct SkylosRunner<'a> {
    config: &'a Config,
    min_confidence: u8,
}

impl<'a> SkylosRunner<'a> {
    pub fn new(config: &'a Config, min_confidence: u8) -> Self {
        Self {
            config,
            min_confidence,
        }
    }

    /// Invoke skylos against the resolved source directories. Any failure
    /// (missing tool, timeout, malformed JSON) yields zero candidates.
    pub fn run(&self) -> Vec<Candidate> {
        let mut cmd = Command::new("uvx");
        cmd.arg("skylos")
            .args(&self.config.source_dirs)
            .arg("--confidence")
            .arg(self.min_confidence.to_string());
        // skylos has no glob support in folder exclusion
        for dir in &self.config.exclude_dirs {
            if !dir.contains('*') {
                cmd.arg("--exclude-folder").arg(dir);
            }
        }
        cmd.arg("--json").current_dir(&self.config.repo_root);

        let output = match run_with_timeout(cmd, SKYLOS_TIMEOUT) {
            Ok(Some(output)) => output,
            Ok(None) => {
                warn!("skylos timed out");
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to run skylos: {}", e);
                return Vec::new();
            }
        };

        if output.stdout.trim().is_empty() {
            return Vec::new();
        }

        parse_output(&output.stdout, self.min_confidence, &self.config.repo_root)
    }
}

/// Parse skylos JSON into candidates, re-filtering by per-item confidence
/// and re-rooting absolute paths relative to the repo root.
pub fn parse_output(stdout: &str, min_confidence: u8, repo_root: &Path) -> Vec<Candidate> {
    let report: SkylosReport = match serde_json::from_str(stdout) {
        Ok(report) => report,
        Err(e) => {
            warn!("Failed to parse skylos JSON output: {}", e);
            return Vec::new();
        }
    };

    let groups = [
        report.unused_functions,
        report.unused_classes,
        report.unused_imports,
        report.unused_variables,
        report.unused_parameters,
    ];

    let mut candidates = Vec::new();
    for item in groups.into_iter().flatten() {
        if item.confidence < min_confidence {
            continue;
        }

        let name = match item.simple_name {
            Some(ref simple) if !simple.is_empty() => simple.clone(),
            _ => item.name.clone(),
        };

        let file_path = Path::new(&item.file)
            .strip_prefix(repo_root)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| item.file.clone());

        let kind = item
            .kind
            .as_deref()
            .map(SymbolKind::parse)
            .unwrap_or(SymbolKind::Unknown);

        candidates.push(Candidate {
            source: DetectorId::Skylos,
            file_path,
            line: item.line,
            name,
            kind,
            confidence: item.confidence,
            message: format!(
                "unused {} (0 references)",
                item.kind.as_deref().unwrap_or("item")
            ),
        });
    }
    candidates
}
