use crate::config::Config;
use crate::discovery::Candidate;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Writes the discovered/filtered candidates as a JSON artifact with a
/// metadata block, for downstream tooling (or a later verification pass).
pub struct CandidatesWriter<'a> {
    config: &'a Config,
    vulture_confidence: u8,
    skylos_confidence: u8,
    timestamp: String,
}

#[derive(Serialize)]
struct CandidatesFile<'a> {
    metadata: Metadata<'a>,
    candidates: &'a [Candidate],
}

#[derive(Serialize)]
struct Metadata<'a> {
    repo_root: String,
    source_dirs: &'a [String],
    test_dirs: &'a [String],
    notebook_count: usize,
    total_candidates: usize,
    whitelist_count: usize,
    vulture_confidence: u8,
    skylos_confidence: u8,
    timestamp: &'a str,
}

impl<'a> CandidatesWriter<'a> {
    pub fn new(
        config: &'a Config,
        vulture_confidence: u8,
        skylos_confidence: u8,
        timestamp: String,
    ) -> Self {
        Self {
            config,
            vulture_confidence,
            skylos_confidence,
            timestamp,
        }
    }

    /// Write `dead_code_candidates_<timestamp>.json` into `output_dir`.
    pub fn write(
        &self,
        output_dir: &Path,
        candidates: &[Candidate],
        whitelist_count: usize,
    ) -> Result<PathBuf> {
        let file = CandidatesFile {
            metadata: Metadata {
                repo_root: self.config.repo_root.display().to_string(),
                source_dirs: &self.config.source_dirs,
                test_dirs: &self.config.test_dirs,
                notebook_count: self.config.notebook_paths.len(),
                total_candidates: candidates.len(),
                whitelist_count,
                vulture_confidence: self.vulture_confidence,
                skylos_confidence: self.skylos_confidence,
                timestamp: &self.timestamp,
            },
            candidates,
        };

        let json = serde_json::to_string_pretty(&file).into_diagnostic()?;
        let path = output_dir.join(format!("dead_code_candidates_{}.json", self.timestamp));
        std::fs::write(&path, json)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
