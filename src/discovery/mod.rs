mod exec;
pub mod skylos;
pub mod vulture;

pub use exec::run_with_timeout;
pub use skylos::SkylosRunner;
pub use vulture::VultureRunner;

use crate::config::Config;
use crate::whitelist::Whitelist;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Which external detector produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorId {
    Vulture,
    Skylos,
}

impl DetectorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorId::Vulture => "vulture",
            DetectorId::Skylos => "skylos",
        }
    }
}

/// Kind of symbol a detector flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Variable,
    Attribute,
    Property,
    Import,
    Parameter,
    Unknown,
}

impl SymbolKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "function" => SymbolKind::Function,
            "method" => SymbolKind::Method,
            "class" => SymbolKind::Class,
            "variable" => SymbolKind::Variable,
            "attribute" => SymbolKind::Attribute,
            "property" => SymbolKind::Property,
            "import" => SymbolKind::Import,
            "parameter" => SymbolKind::Parameter,
            _ => SymbolKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Class => "class",
            SymbolKind::Variable => "variable",
            SymbolKind::Attribute => "attribute",
            SymbolKind::Property => "property",
            SymbolKind::Import => "import",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Unknown => "unknown",
        }
    }
}

/// A symbol flagged by an external detector as potentially unused.
///
/// Identity for deduplication is `(file_path, name)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub source: DetectorId,
    pub file_path: String,
    pub line: u32,
    pub name: String,
    pub kind: SymbolKind,
    /// Detector-reported confidence, 0-100
    pub confidence: u8,
    pub message: String,
}

/// Outcome of the discovery phase.
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    /// Deduplicated, whitelist-filtered candidates
    pub candidates: Vec<Candidate>,
    /// Candidates dropped by exact whitelist match
    pub whitelisted: usize,
}

/// Runs the external detectors and normalizes their output.
pub struct Discovery<'a> {
    config: &'a Config,
    vulture_confidence: u8,
    skylos_confidence: u8,
    skip_skylos: bool,
}

impl<'a> Discovery<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            vulture_confidence: 60,
            skylos_confidence: 60,
            skip_skylos: false,
        }
    }

    pub fn with_vulture_confidence(mut self, confidence: u8) -> Self {
        self.vulture_confidence = confidence;
        self
    }

    pub fn with_skylos_confidence(mut self, confidence: u8) -> Self {
        self.skylos_confidence = confidence;
        self
    }

    pub fn with_skip_skylos(mut self, skip: bool) -> Self {
        self.skip_skylos = skip;
        self
    }

    /// Run both detectors, concatenate vulture-then-skylos, dedupe, and
    /// drop whitelisted names. A detector timeout or crash contributes an
    /// empty result rather than aborting the run.
    pub fn run(&self, whitelist: &Whitelist) -> DiscoveryResult {
        let mut all = VultureRunner::new(self.config, self.vulture_confidence).run();
        info!("vulture: {} candidates", all.len());

        if !self.skip_skylos {
            let skylos = SkylosRunner::new(self.config, self.skylos_confidence).run();
            info!("skylos: {} candidates", skylos.len());
            all.extend(skylos);
        }

        let deduped = dedupe(all);
        filter_whitelisted(deduped, whitelist)
    }
}

/// Keep the first occurrence of each `(file_path, name)` key.
pub fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert((c.file_path.clone(), c.name.clone())))
        .collect()
}

/// Remove candidates whose name exactly matches a whitelist entry,
/// counting them separately for the report.
pub fn filter_whitelisted(candidates: Vec<Candidate>, whitelist: &Whitelist) -> DiscoveryResult {
    let mut result = DiscoveryResult::default();
    for candidate in candidates {
        if whitelist.contains(&candidate.name) {
            result.whitelisted += 1;
        } else {
            result.candidates.push(candidate);
        }
    }
    result
}
