// Adapter for vulture's line-oriented output.
//
// vulture prints one finding per line:
//
// ```text
// pkg/a.py:12: unused function 'helper' (90% confidence)
// pkg/b.py:3: unused import 'os' (90% confidence, 1 line)
// ```

use super::exec::run_with_timeout;
use super::{Candidate, DetectorId, SymbolKind};
use crate::config::Config;
use regex::Regex;
use std::process::Command;
use std::time::Duration;
use tracing::warn;

const VULTURE_TIMEOUT: Duration = Duration::from_secs(120);

pub struct VultureRunner<'a> {
    config: &'a Config,
    min_confidence: u8,
}

impl<'a> VultureRunner<'a> {
    pub fn new(config: &'a Config, min_confidence: u8) -> Self {
        Self {
            config,
            min_confidence,
        }
    }

    /// Invoke vulture against the resolved source directories. Any failure
    /// (missing tool, timeout) yields zero candidates.
    pub fn run(&self) -> Vec<Candidate> {
        let mut cmd = Command::new("uvx");
        cmd.arg("vulture")
            .args(&self.config.source_dirs)
            .arg("--min-confidence")
            .arg(self.min_confidence.to_string())
            .arg("--exclude")
            .arg(self.config.vulture_exclude_arg())
            .arg("--ignore-decorators")
            .arg(self.config.vulture_ignore_decorators_arg())
            .arg("--ignore-names")
            .arg(self.config.vulture_ignore_names_arg())
            .arg("--sort-by-size")
            .current_dir(&self.config.repo_root);

        let output = match run_with_timeout(cmd, VULTURE_TIMEOUT) {
            Ok(Some(output)) => output,
            Ok(None) => {
                warn!("vulture timed out");
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to run vulture: {}", e);
                return Vec::new();
            }
        };

        // vulture exits non-zero when it finds anything; only the parseable
        // stdout lines matter.
        parse_output(&output.stdout)
    }
}

/// Parse vulture's output lines into candidates. Unparseable lines (e.g.
/// syntax-error notices for individual files) are silently skipped.
pub fn parse_output(stdout: &str) -> Vec<Candidate> {
    // file:line: message (NN% confidence[, NN lines])
    let line_re = Regex::new(r"^(.+):(\d+): (.+) \((\d+)% confidence(?:, \d+ lines?)?\)$")
        .expect("static regex");
    let name_re = Regex::new(r"unused (\w+) '([^']+)'").expect("static regex");

    let mut candidates = Vec::new();
    for line in stdout.lines() {
        let caps = match line_re.captures(line) {
            Some(caps) => caps,
            None => continue,
        };

        let file_path = caps[1].to_string();
        let line_num: u32 = caps[2].parse().unwrap_or(0);
        let message = caps[3].to_string();
        let confidence: u8 = caps[4].parse().unwrap_or(0);

        let (kind, name) = match name_re.captures(&message) {
            Some(name_caps) => (SymbolKind::parse(&name_caps[1]), name_caps[2].to_string()),
            None => (SymbolKind::Unknown, message.clone()),
        };

        candidates.push(Candidate {
            source: DetectorId::Vulture,
            file_path,
            line: line_num,
            name,
            kind,
            confidence,
            message,
        });
    }
    candidates
}
