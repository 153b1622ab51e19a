mod json;
mod markdown;
mod terminal;

pub use json::CandidatesWriter;
pub use markdown::MarkdownReporter;
pub use terminal::TerminalReporter;

use crate::discovery::Candidate;
use crate::verify::VerificationResult;

/// A candidate together with its verification verdict.
#[derive(Debug, Clone)]
pub struct Audited {
    pub candidate: Candidate,
    pub verification: VerificationResult,
}

/// Summary counts for a completed run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summary {
    pub checked: usize,
    pub dead: usize,
    pub notebook_only: usize,
    pub alive: usize,
    pub whitelisted: usize,
}

impl Summary {
    pub fn from_audits(audits: &[Audited], whitelisted: usize) -> Self {
        let mut summary = Summary {
            checked: audits.len(),
            whitelisted,
            ..Default::default()
        };
        for audit in audits {
            if audit.verification.notebook_only {
                summary.notebook_only += 1;
            } else if audit.verification.is_dead {
                summary.dead += 1;
            } else {
                summary.alive += 1;
            }
        }
        summary
    }
}
