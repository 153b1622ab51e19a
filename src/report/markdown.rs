use super::{Audited, Summary};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};

/// Renders the audit outcome as a markdown document: summary counts, a
/// table of verified-dead items, a table of notebook-only items, and a
/// fixed methodology section. Pure transformation, no decision logic.
pub struct MarkdownReporter {
    timestamp: String,
}

impl MarkdownReporter {
    pub fn new(timestamp: String) -> Self {
        Self { timestamp }
    }

    /// Write `dead_code_report_<timestamp>.md` into `output_dir`.
    pub fn write(&self, output_dir: &Path, audits: &[Audited], summary: Summary) -> Result<PathBuf> {
        let path = output_dir.join(format!("dead_code_report_{}.md", self.timestamp));
        std::fs::write(&path, self.render(audits, summary))
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn render(&self, audits: &[Audited], summary: Summary) -> String {
        let mut out = String::new();

        out.push_str("# Dead Code Audit Report\n\n");
        out.push_str(&format!("Generated: {}\n\n", self.timestamp));

        out.push_str("## Summary\n\n");
        out.push_str("| Candidates checked | Verified dead | Notebook-only | Still alive | Whitelisted (skipped) |\n");
        out.push_str("|---|---|---|---|---|\n");
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n\n",
            summary.checked, summary.dead, summary.notebook_only, summary.alive, summary.whitelisted
        ));

        out.push_str("## Verified Dead\n\n");
        let dead: Vec<&Audited> = audits
            .iter()
            .filter(|a| a.verification.is_dead && !a.verification.notebook_only)
            .collect();
        self.push_table(&mut out, &dead);

        out.push_str("## Notebook-Only\n\n");
        out.push_str("Dead by source-code criteria but referenced in notebooks; review before deleting.\n\n");
        let notebook_only: Vec<&Audited> = audits
            .iter()
            .filter(|a| a.verification.notebook_only)
            .collect();
        self.push_table(&mut out, &notebook_only);

        out.push_str(METHODOLOGY);
        out
    }

    fn push_table(&self, out: &mut String, rows: &[&Audited]) {
        if rows.is_empty() {
            out.push_str("None.\n\n");
            return;
        }

        out.push_str("| Name | Kind | File | Line | Detector | Confidence |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for audit in rows {
            let c = &audit.candidate;
            out.push_str(&format!(
                "| `{}` | {} | `{}` | {} | {} | {}% |\n",
                c.name,
                c.kind.as_str(),
                c.file_path,
                c.line,
                c.source.as_str(),
                c.confidence
            ));
        }
        out.push('\n');
    }
}

const METHODOLOGY: &str = "\
## Methodology

Each candidate reported by the detectors was verified with four textual
reference searches over the non-test source tree:

1. **Direct references** - any plain occurrence of the name outside its own
   definition line, test directories, and comments.
2. **String literal references** - the name inside single or double quotes,
   to catch dynamic/string-based dispatch.
3. **Re-exports** - direct imports of the name in package `__init__.py`
   files, or the quoted name in an `__init__.py` defining `__all__`.
4. **Inheritance** - for capitalized names, the name inside a parenthesized
   subclass list.

Notebook code cells were searched separately; notebook hits never block a
dead verdict on their own but demote it to notebook-only. The searches are
lexical, so a match inside a larger identifier counts as a live reference;
the audit deliberately errs toward keeping code.
";
