use super::{Audited, Summary};
use colored::Colorize;

/// Colored per-verdict terminal output.
pub struct TerminalReporter {
    /// Cap on reference lines shown per alive candidate
    max_references: usize,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { max_references: 3 }
    }

    pub fn report(&self, audits: &[Audited], summary: Summary) {
        if audits.is_empty() {
            println!("{}", "No candidates to verify.".green().bold());
            self.print_summary(summary);
            return;
        }

        println!();
        for audit in audits {
            let v = &audit.verification;
            let c = &audit.candidate;
            let location = format!("{}:{}", c.file_path, c.line);

            if v.notebook_only {
                println!(
                    "  {} {} {} ({} notebook refs)",
                    "◐".yellow(),
                    "NOTEBOOK-ONLY".yellow().bold(),
                    format!("{} [{}]", c.name, location).normal(),
                    v.notebook_references.len()
                );
            } else if v.is_dead {
                println!(
                    "  {} {} {}",
                    "●".red(),
                    "DEAD".red().bold(),
                    format!("{} [{}]", c.name, location).normal()
                );
            } else {
                println!(
                    "  {} {} {} ({} refs)",
                    "○".green(),
                    "ALIVE".green().bold(),
                    format!("{} [{}]", c.name, location).dimmed(),
                    v.references.len()
                );
                for reference in v.references.iter().take(self.max_references) {
                    println!(
                        "      {} {}",
                        format!("[{}]", reference.kind.tag()).dimmed(),
                        reference.location.dimmed()
                    );
                }
                if v.references.len() > self.max_references {
                    println!(
                        "      {}",
                        format!("... and {} more", v.references.len() - self.max_references)
                            .dimmed()
                    );
                }
            }
        }

        self.print_summary(summary);
    }

    fn print_summary(&self, summary: Summary) {
        println!();
        println!("{}", "Audit summary:".bold());
        println!("  checked:       {}", summary.checked);
        println!("  verified dead: {}", summary.dead.to_string().red());
        println!(
            "  notebook-only: {}",
            summary.notebook_only.to_string().yellow()
        );
        println!("  still alive:   {}", summary.alive.to_string().green());
        println!("  whitelisted:   {}", summary.whitelisted);
        println!();
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
