//! deadaudit - Dead code discovery and verification for Python projects
//!
//! A thin orchestration layer over external static-analysis tools and
//! textual reference search.
//!
//! # Architecture
//!
//! One audit run moves through four phases:
//! 1. **Config Resolution** - locate the repo root, detect source/test
//!    directories and notebooks, merge override-file settings
//! 2. **Candidate Discovery** - run `vulture` and `skylos`, normalize
//!    their output into one candidate shape, dedupe, drop whitelisted names
//! 3. **Reference Verification** - for each candidate, search source,
//!    string literals, re-exports, inheritance sites, and notebooks to
//!    decide whether any live reference exists
//! 4. **Reporting** - candidates JSON, markdown report, terminal summary

pub mod config;
pub mod discovery;
pub mod notebook;
pub mod report;
pub mod verify;
pub mod whitelist;

pub use config::{Config, ConfigError};
pub use discovery::{Candidate, DetectorId, Discovery, SymbolKind};
pub use notebook::NotebookCode;
pub use report::{Audited, CandidatesWriter, MarkdownReporter, Summary, TerminalReporter};
pub use verify::{RefKind, Reference, VerificationResult, Verifier};
pub use whitelist::Whitelist;
