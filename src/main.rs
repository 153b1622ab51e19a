use chrono::Local;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::PathBuf;
use tracing::info;

mod config;
mod discovery;
mod notebook;
mod report;
mod verify;
mod whitelist;

use config::Config;
use discovery::Discovery;
use report::{Audited, CandidatesWriter, MarkdownReporter, Summary, TerminalReporter};
use verify::Verifier;
use whitelist::Whitelist;

/// deadaudit - Dead code discovery and verification for Python projects
#[derive(Parser, Debug)]
#[command(name = "deadaudit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path inside the project to audit (the repo root is located by
    /// walking upward from here)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Source directories to analyze, relative to the repo root
    /// (default: auto-detect)
    #[arg(short, long, num_args = 1..)]
    source_dirs: Vec<String>,

    /// Directory to write the candidates JSON and report into
    /// (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Minimum vulture confidence threshold
    #[arg(long, default_value_t = 60)]
    vulture_confidence: u8,

    /// Minimum skylos confidence threshold
    #[arg(long, default_value_t = 60)]
    skylos_confidence: u8,

    /// Skip running skylos (use only vulture)
    #[arg(long)]
    skip_skylos: bool,

    /// Limit the number of candidates verified (0 = no limit)
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Project whitelist file appended to the built-in whitelist
    #[arg(short, long)]
    whitelist: Option<PathBuf>,

    /// Only write the candidates JSON, skip verification and the report
    #[arg(long)]
    no_report: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("deadaudit v{}", env!("CARGO_PKG_VERSION"));

    // Phase 1: configuration. The only fatal failures live here.
    let start = std::fs::canonicalize(&cli.path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Cannot access {}", cli.path.display()))?;
    let config = Config::resolve(&start, &cli.source_dirs)?;

    if !cli.quiet {
        println!("{}", "Dead Code Audit".bold());
        println!("  repo root:   {}", config.repo_root.display());
        println!("  source dirs: {}", config.source_dirs.join(", "));
        println!("  test dirs:   {}", config.test_dirs.join(", "));
        println!("  notebooks:   {}", config.notebook_paths.len());
    }

    // Whitelist: built-in + pyproject entry points + project file
    let mut whitelist = Whitelist::builtin();
    whitelist.extend_from_pyproject(&config.repo_root);
    if let Some(ref path) = cli.whitelist {
        whitelist.extend_from_file(path);
    }
    info!("Whitelist: {} entries", whitelist.len());

    // Phase 2: discovery. Detector failures degrade to empty results.
    if !cli.quiet {
        println!();
        println!(
            "Running vulture (confidence >= {})...",
            cli.vulture_confidence
        );
        if !cli.skip_skylos {
            println!(
                "Running skylos (confidence >= {})...",
                cli.skylos_confidence
            );
        }
    }

    let mut result = Discovery::new(&config)
        .with_vulture_confidence(cli.vulture_confidence)
        .with_skylos_confidence(cli.skylos_confidence)
        .with_skip_skylos(cli.skip_skylos)
        .run(&whitelist);

    if cli.limit > 0 && result.candidates.len() > cli.limit {
        info!("Limiting to first {} candidates", cli.limit);
        result.candidates.truncate(cli.limit);
    }

    if !cli.quiet {
        println!(
            "Found {} candidates ({} whitelisted)",
            result.candidates.len(),
            result.whitelisted
        );
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let output_dir = cli.output_dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Cannot create {}", output_dir.display()))?;

    let writer = CandidatesWriter::new(
        &config,
        cli.vulture_confidence,
        cli.skylos_confidence,
        timestamp.clone(),
    );
    let candidates_path = writer.write(&output_dir, &result.candidates, result.whitelisted)?;
    if !cli.quiet {
        println!("Candidates file: {}", candidates_path.display());
    }

    if cli.no_report {
        return Ok(());
    }

    // Phase 3: verification, one candidate at a time.
    let verifier = Verifier::new(&config);
    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(result.candidates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} verifying")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    };

    let audits: Vec<Audited> = result
        .candidates
        .iter()
        .map(|candidate| {
            let verification = verifier.verify(&candidate.name, &candidate.file_path);
            progress.inc(1);
            Audited {
                candidate: candidate.clone(),
                verification,
            }
        })
        .collect();
    progress.finish_and_clear();

    // Phase 4: reporting.
    let summary = Summary::from_audits(&audits, result.whitelisted);

    if !cli.quiet {
        TerminalReporter::new().report(&audits, summary);
    }

    let reporter = MarkdownReporter::new(timestamp);
    let report_path = reporter.write(&output_dir, &audits, summary)?;
    if !cli.quiet {
        println!("Report: {}", report_path.display());
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
