use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process;

use specguard_core::{resolver, rules, Document, Report, Resolution, Rule, Verdict};

/// Exit status contract: 0 = contract holds, 1 = violations found,
/// 2 = the input itself could not be loaded.
const EXIT_PASS: i32 = 0;
const EXIT_FAIL: i32 = 1;
const EXIT_ERROR: i32 = 2;

/// specguard — contract gate for OpenAPI specification documents
///
/// Verify that a specification document declares the endpoints,
/// schemas, and cross-references an API contract requires.
#[derive(Parser)]
#[command(name = "specguard", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a specification document against a rule catalog
    Verify {
        /// Path to the specification document (JSON)
        spec: PathBuf,
        /// Path to the rule catalog (JSON array of rules)
        #[arg(long)]
        rules: PathBuf,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
        /// Suppress human-readable output (exit status only)
        #[arg(long)]
        quiet: bool,
    },

    /// List every reference in a document with its resolution status
    Refs {
        /// Path to the specification document (JSON)
        spec: PathBuf,
        /// Output the reference list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the SHA-256 fingerprint of a document's canonical form
    Fingerprint {
        /// Path to the specification document (JSON)
        spec: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Verify {
            spec,
            rules,
            json,
            quiet,
        } => cmd_verify(&spec, &rules, json, quiet),
        Commands::Refs { spec, json } => cmd_refs(&spec, json),
        Commands::Fingerprint { spec } => cmd_fingerprint(&spec),
    };

    process::exit(exit_code);
}

// ── Commands ──────────────────────────────────────────────

fn cmd_verify(spec_path: &Path, rules_path: &Path, json: bool, quiet: bool) -> i32 {
    let document = match load_document(spec_path) {
        Ok(document) => document,
        Err(message) => return fail_loudly(&message),
    };
    let catalog = match load_catalog(rules_path) {
        Ok(catalog) => catalog,
        Err(message) => return fail_loudly(&message),
    };

    let report = specguard_core::verify(&document, &catalog);

    if json {
        println!("{}", render_report_json(&report, &document));
    } else if !quiet {
        render_report_human(&report);
    }

    match report.verdict() {
        Verdict::Pass => EXIT_PASS,
        Verdict::Fail => EXIT_FAIL,
    }
}

fn cmd_refs(spec_path: &Path, json: bool) -> i32 {
    let document = match load_document(spec_path) {
        Ok(document) => document,
        Err(message) => return fail_loudly(&message),
    };

    let references = resolver::resolve_all(&document);
    let mut unhealthy = 0;

    if json {
        let entries: Vec<serde_json::Value> = references
            .iter()
            .map(|reference| {
                json!({
                    "source": reference.source_path.pointer(),
                    "target": reference.target_pointer,
                    "status": status_name(&reference.resolution),
                })
            })
            .collect();
        println!(
            "{}",
            json!({ "references": entries, "total": references.len() })
        );
    }

    for reference in references.iter() {
        let status = status_name(&reference.resolution);
        if !reference.is_resolved() {
            unhealthy += 1;
        }
        if !json {
            let label = match reference.resolution {
                Resolution::Resolved(_) => status.green(),
                _ => status.red().bold(),
            };
            println!(
                "{:>8}  {} -> {}",
                label,
                reference.source_path.pointer(),
                reference.target_pointer
            );
        }
    }

    if unhealthy > 0 {
        EXIT_FAIL
    } else {
        EXIT_PASS
    }
}

fn cmd_fingerprint(spec_path: &Path) -> i32 {
    match load_document(spec_path) {
        Ok(document) => {
            println!("{}", document.fingerprint());
            EXIT_PASS
        }
        Err(message) => fail_loudly(&message),
    }
}

// ── Input loading ─────────────────────────────────────────

fn load_document(path: &Path) -> Result<Document, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    Document::load(&raw).map_err(|e| e.to_string())
}

fn load_catalog(path: &Path) -> Result<Vec<Rule>, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    rules::parse_catalog(&raw).map_err(|e| e.to_string())
}

fn fail_loudly(message: &str) -> i32 {
    eprintln!("{} {}", "error:".red().bold(), message);
    EXIT_ERROR
}

// ── Report rendering ──────────────────────────────────────

fn render_report_human(report: &Report) {
    for violation in report.violations() {
        println!("{} {}", "violation:".red().bold(), violation);
    }
    match report.verdict() {
        Verdict::Pass => println!(
            "{} {} rules evaluated, contract holds",
            "pass:".green().bold(),
            report.rules_evaluated()
        ),
        Verdict::Fail => println!(
            "{} {} rules evaluated, {} violations",
            "fail:".red().bold(),
            report.rules_evaluated(),
            report.violations().len()
        ),
    }
}

fn render_report_json(report: &Report, document: &Document) -> String {
    json!({
        "verdict": report.verdict(),
        "fingerprint": document.fingerprint(),
        "rules_evaluated": report.rules_evaluated(),
        "violations": report.violations(),
    })
    .to_string()
}

fn status_name(resolution: &Resolution) -> &'static str {
    match resolution {
        Resolution::Resolved(_) => "resolved",
        Resolution::Dangling => "dangling",
        Resolution::Cyclic { .. } => "cyclic",
    }
}
