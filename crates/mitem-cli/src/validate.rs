//! # Validate Subcommand
//!
//! Validates one or more mitem documents and prints a report per document.
//!
//! ```text
//! OK: fixtures/mitems/valid/article.json
//! FAIL: fixtures/mitems/invalid/unsupported-video.json
//!   /body/0/videoType: Mandatory field videoType has invalid content (dailymotion) in element of type: video
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use mitem_schema::{MitemService, Violation};

/// Arguments for the `mitem validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Documents to validate. `-` reads standard input.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Print the reports as a JSON array.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DocumentReport<'a> {
    document: String,
    valid: bool,
    violations: Vec<ViolationEntry<'a>>,
}

#[derive(Serialize)]
struct ViolationEntry<'a> {
    #[serde(flatten)]
    violation: &'a Violation,
    message: String,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every document is valid, 1 when any has
/// violations. Unreadable documents are an `Err`.
pub fn run_validate(args: &ValidateArgs, service: &MitemService, out: &mut impl Write) -> Result<u8> {
    let mut results = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let raw = crate::read_document(path)?;
        let violations = service.validate(&raw);
        tracing::info!(
            document = %path.display(),
            violations = violations.len(),
            "validated document"
        );
        results.push((path, violations));
    }

    let failed = results.iter().filter(|(_, v)| !v.is_empty()).count();

    if args.json {
        let reports: Vec<DocumentReport<'_>> = results
            .iter()
            .map(|(path, violations)| DocumentReport {
                document: path.display().to_string(),
                valid: violations.is_empty(),
                violations: violations
                    .violations()
                    .iter()
                    .map(|violation| ViolationEntry {
                        violation,
                        message: violation.message(),
                    })
                    .collect(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &reports)?;
        writeln!(out)?;
    } else {
        for (path, violations) in &results {
            if violations.is_empty() {
                writeln!(out, "OK: {}", path.display())?;
            } else {
                writeln!(out, "FAIL: {}", path.display())?;
                writeln!(out, "{violations}")?;
            }
        }
        if results.len() > 1 {
            writeln!(out, "\n{}/{} documents valid", results.len() - failed, results.len())?;
        }
    }

    Ok(if failed > 0 { 1 } else { 0 })
}
