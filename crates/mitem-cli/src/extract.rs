//! # Extract Subcommand
//!
//! Prints one field of a mitem document. Plain values are printed as is,
//! structured values as JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use mitem_schema::{ExtractError, MitemService};

/// Fields `mitem extract` can print.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    SourceUrl,
    LogoUrl,
    Category,
    CategoryPath,
    Status,
    Body,
    CreationDate,
    Authors,
    Envelope,
}

/// Arguments for the `mitem extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Document to read. `-` reads standard input.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Field to print.
    #[arg(long, value_enum)]
    pub field: Field,
}

/// Execute the extract subcommand.
///
/// Returns exit code: 0 when the field was printed, 1 when it could not be
/// extracted. Unreadable documents are an `Err`.
pub fn run_extract(args: &ExtractArgs, service: &MitemService, out: &mut impl Write) -> Result<u8> {
    let raw = crate::read_document(&args.path)?;
    match extract_field(args.field, service, &raw) {
        Ok(value) => {
            writeln!(out, "{value}")?;
            Ok(0)
        }
        Err(e) => {
            tracing::error!(document = %args.path.display(), field = ?args.field, error = %e, "extraction failed");
            Ok(1)
        }
    }
}

fn extract_field(field: Field, service: &MitemService, raw: &[u8]) -> Result<String, ExtractError> {
    let value = match field {
        Field::SourceUrl => service.source_url(raw)?,
        Field::LogoUrl => service.logo_url(raw)?,
        Field::Category => service.category(raw)?,
        Field::CategoryPath => service.category_path(raw)?,
        Field::Status => service.status(raw)?.to_string(),
        Field::Body => serde_json::to_string_pretty(&service.body(raw)?)?,
        Field::CreationDate => service.creation_date(raw)?.to_rfc3339(),
        Field::Authors => serde_json::to_string_pretty(&service.authors(raw)?)?,
        Field::Envelope => serde_json::to_string_pretty(&service.mitem_tiniest(raw)?)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "sourceURL": "https://example.com/a",
        "date": "Tue, 14 Mar 2017 10:00:00 +0100",
        "category": {"tier1": "news", "tier2": "tech"},
        "meta": {"logoURL": "logo.png"},
        "authors": [{"name": "A"}, {"name": ""}],
        "status": 1,
        "body": [{"type":"paragraph","content":"x"}]
    }"#;

    fn run(content: &str, field: Field) -> (u8, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, content).unwrap();
        let mut out = Vec::new();
        let code = run_extract(&ExtractArgs { path, field }, &MitemService::new(), &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn plain_fields() {
        assert_eq!(run(DOC, Field::SourceUrl), (0, "https://example.com/a\n".to_string()));
        assert_eq!(run(DOC, Field::LogoUrl), (0, "logo.png\n".to_string()));
        assert_eq!(run(DOC, Field::Category), (0, "news\n".to_string()));
        assert_eq!(run(DOC, Field::CategoryPath), (0, "news>tech\n".to_string()));
        assert_eq!(run(DOC, Field::Status), (0, "1\n".to_string()));
        assert_eq!(
            run(DOC, Field::CreationDate),
            (0, "2017-03-14T09:00:00Z\n".to_string())
        );
    }

    #[test]
    fn structured_fields_are_json() {
        let (code, out) = run(DOC, Field::Authors);
        assert_eq!(code, 0);
        let authors: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(authors, vec!["A"]);

        let (code, out) = run(DOC, Field::Body);
        assert_eq!(code, 0);
        let body: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(body[0]["type"], "paragraph");

        let (code, out) = run(DOC, Field::Envelope);
        assert_eq!(code, 0);
        let envelope: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(envelope["sourceURL"], "https://example.com/a");
        assert_eq!(envelope["category"]["tier2"], "tech");
    }

    #[test]
    fn extraction_failures_exit_one() {
        assert_eq!(run("{}", Field::SourceUrl), (1, String::new()));
        assert_eq!(run("{}", Field::CreationDate), (1, String::new()));
        assert_eq!(run(r#"{"authors": "x"}"#, Field::Authors), (1, String::new()));
        assert_eq!(run("not json", Field::Status), (1, String::new()));
    }
}
