//! # mitem-cli — CLI Tool for Mitem Documents
//!
//! Provides the `mitem` command-line interface over `mitem-schema`.
//!
//! ## Subcommands
//!
//! - `mitem validate` — validation reports, as text or JSON.
//! - `mitem extract` — print a single field.
//!
//! ```bash
//! mitem validate fixtures/mitems/valid/*.json
//! mitem validate --json - < article.json
//! mitem extract article.json --field category-path
//! ```
//!
//! ## Exit Codes
//!
//! 0 on success, 1 when a document is invalid or a field cannot be
//! extracted, 2 on operational errors (unreadable input, bad config).

pub mod config;
pub mod extract;
pub mod validate;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a document from `path`, or from standard input when `path` is `-`.
pub fn read_document(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut raw = Vec::new();
        std::io::stdin()
            .read_to_end(&mut raw)
            .context("failed to read document from stdin")?;
        return Ok(raw);
    }
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, b"{}").unwrap();
        assert_eq!(read_document(&path).unwrap(), b"{}");
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let err = read_document(Path::new("/nonexistent/mitem.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mitem.json"));
    }
}
