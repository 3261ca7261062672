//! # Error Hierarchy
//!
//! Structured error types for mitem decoding, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Validation does not use these types to report violations: violations are
//! accumulated as data by `mitem-schema`. The errors here describe failures
//! of a single decode or parse step.

use thiserror::Error;

/// Top-level error type for mitem decoding and parsing.
#[derive(Error, Debug)]
pub enum MitemError {
    /// The document (or a fragment of it) is not decodable JSON for the
    /// requested shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A date string matched none of the recognized layouts.
    #[error("date error: {0}")]
    Date(#[from] DateParseError),

    /// A field holds a value outside its fixed value set.
    #[error("invalid value for {field}: got = {value}, want = {expected}")]
    InvalidValue {
        /// Wire name of the field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Human-readable description of the accepted values.
        expected: &'static str,
    },
}

/// Errors while parsing a date string against the recognized layouts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// The date string is empty.
    #[error("empty date string")]
    Empty,

    /// No recognized layout accepted the input.
    #[error("cannot parse \"{input}\" with any of {layouts} recognized layouts")]
    Unrecognized {
        /// The rejected input.
        input: String,
        /// Number of layouts tried.
        layouts: usize,
    },
}
