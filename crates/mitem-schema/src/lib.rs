//! # mitem-schema — Mitem Validation & Field Extraction
//!
//! Checks raw mitem documents against the envelope and body element rules,
//! and pulls individual fields out of them.
//!
//! ## Validation (`validate`)
//!
//! [`validate_mitem`] walks the envelope and then the body, recursing into
//! gallery bodies, and returns every [`Violation`] it finds in one flat
//! ordered list. It never fails: an unreadable document is itself a
//! violation.
//!
//! ## Extraction (`extract`)
//!
//! The [`extract`] functions decode the narrowest view needed for one field.
//! Absent fields yield zero values, except `sourceURL` and the creation
//! date.
//!
//! ## Processing (`process`)
//!
//! [`Pipeline`] chains [`ProcessStep`]s over raw bytes and stops at the
//! first failure.
//!
//! ## Service (`service`)
//!
//! [`MitemService`] bundles the date layouts and the pipeline behind the
//! full operation surface.
//!
//! ## Crate Policy
//!
//! - Depends only on `mitem-core` internally.
//! - Violation messages are shown to authors verbatim. Changing one is a
//!   breaking change for authoring tools.

pub mod extract;
pub mod process;
pub mod service;
pub mod validate;

pub use extract::ExtractError;
pub use process::{FnStep, Pipeline, ProcessError, ProcessStep};
pub use service::MitemService;
pub use validate::{
    validate_body, validate_envelope, validate_mitem, ValidationViolations, Violation,
    ViolationKind,
};
