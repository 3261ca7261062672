//! # Mitem Validation
//!
//! Recursive validation of a raw mitem against the envelope and body
//! element rules.
//!
//! ## Accumulation
//!
//! Validation never stops at the first problem. Every mandatory envelope
//! field is checked independently, every body element is checked even when
//! a sibling failed, and gallery bodies are walked with the same entry point
//! as the top-level body. All violations land in one flat, ordered
//! [`ValidationViolations`]; nested violations carry no depth marker in
//! their message. The only early exits are an empty document and a document
//! that does not decode as an envelope at all.
//!
//! ## Order
//!
//! Envelope violations are reported in field order: `sourceURL`, `date`,
//! `type`, `licenseType`, `mainImage.source`, `headline`, `body`, followed
//! by body element violations in document order (depth first).
//!
//! ## Messages
//!
//! Violation messages are the compatibility contract with content-authoring
//! tools, which show them verbatim. [`ViolationKind`] gives each message a
//! machine-readable identity and [`Violation::path`] locates it, without
//! changing the text.

use std::fmt;

use serde::Serialize;
use serde_json::value::RawValue;
use thiserror::Error;

use mitem_core::{BodyElement, BodyElementError, DateParser, LicenseType, MitemTiniest};

/// What is wrong, with the message shown to authors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The document is zero bytes long.
    #[error("An empty mitem passed in")]
    EmptyDocument,

    /// The document does not decode as a mitem envelope.
    #[error("Unable to unmarshal passed mitem")]
    Unparseable,

    /// A mandatory envelope field is absent or empty.
    #[error("Mandatory field {field} is empty")]
    MissingField {
        /// Field label as shown to authors.
        field: &'static str,
    },

    /// The `date` field matches no recognized layout.
    #[error("Mandatory field date is in unsupported format: {reason}")]
    UnsupportedDateFormat {
        /// Parser diagnostic.
        reason: String,
    },

    /// `licenseType` is not one of the supported values.
    #[error("Unsupported license type got = {value}, want = {}", LicenseType::EXPECTED)]
    UnsupportedLicenseType {
        /// The rejected value.
        value: String,
    },

    /// A body element is not a JSON object with a string `type`.
    #[error("Unable to unmarshal body element")]
    UnreadableBodyElement,

    /// A body element has no `type`.
    #[error("Mandatory field type is empty in body element")]
    MissingElementType,

    /// A body element does not fit the record of its type.
    #[error("Unable to unmarshal element of type: {element_type}")]
    UnreadableElement {
        /// The element's discriminator.
        element_type: String,
    },

    /// A mandatory field of a body element is absent or empty.
    #[error("Mandatory field {field} is empty in element of type: {element_type}")]
    MissingElementField {
        /// Wire name of the element field.
        field: &'static str,
        /// The element's discriminator.
        element_type: String,
    },

    /// A video element names an unsupported host.
    #[error("Mandatory field videoType has invalid content ({value}) in element of type: {element_type}")]
    UnsupportedVideoType {
        /// The rejected value.
        value: String,
        /// The element's discriminator.
        element_type: String,
    },
}

/// A single violation, located in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer style location (`""` for the whole document,
    /// `/body/1/body/0` for the first element of the second element's
    /// gallery).
    pub path: String,
    /// What is wrong.
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// The author-facing message.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "  (root): {}", self.kind)
        } else {
            write!(f, "  {}: {}", self.path, self.kind)
        }
    }
}

/// Ordered collection of violations. Empty means the document is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if the document is valid.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The author-facing messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::message).collect()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationViolations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

/// Validate a raw mitem document.
///
/// Never fails: every problem is reported in the returned collection.
pub fn validate_mitem(raw: &[u8], dates: &DateParser) -> ValidationViolations {
    tracing::debug!(bytes = raw.len(), "validating mitem");
    let mut violations = Vec::new();

    if raw.is_empty() {
        violations.push(Violation::new("", ViolationKind::EmptyDocument));
    } else {
        match MitemTiniest::from_slice(raw) {
            Ok(envelope) => validate_envelope(&envelope, dates, &mut violations),
            Err(e) => {
                tracing::debug!(error = %e, "mitem does not decode as an envelope");
                violations.push(Violation::new("", ViolationKind::Unparseable));
            }
        }
    }

    tracing::debug!(violations = violations.len(), "mitem validated");
    ValidationViolations { violations }
}

/// Check every mandatory envelope field, then the body.
pub fn validate_envelope(envelope: &MitemTiniest, dates: &DateParser, out: &mut Vec<Violation>) {
    let missing = |field| ViolationKind::MissingField { field };

    if envelope.source_url.is_empty() {
        out.push(Violation::new("/sourceURL", missing("sourceURL")));
    }

    if envelope.date.is_empty() {
        out.push(Violation::new("/date", missing("date")));
    } else if let Err(e) = dates.parse(&envelope.date) {
        out.push(Violation::new(
            "/date",
            ViolationKind::UnsupportedDateFormat {
                reason: e.to_string(),
            },
        ));
    }

    if envelope.mitem_type.is_empty() {
        out.push(Violation::new("/type", missing("type")));
    }

    if envelope.license_type.is_empty() {
        out.push(Violation::new("/licenseType", missing("license type")));
    } else if envelope.license().is_err() {
        out.push(Violation::new(
            "/licenseType",
            ViolationKind::UnsupportedLicenseType {
                value: envelope.license_type.clone(),
            },
        ));
    }

    if envelope.main_image.source.is_empty() {
        out.push(Violation::new("/mainImage/source", missing("mainimage.source")));
    }

    if envelope.headline.is_empty() {
        out.push(Violation::new("/headline", missing("headline")));
    }

    if envelope.body.is_empty() {
        out.push(Violation::new("/body", missing("body")));
    } else {
        validate_body(&envelope.body, "/body", out);
    }
}

/// Validate each element of a body. Used for the top-level body and for
/// every gallery body below it.
pub fn validate_body(body: &[Box<RawValue>], path: &str, out: &mut Vec<Violation>) {
    for (index, raw) in body.iter().enumerate() {
        let element_path = format!("{path}/{index}");
        match BodyElement::decode(raw) {
            Ok(element) => validate_element(&element, &element_path, out),
            Err(BodyElementError::Unreadable { .. }) => {
                out.push(Violation::new(element_path, ViolationKind::UnreadableBodyElement));
            }
            Err(BodyElementError::MissingType) => {
                out.push(Violation::new(element_path, ViolationKind::MissingElementType));
            }
            Err(BodyElementError::UnreadableElement { element_type, .. }) => {
                out.push(Violation::new(
                    element_path,
                    ViolationKind::UnreadableElement { element_type },
                ));
            }
        }
    }
}

fn validate_element(element: &BodyElement, path: &str, out: &mut Vec<Violation>) {
    let element_type = element.element_type();
    let missing = |field| ViolationKind::MissingElementField {
        field,
        element_type: element_type.to_string(),
    };

    match element {
        // Text content is informational; an empty paragraph is allowed.
        BodyElement::Text(..) | BodyElement::Unknown(_) => {}
        BodyElement::Image(image) => {
            if image.source.is_empty() {
                out.push(Violation::new(format!("{path}/source"), missing("source")));
            }
        }
        BodyElement::Video(video) => {
            if video.source.is_empty() {
                out.push(Violation::new(format!("{path}/source"), missing("source")));
            }
            if video.video_type.is_empty() {
                out.push(Violation::new(format!("{path}/videoType"), missing("videoType")));
            } else if video.host().is_err() {
                out.push(Violation::new(
                    format!("{path}/videoType"),
                    ViolationKind::UnsupportedVideoType {
                        value: video.video_type.clone(),
                        element_type: element_type.to_string(),
                    },
                ));
            }
        }
        BodyElement::Gallery(gallery) => {
            if gallery.body.is_empty() {
                out.push(Violation::new(format!("{path}/body"), missing("body")));
            } else {
                validate_body(&gallery.body, &format!("{path}/body"), out);
            }
        }
    }
}
