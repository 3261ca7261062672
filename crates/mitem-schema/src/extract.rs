//! # Field Extraction
//!
//! Pull single values out of a raw mitem without validating it. Each
//! function decodes only the projection it needs, so a document with a
//! malformed `body` still yields its `sourceURL`.
//!
//! Absent fields yield their zero value, except `sourceURL` and the
//! creation date, which downstream systems cannot do without.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use mitem_core::{
    from_object_slice, Body, Category, DateParseError, DateParser, MetaTiniest, MitemTiniest,
    Timestamp,
};

/// Errors from field extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The document does not decode into the projection for the field.
    #[error("unable to decode mitem: {0}")]
    Decode(#[from] serde_json::Error),

    /// `sourceURL` is absent or empty.
    #[error("sourceURL is either absent from the mitem or empty")]
    MissingSourceUrl,

    /// The creation date is empty or in no recognized layout.
    #[error("creation date: {0}")]
    Date(#[from] DateParseError),

    /// The document has no `authors` field.
    #[error("mitem has no authors field")]
    AuthorsMissing,

    /// `authors` is not an array.
    #[error("authors must be an array, got {found}")]
    AuthorsNotArray {
        /// JSON type actually found.
        found: &'static str,
    },

    /// An `authors` entry is not an object.
    #[error("author #{index} must be an object, got {found}")]
    AuthorNotObject {
        index: usize,
        found: &'static str,
    },

    /// An `authors` entry has no `name`.
    #[error("author #{index} has no name field")]
    AuthorNameMissing { index: usize },

    /// An `authors` entry has a `name` that is not a string.
    #[error("author #{index} name must be a string, got {found}")]
    AuthorNameNotString {
        index: usize,
        found: &'static str,
    },
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SourceView {
    #[serde(rename = "sourceURL", alias = "sourceurl")]
    source_url: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DateView {
    date: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CategoryView {
    category: Option<Category>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct MetaView {
    meta: Option<MetaTiniest>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StatusView {
    status: Option<i64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BodyView {
    body: Option<Body>,
}

fn decode<T: DeserializeOwned + Default>(raw: &[u8], what: &str) -> Result<T, ExtractError> {
    from_object_slice(raw).map_err(|e| {
        tracing::error!(field = what, error = %e, "unable to decode mitem");
        ExtractError::Decode(e)
    })
}

/// The minimal envelope.
pub fn envelope(raw: &[u8]) -> Result<MitemTiniest, ExtractError> {
    decode(raw, "envelope")
}

/// `sourceURL`. Fails if absent or empty.
pub fn source_url(raw: &[u8]) -> Result<String, ExtractError> {
    let view: SourceView = decode(raw, "sourceURL")?;
    match view.source_url {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(ExtractError::MissingSourceUrl),
    }
}

/// `meta.logoURL`, or `""`.
pub fn logo_url(raw: &[u8]) -> Result<String, ExtractError> {
    let view: MetaView = decode(raw, "meta")?;
    Ok(view.meta.map(|m| m.logo_url).unwrap_or_default())
}

/// `category.tier1`, or `""`.
pub fn category(raw: &[u8]) -> Result<String, ExtractError> {
    let view: CategoryView = decode(raw, "category")?;
    Ok(view.category.map(|c| c.tier1).unwrap_or_default())
}

/// The rendered category path, see [`make_category_path`].
pub fn category_path(raw: &[u8]) -> Result<String, ExtractError> {
    let view: CategoryView = decode(raw, "category")?;
    Ok(make_category_path(&view.category.unwrap_or_default()))
}

/// `tier1>tier2`, `tier1`, or `""` when `tier1` is empty.
pub fn make_category_path(category: &Category) -> String {
    category.path()
}

/// `status`, or 0.
pub fn status(raw: &[u8]) -> Result<i64, ExtractError> {
    let view: StatusView = decode(raw, "status")?;
    Ok(view.status.unwrap_or_default())
}

/// The undecoded body elements, or an empty body.
pub fn body(raw: &[u8]) -> Result<Body, ExtractError> {
    let view: BodyView = decode(raw, "body")?;
    Ok(view.body.unwrap_or_default())
}

/// The `date` field parsed with `dates`.
pub fn creation_date(raw: &[u8], dates: &DateParser) -> Result<Timestamp, ExtractError> {
    let view: DateView = decode(raw, "date")?;
    Ok(dates.parse(view.date.as_deref().unwrap_or_default())?)
}

/// The `date` field of an already decoded envelope, parsed with `dates`.
pub fn convert_creation_date(
    envelope: &MitemTiniest,
    dates: &DateParser,
) -> Result<Timestamp, ExtractError> {
    Ok(dates.parse(&envelope.date)?)
}

/// Non-empty author names from the top-level `authors` array, in order.
///
/// The array is read structurally so that each malformed entry is reported
/// by position.
pub fn authors(raw: &[u8]) -> Result<Vec<String>, ExtractError> {
    let doc: Value = decode(raw, "authors")?;
    let authors = doc.get("authors").ok_or(ExtractError::AuthorsMissing)?;
    let entries = authors.as_array().ok_or(ExtractError::AuthorsNotArray {
        found: json_kind(authors),
    })?;

    let mut names = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let fields = entry.as_object().ok_or(ExtractError::AuthorNotObject {
            index,
            found: json_kind(entry),
        })?;
        let name = fields
            .get("name")
            .ok_or(ExtractError::AuthorNameMissing { index })?;
        let name = name.as_str().ok_or(ExtractError::AuthorNameNotString {
            index,
            found: json_kind(name),
        })?;
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Vec<u8> {
        value.to_string().into_bytes()
    }

    #[test]
    fn source_url_present() {
        let raw = doc(json!({"sourceURL": "https://example.com/a", "body": "not a body"}));
        assert_eq!(source_url(&raw).unwrap(), "https://example.com/a");
    }

    #[test]
    fn source_url_absent_or_empty_fails() {
        assert!(matches!(
            source_url(b"{}"),
            Err(ExtractError::MissingSourceUrl)
        ));
        assert!(matches!(
            source_url(&doc(json!({"sourceURL": ""}))),
            Err(ExtractError::MissingSourceUrl)
        ));
        assert!(matches!(
            source_url(&doc(json!({"sourceURL": null}))),
            Err(ExtractError::MissingSourceUrl)
        ));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(source_url(b"{"), Err(ExtractError::Decode(_))));
        assert!(matches!(status(b""), Err(ExtractError::Decode(_))));
        assert!(matches!(source_url(br#"["x"]"#), Err(ExtractError::Decode(_))));
        assert!(matches!(
            status(&doc(json!({"status": "live"}))),
            Err(ExtractError::Decode(_))
        ));
    }

    #[test]
    fn absent_fields_yield_zero_values() {
        assert_eq!(logo_url(b"{}").unwrap(), "");
        assert_eq!(category(b"{}").unwrap(), "");
        assert_eq!(category_path(b"{}").unwrap(), "");
        assert_eq!(status(b"{}").unwrap(), 0);
        assert!(body(b"{}").unwrap().is_empty());
        assert!(body(&doc(json!({"body": null}))).unwrap().is_empty());
    }

    #[test]
    fn null_document_behaves_like_empty_object() {
        assert!(matches!(source_url(b"null"), Err(ExtractError::MissingSourceUrl)));
        assert_eq!(category(b"null").unwrap(), "");
        assert_eq!(status(b"null").unwrap(), 0);
        assert!(body(b"null").unwrap().is_empty());
        assert!(matches!(authors(b"null"), Err(ExtractError::AuthorsMissing)));
        assert!(matches!(
            creation_date(b"null", &DateParser::recognized()),
            Err(ExtractError::Date(DateParseError::Empty))
        ));
        assert!(envelope(b"null").unwrap().source_url.is_empty());
    }

    #[test]
    fn nested_fields() {
        let raw = doc(json!({
            "meta": {"logoURL": "https://example.com/logo.png"},
            "category": {"tier1": "news", "tier2": "tech"},
            "status": 1,
            "body": [{"type": "paragraph", "content": "x"}, {"type": "mystery"}]
        }));
        assert_eq!(logo_url(&raw).unwrap(), "https://example.com/logo.png");
        assert_eq!(category(&raw).unwrap(), "news");
        assert_eq!(category_path(&raw).unwrap(), "news>tech");
        assert_eq!(status(&raw).unwrap(), 1);
        let body = body(&raw).unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body[1].get(), r#"{"type":"mystery"}"#);
    }

    #[test]
    fn category_path_without_tier1_is_empty() {
        let raw = doc(json!({"category": {"tier2": "tech"}}));
        assert_eq!(category_path(&raw).unwrap(), "");
        assert_eq!(make_category_path(&Category::new("news", "")), "news");
    }

    #[test]
    fn creation_date_parses_and_normalizes() {
        let dates = DateParser::recognized();
        let raw = doc(json!({"date": "2017-03-14T10:00:00+02:00"}));
        assert_eq!(
            creation_date(&raw, &dates).unwrap().to_rfc3339(),
            "2017-03-14T08:00:00Z"
        );
        assert!(matches!(
            creation_date(b"{}", &dates),
            Err(ExtractError::Date(DateParseError::Empty))
        ));
        assert!(matches!(
            creation_date(&doc(json!({"date": "tomorrow"})), &dates),
            Err(ExtractError::Date(DateParseError::Unrecognized { .. }))
        ));
    }

    #[test]
    fn convert_creation_date_uses_envelope_date() {
        let mt = envelope(&doc(json!({"date": "2017-03-14"}))).unwrap();
        let ts = convert_creation_date(&mt, &DateParser::recognized()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2017-03-14T00:00:00Z");
    }

    #[test]
    fn authors_skips_empty_names() {
        let raw = doc(json!({"authors": [{"name": "A"}, {"name": ""}, {"name": "B", "email": "b@x"}]}));
        assert_eq!(authors(&raw).unwrap(), vec!["A", "B"]);
        assert!(authors(&doc(json!({"authors": []}))).unwrap().is_empty());
    }

    #[test]
    fn authors_structural_errors() {
        assert!(matches!(authors(b"{}"), Err(ExtractError::AuthorsMissing)));
        assert!(matches!(
            authors(&doc(json!({"authors": "not-an-array"}))),
            Err(ExtractError::AuthorsNotArray { found: "string" })
        ));
        assert!(matches!(
            authors(&doc(json!({"authors": [{"name": "A"}, 7]}))),
            Err(ExtractError::AuthorNotObject { index: 1, found: "number" })
        ));
        assert!(matches!(
            authors(&doc(json!({"authors": [{"email": "a@x"}]}))),
            Err(ExtractError::AuthorNameMissing { index: 0 })
        ));
        assert!(matches!(
            authors(&doc(json!({"authors": [{"name": null}]}))),
            Err(ExtractError::AuthorNameNotString { index: 0, found: "null" })
        ));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ExtractError::AuthorNameMissing { index: 2 }.to_string(),
            "author #2 has no name field"
        );
        assert_eq!(
            ExtractError::MissingSourceUrl.to_string(),
            "sourceURL is either absent from the mitem or empty"
        );
    }
}
