//! # Mitem Service
//!
//! One handle over validation, extraction and processing. The service owns
//! its configuration (the date layouts and the processing pipeline) and
//! holds no per-document state: every call takes the raw document and
//! decodes what it needs.
//!
//! ## Thread Safety
//!
//! `MitemService` is `Send + Sync` and cheap to clone. Calls are
//! independent and may run concurrently.

use mitem_core::{Body, Category, DateParser, MitemTiniest, Timestamp};

use crate::extract::{self, ExtractError};
use crate::process::{Pipeline, ProcessError};
use crate::validate::{validate_mitem, ValidationViolations};

/// Validation, extraction and processing of raw mitems.
#[derive(Debug, Clone, Default)]
pub struct MitemService {
    dates: DateParser,
    pipeline: Pipeline,
}

impl MitemService {
    /// A service with the recognized date layouts and an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the date parser.
    pub fn with_date_parser(mut self, dates: DateParser) -> Self {
        self.dates = dates;
        self
    }

    /// Replace the processing pipeline.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn date_parser(&self) -> &DateParser {
        &self.dates
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Every violation in `raw`, in document order. Empty means valid.
    pub fn validate(&self, raw: &[u8]) -> ValidationViolations {
        validate_mitem(raw, &self.dates)
    }

    /// Decode the minimal envelope.
    pub fn mitem_tiniest(&self, raw: &[u8]) -> Result<MitemTiniest, ExtractError> {
        extract::envelope(raw)
    }

    pub fn source_url(&self, raw: &[u8]) -> Result<String, ExtractError> {
        extract::source_url(raw)
    }

    pub fn logo_url(&self, raw: &[u8]) -> Result<String, ExtractError> {
        extract::logo_url(raw)
    }

    pub fn category(&self, raw: &[u8]) -> Result<String, ExtractError> {
        extract::category(raw)
    }

    pub fn category_path(&self, raw: &[u8]) -> Result<String, ExtractError> {
        extract::category_path(raw)
    }

    pub fn make_category_path(&self, category: &Category) -> String {
        extract::make_category_path(category)
    }

    pub fn status(&self, raw: &[u8]) -> Result<i64, ExtractError> {
        extract::status(raw)
    }

    pub fn body(&self, raw: &[u8]) -> Result<Body, ExtractError> {
        extract::body(raw)
    }

    pub fn authors(&self, raw: &[u8]) -> Result<Vec<String>, ExtractError> {
        extract::authors(raw)
    }

    /// The creation date, normalized to UTC.
    pub fn creation_date(&self, raw: &[u8]) -> Result<Timestamp, ExtractError> {
        extract::creation_date(raw, &self.dates)
    }

    /// The creation date of an already decoded envelope.
    pub fn convert_creation_date(&self, envelope: &MitemTiniest) -> Result<Timestamp, ExtractError> {
        extract::convert_creation_date(envelope, &self.dates)
    }

    /// Run the processing pipeline over `raw`.
    pub fn process(&self, raw: &[u8]) -> Result<Vec<u8>, ProcessError> {
        self.pipeline.process(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::FnStep;
    use mitem_core::{DateLayout, LayoutKind};
    use proptest::prelude::*;
    use serde_json::json;

    fn article() -> Vec<u8> {
        json!({
            "sourceURL": "https://example.com/a",
            "date": "Tue, 14 Mar 2017 10:00:00 +0100",
            "type": "article",
            "licenseType": "editorial",
            "mainImage": {"source": "a.jpg"},
            "headline": "H",
            "category": {"tier1": "news", "tier2": "tech"},
            "meta": {"logoURL": "logo.png"},
            "status": 1,
            "authors": [{"name": "A"}],
            "body": [{"type": "paragraph", "content": "x"}]
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn service_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MitemService>();
    }

    #[test]
    fn extraction_surface() {
        let svc = MitemService::new();
        let raw = article();
        assert!(svc.validate(&raw).is_empty());
        assert_eq!(svc.source_url(&raw).unwrap(), "https://example.com/a");
        assert_eq!(svc.logo_url(&raw).unwrap(), "logo.png");
        assert_eq!(svc.category(&raw).unwrap(), "news");
        assert_eq!(svc.category_path(&raw).unwrap(), "news>tech");
        assert_eq!(svc.status(&raw).unwrap(), 1);
        assert_eq!(svc.body(&raw).unwrap().len(), 1);
        assert_eq!(svc.authors(&raw).unwrap(), vec!["A"]);
        assert_eq!(
            svc.creation_date(&raw).unwrap().to_rfc3339(),
            "2017-03-14T09:00:00Z"
        );
        let mt = svc.mitem_tiniest(&raw).unwrap();
        assert!(mt.is_marked_for_deletion());
        assert_eq!(
            svc.convert_creation_date(&mt).unwrap(),
            svc.creation_date(&raw).unwrap()
        );
        assert_eq!(svc.make_category_path(&mt.category), "news>tech");
    }

    #[test]
    fn custom_date_parser_is_used() {
        let dates = DateParser::recognized().with_layout(DateLayout::new(
            "DayMonthYear",
            LayoutKind::DateOnly("%d.%m.%Y"),
        ));
        let svc = MitemService::new().with_date_parser(dates);
        let raw = json!({"date": "14.03.2017"}).to_string();
        assert_eq!(
            svc.creation_date(raw.as_bytes()).unwrap().to_rfc3339(),
            "2017-03-14T00:00:00Z"
        );
        assert!(MitemService::new().creation_date(raw.as_bytes()).is_err());
    }

    #[test]
    fn process_runs_the_pipeline() {
        let svc = MitemService::new();
        assert_eq!(svc.process(b"raw").unwrap(), b"raw");

        let svc = svc.with_pipeline(Pipeline::new().with_step(FnStep::new(
            "uppercase",
            |input: &[u8]| Ok(input.to_ascii_uppercase()),
        )));
        assert_eq!(svc.pipeline().len(), 1);
        assert_eq!(svc.process(b"raw").unwrap(), b"RAW");
    }

    proptest! {
        /// Extraction has no hidden state: the same document gives the
        /// same answer every time.
        #[test]
        fn extraction_is_idempotent(
            url in "[a-z:/.]{0,20}",
            tier1 in "[a-z]{0,6}",
            tier2 in "[a-z]{0,6}",
            status in any::<i64>(),
        ) {
            let svc = MitemService::new();
            let raw = json!({
                "sourceURL": url,
                "category": {"tier1": tier1, "tier2": tier2},
                "status": status
            })
            .to_string();
            let raw = raw.as_bytes();
            prop_assert_eq!(svc.source_url(raw).ok(), svc.source_url(raw).ok());
            prop_assert_eq!(svc.category_path(raw).unwrap(), svc.category_path(raw).unwrap());
            prop_assert_eq!(svc.status(raw).unwrap(), status);
            prop_assert_eq!(svc.validate(raw), svc.validate(raw));
        }

        /// A timestamp written as RFC 3339 reads back as the same instant.
        #[test]
        fn creation_date_round_trips_rfc3339(
            secs in 0i64..4_102_444_800,
            nanos in 0u32..1_000_000_000,
        ) {
            let instant = chrono::DateTime::from_timestamp(secs, nanos).unwrap();
            let raw = json!({"date": instant.to_rfc3339()}).to_string();
            let parsed = MitemService::new().creation_date(raw.as_bytes()).unwrap();
            prop_assert_eq!(*parsed.as_datetime(), instant);
        }
    }
}
