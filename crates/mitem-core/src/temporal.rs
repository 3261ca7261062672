//! # Temporal Types — Recognized Date Layouts
//!
//! Mitems arrive from many upstream feeds and each feed writes its `date`
//! field in its own way. This module defines the fixed list of layouts a
//! date string may use, a [`DateParser`] that tries them in order, and the
//! UTC [`Timestamp`] the parser produces.
//!
//! ## Layout Order
//!
//! Layouts are tried in the order of [`RECOGNIZED_LAYOUTS`] and the first
//! one that accepts the whole input wins. The list covers RFC 3339,
//! RFC 1123/822/850 style mail and HTTP dates, the Unix `date(1)` and Ruby
//! renderings, calendar dates with an optional time of day, and the custom
//! layout of the svt.se feed (`Mon Jan 02 2006 15:04:05 GMT+0100`).
//!
//! Layouts without a zone, or with a zone abbreviation and no numeric
//! offset, are read as UTC.
//!
//! ## Immutability
//!
//! The list is a `static` slice. A [`DateParser`] owns a copy that can be
//! extended once at construction with [`DateParser::with_layout`]; nothing
//! mutates it afterwards, so a parser can be shared freely across threads.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DateParseError;

/// How a [`DateLayout`] turns a string into an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// RFC 3339 with optional fractional seconds.
    Rfc3339,
    /// A `chrono` format string that includes a numeric offset (`%z`).
    Zoned(&'static str),
    /// A `chrono` format string with no usable offset; read as UTC.
    Naive(&'static str),
    /// A `chrono` format string for a calendar date; midnight UTC.
    DateOnly(&'static str),
    /// A `chrono` format string for everything before the last space,
    /// followed by a zone abbreviation glued to a numeric offset
    /// (`GMT+0100`). The abbreviation is ignored, the offset is honoured.
    AbbreviatedOffset(&'static str),
}

/// A named date layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLayout {
    name: &'static str,
    kind: LayoutKind,
}

impl DateLayout {
    /// Create a layout from a name and a parsing strategy.
    pub const fn new(name: &'static str, kind: LayoutKind) -> Self {
        Self { name, kind }
    }

    /// Layout name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parsing strategy.
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Parse `input` with this layout. Returns `None` when the layout does
    /// not accept the input.
    pub fn parse(&self, input: &str) -> Option<DateTime<FixedOffset>> {
        match self.kind {
            LayoutKind::Rfc3339 => DateTime::parse_from_rfc3339(input).ok(),
            LayoutKind::Zoned(fmt) => DateTime::parse_from_str(input, fmt).ok(),
            LayoutKind::Naive(fmt) => NaiveDateTime::parse_from_str(input, fmt)
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset()),
            LayoutKind::DateOnly(fmt) => NaiveDate::parse_from_str(input, fmt)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset()),
            LayoutKind::AbbreviatedOffset(fmt) => {
                let (head, zone) = input.rsplit_once(' ')?;
                let offset = zone.trim_start_matches(|c: char| c.is_ascii_alphabetic());
                if offset.is_empty() {
                    return None;
                }
                DateTime::parse_from_str(&format!("{head} {offset}"), &format!("{fmt} %z")).ok()
            }
        }
    }
}

/// Every layout a mitem `date` may use, in trial order.
pub static RECOGNIZED_LAYOUTS: &[DateLayout] = &[
    DateLayout::new("RFC3339", LayoutKind::Rfc3339),
    DateLayout::new("RFC1123Z", LayoutKind::Zoned("%a, %d %b %Y %H:%M:%S %z")),
    DateLayout::new("RFC1123", LayoutKind::Naive("%a, %d %b %Y %H:%M:%S %Z")),
    DateLayout::new("RFC822Z", LayoutKind::Zoned("%d %b %y %H:%M %z")),
    DateLayout::new("RFC822", LayoutKind::Naive("%d %b %y %H:%M %Z")),
    DateLayout::new("RFC850", LayoutKind::Naive("%A, %d-%b-%y %H:%M:%S %Z")),
    DateLayout::new("RubyDate", LayoutKind::Zoned("%a %b %d %H:%M:%S %z %Y")),
    DateLayout::new("UnixDate", LayoutKind::Naive("%a %b %e %H:%M:%S %Z %Y")),
    DateLayout::new("ANSIC", LayoutKind::Naive("%a %b %e %H:%M:%S %Y")),
    DateLayout::new(
        "svt",
        LayoutKind::AbbreviatedOffset("%a %b %d %Y %H:%M:%S"),
    ),
    DateLayout::new(
        "DateTimeZone",
        LayoutKind::Zoned("%Y-%m-%d %H:%M:%S%.f %z"),
    ),
    DateLayout::new("DateTime", LayoutKind::Naive("%Y-%m-%d %H:%M:%S%.f")),
    DateLayout::new("DateTimeT", LayoutKind::Naive("%Y-%m-%dT%H:%M:%S%.f")),
    DateLayout::new("DateHourMinute", LayoutKind::Naive("%Y-%m-%d %H:%M")),
    DateLayout::new("Date", LayoutKind::DateOnly("%Y-%m-%d")),
    DateLayout::new("SlashDate", LayoutKind::DateOnly("%Y/%m/%d")),
];

/// Parses date strings against an ordered list of layouts.
#[derive(Debug, Clone)]
pub struct DateParser {
    layouts: Vec<DateLayout>,
}

impl DateParser {
    /// A parser over [`RECOGNIZED_LAYOUTS`].
    pub fn recognized() -> Self {
        Self {
            layouts: RECOGNIZED_LAYOUTS.to_vec(),
        }
    }

    /// Append a layout, tried after all existing ones.
    pub fn with_layout(mut self, layout: DateLayout) -> Self {
        self.layouts.push(layout);
        self
    }

    /// The layouts in trial order.
    pub fn layouts(&self) -> &[DateLayout] {
        &self.layouts
    }

    /// Parse `input` with the first layout that accepts it.
    ///
    /// # Errors
    ///
    /// [`DateParseError::Empty`] for an empty string,
    /// [`DateParseError::Unrecognized`] when no layout matches.
    pub fn parse(&self, input: &str) -> Result<Timestamp, DateParseError> {
        if input.is_empty() {
            return Err(DateParseError::Empty);
        }
        for layout in &self.layouts {
            if let Some(dt) = layout.parse(input) {
                tracing::trace!(layout = layout.name(), input, "date layout matched");
                return Ok(Timestamp::from_datetime(dt.with_timezone(&Utc)));
            }
        }
        tracing::warn!(input, "date matches no recognized layout");
        Err(DateParseError::Unrecognized {
            input: input.to_string(),
            layouts: self.layouts.len(),
        })
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::recognized()
    }
}

/// A UTC instant parsed from a mitem date.
///
/// Sub-second precision is kept: feeds that send RFC 3339 with nanoseconds
/// get the same instant back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap a `chrono::DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// RFC 3339 with `Z` suffix; fractional seconds only when present.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use proptest::prelude::*;

    fn parse(s: &str) -> Timestamp {
        DateParser::recognized()
            .parse(s)
            .unwrap_or_else(|e| panic!("{s:?} should parse: {e}"))
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    #[test]
    fn rfc3339_with_offset_is_normalized_to_utc() {
        assert_eq!(parse("2006-01-02T15:04:05+01:00"), utc(2006, 1, 2, 14, 4, 5));
        assert_eq!(parse("2006-01-02T15:04:05Z"), utc(2006, 1, 2, 15, 4, 5));
    }

    #[test]
    fn rfc3339_keeps_nanoseconds() {
        let ts = parse("2006-01-02T15:04:05.123456789Z");
        assert_eq!(ts.as_datetime().nanosecond(), 123_456_789);
    }

    #[test]
    fn rfc1123_variants() {
        assert_eq!(parse("Mon, 02 Jan 2006 15:04:05 -0700"), utc(2006, 1, 2, 22, 4, 5));
        assert_eq!(parse("Mon, 02 Jan 2006 15:04:05 GMT"), utc(2006, 1, 2, 15, 4, 5));
    }

    #[test]
    fn rfc822_variants() {
        assert_eq!(parse("02 Jan 06 15:04 -0700"), utc(2006, 1, 2, 22, 4, 0));
        assert_eq!(parse("02 Jan 06 15:04 MST"), utc(2006, 1, 2, 15, 4, 0));
    }

    #[test]
    fn rfc850() {
        assert_eq!(parse("Monday, 02-Jan-06 15:04:05 MST"), utc(2006, 1, 2, 15, 4, 5));
    }

    #[test]
    fn ruby_unix_and_ansic() {
        assert_eq!(parse("Mon Jan 02 15:04:05 -0700 2006"), utc(2006, 1, 2, 22, 4, 5));
        assert_eq!(parse("Mon Jan  2 15:04:05 MST 2006"), utc(2006, 1, 2, 15, 4, 5));
        assert_eq!(parse("Mon Jan  2 15:04:05 2006"), utc(2006, 1, 2, 15, 4, 5));
    }

    #[test]
    fn svt_feed_layout() {
        assert_eq!(
            parse("Mon Jan 02 2006 15:04:05 GMT+0100"),
            utc(2006, 1, 2, 14, 4, 5)
        );
        assert_eq!(
            parse("Tue Mar 14 2017 10:00:00 CET-0200"),
            utc(2017, 3, 14, 12, 0, 0)
        );
    }

    #[test]
    fn calendar_dates() {
        assert_eq!(parse("2017-03-14"), utc(2017, 3, 14, 0, 0, 0));
        assert_eq!(parse("2017/03/14"), utc(2017, 3, 14, 0, 0, 0));
        assert_eq!(parse("2017-03-14 10:30"), utc(2017, 3, 14, 10, 30, 0));
        assert_eq!(parse("2017-03-14 10:30:15"), utc(2017, 3, 14, 10, 30, 15));
        assert_eq!(parse("2017-03-14T10:30:15"), utc(2017, 3, 14, 10, 30, 15));
        assert_eq!(
            parse("2017-03-14 10:30:15.5 +0200"),
            Timestamp::from_datetime(
                Utc.with_ymd_and_hms(2017, 3, 14, 8, 30, 15)
                    .unwrap()
                    .with_nanosecond(500_000_000)
                    .unwrap()
            )
        );
    }

    #[test]
    fn empty_input_is_its_own_error() {
        assert_eq!(DateParser::recognized().parse(""), Err(DateParseError::Empty));
    }

    #[test]
    fn unrecognized_input_reports_layout_count() {
        let parser = DateParser::recognized();
        let err = parser.parse("the day before yesterday").unwrap_err();
        assert_eq!(
            err,
            DateParseError::Unrecognized {
                input: "the day before yesterday".to_string(),
                layouts: RECOGNIZED_LAYOUTS.len(),
            }
        );
    }

    #[test]
    fn time_only_inputs_are_rejected() {
        let parser = DateParser::recognized();
        assert!(parser.parse("3:04PM").is_err());
        assert!(parser.parse("Jan  2 15:04:05").is_err());
    }

    #[test]
    fn custom_layout_extends_the_list() {
        let parser = DateParser::recognized()
            .with_layout(DateLayout::new("DottedDate", LayoutKind::DateOnly("%d.%m.%Y")));
        assert_eq!(parser.layouts().len(), RECOGNIZED_LAYOUTS.len() + 1);
        assert_eq!(parser.parse("14.03.2017").unwrap(), utc(2017, 3, 14, 0, 0, 0));
        assert!(DateParser::recognized().parse("14.03.2017").is_err());
    }

    #[test]
    fn abbreviated_offset_requires_an_offset() {
        let layout = DateLayout::new("svt", LayoutKind::AbbreviatedOffset("%a %b %d %Y %H:%M:%S"));
        assert!(layout.parse("Mon Jan 02 2006 15:04:05 GMT").is_none());
        assert!(layout.parse("Mon Jan 02 2006 15:04:05 +0100").is_some());
    }

    #[test]
    fn display_is_rfc3339_z() {
        assert_eq!(utc(2026, 1, 15, 12, 0, 0).to_string(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn serde_roundtrip() {
        let ts = parse("2026-01-15T12:00:00Z");
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }

    proptest! {
        /// Any instant rendered as RFC 3339 parses back to the same instant.
        #[test]
        fn rfc3339_roundtrip(secs in 0i64..4_102_444_800, nanos in 0u32..1_000_000_000) {
            let dt = DateTime::from_timestamp(secs, nanos).unwrap();
            let rendered = dt.to_rfc3339();
            let ts = DateParser::recognized().parse(&rendered).unwrap();
            prop_assert_eq!(*ts.as_datetime(), dt);
        }
    }
}
