//! # Body Elements — Polymorphic Fragments
//!
//! A mitem body is an ordered list of opaque JSON fragments. Each fragment
//! names its own shape with a `type` discriminator. Decoding is two-phase:
//!
//! 1. [`read_element_type`] reads only the fragment's `type`, skipping
//!    every other key without building it.
//! 2. [`BodyElement::decode`] dispatches on the tag and decodes the fragment
//!    into the record for that tag.
//!
//! Tags this crate does not know decode to [`BodyElement::Unknown`] rather
//! than failing, so new block kinds introduced upstream pass through.
//!
//! All records decode leniently: unknown fields are ignored and absent or
//! `null` fields take their zero value. Only malformed JSON, or a field of
//! the wrong JSON type, is a decode error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;
use thiserror::Error;

use crate::de::{from_object_slice, null_as_default};
use crate::error::MitemError;

/// Ordered, still-opaque body fragments.
pub type Body = Vec<Box<RawValue>>;

/// Errors while decoding a single body element.
#[derive(Error, Debug)]
pub enum BodyElementError {
    /// The fragment is not a JSON object with a string `type`.
    #[error("unable to read body element: {reason}")]
    Unreadable {
        /// Decoder diagnostic.
        reason: String,
    },

    /// The fragment has no `type`, or an empty one.
    #[error("body element has no type")]
    MissingType,

    /// The fragment has a known `type` but does not fit that type's record.
    #[error("unable to decode element of type {element_type}: {source}")]
    UnreadableElement {
        /// The element's discriminator.
        element_type: String,
        /// Decoder diagnostic.
        source: serde_json::Error,
    },
}

/// The recognized body element discriminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Paragraph,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Info,
    Subhead,
    Image,
    Video,
    Gallery,
}

impl ElementKind {
    /// All recognized kinds.
    pub const ALL: [ElementKind; 12] = [
        Self::Paragraph,
        Self::H1,
        Self::H2,
        Self::H3,
        Self::H4,
        Self::H5,
        Self::H6,
        Self::Info,
        Self::Subhead,
        Self::Image,
        Self::Video,
        Self::Gallery,
    ];

    /// Map a discriminator to a kind. `None` for tags this crate does not know.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// The wire discriminator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::Info => "info",
            Self::Subhead => "subhead",
            Self::Image => "image",
            Self::Video => "video",
            Self::Gallery => "gallery",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported video hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    Vimeo,
    Youtube,
}

impl VideoType {
    /// The wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vimeo => "vimeo",
            Self::Youtube => "youtube",
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoType {
    type Err = MitemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vimeo" => Ok(Self::Vimeo),
            "youtube" => Ok(Self::Youtube),
            other => Err(MitemError::InvalidValue {
                field: "videoType",
                value: other.to_string(),
                expected: "vimeo or youtube",
            }),
        }
    }
}

/// Paragraph, heading, info or subhead block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBlock {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub element_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
}

/// Image block. Also the shape of the envelope's main image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageBlock {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub element_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub caption: String,
    #[serde(deserialize_with = "null_as_default")]
    pub height: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub width: i64,
}

/// Embedded video block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoBlock {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub element_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(
        rename = "videoType",
        alias = "videotype",
        deserialize_with = "null_as_default"
    )]
    pub video_type: String,
}

impl VideoBlock {
    /// The video host, if `videoType` is one of the supported values.
    pub fn host(&self) -> Result<VideoType, MitemError> {
        self.video_type.parse()
    }
}

/// Gallery block: a nested body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryBlock {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub element_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: Body,
}

/// A decoded body element.
#[derive(Debug, Clone)]
pub enum BodyElement {
    Text(ElementKind, TextBlock),
    Image(ImageBlock),
    Video(VideoBlock),
    Gallery(GalleryBlock),
    /// A tag this crate does not know. Carried through undecoded.
    Unknown(String),
}

impl BodyElement {
    /// Decode a fragment: read its tag, then decode the record for the tag.
    ///
    /// # Errors
    ///
    /// - [`BodyElementError::Unreadable`] if the fragment is not an object
    ///   with a string `type`.
    /// - [`BodyElementError::MissingType`] if `type` is absent or empty.
    /// - [`BodyElementError::UnreadableElement`] if the fragment does not fit
    ///   the record of its tag.
    pub fn decode(raw: &RawValue) -> Result<Self, BodyElementError> {
        let tag = read_element_type(raw)?;
        if tag.is_empty() {
            return Err(BodyElementError::MissingType);
        }
        let Some(kind) = ElementKind::from_tag(&tag) else {
            return Ok(Self::Unknown(tag));
        };
        let wrap = |source| BodyElementError::UnreadableElement {
            element_type: tag.clone(),
            source,
        };
        let element = match kind {
            ElementKind::Image => Self::Image(serde_json::from_str(raw.get()).map_err(wrap)?),
            ElementKind::Video => Self::Video(serde_json::from_str(raw.get()).map_err(wrap)?),
            ElementKind::Gallery => Self::Gallery(serde_json::from_str(raw.get()).map_err(wrap)?),
            text => Self::Text(text, serde_json::from_str(raw.get()).map_err(wrap)?),
        };
        Ok(element)
    }

    /// The element's discriminator.
    pub fn element_type(&self) -> &str {
        match self {
            Self::Text(kind, _) => kind.as_str(),
            Self::Image(_) => ElementKind::Image.as_str(),
            Self::Video(_) => ElementKind::Video.as_str(),
            Self::Gallery(_) => ElementKind::Gallery.as_str(),
            Self::Unknown(tag) => tag,
        }
    }
}

#[derive(Deserialize, Default)]
struct TagView {
    #[serde(rename = "type", default)]
    tag: Option<Value>,
}

/// Read a fragment's `type` without decoding the rest of it.
///
/// A `null` fragment, or one without `type`, yields an empty tag.
pub fn read_element_type(raw: &RawValue) -> Result<String, BodyElementError> {
    let view: TagView =
        from_object_slice(raw.get().as_bytes()).map_err(|e| BodyElementError::Unreadable {
            reason: e.to_string(),
        })?;
    match view.tag {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(tag)) => Ok(tag),
        Some(other) => Err(BodyElementError::Unreadable {
            reason: format!("type must be a string, got {other}"),
        }),
    }
}
