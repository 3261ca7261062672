//! # Editorial Mitem Record
//!
//! The complete article record as it is stored and rendered downstream, as
//! opposed to the [`MitemTiniest`](crate::MitemTiniest) envelope used for
//! validation. Decoding follows the same lenient rules: unknown fields are
//! ignored, absent or `null` fields take their zero value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::body::{Body, ImageBlock};
use crate::de::{from_object_slice, null_as_default};
use crate::envelope::{AdsPolicy, Tag, STATUS_DELETE};
use crate::error::MitemError;

/// A complete mitem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mitem {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub mitem_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub headline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(rename = "mainImage", deserialize_with = "null_as_default")]
    pub main_image: ImageBlock,
    #[serde(rename = "creationDate")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub body: Body,
    #[serde(deserialize_with = "null_as_default")]
    pub meta: MitemMeta,
}

impl Mitem {
    /// Decode a mitem from raw JSON bytes.
    pub fn from_slice(raw: &[u8]) -> Result<Self, MitemError> {
        Ok(from_object_slice(raw)?)
    }

    /// Whether the mitem is flagged for deletion.
    pub fn is_marked_for_deletion(&self) -> bool {
        self.status == STATUS_DELETE
    }

    /// Author names, skipping authors without one.
    pub fn author_names(&self) -> Vec<&str> {
        self.meta
            .authors
            .iter()
            .map(|a| a.name.as_str())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Metadata attached to a mitem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MitemMeta {
    /// ID of the playlist the mitem was first added to.
    #[serde(rename = "sourceID", deserialize_with = "null_as_default")]
    pub source_id: String,
    /// Origin URL, e.g. `https://bbc.co.uk`.
    #[serde(rename = "sourceURL", deserialize_with = "null_as_default")]
    pub source_url: String,
    /// Magazine logo shown in the rendered article.
    #[serde(rename = "logoURL", deserialize_with = "null_as_default")]
    pub logo_url: String,
    #[serde(rename = "mosaiqPrimary", deserialize_with = "null_as_default")]
    pub mosaiq_primary: MosaiqPrimary,
    /// Edited by hand in the admin tool.
    #[serde(rename = "userEdited", deserialize_with = "null_as_default")]
    pub user_edited: bool,
    /// Excluded from playlists by default.
    #[serde(deserialize_with = "null_as_default")]
    pub inactive: bool,
    /// Free-form license payload.
    pub license: Option<serde_json::Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub analytics: Vec<Analytics>,
    #[serde(deserialize_with = "null_as_default")]
    pub authors: Vec<Author>,
    #[serde(rename = "sectionPlaylist", deserialize_with = "null_as_default")]
    pub section_playlist: Vec<SectionPlaylist>,
    #[serde(deserialize_with = "null_as_default")]
    pub section: Section,
    #[serde(rename = "adsPolicy", deserialize_with = "null_as_default")]
    pub ads_policy: AdsPolicy,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

/// Set when the article was authored in-house rather than pulled from a feed.
/// `domain` feeds the canonical link of the rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaiqPrimary {
    #[serde(deserialize_with = "null_as_default")]
    pub set: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
}

/// Secondary analytics destination (e.g. `ga` with a tracking ID).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub analytics_type: String,
    #[serde(rename = "ID", deserialize_with = "null_as_default")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "playlistName", deserialize_with = "null_as_default")]
    pub playlist_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionPlaylist {
    #[serde(rename = "displayName", deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(rename = "playlistName", deserialize_with = "null_as_default")]
    pub playlist_name: String,
}

/// Taxonomy section with its display colours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    #[serde(rename = "color", deserialize_with = "null_as_default")]
    pub colour: Colour,
    #[serde(deserialize_with = "null_as_default")]
    pub gradient: Colour,
    #[serde(deserialize_with = "null_as_default")]
    pub tier1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tier2: String,
}

/// An HSL colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colour {
    #[serde(rename = "h")]
    pub hue: f64,
    #[serde(rename = "s")]
    pub saturation: f64,
    #[serde(rename = "l")]
    pub lum: f64,
}

impl Colour {
    /// The colour used when a feed gives none, or an unusable one.
    pub const BLANK: Colour = Colour {
        hue: 0.0,
        saturation: 0.0,
        lum: 0.0,
    };

    /// Parse a `hue|saturation|lum` string. Anything unusable yields
    /// [`Colour::BLANK`]; components past the third are ignored.
    pub fn parse(s: &str) -> Colour {
        if s.is_empty() {
            return Self::BLANK;
        }
        let parts: Vec<&str> = s.split('|').collect();
        if parts.len() < 3 {
            return Self::BLANK;
        }
        let component = |name: &str, raw: &str| match raw.parse::<f64>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::error!(component = name, value = raw, error = %e, "cannot convert colour component into numeric");
                None
            }
        };
        let parsed = component("hue", parts[0]).and_then(|hue| {
            let saturation = component("saturation", parts[1])?;
            let lum = component("lum", parts[2])?;
            Some(Colour {
                hue,
                saturation,
                lum,
            })
        });
        parsed.unwrap_or(Self::BLANK)
    }
}
