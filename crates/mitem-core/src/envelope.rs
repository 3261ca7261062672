//! # Envelope — The Tiniest Mitem
//!
//! [`MitemTiniest`] is the smallest decoded shape of a mitem that still
//! carries everything validation and field extraction need. It is decoded
//! fresh for each call and never shared.
//!
//! ## Key Casing
//!
//! Fields use camelCase wire names (`sourceURL`, `licenseType`,
//! `mainImage`, `adsPolicy`). Older feeds send the lowercase spelling
//! (`licensetype`, `mainimage`, `adspolicy`); both are accepted. Other
//! spellings are ignored like any unknown key. A document carrying both
//! spellings of one field is a decode error.
//!
//! ## Lenient Decoding
//!
//! Every field is optional at decode time and `null` is read as the zero
//! value. Presence rules are enforced by the validator, not by serde.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::body::{Body, ImageBlock};
use crate::de::{from_object_slice, null_as_default};
use crate::error::MitemError;

/// Status value marking a mitem for deletion.
pub const STATUS_DELETE: i64 = 1;

/// Mitem metadata plus its raw body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MitemTiniest {
    #[serde(
        rename = "sourceURL",
        alias = "sourceurl",
        deserialize_with = "null_as_default"
    )]
    pub source_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub mitem_type: String,
    #[serde(
        rename = "licenseType",
        alias = "licensetype",
        deserialize_with = "null_as_default"
    )]
    pub license_type: String,
    #[serde(
        rename = "licenseText",
        alias = "licensetext",
        deserialize_with = "null_as_default"
    )]
    pub license_text: String,
    #[serde(
        rename = "licensePromo",
        alias = "licensepromo",
        deserialize_with = "null_as_default"
    )]
    pub license_promo: String,
    #[serde(
        rename = "mainImage",
        alias = "mainimage",
        deserialize_with = "null_as_default"
    )]
    pub main_image: ImageBlock,
    #[serde(deserialize_with = "null_as_default")]
    pub headline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: Price,
    #[serde(deserialize_with = "null_as_default")]
    pub category: Category,
    #[serde(
        rename = "adsPolicy",
        alias = "adspolicy",
        deserialize_with = "null_as_default"
    )]
    pub ads_policy: AdsPolicy,
    #[serde(deserialize_with = "null_as_default")]
    pub meta: MetaTiniest,
    #[serde(deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub body: Body,
}

impl MitemTiniest {
    /// Decode an envelope from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MitemError::Json`] if the bytes are not a JSON object of
    /// the envelope's shape.
    pub fn from_slice(raw: &[u8]) -> Result<Self, MitemError> {
        Ok(from_object_slice(raw)?)
    }

    /// The license type, if it is one of the supported values.
    pub fn license(&self) -> Result<LicenseType, MitemError> {
        self.license_type.parse()
    }

    /// Whether the mitem is flagged for deletion.
    pub fn is_marked_for_deletion(&self) -> bool {
        self.status == STATUS_DELETE
    }
}

/// Two-tier category taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    #[serde(deserialize_with = "null_as_default")]
    pub tier1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tier2: String,
}

impl Category {
    /// Separator between tiers in a rendered path.
    pub const SEPARATOR: &'static str = ">";

    /// Create a category from its two tiers.
    pub fn new(tier1: impl Into<String>, tier2: impl Into<String>) -> Self {
        Self {
            tier1: tier1.into(),
            tier2: tier2.into(),
        }
    }

    /// Render the category path: `tier1>tier2` when both tiers are set,
    /// otherwise `tier1` alone. A missing `tier1` renders as `""` even if
    /// `tier2` is set.
    pub fn path(&self) -> String {
        let mut path = self.tier1.clone();
        if !path.is_empty() && !self.tier2.is_empty() {
            path.push_str(Self::SEPARATOR);
            path.push_str(&self.tier2);
        }
        path
    }
}

/// Ads policy enforced by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdsPolicy {
    #[serde(deserialize_with = "null_as_default")]
    pub on: bool,
    #[serde(rename = "maxAds", alias = "maxads", deserialize_with = "null_as_default")]
    pub max_ads: i64,
}

/// Price of paid content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    #[serde(deserialize_with = "null_as_default")]
    pub value: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
}

/// The metadata subset carried by the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaTiniest {
    #[serde(
        rename = "logoURL",
        alias = "logourl",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub logo_url: String,
    #[serde(
        rename = "mosaiqPrimary",
        alias = "mosaiqprimary",
        skip_serializing_if = "std::ops::Not::not",
        deserialize_with = "null_as_default"
    )]
    pub mosaiq_primary: bool,
    #[serde(
        rename = "userEdited",
        alias = "useredited",
        skip_serializing_if = "std::ops::Not::not",
        deserialize_with = "null_as_default"
    )]
    pub user_edited: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

/// A tag attached to a mitem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(
        rename = "type",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub tag_type: String,
}

/// Licensing model of a mitem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    Editorial,
    Sponsored,
}

impl LicenseType {
    /// Human-readable list of accepted values.
    pub const EXPECTED: &'static str = "editorial or sponsored";

    /// The wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editorial => "editorial",
            Self::Sponsored => "sponsored",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseType {
    type Err = MitemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editorial" => Ok(Self::Editorial),
            "sponsored" => Ok(Self::Sponsored),
            other => Err(MitemError::InvalidValue {
                field: "licenseType",
                value: other.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}
