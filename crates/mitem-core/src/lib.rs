//! # mitem-core — Schema Model for Mitems
//!
//! A mitem is an article-like content item (headline, images, body blocks,
//! metadata) sourced from external feeds. This crate defines the shapes a
//! raw mitem document decodes into. It holds no validation logic: the rules
//! live in `mitem-schema`, which walks these types.
//!
//! ## Modules
//!
//! - [`envelope`] — [`MitemTiniest`], the minimal envelope used for
//!   validation and extraction, with its category, ads policy, price and
//!   meta blocks.
//! - [`body`] — polymorphic body elements, decoded in two phases: read the
//!   `type` tag generically, then decode the record for that tag.
//! - [`mitem`] — the full editorial [`Mitem`] record.
//! - [`temporal`] — recognized date layouts and the UTC [`Timestamp`].
//! - [`error`] — the error hierarchy.
//! - [`de`] — lenient decoding helpers, including the object-only
//!   document decoder every `from_slice` goes through.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mitem-*` crates (leaf of the DAG).
//! - Decoding is lenient: unknown fields are ignored, absent or `null`
//!   fields take their zero value. Decode errors are reserved for malformed
//!   JSON and fields of the wrong JSON type.
//! - No `unsafe`, no `.unwrap()` outside tests.

pub mod body;
pub mod de;
pub mod envelope;
pub mod error;
pub mod mitem;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use body::{
    read_element_type, Body, BodyElement, BodyElementError, ElementKind, GalleryBlock,
    ImageBlock, TextBlock, VideoBlock, VideoType,
};
pub use envelope::{
    AdsPolicy, Category, LicenseType, MetaTiniest, MitemTiniest, Price, Tag, STATUS_DELETE,
};
pub use de::from_object_slice;
pub use error::{DateParseError, MitemError};
pub use mitem::{Analytics, Author, Colour, Mitem, MitemMeta, MosaiqPrimary, Section, SectionPlaylist};
pub use temporal::{DateLayout, DateParser, LayoutKind, Timestamp, RECOGNIZED_LAYOUTS};
