//! Lenient field decoding shared by the schema model.

use serde::de::{DeserializeOwned, Error as _, Unexpected};
use serde::{Deserialize, Deserializer};

/// Decode a field, mapping JSON `null` to the type's zero value.
///
/// Upstream feeds write `null` for "no value" as often as they omit the key.
/// Both must land on the zero value so that the mandatory-field checks, not
/// the decoder, report the absence.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decode a struct from a document that must be a JSON object.
///
/// Derived struct decoders also accept a JSON array, filling fields by
/// position; a mitem is never positional, so arrays are rejected up front.
/// A top-level `null` is the zero value, like a `null` field.
pub fn from_object_slice<T>(raw: &[u8]) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    if raw.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'[') {
        return Err(serde_json::Error::invalid_type(
            Unexpected::Seq,
            &"a JSON object",
        ));
    }
    serde_json::from_slice::<Option<T>>(raw).map(Option::unwrap_or_default)
}
