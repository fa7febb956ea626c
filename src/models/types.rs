//! Type definitions for decoded EXIF metadata
//! Raw tag keys/values as produced by the decoder, before any GPS conversion

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Key of an EXIF tag: numeric identifier or canonical name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum TagKey {
    /// Raw tag number (unknown tags, GPS sub-IFD entries)
    Id(u16),
    /// Canonical tag name (e.g. "DateTime", "GPSInfo")
    Name(String),
}

impl TagKey {
    pub fn name(name: impl Into<String>) -> Self {
        TagKey::Name(name.into())
    }
}

impl From<u16> for TagKey {
    fn from(id: u16) -> Self {
        TagKey::Id(id)
    }
}

impl From<&str> for TagKey {
    fn from(name: &str) -> Self {
        TagKey::Name(name.to_string())
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKey::Id(id) => write!(f, "{}", id),
            TagKey::Name(name) => f.write_str(name),
        }
    }
}

/// Raw tag value, as surfaced by the decoder
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Integer(i64),
    Float(f64),
    /// numerator / denominator
    Rational(i64, i64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<TagValue>),
    /// Nested IFD (e.g. the GPS sub-directory)
    Ifd(TagMapping),
    Empty,
}

impl TagValue {
    /// Text content, if this value is textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Nested mapping, if this value is an IFD
    pub fn as_mapping(&self) -> Option<&TagMapping> {
        match self {
            TagValue::Ifd(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Elements, if this value is a list
    pub fn as_list(&self) -> Option<&[TagValue]> {
        match self {
            TagValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Integer(v) => write!(f, "{}", v),
            TagValue::Float(v) => write!(f, "{}", v),
            TagValue::Rational(num, den) => write!(f, "{}/{}", num, den),
            TagValue::Text(s) => f.write_str(s),
            TagValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) if s.chars().all(|c| !c.is_control() || c.is_whitespace()) => {
                    f.write_str(s.trim_end_matches('\0'))
                }
                _ => {
                    for b in bytes {
                        write!(f, "{:02x}", b)?;
                    }
                    Ok(())
                }
            },
            TagValue::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            TagValue::Ifd(mapping) => {
                f.write_str("{")?;
                for (i, (key, value)) in mapping.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            TagValue::Empty => f.write_str("None"),
        }
    }
}

/// Mapping from tag key to raw value
///
/// Produced once per image by the decoder and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMapping {
    entries: BTreeMap<TagKey, TagValue>,
}

impl TagMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<TagKey>, value: TagValue) -> Option<TagValue> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &TagKey) -> Option<&TagValue> {
        self.entries.get(key)
    }

    /// Lookup by canonical name
    pub fn get_named(&self, name: &str) -> Option<&TagValue> {
        self.entries.get(&TagKey::Name(name.to_string()))
    }

    pub fn contains_key(&self, key: &TagKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TagKey, &TagValue)> {
        self.entries.iter()
    }

    /// Flatten to `name -> string` pairs for display
    pub fn to_display_strings(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

impl<K: Into<TagKey>> FromIterator<(K, TagValue)> for TagMapping {
    fn from_iter<I: IntoIterator<Item = (K, TagValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
