//! EXIF decoder module
//! Reads image bytes with kamadak-exif and flattens the primary image's
//! fields into a [`TagMapping`], with GPS fields nested under `GPSInfo`

use std::io::Cursor;
use std::path::Path;

use exif::{Context, Field, In, Reader, Tag, Value};
use tracing::debug;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{TagKey, TagMapping, TagValue};
use crate::utils::constants::GPS_INFO_TAG;

/// Decoder for EXIF metadata
pub struct ExifDecoder;

impl ExifDecoder {
    /// Decode EXIF from an in-memory image
    /// Returns an empty mapping when the image carries no EXIF block
    pub fn decode(bytes: &[u8]) -> AppResult<TagMapping> {
        let mut cursor = Cursor::new(bytes);
        let exif = match Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(container)) => {
                debug!(container, "No EXIF data in image");
                return Ok(TagMapping::new());
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorCode::ExifDecodeFailed,
                    format!("Could not read EXIF data: {}", e),
                    e,
                ))
            }
        };

        Ok(Self::build_mapping(exif.fields()))
    }

    /// Decode EXIF from a file on disk
    pub fn decode_file(path: &Path) -> AppResult<TagMapping> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Group primary-image fields: GPS context into the nested `GPSInfo`
    /// mapping keyed by tag number, everything else at the top level
    pub fn build_mapping<'a>(fields: impl Iterator<Item = &'a Field>) -> TagMapping {
        let mut top = TagMapping::new();
        let mut gps = TagMapping::new();

        for field in fields.filter(|f| f.ifd_num == In::PRIMARY) {
            if Self::is_pointer(field.tag) {
                continue;
            }
            let value = Self::convert_value(&field.value);
            if field.tag.context() == Context::Gps {
                gps.insert(field.tag.number(), value);
            } else {
                top.insert(Self::key_for(field.tag), value);
            }
        }

        if !gps.is_empty() {
            top.insert(GPS_INFO_TAG, TagValue::Ifd(gps));
        }
        top
    }

    /// Known tags by name, unknown ones by number
    fn key_for(tag: Tag) -> TagKey {
        match tag.description() {
            Some(_) => TagKey::Name(tag.to_string()),
            None => TagKey::Id(tag.number()),
        }
    }

    fn is_pointer(tag: Tag) -> bool {
        tag == Tag::ExifIFDPointer || tag == Tag::GPSInfoIFDPointer || tag == Tag::InteropIFDPointer
    }

    /// Convert a kamadak-exif value into a raw tag value
    pub fn convert_value(value: &Value) -> TagValue {
        match value {
            Value::Byte(v) => collapse(v.iter().map(|&b| TagValue::Integer(b as i64))),
            Value::SByte(v) => collapse(v.iter().map(|&b| TagValue::Integer(b as i64))),
            Value::Short(v) => collapse(v.iter().map(|&s| TagValue::Integer(s as i64))),
            Value::SShort(v) => collapse(v.iter().map(|&s| TagValue::Integer(s as i64))),
            Value::Long(v) => collapse(v.iter().map(|&l| TagValue::Integer(l as i64))),
            Value::SLong(v) => collapse(v.iter().map(|&l| TagValue::Integer(l as i64))),
            Value::Rational(v) => collapse(
                v.iter()
                    .map(|r| TagValue::Rational(r.num as i64, r.denom as i64)),
            ),
            Value::SRational(v) => collapse(
                v.iter()
                    .map(|r| TagValue::Rational(r.num as i64, r.denom as i64)),
            ),
            Value::Float(v) => collapse(v.iter().map(|&f| TagValue::Float(f as f64))),
            Value::Double(v) => collapse(v.iter().map(|&f| TagValue::Float(f))),
            Value::Ascii(strings) => match strings.first() {
                Some(s) => TagValue::Text(
                    String::from_utf8_lossy(s)
                        .trim_end_matches('\0')
                        .to_string(),
                ),
                None => TagValue::Empty,
            },
            Value::Undefined(bytes, _) => TagValue::Bytes(bytes.clone()),
            _ => TagValue::Empty,
        }
    }
}

/// Single element stays scalar, otherwise a list
fn collapse(values: impl Iterator<Item = TagValue>) -> TagValue {
    let mut items: Vec<TagValue> = values.collect();
    match items.len() {
        0 => TagValue::Empty,
        1 => items.remove(0),
        _ => TagValue::List(items),
    }
}
