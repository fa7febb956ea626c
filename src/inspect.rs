//! Per-file GPS report used by the `geophoto` CLI

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::core::gps::{Coordinate, GpsExtractor};
use crate::utils::decoder::ExifDecoder;

/// What was found in one image file
#[derive(Debug, Serialize)]
pub struct Report {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    /// Set when the file could not be read or decoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Every decoded tag, only when a dump was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<BTreeMap<String, String>>,
}

/// Decode `path` and locate it
pub fn inspect(extractor: &GpsExtractor, path: &Path, dump: bool) -> Report {
    let shown = path.display().to_string();

    match ExifDecoder::decode_file(path) {
        Ok(mapping) => {
            let coordinate = extractor.extract_lat_lon(&mapping);
            Report {
                path: shown,
                map_url: coordinate.map(|c| c.map_link()),
                coordinate,
                error: None,
                exif: dump.then(|| mapping.to_display_strings()),
            }
        }
        Err(e) => {
            warn!(path = %shown, code = e.code_str(), "{}", e.message);
            Report {
                path: shown,
                coordinate: None,
                map_url: None,
                error: Some(e.message),
                exif: None,
            }
        }
    }
}
