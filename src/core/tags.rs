//! GPS IFD tag-name table
//!
//! Maps numeric GPS tag identifiers to their canonical EXIF names. The table
//! is handed to the extractor explicitly so tests can swap in partial or
//! custom tables.

use std::collections::HashMap;

use crate::models::types::TagKey;

/// Standard EXIF 2.3 GPS IFD tags
const STANDARD_GPS_TAGS: [(u16, &str); 32] = [
    (0, "GPSVersionID"),
    (1, "GPSLatitudeRef"),
    (2, "GPSLatitude"),
    (3, "GPSLongitudeRef"),
    (4, "GPSLongitude"),
    (5, "GPSAltitudeRef"),
    (6, "GPSAltitude"),
    (7, "GPSTimeStamp"),
    (8, "GPSSatellites"),
    (9, "GPSStatus"),
    (10, "GPSMeasureMode"),
    (11, "GPSDOP"),
    (12, "GPSSpeedRef"),
    (13, "GPSSpeed"),
    (14, "GPSTrackRef"),
    (15, "GPSTrack"),
    (16, "GPSImgDirectionRef"),
    (17, "GPSImgDirection"),
    (18, "GPSMapDatum"),
    (19, "GPSDestLatitudeRef"),
    (20, "GPSDestLatitude"),
    (21, "GPSDestLongitudeRef"),
    (22, "GPSDestLongitude"),
    (23, "GPSDestBearingRef"),
    (24, "GPSDestBearing"),
    (25, "GPSDestDistanceRef"),
    (26, "GPSDestDistance"),
    (27, "GPSProcessingMethod"),
    (28, "GPSAreaInformation"),
    (29, "GPSDateStamp"),
    (30, "GPSDifferential"),
    (31, "GPSHPositioningError"),
];

/// Read-only lookup from GPS tag id to canonical name
#[derive(Debug, Clone)]
pub struct GpsTagTable {
    names: HashMap<u16, String>,
}

impl GpsTagTable {
    /// Full standard GPS IFD table
    pub fn standard() -> Self {
        Self::from_entries(STANDARD_GPS_TAGS.iter().copied())
    }

    /// Table built from arbitrary `(id, name)` pairs
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (u16, &'a str)>) -> Self {
        Self {
            names: entries
                .into_iter()
                .map(|(id, name)| (id, name.to_string()))
                .collect(),
        }
    }

    pub fn name_of(&self, id: u16) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Canonical key for `key`; unknown ids and names pass through untouched
    pub fn rename(&self, key: &TagKey) -> TagKey {
        match key {
            TagKey::Id(id) => match self.name_of(*id) {
                Some(name) => TagKey::Name(name.to_string()),
                None => TagKey::Id(*id),
            },
            TagKey::Name(_) => key.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for GpsTagTable {
    fn default() -> Self {
        Self::standard()
    }
}
