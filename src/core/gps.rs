//! GPS coordinate extraction
//!
//! Locates the `GPSInfo` sub-IFD in a decoded tag mapping, renames its
//! numeric keys through a [`GpsTagTable`], converts latitude and longitude
//! from DMS and range-checks the result.
//!
//! [`GpsExtractor::extract_lat_lon`] is strictly present-and-valid or
//! `None`. [`GpsExtractor::try_extract`] reports why extraction failed, for
//! logs and counters only.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::dms::{try_to_decimal, DmsError, RefChar};
use super::tags::GpsTagTable;
use crate::models::types::{TagMapping, TagValue};
use crate::utils::constants::{
    GPS_INFO_TAG, GPS_LATITUDE, GPS_LATITUDE_REF, GPS_LONGITUDE, GPS_LONGITUDE_REF,
    LATITUDE_RANGE, LONGITUDE_RANGE, MAP_LINK_BASE,
};

/// Validated latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedCoordinate")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Wire shape of a coordinate before range validation
#[derive(Deserialize)]
struct UncheckedCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<UncheckedCoordinate> for Coordinate {
    type Error = String;

    fn try_from(raw: UncheckedCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude).ok_or_else(|| {
            format!("coordinate out of range ({}, {})", raw.latitude, raw.longitude)
        })
    }
}

impl Coordinate {
    /// Build a coordinate, rejecting out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if LATITUDE_RANGE.contains(&latitude) && LONGITUDE_RANGE.contains(&longitude) {
            Some(Self { latitude, longitude })
        } else {
            None
        }
    }

    /// `https://www.google.com/maps?q=<lat>,<lon>`
    pub fn map_link(&self) -> String {
        format!("{}{},{}", MAP_LINK_BASE, self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Reason a mapping yielded no coordinate
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionFailure {
    /// No `GPSInfo` entry, or it is not a nested mapping
    MissingGpsBlock,
    /// A required GPS field is absent after renaming
    MissingRequiredField(&'static str),
    /// A DMS value or hemisphere reference could not be interpreted
    UnconvertibleComponent { field: &'static str, detail: String },
    /// Converted values fall outside geographic bounds
    OutOfRange { latitude: f64, longitude: f64 },
}

impl ExtractionFailure {
    /// Short stable label for counters
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionFailure::MissingGpsBlock => "missing_gps_block",
            ExtractionFailure::MissingRequiredField(_) => "missing_required_field",
            ExtractionFailure::UnconvertibleComponent { .. } => "unconvertible_component",
            ExtractionFailure::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionFailure::MissingGpsBlock => f.write_str("no GPS block"),
            ExtractionFailure::MissingRequiredField(name) => write!(f, "missing {}", name),
            ExtractionFailure::UnconvertibleComponent { field, detail } => {
                write!(f, "{}: {}", field, detail)
            }
            ExtractionFailure::OutOfRange { latitude, longitude } => {
                write!(f, "coordinate out of range ({}, {})", latitude, longitude)
            }
        }
    }
}

/// Stateless GPS extractor; share freely across threads
#[derive(Debug, Clone, Default)]
pub struct GpsExtractor {
    table: GpsTagTable,
}

impl GpsExtractor {
    pub fn new(table: GpsTagTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &GpsTagTable {
        &self.table
    }

    /// Coordinate from a decoded mapping, or `None`
    pub fn extract_lat_lon(&self, exif: &TagMapping) -> Option<Coordinate> {
        match self.try_extract(exif) {
            Ok(coordinate) => Some(coordinate),
            Err(failure) => {
                debug!(kind = failure.kind(), reason = %failure, "No GPS coordinate");
                None
            }
        }
    }

    /// Same as [`extract_lat_lon`](Self::extract_lat_lon) with the failure kind
    pub fn try_extract(&self, exif: &TagMapping) -> Result<Coordinate, ExtractionFailure> {
        let gps_block = exif
            .get_named(GPS_INFO_TAG)
            .and_then(TagValue::as_mapping)
            .ok_or(ExtractionFailure::MissingGpsBlock)?;

        let gps = self.rename(gps_block);

        let lat_value = required(&gps, GPS_LATITUDE)?;
        let lat_ref = required(&gps, GPS_LATITUDE_REF)?;
        let lon_value = required(&gps, GPS_LONGITUDE)?;
        let lon_ref = required(&gps, GPS_LONGITUDE_REF)?;

        let latitude = convert_axis(GPS_LATITUDE, lat_value, GPS_LATITUDE_REF, lat_ref)?;
        let longitude = convert_axis(GPS_LONGITUDE, lon_value, GPS_LONGITUDE_REF, lon_ref)?;

        Coordinate::new(latitude, longitude)
            .ok_or(ExtractionFailure::OutOfRange { latitude, longitude })
    }

    /// Copy of the GPS sub-mapping keyed by canonical names
    pub fn rename(&self, gps_block: &TagMapping) -> TagMapping {
        gps_block
            .iter()
            .map(|(key, value)| (self.table.rename(key), value.clone()))
            .collect()
    }
}

fn required<'a>(gps: &'a TagMapping, name: &'static str) -> Result<&'a TagValue, ExtractionFailure> {
    gps.get_named(name)
        .ok_or(ExtractionFailure::MissingRequiredField(name))
}

fn convert_axis(
    field: &'static str,
    dms: &TagValue,
    ref_field: &'static str,
    ref_value: &TagValue,
) -> Result<f64, ExtractionFailure> {
    let reference = RefChar::from_tag_value(ref_value).ok_or_else(|| {
        ExtractionFailure::UnconvertibleComponent {
            field: ref_field,
            detail: format!("invalid reference {}", ref_value),
        }
    })?;

    try_to_decimal(dms, reference).map_err(|e: DmsError| {
        ExtractionFailure::UnconvertibleComponent {
            field,
            detail: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dms(d: i64, m: i64, s: i64) -> TagValue {
        TagValue::List(vec![
            TagValue::Rational(d, 1),
            TagValue::Rational(m, 1),
            TagValue::Rational(s, 1),
        ])
    }

    fn text(s: &str) -> TagValue {
        TagValue::Text(s.to_string())
    }

    fn mapping_with_gps(gps: TagMapping) -> TagMapping {
        let mut exif = TagMapping::new();
        exif.insert("Make", text("TestCam"));
        exif.insert(GPS_INFO_TAG, TagValue::Ifd(gps));
        exif
    }

    fn pittsburgh_gps() -> TagMapping {
        vec![
            (1u16, text("N")),
            (2u16, dms(40, 26, 46)),
            (3u16, text("W")),
            (4u16, dms(79, 58, 56)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_full_extraction() {
        let extractor = GpsExtractor::default();
        let coord = extractor
            .extract_lat_lon(&mapping_with_gps(pittsburgh_gps()))
            .unwrap();
        assert!((coord.latitude - 40.446111).abs() < 1e-4);
        assert!((coord.longitude + 79.982222).abs() < 1e-4);
    }

    #[test]
    fn test_missing_gps_block() {
        let mut exif = TagMapping::new();
        exif.insert("Make", text("TestCam"));
        let extractor = GpsExtractor::default();
        assert_eq!(extractor.extract_lat_lon(&exif), None);
        assert_eq!(extractor.try_extract(&exif), Err(ExtractionFailure::MissingGpsBlock));
    }

    #[test]
    fn test_gps_block_not_a_mapping() {
        let mut exif = TagMapping::new();
        exif.insert(GPS_INFO_TAG, TagValue::Integer(26));
        assert_eq!(
            GpsExtractor::default().try_extract(&exif),
            Err(ExtractionFailure::MissingGpsBlock)
        );
    }

    #[test]
    fn test_each_required_field_missing() {
        let extractor = GpsExtractor::default();
        for (id, name) in [
            (1u16, GPS_LATITUDE_REF),
            (2, GPS_LATITUDE),
            (3, GPS_LONGITUDE_REF),
            (4, GPS_LONGITUDE),
        ] {
            let gps: TagMapping = pittsburgh_gps()
                .iter()
                .filter(|(key, _)| **key != id.into())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            let exif = mapping_with_gps(gps);
            assert_eq!(extractor.extract_lat_lon(&exif), None);
            assert_eq!(
                extractor.try_extract(&exif),
                Err(ExtractionFailure::MissingRequiredField(name))
            );
        }
    }

    #[test]
    fn test_deserialize_checks_range() {
        let coord: Coordinate =
            serde_json::from_str(r#"{"latitude":40.5,"longitude":-79.9}"#).unwrap();
        assert_eq!(coord, Coordinate::new(40.5, -79.9).unwrap());

        assert!(serde_json::from_str::<Coordinate>(r#"{"latitude":500.0,"longitude":-999.0}"#).is_err());
        assert!(serde_json::from_str::<Coordinate>(r#"{"latitude":0.0,"longitude":180.5}"#).is_err());
    }

    #[test]
    fn test_partial_table_leaves_ids_unrenamed() {
        let table = GpsTagTable::from_entries([(1, GPS_LATITUDE_REF), (2, GPS_LATITUDE)]);
        let extractor = GpsExtractor::new(table);
        let exif = mapping_with_gps(pittsburgh_gps());

        let renamed = extractor.rename(exif.get_named(GPS_INFO_TAG).unwrap().as_mapping().unwrap());
        assert!(renamed.get_named(GPS_LATITUDE).is_some());
        assert!(renamed.contains_key(&4u16.into()));
        // Longitude is looked up before its reference
        assert_eq!(
            extractor.try_extract(&exif),
            Err(ExtractionFailure::MissingRequiredField(GPS_LONGITUDE))
        );
    }

    #[test]
    fn test_custom_table() {
        let table = GpsTagTable::from_entries([
            (101, GPS_LATITUDE_REF),
            (102, GPS_LATITUDE),
            (103, GPS_LONGITUDE_REF),
            (104, GPS_LONGITUDE),
        ]);
        let gps: TagMapping = vec![
            (101u16, text("S")),
            (102u16, dms(33, 52, 8)),
            (103u16, text("E")),
            (104u16, dms(151, 12, 30)),
        ]
        .into_iter()
        .collect();

        let coord = GpsExtractor::new(table)
            .extract_lat_lon(&mapping_with_gps(gps))
            .unwrap();
        assert!(coord.latitude < -33.86 && coord.latitude > -33.87);
        assert!(coord.longitude > 151.2);
    }

    #[test]
    fn test_latitude_boundary() {
        let extractor = GpsExtractor::default();

        let exact: TagMapping = vec![
            (1u16, text("N")),
            (2u16, dms(90, 0, 0)),
            (3u16, text("E")),
            (4u16, dms(180, 0, 0)),
        ]
        .into_iter()
        .collect();
        let coord = extractor.extract_lat_lon(&mapping_with_gps(exact)).unwrap();
        assert_eq!(coord.latitude, 90.0);
        assert_eq!(coord.longitude, 180.0);

        let over: TagMapping = vec![
            (1u16, text("N")),
            (2u16, TagValue::List(vec![TagValue::Float(90.0000001), TagValue::Integer(0), TagValue::Integer(0)])),
            (3u16, text("E")),
            (4u16, dms(10, 0, 0)),
        ]
        .into_iter()
        .collect();
        let exif = mapping_with_gps(over);
        assert_eq!(extractor.extract_lat_lon(&exif), None);
        assert!(matches!(
            extractor.try_extract(&exif),
            Err(ExtractionFailure::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_malformed_degrees() {
        let mut gps = pittsburgh_gps();
        gps.insert(
            2u16,
            TagValue::List(vec![
                TagValue::Empty,
                TagValue::Rational(1, 2),
                TagValue::Rational(3, 1),
            ]),
        );
        let exif = mapping_with_gps(gps);
        let extractor = GpsExtractor::default();

        assert_eq!(extractor.extract_lat_lon(&exif), None);
        assert_eq!(
            extractor.try_extract(&exif).unwrap_err().kind(),
            "unconvertible_component"
        );
    }

    #[test]
    fn test_invalid_reference() {
        let mut gps = pittsburgh_gps();
        gps.insert(3u16, text("Q"));
        assert_eq!(GpsExtractor::default().extract_lat_lon(&mapping_with_gps(gps)), None);
    }

    #[test]
    fn test_map_link() {
        let coord = Coordinate::new(40.5, -79.25).unwrap();
        assert_eq!(coord.map_link(), "https://www.google.com/maps?q=40.5,-79.25");
        assert!(Coordinate::new(0.0, 180.5).is_none());
    }
}
