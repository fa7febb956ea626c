//! GeoPhoto Library
//!
//! Reads EXIF metadata from uploaded photos and turns embedded GPS tags
//! into a decimal coordinate and a map link:
//! - `core`: DMS/rational conversion and GPS block extraction
//! - `utils::decoder`: image bytes to a tag mapping (kamadak-exif)
//! - `api`: axum upload form and JSON API
//! - `inspect`: per-file reports for the CLI

pub mod api;
pub mod core;
pub mod inspect;
pub mod models;
pub mod telemetry;
pub mod utils;

pub use crate::core::{
    to_decimal, to_float, Coordinate, ExtractionFailure, GpsExtractor, GpsTagTable, RawNumeric,
    RefChar,
};
pub use models::{AppConfig, AppError, AppResult, ErrorCode, TagKey, TagMapping, TagValue};
pub use telemetry::{TelemetryCollector, TelemetryEvent, TelemetryStats, UploadOutcome};
pub use utils::decoder::ExifDecoder;
