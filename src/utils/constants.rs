//! Constants Module - Single Source of Truth
//!
//! Defaults, limits and fixed names shared by the service, the CLI and the
//! configuration layer.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "GeoPhoto";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// SERVER DEFAULTS
// ============================================

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_PORT: u16 = 8080;

/// Default upload limit: 16 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Default telemetry export directory
pub const DEFAULT_TELEMETRY_DIR: &str = "./telemetry";

/// Image extensions accepted by default
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 8] =
    ["jpg", "jpeg", "png", "tif", "tiff", "webp", "heic", "heif"];

/// Multipart field carrying the uploaded photo
pub const UPLOAD_FIELD_NAME: &str = "photo";

/// Rate limiter: requests per window
pub const RATE_LIMIT_REQUESTS: u32 = 100;

/// Rate limiter: window length (seconds)
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Rate limiter: stale entry sweep interval (seconds)
pub const RATE_LIMIT_CLEANUP_SECS: u64 = 120;

// ============================================
// GEOGRAPHY
// ============================================

/// Valid latitude range (degrees, inclusive)
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitude range (degrees, inclusive)
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Map link prefix; the coordinate is appended as `<lat>,<lon>`
pub const MAP_LINK_BASE: &str = "https://www.google.com/maps?q=";

// ============================================
// EXIF NAMES
// ============================================

/// Top-level key holding the GPS sub-IFD
pub const GPS_INFO_TAG: &str = "GPSInfo";

pub const GPS_LATITUDE_REF: &str = "GPSLatitudeRef";
pub const GPS_LATITUDE: &str = "GPSLatitude";
pub const GPS_LONGITUDE_REF: &str = "GPSLongitudeRef";
pub const GPS_LONGITUDE: &str = "GPSLongitude";

/// Check whether `ext` (without dot, any case) is one of `allowed`
pub fn is_allowed_extension(ext: &str, allowed: &[String]) -> bool {
    let ext = ext.to_ascii_lowercase();
    allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext))
}

/// Default extension allow-list as owned strings
pub fn default_allowed_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extension_case_insensitive() {
        let allowed = default_allowed_extensions();
        assert!(is_allowed_extension("JPG", &allowed));
        assert!(is_allowed_extension("tiff", &allowed));
        assert!(!is_allowed_extension("gif", &allowed));
    }

    #[test]
    fn test_ranges_inclusive() {
        assert!(LATITUDE_RANGE.contains(&90.0));
        assert!(LATITUDE_RANGE.contains(&-90.0));
        assert!(!LATITUDE_RANGE.contains(&90.0000001));
        assert!(LONGITUDE_RANGE.contains(&-180.0));
        assert!(!LONGITUDE_RANGE.contains(&f64::NAN));
    }
}
