//! Configuration module for the GeoPhoto service
//!
//! All values come from the environment, falling back to the defaults in
//! `utils::constants`.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    default_allowed_extensions, DEFAULT_HOST, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
    DEFAULT_TELEMETRY_DIR,
};

/// Runtime configuration of the web service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Largest accepted request body (bytes)
    pub max_upload_bytes: usize,
    /// Lowercase file extensions accepted for upload
    pub allowed_extensions: Vec<String>,
    /// Where telemetry snapshots are written
    pub telemetry_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: default_allowed_extensions(),
            telemetry_dir: PathBuf::from(DEFAULT_TELEMETRY_DIR),
        }
    }
}

impl AppConfig {
    /// Load from process environment
    ///
    /// Hosting platforms set `PORT`; `GEOPHOTO_PORT` is the local override.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("GEOPHOTO_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("PORT").or_else(|| lookup("GEOPHOTO_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::invalid_config("PORT", &raw))?,
            None => defaults.port,
        };

        let max_upload_bytes = match lookup("GEOPHOTO_MAX_UPLOAD_BYTES") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(AppError::invalid_config("GEOPHOTO_MAX_UPLOAD_BYTES", &raw)),
            },
            None => defaults.max_upload_bytes,
        };

        let allowed_extensions = match lookup("GEOPHOTO_ALLOWED_EXTENSIONS") {
            Some(raw) => {
                let list = parse_extension_list(&raw);
                if list.is_empty() {
                    return Err(AppError::invalid_config("GEOPHOTO_ALLOWED_EXTENSIONS", &raw));
                }
                list
            }
            None => defaults.allowed_extensions,
        };

        let telemetry_dir = lookup("GEOPHOTO_TELEMETRY_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.telemetry_dir);

        Ok(Self {
            host,
            port,
            max_upload_bytes,
            allowed_extensions,
            telemetry_dir,
        })
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| AppError::invalid_config("GEOPHOTO_HOST", &self.host))
    }

    /// Log the effective configuration
    pub fn log_summary(&self) {
        info!("⚙️  Bind address: {}:{}", self.host, self.port);
        info!("⚙️  Max upload: {} bytes", self.max_upload_bytes);
        info!("⚙️  Allowed extensions: {}", self.allowed_extensions.join(", "));
        info!("⚙️  Telemetry dir: {}", self.telemetry_dir.display());
    }
}

/// `".JPG, png ,,tiff"` -> `["jpg", "png", "tiff"]`
fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
