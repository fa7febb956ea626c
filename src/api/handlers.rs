//! API Request Handlers

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Json, Multipart, State},
    http::StatusCode,
    response::Html,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use super::templates::{render_page, PageView};
use super::types::*;
use crate::core::gps::{Coordinate, GpsExtractor};
use crate::models::config::AppConfig;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::telemetry::{TelemetryCollector, TelemetryEvent, UploadOutcome};
use crate::utils::constants::{is_allowed_extension, UPLOAD_FIELD_NAME};
use crate::utils::decoder::ExifDecoder;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub extractor: Arc<GpsExtractor>,
    pub telemetry: Arc<TelemetryCollector>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, telemetry: Arc<TelemetryCollector>) -> Self {
        Self::with_extractor(config, telemetry, GpsExtractor::default())
    }

    pub fn with_extractor(
        config: AppConfig,
        telemetry: Arc<TelemetryCollector>,
        extractor: GpsExtractor,
    ) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
            telemetry,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// The `photo` part of a multipart form
pub struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

/// Result of decoding one upload
pub struct UploadResult {
    pub filename: String,
    pub size_bytes: usize,
    pub coordinate: Option<Coordinate>,
    pub exif: BTreeMap<String, String>,
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// HTML Form
// ============================================

pub async fn index() -> Html<String> {
    Html(render_page(&PageView::form()))
}

pub async fn upload_form(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Html<String> {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Form post without multipart body: {}", rejection);
            record_rejected(&state);
            return Html(render_page(&PageView::error(AppError::missing_file().message)));
        }
    };

    let view = match run_upload(&state, multipart).await {
        Ok(result) => PageView::result(result.filename, result.coordinate, result.exif),
        Err(e) if e.code == ErrorCode::ExifDecodeFailed => {
            PageView::error(format!("Could not open the image. Error: {}", e.message))
        }
        Err(e) => PageView::error(e.message),
    };

    Html(render_page(&view))
}

// ============================================
// JSON Extraction
// ============================================

pub async fn extract(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<ExtractionData>>, (StatusCode, Json<ApiResponse<()>>)> {
    let start = Instant::now();

    let upload = match multipart {
        Ok(multipart) => run_upload(&state, multipart).await,
        Err(rejection) => {
            warn!("Extract request without multipart body: {}", rejection);
            record_rejected(&state);
            Err(AppError::bad_request(format!(
                "Expected a multipart/form-data body with a {} part: {}",
                UPLOAD_FIELD_NAME,
                rejection.body_text()
            )))
        }
    };

    match upload {
        Ok(result) => {
            let data = ExtractionData {
                filename: result.filename,
                size_bytes: result.size_bytes,
                coordinate: result.coordinate.map(Into::into),
                exif: result.exif,
            };
            Ok(Json(ApiResponse::success(
                data,
                start.elapsed().as_secs_f64() * 1000.0,
            )))
        }
        Err(e) => {
            let status = StatusCode::from_u16(e.code.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err((
                status,
                Json(ApiResponse::error(
                    ApiError::from(&e),
                    start.elapsed().as_secs_f64() * 1000.0,
                )),
            ))
        }
    }
}

// ============================================
// Stats / Telemetry
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let stats = state.telemetry.get_stats();

    let data = StatsData {
        total_processed: stats.total_processed,
        total_located: stats.total_located,
        total_no_gps: stats.total_no_gps,
        decode_failures: stats.decode_failures,
        rejected_uploads: stats.rejected_uploads,
        located_rate_percent: stats.located_rate(),
        no_gps_by_reason: stats.no_gps_by_reason.into_iter().collect(),
        avg_latency_ms: stats.avg_latency_ms,
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Helper Functions
// ============================================

/// Read, decode and locate one upload, recording telemetry for every outcome
pub async fn run_upload(state: &AppState, mut multipart: Multipart) -> AppResult<UploadResult> {
    let upload_id = Uuid::new_v4();
    let start = Instant::now();

    let upload = match read_upload(&mut multipart, &state.config.allowed_extensions).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!(upload_id = %upload_id, code = e.code_str(), "Upload rejected: {}", e.message);
            record_rejected(state);
            return Err(e);
        }
    };

    let size_bytes = upload.bytes.len();
    let extractor = Arc::clone(&state.extractor);
    let bytes = upload.bytes.clone();

    // Decoding is CPU-bound; keep it off the async workers
    let decoded = tokio::task::spawn_blocking(move || {
        ExifDecoder::decode(&bytes).map(|mapping| {
            let outcome = extractor.try_extract(&mapping);
            (mapping.to_display_strings(), outcome)
        })
    })
    .await
    .map_err(|e| AppError::internal(format!("Decoder task failed: {}", e)))?;

    let latency_ms = start.elapsed().as_millis() as u64;

    let (exif, outcome) = match decoded {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(upload_id = %upload_id, filename = %upload.filename, "EXIF decode failed: {}", e);
            state.telemetry.record(TelemetryEvent::new(
                UploadOutcome::DecodeFailed,
                None,
                size_bytes as u64,
                latency_ms,
            ));
            return Err(e);
        }
    };

    let coordinate = match outcome {
        Ok(coord) => {
            info!(
                upload_id = %upload_id,
                filename = %upload.filename,
                latitude = coord.latitude,
                longitude = coord.longitude,
                latency_ms,
                "📍 Photo located"
            );
            state.telemetry.record(TelemetryEvent::new(
                UploadOutcome::Located,
                None,
                size_bytes as u64,
                latency_ms,
            ));
            Some(coord)
        }
        Err(failure) => {
            info!(
                upload_id = %upload_id,
                filename = %upload.filename,
                reason = %failure,
                latency_ms,
                "No GPS data in photo"
            );
            state.telemetry.record(TelemetryEvent::new(
                UploadOutcome::NoGps,
                Some(failure.kind()),
                size_bytes as u64,
                latency_ms,
            ));
            None
        }
    };

    Ok(UploadResult {
        filename: upload.filename,
        size_bytes,
        coordinate,
        exif,
    })
}

/// Pull the `photo` part out of the form and validate it
pub async fn read_upload(multipart: &mut Multipart, allowed_extensions: &[String]) -> AppResult<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().trim().to_string();
        if filename.is_empty() {
            return Err(AppError::empty_filename());
        }

        let extension = Path::new(&filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        if !is_allowed_extension(&extension, allowed_extensions) {
            let shown = if extension.is_empty() { "(none)" } else { extension.as_str() };
            return Err(AppError::unsupported_type(shown));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Upload { filename, bytes });
    }

    Err(AppError::missing_file())
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::too_large()
    } else {
        AppError::malformed_upload(format!("Malformed upload: {}", err.body_text()))
    }
}

fn record_rejected(state: &AppState) {
    state
        .telemetry
        .record(TelemetryEvent::new(UploadOutcome::Rejected, None, 0, 0));
}
