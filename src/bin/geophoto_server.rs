//! GeoPhoto Web Server
//!
//! Upload form plus JSON API for locating photos from their EXIF GPS tags
//!
//! Usage:
//!   cargo run --bin geophoto_server
//!
//! Environment:
//!   PORT / GEOPHOTO_PORT         - Server port (default: 8080)
//!   GEOPHOTO_HOST                - Server host (default: 0.0.0.0)
//!   GEOPHOTO_MAX_UPLOAD_BYTES    - Upload limit (default: 16 MiB)
//!   GEOPHOTO_ALLOWED_EXTENSIONS  - Comma list of accepted extensions
//!   GEOPHOTO_TELEMETRY_DIR       - Stats export directory (default: ./telemetry)
//!   RUST_LOG                     - Log level (default: info)

use geophoto::api::{create_router, start_cleanup_task, AppState};
use geophoto::utils::{init_logging, APP_NAME, APP_VERSION};
use geophoto::{AppConfig, TelemetryCollector};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_logging("info");

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;

    info!("📷 {} v{}", APP_NAME, APP_VERSION);
    config.log_summary();

    let telemetry = Arc::new(TelemetryCollector::with_config(
        config.telemetry_dir.clone(),
        1000,
    ));
    let telemetry_for_shutdown = telemetry.clone();

    let state = Arc::new(AppState::new(config, telemetry));

    // Start background cleanup task for rate limiter
    start_cleanup_task();
    info!("🧹 Background cleanup task started");

    let app = create_router(state);

    info!("🚀 {} starting on http://{}", APP_NAME, addr);
    info!("");
    info!("Endpoints:");
    info!("  GET  /              - Upload form");
    info!("  POST /              - Upload a photo (form field: photo)");
    info!("  POST /v1/extract    - Upload a photo, JSON result");
    info!("  GET  /v1/stats      - Upload statistics");
    info!("  GET  /v1/health     - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 Shutdown signal received, cleaning up...");

    let stats = telemetry_for_shutdown.get_stats();
    println!("{}", stats.summary());

    match telemetry_for_shutdown.export_stats_json() {
        Ok(path) => info!("   ✅ Stats exported to: {}", path.display()),
        Err(e) => warn!("   ⚠️ Failed to export stats: {}", e),
    }

    info!("👋 {} shutdown complete", APP_NAME);

    Ok(())
}
