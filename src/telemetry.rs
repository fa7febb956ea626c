//! Telemetry Module for GeoPhoto
//!
//! Counts upload outcomes for the `/v1/stats` endpoint and the shutdown
//! report.
//!
//! Privacy-first: no filenames, coordinates or image bytes are stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::utils::constants::{APP_NAME, DEFAULT_TELEMETRY_DIR};

/// Outcome of one processed upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UploadOutcome {
    /// Coordinate extracted
    Located,
    /// EXIF decoded but no usable GPS data
    NoGps,
    /// Image/EXIF could not be decoded
    DecodeFailed,
    /// Request rejected before decoding (missing file, bad type, too large)
    Rejected,
}

impl UploadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadOutcome::Located => "located",
            UploadOutcome::NoGps => "no_gps",
            UploadOutcome::DecodeFailed => "decode_failed",
            UploadOutcome::Rejected => "rejected",
        }
    }
}

/// Single telemetry event (anonymized)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Unix timestamp
    pub timestamp: u64,
    pub outcome: UploadOutcome,
    /// Failure kind when `outcome` is `NoGps` (e.g. "missing_gps_block")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Upload size in bytes
    pub size_bytes: u64,
    /// Processing latency in milliseconds
    pub latency_ms: u64,
}

impl TelemetryEvent {
    pub fn new(
        outcome: UploadOutcome,
        reason: Option<&str>,
        size_bytes: u64,
        latency_ms: u64,
    ) -> Self {
        Self {
            timestamp: current_timestamp(),
            outcome,
            reason: reason.map(str::to_string),
            size_bytes,
            latency_ms,
        }
    }
}

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryStats {
    /// Uploads that reached the decoder
    pub total_processed: u64,
    /// Uploads with a coordinate
    pub total_located: u64,
    /// Uploads decoded without usable GPS data
    pub total_no_gps: u64,
    /// Undecodable images
    pub decode_failures: u64,
    /// Rejected before decoding
    pub rejected_uploads: u64,
    /// No-GPS uploads by failure kind
    pub no_gps_by_reason: HashMap<String, u64>,
    /// Total bytes decoded
    pub total_bytes: u64,
    /// Average processing latency (ms)
    pub avg_latency_ms: f64,
    /// Period start timestamp
    pub period_start: u64,
    /// Period end timestamp
    pub period_end: u64,
}

impl TelemetryStats {
    /// Share of processed uploads that produced a coordinate, in percent
    pub fn located_rate(&self) -> f64 {
        if self.total_processed == 0 {
            0.0
        } else {
            self.total_located as f64 / self.total_processed as f64 * 100.0
        }
    }

    /// Human-readable report
    pub fn summary(&self) -> String {
        let period_minutes = self.period_end.saturating_sub(self.period_start) / 60;
        let mut reasons: Vec<_> = self.no_gps_by_reason.iter().collect();
        reasons.sort();

        let mut out = format!(
            r#"
╔══════════════════════════════════════════════════════════════════╗
║   📍 {} - UPLOAD REPORT
╠══════════════════════════════════════════════════════════════════╣
║   Period:              {} minutes
║   Uploads processed:   {:>10}
║   Located:             {:>10} ({:.1}%)
║   No GPS data:         {:>10}
║   Decode failures:     {:>10}
║   Rejected:            {:>10}
║   Avg latency:         {:>10.2}ms
"#,
            APP_NAME,
            period_minutes,
            self.total_processed,
            self.total_located,
            self.located_rate(),
            self.total_no_gps,
            self.decode_failures,
            self.rejected_uploads,
            self.avg_latency_ms,
        );
        for (reason, count) in reasons {
            out.push_str(&format!("║     - {:<24} {:>6}\n", reason, count));
        }
        out.push_str("╚══════════════════════════════════════════════════════════════════╝\n");
        out
    }

    /// Export as JSON for API
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Main telemetry collector
pub struct TelemetryCollector {
    /// Event buffer (in-memory)
    events: Arc<RwLock<Vec<TelemetryEvent>>>,
    /// Atomic counters for fast updates
    total_processed: AtomicU64,
    total_located: AtomicU64,
    total_no_gps: AtomicU64,
    decode_failures: AtomicU64,
    rejected_uploads: AtomicU64,
    total_bytes: AtomicU64,
    total_latency_ms: AtomicU64,
    /// No-GPS counters by failure kind
    reason_counts: Arc<RwLock<HashMap<String, u64>>>,
    /// Session start time
    session_start: AtomicU64,
    /// Export directory
    export_dir: PathBuf,
    /// Max events in memory before flush
    max_buffer_size: usize,
}

impl TelemetryCollector {
    /// Create new collector with default settings
    pub fn new() -> Self {
        Self::with_config(PathBuf::from(DEFAULT_TELEMETRY_DIR), 1000)
    }

    /// Create collector with custom config
    ///
    /// The export directory is created lazily on first write.
    pub fn with_config(export_dir: PathBuf, max_buffer_size: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::with_capacity(max_buffer_size.min(1024)))),
            total_processed: AtomicU64::new(0),
            total_located: AtomicU64::new(0),
            total_no_gps: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            rejected_uploads: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            reason_counts: Arc::new(RwLock::new(HashMap::new())),
            session_start: AtomicU64::new(current_timestamp()),
            export_dir,
            max_buffer_size: max_buffer_size.max(1),
        }
    }

    /// Record a processed or rejected upload
    pub fn record(&self, event: TelemetryEvent) {
        match event.outcome {
            UploadOutcome::Rejected => {
                self.rejected_uploads.fetch_add(1, Ordering::Relaxed);
                return;
            }
            UploadOutcome::Located => {
                self.total_located.fetch_add(1, Ordering::Relaxed);
            }
            UploadOutcome::NoGps => {
                self.total_no_gps.fetch_add(1, Ordering::Relaxed);
                if let (Some(reason), Ok(mut counts)) =
                    (event.reason.as_ref(), self.reason_counts.write())
                {
                    *counts.entry(reason.clone()).or_insert(0) += 1;
                }
            }
            UploadOutcome::DecodeFailed => {
                self.decode_failures.fetch_add(1, Ordering::Relaxed);
            }
        }

        self.total_processed.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(event.size_bytes, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(event.latency_ms, Ordering::Relaxed);

        // Buffer event
        if let Ok(mut events) = self.events.write() {
            events.push(event);

            // Auto-flush if buffer full
            if events.len() >= self.max_buffer_size {
                let events_to_flush = std::mem::take(&mut *events);
                drop(events); // Release lock before I/O
                if let Err(e) = self.flush_events(&events_to_flush) {
                    tracing::warn!("Telemetry flush failed: {}", e);
                }
            }
        }
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        let total_processed = self.total_processed.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency = if total_processed > 0 {
            total_latency as f64 / total_processed as f64
        } else {
            0.0
        };

        let no_gps_by_reason = self
            .reason_counts
            .read()
            .map(|counts| counts.clone())
            .unwrap_or_default();

        TelemetryStats {
            total_processed,
            total_located: self.total_located.load(Ordering::Relaxed),
            total_no_gps: self.total_no_gps.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            rejected_uploads: self.rejected_uploads.load(Ordering::Relaxed),
            no_gps_by_reason,
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            avg_latency_ms: avg_latency,
            period_start: self.session_start.load(Ordering::Relaxed),
            period_end: current_timestamp(),
        }
    }

    /// Export current stats to JSON file
    pub fn export_stats_json(&self) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.export_dir)?;
        let stats = self.get_stats();
        let filename = format!("stats_{}.json", stats.period_end);
        let path = self.export_dir.join(filename);

        fs::write(&path, stats.to_json())?;

        // Flush whatever is still buffered alongside the snapshot
        let pending = self
            .events
            .write()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default();
        self.flush_events(&pending)?;

        Ok(path)
    }

    /// Append events to the JSON-lines log
    fn flush_events(&self, events: &[TelemetryEvent]) -> Result<(), std::io::Error> {
        if events.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.export_dir)?;
        let path = self.export_dir.join("events.jsonl");

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        for event in events {
            if let Ok(json) = serde_json::to_string(event) {
                writeln!(file, "{}", json)?;
            }
        }

        Ok(())
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.total_processed.store(0, Ordering::Relaxed);
        self.total_located.store(0, Ordering::Relaxed);
        self.total_no_gps.store(0, Ordering::Relaxed);
        self.decode_failures.store(0, Ordering::Relaxed);
        self.rejected_uploads.store(0, Ordering::Relaxed);
        self.total_bytes.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);
        self.session_start.store(current_timestamp(), Ordering::Relaxed);

        if let Ok(mut counts) = self.reason_counts.write() {
            counts.clear();
        }
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("geophoto-telemetry-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_event_creation() {
        let event = TelemetryEvent::new(UploadOutcome::NoGps, Some("missing_gps_block"), 2048, 7);

        assert_eq!(event.outcome, UploadOutcome::NoGps);
        assert_eq!(event.reason.as_deref(), Some("missing_gps_block"));
        assert_eq!(event.size_bytes, 2048);
        assert!(event.timestamp > 0);
    }

    #[test]
    fn test_collector_basic() {
        let collector = TelemetryCollector::with_config(temp_dir("basic"), 100);

        collector.record(TelemetryEvent::new(UploadOutcome::Located, None, 100, 10));
        collector.record(TelemetryEvent::new(UploadOutcome::Located, None, 100, 20));
        collector.record(TelemetryEvent::new(UploadOutcome::NoGps, Some("out_of_range"), 100, 30));
        collector.record(TelemetryEvent::new(UploadOutcome::DecodeFailed, None, 100, 0));
        collector.record(TelemetryEvent::new(UploadOutcome::Rejected, None, 0, 0));

        let stats = collector.get_stats();
        assert_eq!(stats.total_processed, 4);
        assert_eq!(stats.total_located, 2);
        assert_eq!(stats.total_no_gps, 1);
        assert_eq!(stats.decode_failures, 1);
        assert_eq!(stats.rejected_uploads, 1);
        assert_eq!(stats.no_gps_by_reason.get("out_of_range"), Some(&1));
        assert_eq!(stats.total_bytes, 400);
        assert_eq!(stats.avg_latency_ms, 15.0);
        assert_eq!(stats.located_rate(), 50.0);
    }

    #[test]
    fn test_reset() {
        let collector = TelemetryCollector::with_config(temp_dir("reset"), 100);
        collector.record(TelemetryEvent::new(UploadOutcome::Located, None, 10, 1));
        collector.reset();

        let stats = collector.get_stats();
        assert_eq!(stats.total_processed, 0);
        assert_eq!(stats.total_located, 0);
    }

    #[test]
    fn test_export_and_flush() {
        let dir = temp_dir("export");
        let collector = TelemetryCollector::with_config(dir.clone(), 2);

        // Second record hits the buffer limit and flushes
        collector.record(TelemetryEvent::new(UploadOutcome::Located, None, 10, 1));
        collector.record(TelemetryEvent::new(UploadOutcome::NoGps, Some("missing_gps_block"), 10, 1));
        let events = std::fs::read_to_string(dir.join("events.jsonl")).unwrap();
        assert_eq!(events.lines().count(), 2);

        let path = collector.export_stats_json().unwrap();
        let json = std::fs::read_to_string(path).unwrap();
        assert!(json.contains("\"total_processed\": 2"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_summary() {
        let mut stats = TelemetryStats {
            total_processed: 40,
            total_located: 30,
            total_no_gps: 10,
            period_start: 1704067200,
            period_end: 1704070800,
            ..Default::default()
        };
        stats.no_gps_by_reason.insert("missing_gps_block".to_string(), 10);

        let report = stats.summary();
        assert!(report.contains("60 minutes"));
        assert!(report.contains("75.0%"));
        assert!(report.contains("missing_gps_block"));
    }
}
