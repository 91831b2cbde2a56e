// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::EngineError;

pub const SNAPSHOTS_APPLIED: &str = "paystream_snapshots_applied_total";
pub const SNAPSHOTS_REJECTED: &str = "paystream_snapshots_rejected_total";
pub const SNAPSHOT_REGRESSIONS: &str = "paystream_snapshot_regressions_total";
pub const POLL_FAILURES: &str = "paystream_ledger_poll_failures_total";
pub const POLL_DURATION: &str = "paystream_ledger_poll_duration_seconds";
pub const TICKS: &str = "paystream_ticks_total";
pub const OBSERVED_STREAMS: &str = "paystream_observed_streams";

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() -> Result<(), EngineError> {
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "paystream_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| EngineError::Internal(format!("failed to install Prometheus recorder: {e}")))?;

    if PROM_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
    }

    metrics::describe_counter!(SNAPSHOTS_APPLIED, "Ledger readings decoded and applied");
    metrics::describe_counter!(SNAPSHOTS_REJECTED, "Ledger readings rejected by the decoder");
    metrics::describe_counter!(SNAPSHOT_REGRESSIONS, "Applied snapshots that moved backwards");
    metrics::describe_counter!(POLL_FAILURES, "Ledger polls that failed or timed out");
    metrics::describe_histogram!(POLL_DURATION, "Time taken by a ledger poll");
    metrics::describe_counter!(TICKS, "Projection ticks emitted");
    metrics::describe_gauge!(OBSERVED_STREAMS, "Streams currently observed by the session");

    metrics::gauge!("paystream_node_up", 1.0);
    Ok(())
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
