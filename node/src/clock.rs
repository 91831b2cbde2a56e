// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Local time sources for projection.
//!
//! Projection needs unix seconds comparable with ledger anchors, but must not jump
//! when the wall clock is adjusted. [`MonotonicClock`] reads the wall clock once
//! and advances by monotonic elapsed time from then on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

pub trait Clock: Send + Sync + 'static {
    /// Unix seconds.
    fn now_seconds(&self) -> u64;
}

#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin_unix: u64,
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        let origin_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::with_origin(origin_unix)
    }

    /// Clock that reads `origin_unix` now. Follows tokio's paused time in tests.
    pub fn with_origin(origin_unix: u64) -> Self {
        Self {
            origin_unix,
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_seconds(&self) -> u64 {
        self.origin_unix.saturating_add(self.origin.elapsed().as_secs())
    }
}

/// Settable clock.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new(now_seconds: u64) -> Self {
        Self(AtomicU64::new(now_seconds))
    }

    pub fn set(&self, now_seconds: u64) {
        self.0.store(now_seconds, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_seconds(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
