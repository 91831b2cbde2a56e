// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Live projection of a stream between ledger reads.
//!
//! ```text
//! elapsed          = max(0, now - anchor_time)
//! live_withdrawable = withdrawable_base + rate * elapsed
//! live_total_earned = accrued_base + rate * elapsed + already_withdrawn
//! live_tax_accrued  = live_total_earned * tax% / 100
//! ```
//!
//! `rate` is the effective rate: zero unless the stream is active.

use serde::{Deserialize, Serialize};

use crate::config::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, SECONDS_PER_MONTH};
use crate::fxp::ops::{accrue, amt_add, percent_of};
use crate::snapshot::StreamSnapshot;
use crate::types::{Amount, StreamId, StreamStatus};

/// Per-tick output for one stream. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedState {
    pub stream_id: StreamId,
    pub live_withdrawable: Amount,
    pub live_total_earned: Amount,
    pub live_tax_accrued: Amount,
    /// False until the first snapshot for this stream has been applied.
    pub initialized: bool,
    pub status: Option<StreamStatus>,
    pub rate_per_second: Amount,
    pub elapsed_seconds: u64,
}

impl ProjectedState {
    /// Placeholder for a stream with no snapshot yet. Rendered as such, not as an error.
    pub fn uninitialized(stream_id: StreamId) -> Self {
        Self {
            stream_id,
            live_withdrawable: Amount::ZERO,
            live_total_earned: Amount::ZERO,
            live_tax_accrued: Amount::ZERO,
            initialized: false,
            status: None,
            rate_per_second: Amount::ZERO,
            elapsed_seconds: 0,
        }
    }
}

/// Employer headline figures over a set of projections.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub active_count: usize,
    pub total_withdrawable: Amount,
}

impl RosterSummary {
    /// Counts active streams and sums what every initialized stream could withdraw now.
    pub fn from_projections(projections: &[ProjectedState]) -> Self {
        projections
            .iter()
            .filter(|p| p.initialized)
            .fold(Self::default(), |acc, p| Self {
                active_count: acc.active_count + usize::from(p.status == Some(StreamStatus::Active)),
                total_withdrawable: amt_add(acc.total_withdrawable, p.live_withdrawable),
            })
    }
}

/// Pure projection of `snapshot` at local time `now_seconds`.
///
/// A local clock behind the anchor is treated as zero elapsed time, so the
/// output never drops below the anchor values.
pub fn project_snapshot(snapshot: &StreamSnapshot, now_seconds: u64) -> ProjectedState {
    let elapsed = now_seconds.saturating_sub(snapshot.anchor_time);
    let rate = snapshot.effective_rate();
    let streamed = accrue(rate, elapsed);

    let live_withdrawable = amt_add(snapshot.withdrawable_base, streamed);
    let live_total_earned = amt_add(amt_add(snapshot.accrued_base, streamed), snapshot.already_withdrawn);
    let live_tax_accrued = percent_of(live_total_earned, snapshot.tax_rate_percent);

    ProjectedState {
        stream_id: snapshot.stream_id.clone(),
        live_withdrawable,
        live_total_earned,
        live_tax_accrued,
        initialized: true,
        status: Some(snapshot.status),
        rate_per_second: rate,
        elapsed_seconds: elapsed,
    }
}

/// Effective earnings rate at common display periods.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBreakdown {
    pub stream_id: StreamId,
    pub per_second: Amount,
    pub per_minute: Amount,
    pub per_hour: Amount,
    pub per_day: Amount,
    /// 30-day month, matching how the ledger derives the rate.
    pub per_month: Amount,
    /// Share of the gross rate flowing to the tax vault.
    pub tax_per_second: Amount,
}

impl RateBreakdown {
    pub fn from_snapshot(snapshot: &StreamSnapshot) -> Self {
        let rate = snapshot.effective_rate();
        Self {
            stream_id: snapshot.stream_id.clone(),
            per_second: rate,
            per_minute: accrue(rate, SECONDS_PER_MINUTE),
            per_hour: accrue(rate, SECONDS_PER_HOUR),
            per_day: accrue(rate, SECONDS_PER_DAY),
            per_month: accrue(rate, SECONDS_PER_MONTH),
            tax_per_second: percent_of(rate, snapshot.tax_rate_percent),
        }
    }
}
