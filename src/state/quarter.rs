// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Quarter-to-date streamed total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{QUARTER_SECONDS, SECONDS_PER_DAY};
use crate::fxp::ops::{amt_add, amt_sub_floor};
use crate::projection::ProjectedState;
use crate::types::{Amount, StreamId};

/// Baselines captured at the start of the current quarter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterTracker {
    pub quarter_start: u64,
    pub baselines: BTreeMap<StreamId, Amount>,
}

impl QuarterTracker {
    pub fn new(quarter_start: u64) -> Self {
        Self {
            quarter_start,
            baselines: BTreeMap::new(),
        }
    }

    pub fn is_due(&self, now_seconds: u64) -> bool {
        now_seconds.saturating_sub(self.quarter_start) >= QUARTER_SECONDS
    }

    /// Whole days until the next roll, rounded up. Zero once due.
    pub fn days_remaining(&self, now_seconds: u64) -> u64 {
        let elapsed = now_seconds.saturating_sub(self.quarter_start);
        QUARTER_SECONDS.saturating_sub(elapsed).div_ceil(SECONDS_PER_DAY)
    }

    /// Starts a new quarter once the current one has run its length.
    ///
    /// Every initialized stream's running total becomes its new baseline.
    pub fn roll_if_due(&mut self, now_seconds: u64, projections: &[ProjectedState]) -> bool {
        if !self.is_due(now_seconds) {
            return false;
        }
        self.baselines = projections
            .iter()
            .filter(|p| p.initialized)
            .map(|p| (p.stream_id.clone(), p.live_total_earned))
            .collect();
        self.quarter_start = now_seconds;
        true
    }

    /// Streams without a baseline count from zero.
    pub fn streamed_this_quarter(&self, projections: &[ProjectedState]) -> Amount {
        projections
            .iter()
            .filter(|p| p.initialized)
            .fold(Amount::ZERO, |sum, p| {
                let baseline = self.baselines.get(&p.stream_id).copied().unwrap_or(Amount::ZERO);
                amt_add(sum, amt_sub_floor(p.live_total_earned, baseline))
            })
    }
}
