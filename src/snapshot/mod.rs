// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Authoritative per-stream anchors.
//!
//! A [`LedgerReading`] is what a ledger poll returns, in raw base units. A
//! [`StreamSnapshot`] is the decoded, display-unit anchor the projector works from.
//! Decoding is all-or-nothing: a reading either becomes a full snapshot or an error.

pub mod decode;

use serde::{Deserialize, Serialize};

use crate::types::{Amount, StreamId, StreamStatus, U256};

pub use decode::decode_reading;

fn default_token_decimals() -> u32 {
    crate::config::DEFAULT_TOKEN_DECIMALS
}

/// One poll's worth of ledger state for a stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReading {
    pub stream_id: StreamId,
    pub rate_per_second_scaled: U256,
    pub scale: U256,
    pub withdrawable_base: U256,
    pub accrued_base: U256,
    pub already_withdrawn: U256,
    pub anchor_time_seconds: u64,
    pub status: StreamStatus,
    pub tax_rate_percent: u8,
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,
}

/// Decoded anchor. Replaced whole on every successful poll, never merged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSnapshot {
    pub stream_id: StreamId,
    pub rate_per_second: Amount,
    pub withdrawable_base: Amount,
    pub accrued_base: Amount,
    pub already_withdrawn: Amount,
    /// Ledger timestamp, seconds. The projection origin.
    pub anchor_time: u64,
    pub status: StreamStatus,
    pub tax_rate_percent: u8,
}

impl StreamSnapshot {
    /// Rate the projection advances at: the decoded rate while active, zero otherwise.
    pub fn effective_rate(&self) -> Amount {
        if self.status.is_accruing() {
            self.rate_per_second
        } else {
            Amount::ZERO
        }
    }

    /// Total recognised as earned at the anchor: accrued plus withdrawn.
    pub fn total_at_anchor(&self) -> Amount {
        crate::fxp::ops::amt_add(self.accrued_base, self.already_withdrawn)
    }

    /// True when `self` moved backwards relative to `previous` for the same stream.
    ///
    /// The ledger is the source of truth, so this is reported, not enforced.
    pub fn regressed_from(&self, previous: &StreamSnapshot) -> bool {
        self.anchor_time < previous.anchor_time
            || self.already_withdrawn < previous.already_withdrawn
            || self.total_at_anchor() < previous.total_at_anchor()
            || (self.withdrawable_base < previous.withdrawable_base
                && self.already_withdrawn == previous.already_withdrawn)
    }
}
