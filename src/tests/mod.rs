#[cfg(test)]
// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod fxp_tests;
pub mod state_tests;

use crate::snapshot::LedgerReading;
use crate::types::{StreamId, StreamStatus, U256};

/// 1 token in base units (18 decimals).
pub(crate) const TOKEN: u128 = 1_000_000_000_000_000_000;

/// Reading with bases in thousandths of a token and a scaled rate at scale 10^18.
pub(crate) fn reading(id: &str, rate_scaled: u128, bases_milli: (u128, u128, u128), anchor: u64, status: StreamStatus, tax: u8) -> LedgerReading {
    let milli = TOKEN / 1000;
    LedgerReading {
        stream_id: StreamId::new(id),
        rate_per_second_scaled: U256::from_u128(rate_scaled),
        scale: U256::from_u128(TOKEN),
        withdrawable_base: U256::from_u128(bases_milli.0 * milli),
        accrued_base: U256::from_u128(bases_milli.1 * milli),
        already_withdrawn: U256::from_u128(bases_milli.2 * milli),
        anchor_time_seconds: anchor,
        status,
        tax_rate_percent: tax,
        token_decimals: 18,
    }
}
