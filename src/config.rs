// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Fixed-point factor the ledger multiplies per-second rates by (10^18).
pub const DEFAULT_RATE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Base-unit decimals of the streamed token (wei -> token).
pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

/// Largest number of fractional digits a display amount can carry.
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// The ledger's notion of a month: 30 days.
pub const SECONDS_PER_MONTH: u64 = 30 * 24 * 60 * 60;

pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
pub const SECONDS_PER_HOUR: u64 = 60 * 60;
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Length of a reporting quarter: 91 days.
pub const QUARTER_SECONDS: u64 = 91 * SECONDS_PER_DAY;

/// Tax rates are whole percentages.
pub const MAX_TAX_RATE_PERCENT: u8 = 100;
