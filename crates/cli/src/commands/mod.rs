// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod decode;
pub mod encode;
pub mod project;

use anyhow::Context;
use paystream_kernel::types::U256;

/// Parses a ledger word given as decimal or `0x` hex.
pub fn parse_word(label: &str, raw: &str) -> anyhow::Result<U256> {
    raw.trim()
        .parse::<U256>()
        .with_context(|| format!("invalid {label}: {raw:?}"))
}

/// RFC 3339, second precision. Out-of-range timestamps print as the epoch.
pub fn format_unix(seconds: u64) -> String {
    i64::try_from(seconds)
        .ok()
        .and_then(|s| chrono::DateTime::from_timestamp(s, 0))
        .unwrap_or_default()
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
