// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use paystream_kernel::fxp::decode::decode_scaled_rate_with_decimals;
use paystream_kernel::fxp::ops::{amt_sub_floor, percent_of};
use paystream_kernel::projection::RateBreakdown;
use paystream_kernel::snapshot::StreamSnapshot;
use paystream_kernel::types::{Amount, StreamId, StreamStatus};

use super::parse_word;

/// Decodes a scaled per-second rate and breaks it down by display period.
pub fn breakdown(scaled: &str, scale: &str, decimals: u32, tax_rate_percent: u8) -> anyhow::Result<RateBreakdown> {
    let scaled = parse_word("scaled rate", scaled)?;
    let scale = parse_word("scale", scale)?;
    if tax_rate_percent > 100 {
        anyhow::bail!("tax rate {tax_rate_percent}% outside 0..=100");
    }

    let rate = decode_scaled_rate_with_decimals(scaled, scale, decimals)?;
    let snapshot = StreamSnapshot {
        stream_id: StreamId::new("-"),
        rate_per_second: rate,
        withdrawable_base: Amount::ZERO,
        accrued_base: Amount::ZERO,
        already_withdrawn: Amount::ZERO,
        anchor_time: 0,
        status: StreamStatus::Active,
        tax_rate_percent,
    };
    Ok(RateBreakdown::from_snapshot(&snapshot))
}

pub fn run(scaled: &str, scale: &str, decimals: u32, tax_rate_percent: u8) -> anyhow::Result<()> {
    let rates = breakdown(scaled, scale, decimals, tax_rate_percent)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Period", "Gross", "Tax", "Net"]);

    for (period, gross) in [
        ("second", rates.per_second),
        ("minute", rates.per_minute),
        ("hour", rates.per_hour),
        ("day", rates.per_day),
        ("month (30d)", rates.per_month),
    ] {
        let tax = percent_of(gross, tax_rate_percent);
        table.add_row(vec![
            period.to_string(),
            gross.normalize().to_string(),
            tax.normalize().to_string(),
            amt_sub_floor(gross, tax).normalize().to_string(),
        ]);
    }

    println!("\nRate per second: {}\n", rates.per_second.normalize());
    println!("{table}\n");
    Ok(())
}
