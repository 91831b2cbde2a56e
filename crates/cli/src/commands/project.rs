// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use paystream_kernel::projection::{project_snapshot, ProjectedState};
use paystream_kernel::snapshot::{decode_reading, LedgerReading, StreamSnapshot};
use std::path::Path;

use super::format_unix;

/// When to project a reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectAt {
    Unix(u64),
    AfterAnchor(u64),
    Now,
}

impl ProjectAt {
    fn resolve(self, anchor: u64) -> u64 {
        match self {
            ProjectAt::Unix(t) => t,
            ProjectAt::AfterAnchor(secs) => anchor.saturating_add(secs),
            ProjectAt::Now => chrono::Utc::now().timestamp().try_into().unwrap_or(0),
        }
    }
}

pub fn load_reading(path: &Path) -> anyhow::Result<LedgerReading> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("{} is not a ledger reading", path.display()))
}

pub fn projection(path: &Path, at: ProjectAt) -> anyhow::Result<(StreamSnapshot, ProjectedState)> {
    let reading = load_reading(path)?;
    let snapshot = decode_reading(&reading)?;
    let state = project_snapshot(&snapshot, at.resolve(snapshot.anchor_time));
    Ok((snapshot, state))
}

pub fn run(path: &Path, at: ProjectAt, json: bool) -> anyhow::Result<()> {
    let (snapshot, state) = projection(path, at)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    let now = snapshot.anchor_time.saturating_add(state.elapsed_seconds);
    table.add_row(vec!["Stream".to_string(), state.stream_id.to_string()]);
    table.add_row(vec!["Status".to_string(), format!("{:?}", snapshot.status)]);
    table.add_row(vec!["Anchor".to_string(), format_unix(snapshot.anchor_time)]);
    table.add_row(vec!["Projected at".to_string(), format_unix(now)]);
    table.add_row(vec!["Elapsed (s)".to_string(), state.elapsed_seconds.to_string()]);
    table.add_row(vec!["Rate / s".to_string(), state.rate_per_second.normalize().to_string()]);
    table.add_row(vec!["Withdrawable".to_string(), state.live_withdrawable.normalize().to_string()]);
    table.add_row(vec!["Total earned".to_string(), state.live_total_earned.normalize().to_string()]);
    table.add_row(vec![
        format!("Tax accrued ({}%)", snapshot.tax_rate_percent),
        state.live_tax_accrued.normalize().to_string(),
    ]);

    println!("\nStream Projection\n");
    println!("{table}\n");
    Ok(())
}
