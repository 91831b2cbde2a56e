// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use paystream_kernel::projection::ProjectedState;
use paystream_kernel::types::{Amount, StreamId};
use serde::{Deserialize, Serialize};

/// One tick's projections for every observed stream, sorted by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickFrame {
    /// Local unix seconds the frame was projected at.
    pub at: u64,
    pub streams: Vec<ProjectedState>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamsResponse {
    pub at: u64,
    pub streams: Vec<ProjectedState>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserveResponse {
    pub stream_id: StreamId,
    pub observed: bool,
    /// False when the request matched the current state.
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterSummary {
    pub quarter_start: u64,
    pub streamed_this_quarter: Amount,
    pub streams_with_baseline: usize,
    pub days_remaining: u64,
    pub active_count: usize,
    pub total_withdrawable: Amount,
}
