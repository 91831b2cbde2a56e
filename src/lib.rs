// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! paystream-kernel: deterministic, fixed-point salary-accrual projection.
//!
//! Ledger polls produce [`snapshot::LedgerReading`]s; the [`state::Projector`]
//! decodes them into anchors and projects live earnings from any anchor at any
//! later local second, without binary floating point anywhere on the path.

pub mod config;
pub mod error;
pub mod fxp;
pub mod types;
pub mod snapshot;
pub mod projection;
pub mod state;

pub use error::{DecodeError, KernelError, KernelResult};
pub use projection::{ProjectedState, RateBreakdown, RosterSummary};
pub use snapshot::{LedgerReading, StreamSnapshot};
pub use state::{ApplyOutcome, Projector, QuarterTracker};
pub use types::{Amount, StreamId, StreamStatus, U256};

#[cfg(test)]
pub mod tests;
