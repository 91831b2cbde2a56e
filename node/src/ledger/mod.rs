// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Sources of authoritative stream state.
//!
//! A ledger read is the only suspension point in the polling path. Implementations
//! may stall; the scheduler bounds every read with a timeout.

pub mod client;
pub mod memory;

use futures::future::BoxFuture;
use paystream_kernel::snapshot::LedgerReading;
use paystream_kernel::types::StreamId;

use crate::errors::EngineError;

pub use client::HttpLedgerClient;
pub use memory::MemoryLedger;

pub trait LedgerSource: Send + Sync + 'static {
    fn read_stream<'a>(&'a self, stream_id: &'a StreamId) -> BoxFuture<'a, Result<LedgerReading, EngineError>>;
}
