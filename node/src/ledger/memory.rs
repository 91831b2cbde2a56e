// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use paystream_kernel::snapshot::LedgerReading;
use paystream_kernel::types::StreamId;

use crate::errors::EngineError;
use crate::ledger::LedgerSource;

#[derive(Default)]
struct Inner {
    readings: HashMap<StreamId, LedgerReading>,
    stalled: HashSet<StreamId>,
    reads: HashMap<StreamId, u64>,
}

/// In-process ledger for tests and local runs.
///
/// A stalled stream's reads never complete.
#[derive(Default)]
pub struct MemoryLedger {
    inner: RwLock<Inner>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, reading: LedgerReading) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.readings.insert(reading.stream_id.clone(), reading);
    }

    pub fn remove(&self, stream_id: &StreamId) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.readings.remove(stream_id);
    }

    pub fn stall(&self, stream_id: &StreamId) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.stalled.insert(stream_id.clone());
    }

    pub fn resume(&self, stream_id: &StreamId) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.stalled.remove(stream_id);
    }

    /// Reads started for `stream_id`, stalled ones included.
    pub fn reads(&self, stream_id: &StreamId) -> u64 {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.reads.get(stream_id).copied().unwrap_or(0)
    }
}

impl LedgerSource for MemoryLedger {
    fn read_stream<'a>(&'a self, stream_id: &'a StreamId) -> BoxFuture<'a, Result<LedgerReading, EngineError>> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *inner.reads.entry(stream_id.clone()).or_insert(0) += 1;

        if inner.stalled.contains(stream_id) {
            return future::pending().boxed();
        }
        let result = inner
            .readings
            .get(stream_id)
            .cloned()
            .ok_or_else(|| EngineError::Ledger(format!("No ledger entry for stream {stream_id}")));
        future::ready(result).boxed()
    }
}
