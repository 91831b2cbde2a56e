// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Snapshot store and projector.

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::error::KernelResult;
use crate::projection::{project_snapshot, ProjectedState, RateBreakdown};
use crate::snapshot::{decode_reading, LedgerReading, StreamSnapshot};
use crate::types::StreamId;

/// Result of replacing a stream's anchor.
#[derive(Clone, Debug)]
pub struct ApplyOutcome {
    pub previous: Option<Arc<StreamSnapshot>>,
    /// The new anchor went back on the previous one: earlier anchor time, lower
    /// withdrawn amount, lower running total, or lower withdrawable with no
    /// withdrawal in between. See [`StreamSnapshot::regressed_from`]. Passed
    /// through regardless.
    pub regressed: bool,
}

/// Maps each stream to its latest snapshot.
///
/// Writers swap in a whole `Arc<StreamSnapshot>`; readers clone the `Arc` and
/// project outside the lock. A reader therefore sees the old anchor or the new
/// one, never a blend. Poisoning is ignored: no writer leaves a partial value.
#[derive(Default)]
pub struct Projector {
    streams: RwLock<FxHashMap<StreamId, Arc<StreamSnapshot>>>,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Write APIs ---

    /// Replaces the anchor for `snapshot.stream_id`.
    pub fn apply_snapshot(&self, snapshot: StreamSnapshot) -> ApplyOutcome {
        let next = Arc::new(snapshot);
        let previous = {
            let mut guard = self.streams.write().unwrap_or_else(PoisonError::into_inner);
            guard.insert(next.stream_id.clone(), next.clone())
        };
        let regressed = previous
            .as_deref()
            .map(|prev| next.regressed_from(prev))
            .unwrap_or(false);
        ApplyOutcome { previous, regressed }
    }

    /// Decodes and applies a raw reading. On a decode failure the prior anchor stays.
    pub fn apply_reading(&self, reading: &LedgerReading) -> KernelResult<ApplyOutcome> {
        let snapshot = decode_reading(reading)?;
        Ok(self.apply_snapshot(snapshot))
    }

    /// Drops a stream's anchor. Returns whether one was held.
    pub fn forget(&self, stream_id: &StreamId) -> bool {
        let mut guard = self.streams.write().unwrap_or_else(PoisonError::into_inner);
        guard.remove(stream_id).is_some()
    }

    pub fn clear(&self) {
        let mut guard = self.streams.write().unwrap_or_else(PoisonError::into_inner);
        guard.clear();
    }

    // --- Read APIs ---

    pub fn snapshot(&self, stream_id: &StreamId) -> Option<Arc<StreamSnapshot>> {
        let guard = self.streams.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(stream_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.streams.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Known streams, sorted.
    pub fn stream_ids(&self) -> Vec<StreamId> {
        let guard = self.streams.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<StreamId> = guard.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Never fails. A stream without an anchor projects as uninitialized.
    pub fn project(&self, stream_id: &StreamId, now_seconds: u64) -> ProjectedState {
        match self.snapshot(stream_id) {
            Some(snapshot) => project_snapshot(&snapshot, now_seconds),
            None => ProjectedState::uninitialized(stream_id.clone()),
        }
    }

    /// Projects each id independently, in the order given.
    pub fn project_many<'a, I>(&self, ids: I, now_seconds: u64) -> Vec<ProjectedState>
    where
        I: IntoIterator<Item = &'a StreamId>,
    {
        ids.into_iter().map(|id| self.project(id, now_seconds)).collect()
    }

    /// Projects every known stream, sorted by id.
    pub fn project_all(&self, now_seconds: u64) -> Vec<ProjectedState> {
        let mut held: Vec<Arc<StreamSnapshot>> = {
            let guard = self.streams.read().unwrap_or_else(PoisonError::into_inner);
            guard.values().cloned().collect()
        };
        held.sort_by(|a, b| a.stream_id.cmp(&b.stream_id));
        held.iter().map(|s| project_snapshot(s, now_seconds)).collect()
    }

    /// Employer view: active and paused streams only.
    pub fn project_active_roster(&self, now_seconds: u64) -> Vec<ProjectedState> {
        self.project_all(now_seconds)
            .into_iter()
            .filter(|p| p.status.map(|s| s.is_on_roster()).unwrap_or(false))
            .collect()
    }

    pub fn rates(&self, stream_id: &StreamId) -> Option<RateBreakdown> {
        self.snapshot(stream_id).map(|s| RateBreakdown::from_snapshot(&s))
    }
}
