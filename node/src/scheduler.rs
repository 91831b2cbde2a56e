// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Session-scoped scheduler: one tick loop plus one poll task per observed stream.
//!
//! Every task runs under a child of the scheduler's root [`CancellationToken`].
//! Unobserving a stream cancels its poll task and awaits it before the snapshot
//! is forgotten, so no late poll can resurrect a forgotten stream. Shutdown
//! cancels the root and awaits everything.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use metrics::{gauge, histogram, increment_counter};
use paystream_kernel::state::{ApplyOutcome, Projector};
use paystream_kernel::types::StreamId;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::TickFrame;
use crate::clock::Clock;
use crate::config::NodeConfig;
use crate::errors::EngineError;
use crate::ledger::LedgerSource;
use crate::telemetry::{
    OBSERVED_STREAMS, POLL_DURATION, POLL_FAILURES, SNAPSHOTS_APPLIED, SNAPSHOTS_REJECTED, SNAPSHOT_REGRESSIONS,
    TICKS,
};

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub tick_interval: Duration,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub frame_buffer: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&NodeConfig::default())
    }
}

impl From<&NodeConfig> for SchedulerConfig {
    fn from(cfg: &NodeConfig) -> Self {
        Self {
            tick_interval: cfg.tick_interval,
            poll_interval: cfg.poll_interval,
            poll_timeout: cfg.poll_timeout,
            frame_buffer: cfg.frame_buffer,
        }
    }
}

struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

struct Shared {
    projector: Arc<Projector>,
    ledger: Arc<dyn LedgerSource>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    // Membership here is both the poll registration and the tick registration.
    polls: Mutex<BTreeMap<StreamId, PollHandle>>,
    frames: broadcast::Sender<TickFrame>,
}

impl Shared {
    fn observed(&self) -> Vec<StreamId> {
        let polls = self.polls.lock().unwrap_or_else(PoisonError::into_inner);
        polls.keys().cloned().collect()
    }

    fn frame(&self) -> TickFrame {
        let ids = self.observed();
        let at = self.clock.now_seconds();
        TickFrame {
            at,
            streams: self.projector.project_many(&ids, at),
        }
    }

    async fn poll_once(&self, stream_id: &StreamId) -> Result<ApplyOutcome, EngineError> {
        let started = Instant::now();
        let read = time::timeout(self.config.poll_timeout, self.ledger.read_stream(stream_id)).await;
        histogram!(POLL_DURATION, started.elapsed().as_secs_f64());

        let reading = read.map_err(|_| EngineError::Timeout(self.config.poll_timeout))??;
        if reading.stream_id != *stream_id {
            return Err(EngineError::Ledger(format!(
                "Reading for {} returned while polling {}",
                reading.stream_id, stream_id
            )));
        }

        let outcome = match self.projector.apply_reading(&reading) {
            Ok(outcome) => outcome,
            Err(e) => {
                increment_counter!(SNAPSHOTS_REJECTED);
                return Err(e.into());
            }
        };
        increment_counter!(SNAPSHOTS_APPLIED);

        if outcome.regressed {
            increment_counter!(SNAPSHOT_REGRESSIONS);
            warn!(
                stream = %stream_id,
                anchor = reading.anchor_time_seconds,
                "Ledger snapshot moved backwards; applied anyway"
            );
        } else {
            debug!(stream = %stream_id, anchor = reading.anchor_time_seconds, "Snapshot applied");
        }
        Ok(outcome)
    }
}

async fn tick_loop(shared: Arc<Shared>, token: CancellationToken) {
    let mut interval = time::interval(shared.config.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }
        let frame = shared.frame();
        increment_counter!(TICKS);
        // No subscribers is not an error.
        let _ = shared.frames.send(frame);
    }
    debug!("Tick loop stopped");
}

async fn poll_loop(shared: Arc<Shared>, stream_id: StreamId, token: CancellationToken) {
    let mut interval = time::interval(shared.config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = shared.poll_once(&stream_id) => match result {
                Ok(_) => {}
                Err(EngineError::Kernel(e)) => {
                    warn!(stream = %stream_id, error = %e, "Ledger reading rejected; keeping prior snapshot");
                }
                Err(e) => {
                    increment_counter!(POLL_FAILURES);
                    warn!(stream = %stream_id, error = %e, "Ledger poll failed; keeping prior snapshot");
                }
            },
        }
    }
    debug!(stream = %stream_id, "Poll task stopped");
}

pub struct Scheduler {
    shared: Arc<Shared>,
    root: CancellationToken,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(
        projector: Arc<Projector>,
        ledger: Arc<dyn LedgerSource>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        let (frames, _) = broadcast::channel(config.frame_buffer.max(1));
        Self {
            shared: Arc::new(Shared {
                projector,
                ledger,
                clock,
                config,
                polls: Mutex::new(BTreeMap::new()),
                frames,
            }),
            root: CancellationToken::new(),
            tick_task: Mutex::new(None),
        }
    }

    /// Starts the tick loop. Must be called within a tokio runtime; later calls are no-ops.
    pub fn start(&self) {
        if self.root.is_cancelled() {
            return;
        }
        let mut slot = self.tick_task.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            let token = self.root.child_token();
            *slot = Some(tokio::spawn(tick_loop(self.shared.clone(), token)));
        }
    }

    /// Registers `stream_id` for ticks and starts its poll task. The first poll is immediate.
    ///
    /// Returns false if it was already observed or the scheduler is shut down.
    pub fn observe(&self, stream_id: StreamId) -> bool {
        if self.root.is_cancelled() {
            return false;
        }
        let observed = {
            let mut polls = self.shared.polls.lock().unwrap_or_else(PoisonError::into_inner);
            if polls.contains_key(&stream_id) {
                return false;
            }
            let token = self.root.child_token();
            let task = tokio::spawn(poll_loop(self.shared.clone(), stream_id.clone(), token.clone()));
            polls.insert(stream_id.clone(), PollHandle { token, task });
            polls.len()
        };
        gauge!(OBSERVED_STREAMS, observed as f64);
        info!(stream = %stream_id, "Observing stream");
        true
    }

    /// Cancels the stream's poll task, waits for it to stop, then drops its snapshot.
    ///
    /// If the stream was observed again while the old task wound down, the snapshot
    /// belongs to the new registration and is kept.
    pub async fn unobserve(&self, stream_id: &StreamId) -> bool {
        let handle = {
            let mut polls = self.shared.polls.lock().unwrap_or_else(PoisonError::into_inner);
            polls.remove(stream_id)
        };
        let Some(handle) = handle else {
            return false;
        };

        handle.token.cancel();
        if let Err(e) = handle.task.await {
            warn!(stream = %stream_id, error = %e, "Poll task ended abnormally");
        }

        let remaining = {
            // Held across forget so a concurrent observe lands before or after it, not between.
            let polls = self.shared.polls.lock().unwrap_or_else(PoisonError::into_inner);
            if !polls.contains_key(stream_id) {
                self.shared.projector.forget(stream_id);
            }
            polls.len()
        };

        gauge!(OBSERVED_STREAMS, remaining as f64);
        info!(stream = %stream_id, "Stopped observing stream");
        true
    }

    pub fn is_observed(&self, stream_id: &StreamId) -> bool {
        let polls = self.shared.polls.lock().unwrap_or_else(PoisonError::into_inner);
        polls.contains_key(stream_id)
    }

    /// Observed streams, sorted.
    pub fn observed(&self) -> Vec<StreamId> {
        self.shared.observed()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TickFrame> {
        self.shared.frames.subscribe()
    }

    /// What the next tick would emit, computed now.
    pub fn current_frame(&self) -> TickFrame {
        self.shared.frame()
    }

    /// One poll outside the regular cadence. Subject to the same timeout.
    pub async fn poll_now(&self, stream_id: &StreamId) -> Result<ApplyOutcome, EngineError> {
        self.shared.poll_once(stream_id).await
    }

    pub fn projector(&self) -> &Arc<Projector> {
        &self.shared.projector
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.shared.clock
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Cancels every task and waits for all of them. Idempotent.
    pub async fn shutdown(&self) {
        self.root.cancel();

        let handles: Vec<(StreamId, PollHandle)> = {
            let mut polls = self.shared.polls.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *polls).into_iter().collect()
        };
        for (stream_id, handle) in handles {
            if let Err(e) = handle.task.await {
                warn!(stream = %stream_id, error = %e, "Poll task ended abnormally");
            }
        }

        let tick = self.tick_task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(task) = tick {
            if let Err(e) = task.await {
                warn!(error = %e, "Tick loop ended abnormally");
            }
        }
        gauge!(OBSERVED_STREAMS, 0.0);
        info!("Scheduler stopped");
    }
}
