// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-login context.
//!
//! A [`Session`] owns everything that lives for one signed-in account: the
//! projector, the scheduler driving it, and the quarter tracker. Nothing here is
//! process-global; `logout` tears all of it down and persists the quarter.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use paystream_kernel::error::KernelError;
use paystream_kernel::projection::RosterSummary;
use paystream_kernel::state::{Projector, QuarterTracker};
use paystream_kernel::types::StreamId;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{QuarterSummary, TickFrame};
use crate::clock::Clock;
use crate::config::NodeConfig;
use crate::errors::EngineError;
use crate::ledger::LedgerSource;
use crate::persistence::QuarterStore;
use crate::scheduler::{Scheduler, SchedulerConfig};

pub struct Session {
    account: String,
    scheduler: Scheduler,
    quarter: Arc<Mutex<QuarterTracker>>,
    quarter_path: Option<PathBuf>,
    quarter_token: CancellationToken,
    quarter_task: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl Session {
    /// Opens a session and starts observing `cfg.streams`. Must be called within a tokio runtime.
    pub fn login(cfg: &NodeConfig, ledger: Arc<dyn LedgerSource>, clock: Arc<dyn Clock>) -> Result<Self, EngineError> {
        cfg.validate()?;
        let account = cfg.account.trim().to_string();
        if account.is_empty() {
            return Err(EngineError::InvalidInput("account must not be empty".into()));
        }

        let now = clock.now_seconds();
        let tracker = match &cfg.quarter_state_path {
            Some(path) => match QuarterStore::load(path)? {
                Some(tracker) => {
                    info!(path = %path.display(), quarter_start = tracker.quarter_start, "Quarter state restored");
                    tracker
                }
                None => QuarterTracker::new(now),
            },
            None => QuarterTracker::new(now),
        };

        let scheduler = Scheduler::new(Arc::new(Projector::new()), ledger, clock, SchedulerConfig::from(cfg));
        scheduler.start();
        for stream_id in &cfg.streams {
            if stream_id.is_empty() {
                warn!("Skipping empty stream id in configuration");
                continue;
            }
            scheduler.observe(stream_id.clone());
        }

        let quarter = Arc::new(Mutex::new(tracker));
        let quarter_token = CancellationToken::new();
        let quarter_task = tokio::spawn(quarter_loop(
            scheduler.subscribe(),
            quarter.clone(),
            cfg.quarter_state_path.clone(),
            quarter_token.clone(),
        ));

        info!(account = %account, streams = cfg.streams.len(), "Session opened");
        Ok(Self {
            account,
            scheduler,
            quarter,
            quarter_path: cfg.quarter_state_path.clone(),
            quarter_token,
            quarter_task: Mutex::new(Some(quarter_task)),
            closed: AtomicBool::new(false),
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn projector(&self) -> &Arc<Projector> {
        self.scheduler.projector()
    }

    pub fn now(&self) -> u64 {
        self.scheduler.clock().now_seconds()
    }

    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    pub fn observe(&self, stream_id: StreamId) -> Result<bool, EngineError> {
        self.ensure_open()?;
        if stream_id.is_empty() {
            return Err(KernelError::EmptyStreamId.into());
        }
        Ok(self.scheduler.observe(stream_id))
    }

    pub async fn unobserve(&self, stream_id: &StreamId) -> Result<bool, EngineError> {
        self.ensure_open()?;
        Ok(self.scheduler.unobserve(stream_id).await)
    }

    pub fn quarter(&self) -> QuarterTracker {
        self.quarter.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Quarter-to-date streamed total and roster figures over the observed streams, projected now.
    pub fn quarter_summary(&self) -> QuarterSummary {
        let frame = self.scheduler.current_frame();
        let roster = RosterSummary::from_projections(&frame.streams);
        let tracker = self.quarter.lock().unwrap_or_else(PoisonError::into_inner);
        QuarterSummary {
            quarter_start: tracker.quarter_start,
            streamed_this_quarter: tracker.streamed_this_quarter(&frame.streams),
            streams_with_baseline: tracker.baselines.len(),
            days_remaining: tracker.days_remaining(frame.at),
            active_count: roster.active_count,
            total_withdrawable: roster.total_withdrawable,
        }
    }

    /// Stops every task, saves the quarter and drops all snapshots. Idempotent.
    pub async fn logout(&self) -> Result<(), EngineError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.scheduler.shutdown().await;

        self.quarter_token.cancel();
        let task = self.quarter_task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Quarter task ended abnormally");
            }
        }

        if let Some(path) = &self.quarter_path {
            QuarterStore::save(path, &self.quarter(), self.now())?;
            debug!(path = %path.display(), "Quarter state saved");
        }

        self.scheduler.projector().clear();
        info!(account = %self.account, "Session closed");
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), EngineError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(EngineError::InvalidInput("session is closed".into()))
        }
    }
}

async fn quarter_loop(
    mut frames: broadcast::Receiver<TickFrame>,
    quarter: Arc<Mutex<QuarterTracker>>,
    path: Option<PathBuf>,
    token: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            recv = frames.recv() => match recv {
                Ok(frame) => frame,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Quarter tracker lagged behind ticks");
                    continue;
                }
                Err(RecvError::Closed) => break,
            },
        };

        let rolled = {
            let mut tracker = quarter.lock().unwrap_or_else(PoisonError::into_inner);
            if tracker.roll_if_due(frame.at, &frame.streams) {
                Some(tracker.clone())
            } else {
                None
            }
        };

        if let Some(tracker) = rolled {
            info!(quarter_start = tracker.quarter_start, baselines = tracker.baselines.len(), "Quarter rolled over");
            if let Some(path) = &path {
                if let Err(e) = QuarterStore::save(path, &tracker, frame.at) {
                    warn!(path = %path.display(), error = %e, "Failed to persist quarter state");
                }
            }
        }
    }
}
