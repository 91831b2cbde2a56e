// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use paystream_kernel::types::StreamId;

use crate::errors::EngineError;

#[derive(Clone, Debug)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Bearer token required on every route when set.
    pub auth_token: Option<String>,
    /// Base URL of the ledger-reader gateway.
    pub ledger_url: Option<String>,
    pub account: String,
    /// Streams observed as soon as the session opens.
    pub streams: Vec<StreamId>,
    pub tick_interval: Duration,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    /// Tick frames buffered per subscriber before it starts lagging.
    pub frame_buffer: usize,
    pub quarter_state_path: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            auth_token: None,
            ledger_url: None,
            account: "local".to_string(),
            streams: Vec::new(),
            tick_interval: Duration::from_millis(1000),
            poll_interval: Duration::from_secs(15),
            poll_timeout: Duration::from_secs(10),
            frame_buffer: 64,
            quarter_state_path: None,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `PAYSTREAM_*` environment variables.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(addr) = parse_var::<SocketAddr>("PAYSTREAM_BIND_ADDR", get("PAYSTREAM_BIND_ADDR"))? {
            cfg.bind_addr = addr;
        }
        cfg.auth_token = get("PAYSTREAM_AUTH_TOKEN");
        cfg.ledger_url = get("PAYSTREAM_LEDGER_URL");
        if let Some(account) = get("PAYSTREAM_ACCOUNT") {
            cfg.account = account;
        }
        if let Some(list) = get("PAYSTREAM_STREAMS") {
            cfg.streams = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(StreamId::from)
                .collect();
        }
        if let Some(ms) = parse_var::<u64>("PAYSTREAM_TICK_MS", get("PAYSTREAM_TICK_MS"))? {
            cfg.tick_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var::<u64>("PAYSTREAM_POLL_SECS", get("PAYSTREAM_POLL_SECS"))? {
            cfg.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>("PAYSTREAM_POLL_TIMEOUT_SECS", get("PAYSTREAM_POLL_TIMEOUT_SECS"))? {
            cfg.poll_timeout = Duration::from_secs(secs);
        }
        cfg.quarter_state_path = get("PAYSTREAM_QUARTER_STATE").map(PathBuf::from);

        cfg.validate()?;
        Ok(cfg)
    }

    /// Zero intervals would spin the scheduler.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.tick_interval.is_zero() {
            return Err(EngineError::InvalidInput("tick interval must be positive".into()));
        }
        if self.poll_interval.is_zero() || self.poll_timeout.is_zero() {
            return Err(EngineError::InvalidInput("poll interval and timeout must be positive".into()));
        }
        if self.frame_buffer == 0 {
            return Err(EngineError::InvalidInput("frame buffer must be positive".into()));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: Option<String>) -> Result<Option<T>, EngineError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| EngineError::InvalidInput(format!("{key}={raw}: {e}")))
        })
        .transpose()
}
