use std::sync::Arc;
use std::time::Duration;

use paystream_kernel::config::QUARTER_SECONDS;
use paystream_kernel::snapshot::LedgerReading;
use paystream_kernel::types::{Amount, StreamId, StreamStatus, U256};
use paystream_node::clock::ManualClock;
use paystream_node::config::NodeConfig;
use paystream_node::errors::EngineError;
use paystream_node::ledger::MemoryLedger;
use paystream_node::persistence::QuarterStore;
use paystream_node::session::Session;
use tempfile::tempdir;
use tokio::time::sleep;

const ANCHOR: u64 = 1_700_000_000;
const TOKEN: u128 = 1_000_000_000_000_000_000;

fn reading(id: &str) -> LedgerReading {
    LedgerReading {
        stream_id: StreamId::new(id),
        // 0.001 token per second
        rate_per_second_scaled: U256::from_u128(1_000_000_000_000_000 * TOKEN),
        scale: U256::from_u128(TOKEN),
        withdrawable_base: U256::ZERO,
        accrued_base: U256::ZERO,
        already_withdrawn: U256::ZERO,
        anchor_time_seconds: ANCHOR,
        status: StreamStatus::Active,
        tax_rate_percent: 0,
        token_decimals: 18,
    }
}

#[tokio::test]
async fn test_quarter_state_survives_logout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quarter.json");
    let config = NodeConfig {
        quarter_state_path: Some(path.clone()),
        ..Default::default()
    };
    let ledger = Arc::new(MemoryLedger::new());
    let clock = Arc::new(ManualClock::new(ANCHOR));

    let session = Session::login(&config, ledger.clone(), clock.clone()).unwrap();
    assert_eq!(session.quarter().quarter_start, ANCHOR);
    assert!(!path.exists());
    session.logout().await.unwrap();
    assert!(path.exists());

    clock.set(ANCHOR + 500);
    let session = Session::login(&config, ledger, clock).unwrap();
    assert_eq!(session.quarter().quarter_start, ANCHOR);
    session.logout().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_quarter_rolls_on_tick_and_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quarter.json");
    let a = StreamId::new("a");
    let config = NodeConfig {
        quarter_state_path: Some(path.clone()),
        streams: vec![a.clone()],
        ..Default::default()
    };
    let ledger = Arc::new(MemoryLedger::new());
    ledger.set(reading("a"));
    let clock = Arc::new(ManualClock::new(ANCHOR));

    let session = Session::login(&config, ledger, clock.clone()).unwrap();
    sleep(Duration::from_secs(2)).await;
    assert!(session.projector().snapshot(&a).is_some());

    let roll_at = ANCHOR + QUARTER_SECONDS + 10;
    clock.set(roll_at);
    sleep(Duration::from_secs(2)).await;

    let tracker = session.quarter();
    assert_eq!(tracker.quarter_start, roll_at);
    // 0.001 token/s over the elapsed quarter.
    assert_eq!(tracker.baselines[&a], Amount::new(1, 3) * Amount::from(QUARTER_SECONDS + 10));

    let saved = QuarterStore::load(&path).unwrap().unwrap();
    assert_eq!(saved, tracker);

    assert_eq!(session.quarter_summary().streamed_this_quarter, Amount::ZERO);
    clock.advance(100);
    assert_eq!(session.quarter_summary().streamed_this_quarter, Amount::new(1, 1));

    session.logout().await.unwrap();
}

#[tokio::test]
async fn test_logout_tears_everything_down() {
    let ledger = Arc::new(MemoryLedger::new());
    ledger.set(reading("a"));
    let config = NodeConfig {
        streams: vec![StreamId::new("a")],
        ..Default::default()
    };
    let session = Session::login(&config, ledger, Arc::new(ManualClock::new(ANCHOR))).unwrap();
    session.scheduler().poll_now(&StreamId::new("a")).await.unwrap();
    assert_eq!(session.scheduler().observed().len(), 1);
    assert!(!session.projector().is_empty());

    session.logout().await.unwrap();
    assert!(!session.is_open());
    assert!(session.scheduler().observed().is_empty());
    assert!(session.projector().is_empty());
    assert!(matches!(session.observe(StreamId::new("b")), Err(EngineError::InvalidInput(_))));

    // Idempotent.
    session.logout().await.unwrap();
}

#[tokio::test]
async fn test_login_rejects_corrupt_quarter_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quarter.json");
    std::fs::write(&path, b"{ not json").unwrap();
    let config = NodeConfig {
        quarter_state_path: Some(path),
        ..Default::default()
    };

    let result = Session::login(&config, Arc::new(MemoryLedger::new()), Arc::new(ManualClock::new(ANCHOR)));
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));
}

#[tokio::test]
async fn test_login_rejects_blank_account() {
    let config = NodeConfig {
        account: "   ".to_string(),
        ..Default::default()
    };
    let result = Session::login(&config, Arc::new(MemoryLedger::new()), Arc::new(ManualClock::new(ANCHOR)));
    assert!(result.is_err());
}
