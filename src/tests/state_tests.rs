// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{DecodeError, KernelError};
use crate::snapshot::StreamSnapshot;
use crate::state::Projector;
use crate::tests::reading;
use crate::types::{Amount, StreamId, StreamStatus, U256};

const ANCHOR: u64 = 1_700_000_000;
const MONTHLY_005: u128 = 19_290_123_456_790_123_456_790_123_456;

fn paused_generation(id: &str, g: u64) -> StreamSnapshot {
    StreamSnapshot {
        stream_id: StreamId::new(id),
        rate_per_second: Amount::ZERO,
        withdrawable_base: Amount::from(g),
        accrued_base: Amount::from(2 * g),
        already_withdrawn: Amount::from(3 * g),
        anchor_time: ANCHOR + g,
        status: StreamStatus::Paused,
        tax_rate_percent: 0,
    }
}

#[test]
fn test_project_before_any_snapshot() {
    let projector = Projector::new();
    let p = projector.project(&StreamId::new("ghost"), ANCHOR);
    assert!(!p.initialized);
    assert_eq!(p.live_withdrawable, Amount::ZERO);
    assert!(projector.is_empty());
}

#[test]
fn test_apply_and_project() {
    let projector = Projector::new();
    let r = reading("a", MONTHLY_005, (1200, 3400, 800), ANCHOR, StreamStatus::Active, 10);
    let outcome = projector.apply_reading(&r).unwrap();
    assert!(outcome.previous.is_none());
    assert!(!outcome.regressed);

    let id = StreamId::new("a");
    let at_anchor = projector.project(&id, ANCHOR);
    assert!(at_anchor.initialized);
    assert_eq!(at_anchor.live_withdrawable, Amount::new(12, 1));

    let later = projector.project(&id, ANCHOR + 60);
    assert!(later.live_withdrawable > at_anchor.live_withdrawable);
    assert_eq!(projector.len(), 1);
}

#[test]
fn test_second_apply_wins() {
    let projector = Projector::new();
    let id = StreamId::new("a");
    projector.apply_reading(&reading("a", MONTHLY_005, (1000, 1000, 0), ANCHOR, StreamStatus::Active, 0)).unwrap();
    let outcome = projector
        .apply_reading(&reading("a", MONTHLY_005, (2000, 2000, 0), ANCHOR + 15, StreamStatus::Active, 0))
        .unwrap();

    assert_eq!(outcome.previous.unwrap().withdrawable_base, Amount::ONE);
    let p = projector.project(&id, ANCHOR + 15);
    assert_eq!(p.live_withdrawable, Amount::from(2));
    assert_eq!(p.live_total_earned, Amount::from(2));
}

#[test]
fn test_regressed_snapshot_passes_through() {
    let projector = Projector::new();
    let id = StreamId::new("a");
    projector.apply_reading(&reading("a", 0, (2000, 2000, 0), ANCHOR + 15, StreamStatus::Active, 0)).unwrap();
    let outcome = projector
        .apply_reading(&reading("a", 0, (1000, 1000, 0), ANCHOR, StreamStatus::Active, 0))
        .unwrap();

    assert!(outcome.regressed);
    assert_eq!(projector.project(&id, ANCHOR + 30).live_withdrawable, Amount::ONE);
}

#[test]
fn test_regression_flagged_with_forward_anchor() {
    let projector = Projector::new();
    projector.apply_reading(&reading("a", 0, (1000, 3000, 500), ANCHOR, StreamStatus::Active, 0)).unwrap();

    // Withdrawn amount fell while the anchor moved forward.
    let outcome = projector
        .apply_reading(&reading("a", 0, (1000, 3000, 400), ANCHOR + 15, StreamStatus::Active, 0))
        .unwrap();
    assert!(outcome.regressed);

    // Running total fell.
    let outcome = projector
        .apply_reading(&reading("a", 0, (1000, 2000, 400), ANCHOR + 30, StreamStatus::Active, 0))
        .unwrap();
    assert!(outcome.regressed);

    // A withdrawal is progress.
    let outcome = projector
        .apply_reading(&reading("a", 0, (0, 1500, 900), ANCHOR + 45, StreamStatus::Active, 0))
        .unwrap();
    assert!(!outcome.regressed);
}

#[test]
fn test_rejected_reading_keeps_prior_snapshot() {
    let projector = Projector::new();
    let id = StreamId::new("a");
    projector.apply_reading(&reading("a", 0, (1000, 1000, 0), ANCHOR, StreamStatus::Active, 0)).unwrap();

    let mut bad = reading("a", 0, (5000, 5000, 0), ANCHOR + 15, StreamStatus::Active, 0);
    bad.scale = U256::ZERO;
    assert_eq!(projector.apply_reading(&bad).unwrap_err(), KernelError::Decode(DecodeError::ZeroScale));

    let snap = projector.snapshot(&id).unwrap();
    assert_eq!(snap.withdrawable_base, Amount::ONE);
    assert_eq!(snap.anchor_time, ANCHOR);
}

#[test]
fn test_streams_are_independent() {
    let projector = Projector::new();
    projector.apply_reading(&reading("a", MONTHLY_005, (1000, 1000, 0), ANCHOR, StreamStatus::Active, 0)).unwrap();

    let mut bad = reading("b", 0, (1000, 1000, 0), ANCHOR, StreamStatus::Active, 0);
    bad.tax_rate_percent = 200;
    assert!(projector.apply_reading(&bad).is_err());

    let all = projector.project_many([&StreamId::new("a"), &StreamId::new("b")], ANCHOR + 10);
    assert!(all[0].initialized);
    assert!(!all[1].initialized);
}

#[test]
fn test_project_all_sorted_and_roster() {
    let projector = Projector::new();
    projector.apply_reading(&reading("c", 0, (1, 1, 1), ANCHOR, StreamStatus::Cancelled, 0)).unwrap();
    projector.apply_reading(&reading("a", 0, (1, 1, 1), ANCHOR, StreamStatus::Active, 0)).unwrap();
    projector.apply_reading(&reading("d", 0, (1, 1, 1), ANCHOR, StreamStatus::Pending, 0)).unwrap();
    projector.apply_reading(&reading("b", 0, (1, 1, 1), ANCHOR, StreamStatus::Paused, 0)).unwrap();

    let ids: Vec<String> = projector.project_all(ANCHOR).into_iter().map(|p| p.stream_id.0).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);

    let roster: Vec<String> = projector.project_active_roster(ANCHOR).into_iter().map(|p| p.stream_id.0).collect();
    assert_eq!(roster, vec!["a", "b"]);

    assert_eq!(projector.stream_ids().len(), 4);
}

#[test]
fn test_forget_and_rates() {
    let projector = Projector::new();
    let id = StreamId::new("a");
    projector.apply_reading(&reading("a", MONTHLY_005, (0, 0, 0), ANCHOR, StreamStatus::Active, 0)).unwrap();
    assert!(projector.rates(&id).is_some());

    assert!(projector.forget(&id));
    assert!(!projector.forget(&id));
    assert!(projector.rates(&id).is_none());
    assert!(!projector.project(&id, ANCHOR).initialized);
}

#[test]
fn test_no_mixed_snapshot_under_concurrent_readers() {
    let projector = Projector::new();
    projector.apply_snapshot(paused_generation("a", 1));
    let done = AtomicBool::new(false);
    let id = StreamId::new("a");

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for g in 2..2_000u64 {
                projector.apply_snapshot(paused_generation("a", g));
            }
            done.store(true, Ordering::SeqCst);
        });

        for _ in 0..3 {
            scope.spawn(|| {
                while !done.load(Ordering::SeqCst) {
                    let p = projector.project(&id, ANCHOR + 10_000);
                    // Every generation keeps total == 5 * withdrawable; a blend would not.
                    assert_eq!(p.live_total_earned, p.live_withdrawable * Amount::from(5));
                }
            });
        }
    });

    let last = projector.project(&id, ANCHOR + 10_000);
    assert_eq!(last.live_withdrawable, Amount::from(1_999));
}
