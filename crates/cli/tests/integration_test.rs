use paystream_cli::commands::project::{self, ProjectAt};
use paystream_cli::commands::{decode, encode, format_unix};
use paystream_kernel::types::{Amount, StreamStatus, U256};
use std::str::FromStr;
use tempfile::tempdir;

const SCALE: &str = "1000000000000000000";

const READING: &str = r#"{
    "streamId": "0xstream",
    "ratePerSecondScaled": "19290123456790123456790123456",
    "scale": "0xde0b6b3a7640000",
    "withdrawableBase": "1200000000000000000",
    "accruedBase": "3400000000000000000",
    "alreadyWithdrawn": "800000000000000000",
    "anchorTimeSeconds": 1700000000,
    "status": "active",
    "taxRatePercent": 10
}"#;

fn dec(s: &str) -> Amount {
    Amount::from_str(s).unwrap()
}

#[test]
fn test_encode_then_decode_monthly_salary() {
    // 0.05 token / month
    let monthly = encode::monthly_base_units("50000000000000000", 18, false).unwrap();
    let scaled = encode::scaled_rate(monthly, SCALE.parse().unwrap()).unwrap();
    assert_eq!(scaled.to_string(), "19290123456790123456790123456");
    assert!(encode::run("50000000000000000", SCALE, 18, false).is_ok());

    let rates = decode::breakdown(&scaled.to_string(), SCALE, 18, 10).unwrap();
    assert_eq!(rates.per_second, dec("0.0000000192901234567901234567"));
    assert!((rates.per_month - dec("0.05")).abs() < dec("0.000000000001"));
    assert!(decode::run(&scaled.to_string(), SCALE, 18, 10).is_ok());
}

#[test]
fn test_decode_rejects_bad_input() {
    assert!(decode::breakdown("12", "0", 18, 0).is_err());
    assert!(decode::breakdown("not-a-number", SCALE, 18, 0).is_err());
    assert!(decode::breakdown("12", SCALE, 18, 101).is_err());
    assert!(encode::scaled_rate(U256::ONE, U256::ZERO).is_err());
    assert!(encode::monthly_base_units("-5", 18, true).is_err());
    assert!(encode::monthly_base_units("abc", 18, true).is_err());
    assert!(encode::run("1", "0", 18, false).is_err());
}

#[test]
fn test_encode_salary_in_tokens() {
    let from_tokens = encode::monthly_base_units("0.05", 18, true).unwrap();
    assert_eq!(from_tokens, encode::monthly_base_units("50000000000000000", 18, false).unwrap());
    assert_eq!(
        encode::monthly_base_units("3000", 6, true).unwrap(),
        U256::from_u64(3_000_000_000)
    );

    let scaled = encode::scaled_rate(from_tokens, SCALE.parse().unwrap()).unwrap();
    assert_eq!(scaled.to_string(), "19290123456790123456790123456");
    assert!(encode::run("0.05", SCALE, 18, true).is_ok());
}

#[test]
fn test_project_reading_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reading.json");
    std::fs::write(&path, READING).unwrap();

    let (snapshot, at_anchor) = project::projection(&path, ProjectAt::AfterAnchor(0)).unwrap();
    assert_eq!(snapshot.status, StreamStatus::Active);
    assert_eq!(at_anchor.live_withdrawable, dec("1.2"));
    assert_eq!(at_anchor.live_total_earned, dec("4.2"));
    assert_eq!(at_anchor.live_tax_accrued, dec("0.42"));

    let (_, later) = project::projection(&path, ProjectAt::Unix(1_700_000_000 + 2_592_000)).unwrap();
    assert_eq!(later.elapsed_seconds, 2_592_000);
    assert!((later.live_withdrawable - dec("1.25")).abs() < dec("0.000000000001"));

    let (_, before) = project::projection(&path, ProjectAt::Unix(1_699_999_000)).unwrap();
    assert_eq!(before.elapsed_seconds, 0);

    assert!(project::run(&path, ProjectAt::AfterAnchor(100), false).is_ok());
    assert!(project::run(&path, ProjectAt::Now, true).is_ok());
}

#[test]
fn test_project_rejects_bad_files() {
    let dir = tempdir().unwrap();
    assert!(project::run(&dir.path().join("missing.json"), ProjectAt::Now, false).is_err());

    let path = dir.path().join("bad.json");
    std::fs::write(&path, READING.replace("\"scale\": \"0xde0b6b3a7640000\"", "\"scale\": \"0\"")).unwrap();
    assert!(project::projection(&path, ProjectAt::Now).is_err());

    std::fs::write(&path, "{}").unwrap();
    assert!(project::load_reading(&path).is_err());
}

#[test]
fn test_format_unix() {
    assert_eq!(format_unix(1_700_000_000), "2023-11-14T22:13:20Z");
    assert_eq!(format_unix(u64::MAX), "1970-01-01T00:00:00Z");
}
