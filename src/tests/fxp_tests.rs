// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use core::str::FromStr;
use crate::config::{DEFAULT_RATE_SCALE, SECONDS_PER_MONTH};
use crate::error::DecodeError;
use crate::fxp::decode::{
    decode_scaled_rate, decode_scaled_rate_with_decimals, decode_token_amount, encode_monthly_salary,
    encode_token_amount,
};
use crate::fxp::ops::{accrue, amt_add, amt_sub_floor, percent_of};
use crate::types::{Amount, U256};

fn dec(s: &str) -> Amount {
    Amount::from_str(s).unwrap()
}

fn scale() -> U256 {
    U256::from_u128(DEFAULT_RATE_SCALE)
}

#[test]
fn test_decode_token_amount() {
    let raw = U256::from_u128(1_200_000_000_000_000_000);
    assert_eq!(decode_token_amount(raw, 18).unwrap(), dec("1.2"));

    // 1 wei
    assert_eq!(decode_token_amount(U256::ONE, 18).unwrap(), dec("0.000000000000000001"));

    // 6-decimal token
    assert_eq!(decode_token_amount(U256::from_u64(2_500_000), 6).unwrap(), dec("2.5"));

    assert_eq!(decode_token_amount(U256::ZERO, 18).unwrap(), Amount::ZERO);
}

#[test]
fn test_decode_token_amount_rejects_out_of_range() {
    assert_eq!(decode_token_amount(U256::MAX, 18), Err(DecodeError::Overflow));
    assert_eq!(decode_token_amount(U256::ONE, 29), Err(DecodeError::UnsupportedDecimals(29)));
}

#[test]
fn test_encode_token_amount() {
    assert_eq!(encode_token_amount(dec("0.05"), 18).unwrap(), U256::from_u128(50_000_000_000_000_000));
    assert_eq!(encode_token_amount(dec("3"), 6).unwrap(), U256::from_u64(3_000_000));
    assert!(encode_token_amount(dec("-1"), 18).is_err());
}

#[test]
fn test_decode_scaled_rate_zero_scale() {
    let r = decode_scaled_rate(U256::from_u64(1000), U256::ZERO);
    assert_eq!(r, Err(DecodeError::ZeroScale));
}

#[test]
fn test_decode_scaled_rate_monthly_salary_precision() {
    // 0.05 token per 30-day month, as the payroll contract stores it.
    let monthly = U256::from_u128(50_000_000_000_000_000);
    let scaled = encode_monthly_salary(monthly, scale()).unwrap();
    assert_eq!(scaled.to_string(), "19290123456790123456790123456");

    let rate = decode_scaled_rate(scaled, scale()).unwrap();
    let expected = dec("0.05") / Amount::from(SECONDS_PER_MONTH);
    assert!((rate - expected).abs() < dec("0.000000000001"));

    // Whole-wei quotient plus sub-wei correction, digit for digit.
    assert_eq!(rate, dec("0.0000000192901234567901234567"));
}

#[test]
fn test_decode_scaled_rate_sub_wei_remainder_only() {
    // Quotient is zero; everything lives in the correction term.
    let rate = decode_scaled_rate(U256::from_u128(19_290_123_456_789), scale()).unwrap();
    assert!(rate > Amount::ZERO);
    assert_eq!(rate, dec("0.0000000000000000000000192901"));
}

#[test]
fn test_decode_scaled_rate_exact_division() {
    // 3 wei/sec exactly
    let scaled = U256::from_u128(3 * DEFAULT_RATE_SCALE);
    let rate = decode_scaled_rate(scaled, scale()).unwrap();
    assert_eq!(rate, dec("0.000000000000000003"));

    // Scale of one with 0 decimals: the word is the rate.
    let rate = decode_scaled_rate_with_decimals(U256::from_u64(7), U256::ONE, 0).unwrap();
    assert_eq!(rate, Amount::from(7));
}

#[test]
fn test_decode_scaled_rate_beyond_f64_mantissa() {
    // ~2^200: far past what a double holds exactly, still decodes on integers.
    let big_scale = U256::pow10(60).unwrap();
    let scaled = U256::pow10(60).unwrap().checked_mul(U256::from_u64(42)).unwrap();
    let rate = decode_scaled_rate(scaled, big_scale).unwrap();
    assert_eq!(rate, dec("0.000000000000000042"));
}

#[test]
fn test_amount_ops() {
    assert_eq!(amt_add(dec("1.5"), dec("2.25")), dec("3.75"));
    assert_eq!(amt_sub_floor(dec("1"), dec("3")), Amount::ZERO);
    assert_eq!(amt_sub_floor(dec("3"), dec("1")), dec("2"));
    assert_eq!(accrue(dec("0.5"), 10), dec("5"));
    assert_eq!(percent_of(dec("4.2"), 10), dec("0.42"));
    assert_eq!(percent_of(dec("4.2"), 0), Amount::ZERO);
}

#[test]
fn test_amount_saturation() {
    let sat = amt_add(Amount::MAX, Amount::ONE);
    assert_eq!(sat, Amount::MAX);

    let sat = accrue(Amount::MAX, u64::MAX);
    assert_eq!(sat, Amount::MAX);
}
