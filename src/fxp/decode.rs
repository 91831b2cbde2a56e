// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger word -> display amount.
//!
//! Every division happens on integers. The only lossy step is the final
//! placement into a 28-digit decimal, which sits far below any displayed unit.

use crate::config::{DEFAULT_TOKEN_DECIMALS, MAX_DECIMAL_SCALE, SECONDS_PER_MONTH};
use crate::error::{DecodeError, DecodeResult};
use crate::types::scalar::Amount;
use crate::types::uint::U256;

fn check_decimals(decimals: u32) -> DecodeResult<()> {
    if decimals > MAX_DECIMAL_SCALE {
        return Err(DecodeError::UnsupportedDecimals(decimals));
    }
    Ok(())
}

fn pow10(exp: u32) -> DecodeResult<U256> {
    U256::pow10(exp).ok_or(DecodeError::Overflow)
}

/// Base units (wei) to display units.
pub fn decode_token_amount(raw: U256, decimals: u32) -> DecodeResult<Amount> {
    check_decimals(decimals)?;
    let wide = raw.to_u128().ok_or(DecodeError::Overflow)?;
    let mantissa = i128::try_from(wide).map_err(|_| DecodeError::Overflow)?;
    Amount::try_from_i128_with_scale(mantissa, decimals)
        .map(|a| a.normalize())
        .map_err(|_| DecodeError::Overflow)
}

/// Display units back to base units, rounding past `decimals` digits.
pub fn encode_token_amount(amount: Amount, decimals: u32) -> DecodeResult<U256> {
    check_decimals(decimals)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DecodeError::InvalidDigits(amount.to_string()));
    }
    let rounded = amount.round_dp(decimals);
    let mantissa = u128::try_from(rounded.mantissa()).map_err(|_| DecodeError::Overflow)?;
    U256::from_u128(mantissa)
        .checked_mul(pow10(decimals - rounded.scale())?)
        .ok_or(DecodeError::Overflow)
}

/// Decodes a scaled per-second rate with the default 18 token decimals.
pub fn decode_scaled_rate(scaled: U256, scale: U256) -> DecodeResult<Amount> {
    decode_scaled_rate_with_decimals(scaled, scale, DEFAULT_TOKEN_DECIMALS)
}

/// Decodes `scaled / scale` base units per second into display units per second.
///
/// The quotient carries whole base units. The remainder becomes a correction of
/// `remainder / (scale * 10^decimals)`, resolved to [`MAX_DECIMAL_SCALE`] digits.
pub fn decode_scaled_rate_with_decimals(scaled: U256, scale: U256, decimals: u32) -> DecodeResult<Amount> {
    if scale.is_zero() {
        return Err(DecodeError::ZeroScale);
    }
    check_decimals(decimals)?;

    let (whole, remainder) = scaled.div_rem(scale).ok_or(DecodeError::ZeroScale)?;
    let whole = decode_token_amount(whole, decimals)?;
    if remainder.is_zero() {
        return Ok(whole);
    }

    let spare_digits = MAX_DECIMAL_SCALE - decimals;
    let numerator = remainder
        .checked_mul(pow10(spare_digits)?)
        .ok_or(DecodeError::Overflow)?;
    // remainder < scale, so the digits fit below 10^spare_digits
    let (digits, _) = numerator.div_rem(scale).ok_or(DecodeError::ZeroScale)?;
    let digits = digits.to_u128().ok_or(DecodeError::Overflow)?;
    let correction = Amount::try_from_i128_with_scale(digits as i128, MAX_DECIMAL_SCALE)
        .map_err(|_| DecodeError::Overflow)?;

    whole
        .checked_add(correction)
        .map(|a| a.normalize())
        .ok_or(DecodeError::Overflow)
}

/// How the payroll contract derives `ratePerSecondScaled` from a monthly salary.
pub fn encode_monthly_salary(monthly_base_units: U256, scale: U256) -> DecodeResult<U256> {
    let scaled = monthly_base_units.checked_mul(scale).ok_or(DecodeError::Overflow)?;
    let (rate, _) = scaled
        .div_rem(U256::from_u64(SECONDS_PER_MONTH))
        .ok_or(DecodeError::ZeroScale)?;
    Ok(rate)
}
