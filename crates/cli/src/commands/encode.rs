// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::str::FromStr;

use anyhow::Context;
use paystream_kernel::fxp::decode::{decode_scaled_rate_with_decimals, encode_monthly_salary, encode_token_amount};
use paystream_kernel::types::{Amount, U256};

use super::parse_word;

/// Reads a monthly salary either as a base-unit word or, with `in_tokens`, as a
/// display amount such as `3000.5`.
pub fn monthly_base_units(monthly: &str, decimals: u32, in_tokens: bool) -> anyhow::Result<U256> {
    if !in_tokens {
        return parse_word("monthly salary", monthly);
    }
    let amount = Amount::from_str(monthly.trim()).with_context(|| format!("invalid monthly salary: {monthly:?}"))?;
    Ok(encode_token_amount(amount, decimals)?)
}

/// The `ratePerSecondScaled` the payroll contract stores for a monthly salary in base units.
pub fn scaled_rate(monthly: U256, scale: U256) -> anyhow::Result<U256> {
    if scale.is_zero() {
        anyhow::bail!("scale must be non-zero");
    }
    Ok(encode_monthly_salary(monthly, scale)?)
}

pub fn run(monthly: &str, scale: &str, decimals: u32, in_tokens: bool) -> anyhow::Result<()> {
    let monthly = monthly_base_units(monthly, decimals, in_tokens)?;
    let scale = parse_word("scale", scale)?;
    let scaled = scaled_rate(monthly, scale)?;
    let per_second: Amount = decode_scaled_rate_with_decimals(scaled, scale, decimals)?;

    println!("{scaled}");
    eprintln!("= {} tokens/second at {} decimals", per_second.normalize(), decimals);
    Ok(())
}
