//! Fixed-point amount operations.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::types::scalar::Amount;

/// Amount addition with saturation.
pub fn amt_add(a: Amount, b: Amount) -> Amount {
    a.saturating_add(b)
}

/// Amount subtraction clamped at zero. Balances never go negative.
pub fn amt_sub_floor(a: Amount, b: Amount) -> Amount {
    let d = a.saturating_sub(b);
    if d.is_sign_negative() {
        Amount::ZERO
    } else {
        d
    }
}

/// `rate * seconds` with saturation.
pub fn accrue(rate: Amount, seconds: u64) -> Amount {
    rate.saturating_mul(Amount::from(seconds))
}

/// `amount * pct / 100`.
pub fn percent_of(amount: Amount, pct: u8) -> Amount {
    amount
        .saturating_mul(Amount::from(pct))
        .checked_div(Amount::ONE_HUNDRED)
        .unwrap_or(Amount::ZERO)
}
