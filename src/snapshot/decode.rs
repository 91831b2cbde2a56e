// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! LedgerReading -> StreamSnapshot.

use crate::config::MAX_TAX_RATE_PERCENT;
use crate::error::{DecodeError, KernelError, KernelResult};
use crate::fxp::decode::{decode_scaled_rate_with_decimals, decode_token_amount};
use crate::snapshot::{LedgerReading, StreamSnapshot};

/// Decodes every field or none of them.
pub fn decode_reading(reading: &LedgerReading) -> KernelResult<StreamSnapshot> {
    if reading.stream_id.is_empty() {
        return Err(KernelError::EmptyStreamId);
    }
    if reading.tax_rate_percent > MAX_TAX_RATE_PERCENT {
        return Err(DecodeError::TaxRateOutOfRange(reading.tax_rate_percent).into());
    }

    let decimals = reading.token_decimals;
    let rate_per_second =
        decode_scaled_rate_with_decimals(reading.rate_per_second_scaled, reading.scale, decimals)?;
    let withdrawable_base = decode_token_amount(reading.withdrawable_base, decimals)?;
    let accrued_base = decode_token_amount(reading.accrued_base, decimals)?;
    let already_withdrawn = decode_token_amount(reading.already_withdrawn, decimals)?;

    Ok(StreamSnapshot {
        stream_id: reading.stream_id.clone(),
        rate_per_second,
        withdrawable_base,
        accrued_base,
        already_withdrawn,
        anchor_time: reading.anchor_time_seconds,
        status: reading.status,
        tax_rate_percent: reading.tax_rate_percent,
    })
}

impl TryFrom<&LedgerReading> for StreamSnapshot {
    type Error = KernelError;

    fn try_from(reading: &LedgerReading) -> Result<Self, Self::Error> {
        decode_reading(reading)
    }
}
