// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

/// Failure to turn a raw ledger word into a display amount.
///
/// Fatal to the single decode call only; callers keep whatever state they had.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Scale must be non-zero")]
    ZeroScale,

    #[error("Value does not fit the display range")]
    Overflow,

    #[error("Malformed integer literal: {0:?}")]
    InvalidDigits(String),

    #[error("Unsupported token decimals: {0}")]
    UnsupportedDecimals(u32),

    #[error("Tax rate {0}% outside 0..=100")]
    TaxRateOutOfRange(u8),

    #[error("Unknown stream status code: {0}")]
    InvalidStatus(u8),

    #[error("Unknown stream status: {0:?}")]
    UnknownStatusName(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Stream identifier must not be empty")]
    EmptyStreamId,
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
pub type DecodeResult<T> = core::result::Result<T, DecodeError>;
