// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Stream lifecycle enums.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// On-chain stream status, encoded as `uint8` by the ledger.
///
/// Serializes as the lowercase name. Deserializes from the name or the raw code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawStatus")]
#[repr(u8)]
pub enum StreamStatus {
    Pending = 0,
    Active = 1,
    Paused = 2,
    Cancelled = 3,
}

impl StreamStatus {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(StreamStatus::Pending),
            1 => Some(StreamStatus::Active),
            2 => Some(StreamStatus::Paused),
            3 => Some(StreamStatus::Cancelled),
            _ => None,
        }
    }

    /// Only an active stream accrues.
    pub fn is_accruing(self) -> bool {
        self == StreamStatus::Active
    }

    /// Streams an employer still sees on the roster.
    pub fn is_on_roster(self) -> bool {
        matches!(self, StreamStatus::Active | StreamStatus::Paused)
    }
}

impl Default for StreamStatus {
    fn default() -> Self {
        StreamStatus::Pending
    }
}

impl TryFrom<u8> for StreamStatus {
    type Error = DecodeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        StreamStatus::from_u8(v).ok_or(DecodeError::InvalidStatus(v))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Code(u8),
    Name(String),
}

impl TryFrom<RawStatus> for StreamStatus {
    type Error = DecodeError;

    fn try_from(raw: RawStatus) -> Result<Self, Self::Error> {
        match raw {
            RawStatus::Code(code) => StreamStatus::try_from(code),
            RawStatus::Name(name) => match name.to_ascii_lowercase().as_str() {
                "pending" => Ok(StreamStatus::Pending),
                "active" => Ok(StreamStatus::Active),
                "paused" => Ok(StreamStatus::Paused),
                "cancelled" => Ok(StreamStatus::Cancelled),
                _ => Err(DecodeError::UnknownStatusName(name)),
            },
        }
    }
}
