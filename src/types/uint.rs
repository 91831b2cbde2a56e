// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Unsigned 256-bit ledger word.
//!
//! Just enough arithmetic to decode EVM `uint256` values without routing them
//! through binary floating point: checked add/sub/mul, long division, decimal and
//! hex parsing, decimal printing.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Little-endian limbs: `0[0]` holds the least significant 64 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawWord", into = "String")]
pub struct U256([u64; 4]);

/// 10^19, the largest power of ten that fits a limb.
const TEN_POW_19: u64 = 10_000_000_000_000_000_000;

impl U256 {
    pub const ZERO: U256 = U256([0; 4]);
    pub const ONE: U256 = U256([1, 0, 0, 0]);
    pub const MAX: U256 = U256([u64::MAX; 4]);

    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        U256(limbs)
    }

    pub const fn from_u64(v: u64) -> Self {
        U256([v, 0, 0, 0])
    }

    pub const fn from_u128(v: u128) -> Self {
        U256([v as u64, (v >> 64) as u64, 0, 0])
    }

    pub fn limbs(&self) -> [u64; 4] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    pub fn to_u128(&self) -> Option<u128> {
        if self.0[2] != 0 || self.0[3] != 0 {
            return None;
        }
        Some((self.0[0] as u128) | ((self.0[1] as u128) << 64))
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u32 {
        for i in (0..4).rev() {
            if self.0[i] != 0 {
                return 64 * i as u32 + (64 - self.0[i].leading_zeros());
            }
        }
        0
    }

    fn bit(&self, n: u32) -> bool {
        (self.0[(n / 64) as usize] >> (n % 64)) & 1 == 1
    }

    fn set_bit(&mut self, n: u32) {
        self.0[(n / 64) as usize] |= 1 << (n % 64);
    }

    fn shl1(self) -> Self {
        let mut out = [0u64; 4];
        for i in 0..4 {
            out[i] = self.0[i] << 1;
            if i > 0 {
                out[i] |= self.0[i - 1] >> 63;
            }
        }
        U256(out)
    }

    fn wrapping_sub(self, rhs: Self) -> Self {
        let mut out = [0u64; 4];
        let mut borrow = false;
        for i in 0..4 {
            let (d, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (d, b2) = d.overflowing_sub(borrow as u64);
            out[i] = d;
            borrow = b1 || b2;
        }
        U256(out)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let mut out = [0u64; 4];
        let mut carry = false;
        for i in 0..4 {
            let (s, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (s, c2) = s.overflowing_add(carry as u64);
            out[i] = s;
            carry = c1 || c2;
        }
        if carry {
            None
        } else {
            Some(U256(out))
        }
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        if self < rhs {
            None
        } else {
            Some(self.wrapping_sub(rhs))
        }
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        // Schoolbook product into 512 bits, then reject anything above 256.
        let mut wide = [0u64; 8];
        for i in 0..4 {
            let mut carry: u128 = 0;
            for j in 0..4 {
                let cur = wide[i + j] as u128 + (self.0[i] as u128) * (rhs.0[j] as u128) + carry;
                wide[i + j] = cur as u64;
                carry = cur >> 64;
            }
            wide[i + 4] = carry as u64;
        }
        if wide[4..].iter().any(|&l| l != 0) {
            return None;
        }
        Some(U256([wide[0], wide[1], wide[2], wide[3]]))
    }

    /// Quotient and remainder. `None` on a zero divisor.
    pub fn div_rem(self, divisor: Self) -> Option<(Self, Self)> {
        if divisor.is_zero() {
            return None;
        }
        if self < divisor {
            return Some((U256::ZERO, self));
        }

        let mut quotient = U256::ZERO;
        let mut rem = U256::ZERO;
        for i in (0..self.bits()).rev() {
            // Bit shifted out of the remainder: the true value is rem + 2^256.
            let overflow = rem.0[3] >> 63 == 1;
            rem = rem.shl1();
            if self.bit(i) {
                rem.0[0] |= 1;
            }
            if overflow || rem >= divisor {
                rem = rem.wrapping_sub(divisor);
                quotient.set_bit(i);
            }
        }
        Some((quotient, rem))
    }

    /// 10^exp, or `None` past 2^256.
    pub fn pow10(exp: u32) -> Option<Self> {
        let ten = U256::from_u64(10);
        let mut acc = U256::ONE;
        for _ in 0..exp {
            acc = acc.checked_mul(ten)?;
        }
        Some(acc)
    }

    fn parse_hex(digits: &str) -> Result<Self, DecodeError> {
        if digits.is_empty() || digits.len() > 64 {
            return Err(DecodeError::InvalidDigits(digits.to_string()));
        }
        let mut out = U256::ZERO;
        for ch in digits.chars() {
            let nibble = ch
                .to_digit(16)
                .ok_or_else(|| DecodeError::InvalidDigits(digits.to_string()))?;
            for _ in 0..4 {
                out = out.shl1();
            }
            out.0[0] |= nibble as u64;
        }
        Ok(out)
    }

    fn parse_decimal(digits: &str) -> Result<Self, DecodeError> {
        // Underscores only between digits.
        if digits.is_empty() || digits.split('_').any(str::is_empty) {
            return Err(DecodeError::InvalidDigits(digits.to_string()));
        }
        let ten = U256::from_u64(10);
        let mut out = U256::ZERO;
        for ch in digits.chars() {
            if ch == '_' {
                continue;
            }
            let d = ch
                .to_digit(10)
                .ok_or_else(|| DecodeError::InvalidDigits(digits.to_string()))?;
            out = out
                .checked_mul(ten)
                .and_then(|v| v.checked_add(U256::from_u64(d as u64)))
                .ok_or(DecodeError::Overflow)?;
        }
        Ok(out)
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for U256 {
    fn from(v: u64) -> Self {
        U256::from_u64(v)
    }
}

impl From<u128> for U256 {
    fn from(v: u128) -> Self {
        U256::from_u128(v)
    }
}

impl FromStr for U256 {
    type Err = DecodeError;

    /// Accepts decimal digits (underscores allowed) or a `0x`-prefixed hex word.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => U256::parse_hex(hex),
            None => U256::parse_decimal(s),
        }
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.pad("0");
        }
        let chunk = U256::from_u64(TEN_POW_19);
        let mut chunks: Vec<u64> = Vec::new();
        let mut rest = *self;
        while !rest.is_zero() {
            // chunk is non-zero, so div_rem always succeeds
            let Some((q, r)) = rest.div_rem(chunk) else { break };
            chunks.push(r.0[0]);
            rest = q;
        }
        let mut out = String::new();
        if let Some((head, tail)) = chunks.split_last() {
            out.push_str(&head.to_string());
            for c in tail.iter().rev() {
                out.push_str(&format!("{:019}", c));
            }
        }
        f.pad(&out)
    }
}

impl From<U256> for String {
    fn from(v: U256) -> Self {
        v.to_string()
    }
}

/// What a JSON ledger gateway may hand us for a `uint256`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawWord {
    Text(String),
    Number(u64),
}

impl TryFrom<RawWord> for U256 {
    type Error = DecodeError;

    fn try_from(raw: RawWord) -> Result<Self, Self::Error> {
        match raw {
            RawWord::Text(s) => s.parse(),
            RawWord::Number(n) => Ok(U256::from_u64(n)),
        }
    }
}
