// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Display-precision monetary scalar.

/// Token amount in display units (e.g. HLUSD, not wei), carried as a fixed-point
/// decimal with an explicit scale of up to 28 fractional digits.
pub type Amount = rust_decimal::Decimal;
