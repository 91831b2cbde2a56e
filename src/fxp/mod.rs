// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed-point arithmetic: ledger-word decoding and saturating amount ops.
pub mod decode;
pub mod ops;
