// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod id;
pub mod enums;
pub mod scalar;
pub mod uint;

pub use enums::StreamStatus;
pub use id::StreamId;
pub use scalar::Amount;
pub use uint::U256;
