// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod projector;
pub mod quarter;

pub use projector::{ApplyOutcome, Projector};
pub use quarter::QuarterTracker;
