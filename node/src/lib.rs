// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod api;
pub mod clock;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod persistence;
pub mod scheduler;
pub mod server;
pub mod session;
pub mod telemetry;
