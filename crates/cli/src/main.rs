// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use paystream_cli::commands::project::ProjectAt;
use paystream_cli::commands::{decode, encode, project};
use std::path::PathBuf;

const DEFAULT_SCALE: &str = "1000000000000000000";

#[derive(Parser)]
#[command(name = "paystream")]
#[command(about = "Paystream offline tools: decode ledger rates and project stream readings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a scaled per-second rate and show it per display period
    DecodeRate {
        /// Scaled rate as stored on the ledger (decimal or 0x hex)
        scaled: String,

        #[arg(long, default_value = DEFAULT_SCALE)]
        scale: String,

        #[arg(long, default_value_t = 18)]
        decimals: u32,

        /// Tax rate percent, for the net column
        #[arg(long, default_value_t = 0)]
        tax: u8,
    },
    /// Compute the scaled rate the contract stores for a monthly salary
    EncodeRate {
        /// Monthly salary in base units, or in tokens with --tokens
        monthly: String,

        #[arg(long, default_value = DEFAULT_SCALE)]
        scale: String,

        #[arg(long, default_value_t = 18)]
        decimals: u32,

        /// Read the salary as a token amount (e.g. 3000.5)
        #[arg(long)]
        tokens: bool,
    },
    /// Project a saved ledger reading (JSON) to a point in time
    Project {
        reading: PathBuf,

        /// Unix seconds to project at
        #[arg(long, conflicts_with = "after")]
        at: Option<u64>,

        /// Seconds after the reading's anchor
        #[arg(long)]
        after: Option<u64>,

        /// Print the projection as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DecodeRate {
            scaled,
            scale,
            decimals,
            tax,
        } => decode::run(&scaled, &scale, decimals, tax),
        Commands::EncodeRate {
            monthly,
            scale,
            decimals,
            tokens,
        } => encode::run(&monthly, &scale, decimals, tokens),
        Commands::Project {
            reading,
            at,
            after,
            json,
        } => {
            let when = match (at, after) {
                (Some(t), _) => ProjectAt::Unix(t),
                (None, Some(secs)) => ProjectAt::AfterAnchor(secs),
                (None, None) => ProjectAt::Now,
            };
            project::run(&reading, when, json)
        }
    }
}
