//! `poa-authority`: encode, inspect and plan PoA authority cells.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use poa_cli::commands::{self, PlanRequest};
use poa_cli::CliConfig;
use poa_lock::RoundState;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "poa-authority")]
#[command(about = "Encode, inspect and plan round-robin PoA authority cells")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the configuration cell data
    Setup {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the 64-byte lock script args
    Script {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Encode a round state cell
    State {
        #[arg(long)]
        round_start: u64,
        /// Defaults to the round start
        #[arg(long)]
        subtime: Option<u64>,
        #[arg(long, default_value = "0")]
        subblock_index: u32,
        #[arg(long, default_value = "0")]
        aggregator_index: u16,
    },
    /// Decode configuration cell data (hex) to JSON
    InspectSetup { data: String },
    /// Decode round state cell data (hex) to JSON
    InspectState { data: String },
    /// Decide whether an aggregator issues now and plan its next subblock
    Plan {
        #[arg(short, long)]
        config: PathBuf,
        /// Current state cell data (hex)
        #[arg(long)]
        state: String,
        /// Aggregator identity (hex)
        #[arg(long)]
        identity: String,
        /// Current time in the configured metric
        #[arg(long)]
        now: u64,
        /// Start of the round this aggregator opened earlier
        #[arg(long)]
        round_start: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Setup { config } => {
            let data = commands::setup_data(&load(&config)?)?;
            println!("0x{}", hex::encode(data));
        }
        Command::Script { config } => {
            let args = commands::script_args(&load(&config)?)?;
            println!("0x{}", hex::encode(args));
        }
        Command::State {
            round_start,
            subtime,
            subblock_index,
            aggregator_index,
        } => {
            let state = RoundState {
                round_start_time: round_start,
                subtime: subtime.unwrap_or(round_start),
                subblock_index,
                aggregator_index,
            };
            println!("0x{}", hex::encode(state.to_bytes()));
        }
        Command::InspectSetup { data } => {
            let view = commands::inspect_setup(&data).context("decoding configuration cell")?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::InspectState { data } => {
            let state = commands::inspect_state(&data).context("decoding state cell")?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::Plan {
            config,
            state,
            identity,
            now,
            round_start,
        } => {
            let report = commands::plan(
                &load(&config)?,
                &PlanRequest {
                    state_hex: &state,
                    identity_hex: &identity,
                    now,
                    round_start,
                },
            )?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<CliConfig> {
    CliConfig::load(path).with_context(|| format!("loading {}", path.display()))
}
