//! Subcommand bodies. Each returns data; printing is left to `main`.

use crate::config::{decode_hex, CliConfig, ConfigError};
use poa_lock::{
    AggregatorSchedule, AuthorityConfig, AuthoritySetup, EncodingError, IssueDecision,
    PlannedSubblock, ReferenceKind, RoundState,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid cell data: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Identity {0} is not part of the aggregator set")]
    NotAnAggregator(String),
}

/// Configuration cell data.
pub fn setup_data(config: &CliConfig) -> Result<Vec<u8>, CommandError> {
    let setup = config.to_setup()?;
    let data = setup.to_bytes().map_err(ConfigError::from)?;
    info!(
        aggregators = setup.identities.len(),
        bytes = data.len(),
        "encoded authority configuration"
    );
    Ok(data)
}

/// 64-byte lock script args.
pub fn script_args(config: &CliConfig) -> Result<Vec<u8>, CommandError> {
    Ok(config.lock_args()?.to_bytes().to_vec())
}

/// Decoded configuration cell, as printed by `inspect-setup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupView {
    pub code_hash: String,
    pub hash_type: ReferenceKind,
    pub interval_type: &'static str,
    pub interval: u32,
    pub subblocks_per_round: u32,
    pub change_threshold: u8,
    pub identities: Vec<String>,
}

impl From<&AuthoritySetup> for SetupView {
    fn from(setup: &AuthoritySetup) -> Self {
        Self {
            code_hash: format!("0x{}", hex::encode(setup.code_reference)),
            hash_type: setup.reference_kind,
            interval_type: if setup.interval_uses_wall_clock {
                "seconds"
            } else {
                "blocks"
            },
            interval: setup.round_duration,
            subblocks_per_round: setup.subblocks_per_round,
            change_threshold: setup.change_threshold,
            identities: setup
                .identities
                .iter()
                .map(|identity| format!("0x{}", hex::encode(identity)))
                .collect(),
        }
    }
}

pub fn inspect_setup(data_hex: &str) -> Result<SetupView, CommandError> {
    let data = decode_hex("data", data_hex)?;
    let config = AuthorityConfig::parse(&data)?;
    Ok(SetupView::from(&AuthoritySetup::from(&config)))
}

pub fn inspect_state(data_hex: &str) -> Result<RoundState, CommandError> {
    let data = decode_hex("data", data_hex)?;
    Ok(RoundState::parse(&data)?)
}

/// Result of `plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub aggregator_index: u16,
    pub decision: IssueDecision,
    pub next: Option<PlannedSubblock>,
    pub state_data: Option<String>,
    /// Round this aggregator is in after planning; pass back as `--round-start`.
    pub round_start: Option<u64>,
}

/// Inputs of `plan`.
#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
    pub state_hex: &'a str,
    pub identity_hex: &'a str,
    pub now: u64,
    pub round_start: Option<u64>,
}

pub fn plan(config: &CliConfig, request: &PlanRequest<'_>) -> Result<PlanReport, CommandError> {
    let data = setup_data(config)?;
    let authority = AuthorityConfig::parse(&data)?;
    let last = inspect_state(request.state_hex)?;

    let identity = decode_hex("identity", request.identity_hex)?;
    let aggregator_index = authority
        .position_of(&identity)
        .ok_or_else(|| CommandError::NotAnAggregator(request.identity_hex.to_string()))?
        as u16;

    let mut schedule = match request.round_start {
        Some(start) => AggregatorSchedule::resume(aggregator_index, start),
        None => AggregatorSchedule::new(aggregator_index),
    };
    let decision = schedule.should_issue(&authority, &last, request.now);
    debug!(aggregator_index, ?decision, now = request.now, "issue decision");

    let next = match decision {
        IssueDecision::No => None,
        IssueDecision::Yes | IssueDecision::YesIfFull => {
            Some(schedule.next_subblock(&authority, &last, request.now))
        }
    };

    Ok(PlanReport {
        aggregator_index,
        decision,
        state_data: next.map(|planned| hex::encode(planned.state.to_bytes())),
        next,
        round_start: schedule.round_start(),
    })
}
