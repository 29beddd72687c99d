//! Operator configuration file.
//!
//! ```toml
//! [verification]
//! module = "secp256k1-blake160"      # builtin module, resolved by type hash
//! # code_hash = "0x..."              # or an explicit code reference
//! # hash_type = "type"               # "data" | "type"
//!
//! [round]
//! interval_type = "seconds"          # "seconds" | "blocks"
//! interval = 60
//! subblocks_per_round = 100
//!
//! [aggregators]
//! change_threshold = 2
//! identities = ["0x...", "0x...", "0x..."]
//!
//! [cells]                            # optional, needed by `script`
//! config_type_hash = "0x..."
//! state_type_hash = "0x..."
//! ```

use poa_lock::{AuthoritySetup, Hash, LockArgs, ReferenceKind, SetupError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid hex in `{field}`: {reason}")]
    InvalidHex { field: String, reason: String },

    #[error("`{field}` must be 32 bytes, got {len}")]
    InvalidHashLength { field: String, len: usize },

    #[error("Set exactly one of `verification.module` and `verification.code_hash`")]
    AmbiguousCodeReference,

    #[error("Unknown verification module `{0}`")]
    UnknownModule(String),

    #[error("Missing `[cells]` section")]
    MissingCells,

    #[error("Round interval must be positive")]
    ZeroInterval,

    #[error(transparent)]
    Setup(#[from] SetupError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalType {
    Seconds,
    Blocks,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerificationSection {
    pub module: Option<String>,
    pub code_hash: Option<String>,
    #[serde(default = "default_hash_type")]
    pub hash_type: ReferenceKind,
}

fn default_hash_type() -> ReferenceKind {
    ReferenceKind::Type
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoundSection {
    pub interval_type: IntervalType,
    pub interval: u32,
    pub subblocks_per_round: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregatorSection {
    pub change_threshold: u8,
    pub identities: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellSection {
    pub config_type_hash: String,
    pub state_type_hash: String,
}

/// Parsed `poa-authority` configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub verification: VerificationSection,
    pub round: RoundSection,
    pub aggregators: AggregatorSection,
    pub cells: Option<CellSection>,
}

impl CliConfig {
    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if let Some(cells) = &self.cells {
            parse_hash("cells.config_type_hash", &cells.config_type_hash)?;
            parse_hash("cells.state_type_hash", &cells.state_type_hash)?;
        }
        self.to_setup()?.validate()?;
        Ok(())
    }

    /// Code reference and how it resolves.
    pub fn code_reference(&self) -> Result<(Hash, ReferenceKind), ConfigError> {
        let verification = &self.verification;
        match (&verification.module, &verification.code_hash) {
            (Some(name), None) => {
                poa_verifiers::builtin_module(name)
                    .ok_or_else(|| ConfigError::UnknownModule(name.clone()))?;
                Ok((poa_verifiers::module_type_hash(name), ReferenceKind::Type))
            }
            (None, Some(code_hash)) => Ok((
                parse_hash("verification.code_hash", code_hash)?,
                verification.hash_type,
            )),
            _ => Err(ConfigError::AmbiguousCodeReference),
        }
    }

    pub fn to_setup(&self) -> Result<AuthoritySetup, ConfigError> {
        let (code_reference, reference_kind) = self.code_reference()?;
        let identities = self
            .aggregators
            .identities
            .iter()
            .enumerate()
            .map(|(i, identity)| decode_hex(&format!("aggregators.identities[{i}]"), identity))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AuthoritySetup {
            code_reference,
            reference_kind,
            interval_uses_wall_clock: self.round.interval_type == IntervalType::Seconds,
            change_threshold: self.aggregators.change_threshold,
            round_duration: self.round.interval,
            subblocks_per_round: self.round.subblocks_per_round,
            identities,
        })
    }

    pub fn lock_args(&self) -> Result<LockArgs, ConfigError> {
        let cells = self.cells.as_ref().ok_or(ConfigError::MissingCells)?;
        Ok(LockArgs {
            config_reference: parse_hash("cells.config_type_hash", &cells.config_type_hash)?,
            state_reference: parse_hash("cells.state_type_hash", &cells.state_type_hash)?,
        })
    }
}

/// Decode hex with an optional `0x` prefix.
pub fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, ConfigError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|e| ConfigError::InvalidHex {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_hash(field: &str, value: &str) -> Result<Hash, ConfigError> {
    let bytes = decode_hex(field, value)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| ConfigError::InvalidHashLength {
            field: field.to_string(),
            len: bytes.len(),
        })
}
