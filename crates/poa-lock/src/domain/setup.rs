//! # Authority Setup
//!
//! Owned counterpart of [`AuthorityConfig`] used when creating or replacing
//! a configuration cell. Encodes to exactly the layout the parser accepts.

use super::config::{AuthorityConfig, ReferenceKind};
use crate::constants::CONFIG_HEADER_SIZE;
use crate::hashing::Hash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected setup parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("No identity is set up")]
    NoIdentities,

    #[error("Too many aggregators: {0}, at most 255")]
    TooManyAggregators(usize),

    #[error("Identity size must be between 1 and 255 bytes, got {0}")]
    InvalidIdentitySize(usize),

    #[error("Identity {index} has {actual} bytes, expected {expected}")]
    IdentityLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Change threshold {threshold} must be between 1 and {count}")]
    InvalidThreshold { threshold: u8, count: usize },
}

/// Authority parameters in owned form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoritySetup {
    pub code_reference: Hash,
    pub reference_kind: ReferenceKind,
    pub interval_uses_wall_clock: bool,
    pub change_threshold: u8,
    pub round_duration: u32,
    pub subblocks_per_round: u32,
    pub identities: Vec<Vec<u8>>,
}

impl AuthoritySetup {
    /// Check the parameters describe a usable aggregator set.
    pub fn validate(&self) -> Result<(), SetupError> {
        let first = self.identities.first().ok_or(SetupError::NoIdentities)?;
        if self.identities.len() > u8::MAX as usize {
            return Err(SetupError::TooManyAggregators(self.identities.len()));
        }
        if first.is_empty() || first.len() > u8::MAX as usize {
            return Err(SetupError::InvalidIdentitySize(first.len()));
        }
        for (index, identity) in self.identities.iter().enumerate().skip(1) {
            if identity.len() != first.len() {
                return Err(SetupError::IdentityLengthMismatch {
                    index,
                    expected: first.len(),
                    actual: identity.len(),
                });
            }
        }
        if self.change_threshold == 0 || self.change_threshold as usize > self.identities.len() {
            return Err(SetupError::InvalidThreshold {
                threshold: self.change_threshold,
                count: self.identities.len(),
            });
        }
        Ok(())
    }

    /// Identity size shared by every aggregator.
    pub fn identity_size(&self) -> usize {
        self.identities.first().map(Vec::len).unwrap_or(0)
    }

    /// Validate and encode as configuration cell data.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SetupError> {
        self.validate()?;

        let identity_size = self.identity_size();
        let mut data = Vec::with_capacity(CONFIG_HEADER_SIZE + identity_size * self.identities.len());
        data.extend_from_slice(&self.code_reference);

        let mut flags = self.reference_kind.bit();
        if self.interval_uses_wall_clock {
            flags |= 0b10;
        }
        data.push(flags);
        data.push(identity_size as u8);
        data.push(self.identities.len() as u8);
        data.push(self.change_threshold);
        data.extend_from_slice(&self.round_duration.to_le_bytes());
        data.extend_from_slice(&self.subblocks_per_round.to_le_bytes());
        for identity in &self.identities {
            data.extend_from_slice(identity);
        }
        Ok(data)
    }
}

impl From<&AuthorityConfig<'_>> for AuthoritySetup {
    fn from(config: &AuthorityConfig<'_>) -> Self {
        Self {
            code_reference: config.code_reference,
            reference_kind: config.reference_kind,
            interval_uses_wall_clock: config.interval_uses_wall_clock,
            change_threshold: config.change_threshold,
            round_duration: config.round_duration,
            subblocks_per_round: config.subblocks_per_round,
            identities: config.identities().map(<[u8]>::to_vec).collect(),
        }
    }
}
