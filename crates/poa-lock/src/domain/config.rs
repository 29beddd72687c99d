//! # Authority Configuration
//!
//! Decoder for the configuration cell data:
//!
//! ```text
//! code_reference[32] | flags[1] | identity_size[1] | aggregator_count[1] |
//! change_threshold[1] | round_duration[4] | subblocks_per_round[4] |
//! identities[identity_size * aggregator_count]
//! ```
//!
//! Multi-byte fields are little-endian. Parsing is all-or-nothing and borrows
//! the identity section from the input buffer.

use super::errors::EncodingError;
use crate::constants::CONFIG_HEADER_SIZE;
use crate::hashing::Hash;
use serde::{Deserialize, Serialize};

const FLAG_REFERENCE_KIND: u8 = 0b01;
const FLAG_WALL_CLOCK: u8 = 0b10;

/// How the verification module's code reference is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Hash of the module image itself.
    Data,
    /// Hash of the type script guarding the module cell.
    Type,
}

impl ReferenceKind {
    /// Flag bit value.
    pub fn bit(self) -> u8 {
        match self {
            ReferenceKind::Data => 0,
            ReferenceKind::Type => FLAG_REFERENCE_KIND,
        }
    }
}

/// Parsed authority configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorityConfig<'a> {
    pub code_reference: Hash,
    pub reference_kind: ReferenceKind,
    /// Round time measured in timestamps when set, block numbers otherwise.
    pub interval_uses_wall_clock: bool,
    pub identity_size: u8,
    pub aggregator_count: u8,
    pub change_threshold: u8,
    pub round_duration: u32,
    pub subblocks_per_round: u32,
    identities: &'a [u8],
}

impl<'a> AuthorityConfig<'a> {
    /// Decode configuration cell data.
    pub fn parse(data: &'a [u8]) -> Result<Self, EncodingError> {
        if data.len() < CONFIG_HEADER_SIZE {
            return Err(EncodingError::ConfigTooShort(data.len()));
        }

        let mut code_reference = [0u8; 32];
        code_reference.copy_from_slice(&data[..32]);
        let flags = data[32];
        let identity_size = data[33];
        let aggregator_count = data[34];
        let change_threshold = data[35];
        let round_duration = read_u32(&data[36..40]);
        let subblocks_per_round = read_u32(&data[40..44]);

        if change_threshold > aggregator_count {
            return Err(EncodingError::ThresholdExceedsCount {
                threshold: change_threshold,
                count: aggregator_count,
            });
        }

        let expected = CONFIG_HEADER_SIZE + identity_size as usize * aggregator_count as usize;
        if data.len() != expected {
            return Err(EncodingError::ConfigLengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        let reference_kind = if flags & FLAG_REFERENCE_KIND != 0 {
            ReferenceKind::Type
        } else {
            ReferenceKind::Data
        };

        Ok(Self {
            code_reference,
            reference_kind,
            interval_uses_wall_clock: flags & FLAG_WALL_CLOCK != 0,
            identity_size,
            aggregator_count,
            change_threshold,
            round_duration,
            subblocks_per_round,
            identities: &data[CONFIG_HEADER_SIZE..],
        })
    }

    /// Identity of the aggregator at `index`.
    pub fn identity(&self, index: usize) -> Option<&'a [u8]> {
        if index >= self.aggregator_count as usize {
            return None;
        }
        let size = self.identity_size as usize;
        self.identities.get(index * size..(index + 1) * size)
    }

    /// Identities in aggregator index order.
    pub fn identities(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let size = self.identity_size as usize;
        let count = if size == 0 {
            0
        } else {
            self.aggregator_count as usize
        };
        self.identities.chunks_exact(size.max(1)).take(count)
    }

    /// Index of the aggregator owning `identity`.
    pub fn position_of(&self, identity: &[u8]) -> Option<usize> {
        if identity.len() != self.identity_size as usize {
            return None;
        }
        self.identities().position(|candidate| candidate == identity)
    }

    /// Raw flags byte as it appears on chain.
    pub fn flags(&self) -> u8 {
        let wall_clock = if self.interval_uses_wall_clock {
            FLAG_WALL_CLOCK
        } else {
            0
        };
        self.reference_kind.bit() | wall_clock
    }
}

pub(crate) fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}
